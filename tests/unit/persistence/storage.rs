use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "storyframe_{name}_{}_{}",
        std::process::id(),
        now_ms()
    ))
}

fn record(prompt: &str) -> NewSavedImage {
    NewSavedImage {
        image_url: "generated/a.png".into(),
        thumbnail_url: "thumbnails/a.jpg".into(),
        prompt: prompt.into(),
        slide_number: 1,
        original_message: None,
        settings: OverlaySettings::default(),
        file_size: 10,
        mime_type: "image/png".into(),
    }
}

#[test]
fn fs_storage_upload_read_delete() {
    let root = temp_dir("fs_storage");
    let s = FsAssetStorage::new(&root);
    let url = s.upload(b"abc", "generated/x.png").unwrap();
    assert_eq!(url, "generated/x.png");
    assert_eq!(s.read(&url).unwrap(), b"abc");

    // Same name again overwrites.
    s.upload(b"abcd", "generated/x.png").unwrap();
    assert_eq!(s.read(&url).unwrap(), b"abcd");

    s.delete(&[url.clone(), "generated/missing.png".into()]).unwrap();
    assert!(s.read(&url).is_err());
    assert!(s.upload(b"x", "../escape.png").is_err());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn in_memory_store_assigns_ids_and_increasing_times() {
    let m = InMemoryMetadataStore::new();
    let a = m.insert(record("a")).unwrap();
    let b = m.insert(record("b")).unwrap();
    assert_ne!(a.id, b.id);
    assert!(b.created_at_ms > a.created_at_ms);
    assert_eq!(m.get(&a.id).unwrap().unwrap().prompt, "a");
    m.delete(&a.id).unwrap();
    assert!(m.get(&a.id).unwrap().is_none());
    assert_eq!(m.list().unwrap().len(), 1);
    m.delete("unknown").unwrap();
}

#[test]
fn json_store_persists_across_instances() {
    let dir = temp_dir("json_store");
    let path = dir.join("saved.json");
    let first = JsonMetadataStore::new(&path);
    assert!(first.list().unwrap().is_empty());
    let saved = first.insert(record("persisted")).unwrap();

    let second = JsonMetadataStore::new(&path);
    let rows = second.list().unwrap();
    assert_eq!(rows, vec![saved.clone()]);
    second.delete(&saved.id).unwrap();
    assert!(first.list().unwrap().is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn json_store_reports_corrupt_file() {
    let dir = temp_dir("json_corrupt");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("saved.json");
    std::fs::write(&path, b"{not json").unwrap();
    let err = JsonMetadataStore::new(&path).list().unwrap_err();
    assert!(matches!(err, StoryError::Persistence(_)));
    std::fs::remove_dir_all(&dir).ok();
}
