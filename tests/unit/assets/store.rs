use super::*;

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn inline_refs_decode_without_io() {
    let r = ImageRef::from_bytes("image/png", &[1, 2, 3, 250]);
    assert!(r.is_inline());
    assert_eq!(r.inline_mime(), Some("image/png"));

    let src = MemoryByteSource::new();
    assert_eq!(r.read_bytes(&src).unwrap(), vec![1, 2, 3, 250]);
}

#[test]
fn url_refs_go_through_the_source() {
    let src = MemoryByteSource::new();
    src.insert("https://cdn.example/bg.png", vec![9, 9]);

    let r = ImageRef::new("https://cdn.example/bg.png");
    assert!(!r.is_inline());
    assert_eq!(r.inline_mime(), None);
    assert_eq!(r.read_bytes(&src).unwrap(), vec![9, 9]);

    assert!(ImageRef::new("https://cdn.example/missing.png")
        .read_bytes(&src)
        .is_err());
}

#[test]
fn malformed_data_urls_are_rejected() {
    let src = MemoryByteSource::new();
    assert!(ImageRef::new("data:image/png;base64").read_bytes(&src).is_err());
    assert!(ImageRef::new("data:text/plain,hello").read_bytes(&src).is_err());
    assert!(ImageRef::new("data:image/png;base64,@@@").read_bytes(&src).is_err());
}

#[test]
fn fs_source_reads_relative_paths() {
    let dir = std::env::temp_dir().join(format!("storyframe-store-{}", std::process::id()));
    std::fs::create_dir_all(dir.join("sub")).unwrap();
    std::fs::write(dir.join("sub/x.bin"), [7u8, 8]).unwrap();

    let src = FsByteSource::new(&dir);
    assert_eq!(src.read("sub/x.bin").unwrap(), vec![7, 8]);
    assert!(src.read("../escape.bin").is_err());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn debug_hides_inline_payload() {
    let r = ImageRef::from_bytes("image/jpeg", &[0u8; 64]);
    let dbg = format!("{r:?}");
    assert!(dbg.starts_with("ImageRef(data:image/jpeg;base64"));
    assert!(!dbg.contains("AAAA"));
}
