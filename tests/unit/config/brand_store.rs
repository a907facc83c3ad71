use super::*;
use crate::assets::color::Color;
use crate::assets::store::ImageRef;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "storyframe_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn custom() -> BrandConfig {
    BrandConfig {
        logo_image: Some(ImageRef::new("logo.svg")),
        primary_color: Color::from_rgba8(255, 0, 128, 255),
        font_preference: "Shippori Mincho".into(),
    }
}

#[test]
fn missing_file_loads_as_absent() {
    let store = JsonFileBrandStore::in_dir(temp_dir("brand_missing"));
    assert!(store.load().is_none());
    assert_eq!(load_or_default(&store), BrandConfig::default());
}

#[test]
fn save_then_load_round_trips() {
    let dir = temp_dir("brand_roundtrip");
    let store = JsonFileBrandStore::in_dir(&dir);
    store.save(&custom()).unwrap();
    assert_eq!(store.path(), dir.join("brand-config.json"));
    assert_eq!(store.load(), Some(custom()));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_file_is_treated_as_absent() {
    let dir = temp_dir("brand_malformed");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(BRAND_CONFIG_FILE), b"{\"primary_color\": 12").unwrap();
    let store = JsonFileBrandStore::in_dir(&dir);
    assert!(store.load().is_none());
    assert_eq!(load_or_default(&store), BrandConfig::default());
    std::fs::remove_dir_all(&dir).ok();

    assert!(MemoryBrandStore::with_raw("not json").load().is_none());
}

#[test]
fn autosave_only_when_customized() {
    let store = MemoryBrandStore::default();
    assert!(!autosave_if_customized(&store, &BrandConfig::default()).unwrap());
    assert!(store.load().is_none());

    assert!(autosave_if_customized(&store, &custom()).unwrap());
    assert_eq!(store.load(), Some(custom()));
}

#[test]
fn partial_json_fills_defaults() {
    let store = MemoryBrandStore::with_raw(r##"{"primary_color": "#ff0000"}"##);
    let cfg = store.load().unwrap();
    assert_eq!(cfg.primary_color.to_hex(), "#ff0000");
    assert_eq!(cfg.font_preference, "Noto Sans JP Bold");
    assert!(cfg.logo_image.is_none());
}

#[test]
fn explicit_config_dir_wins() {
    let p = PathBuf::from("/tmp/somewhere");
    assert_eq!(resolve_config_dir(Some(&p)), p);
}
