use super::*;
use serde_json::json;

#[test]
fn parses_hex_forms() {
    let c: Color = "#ff0000".parse().unwrap();
    assert_eq!(c.to_rgba8(), [255, 0, 0, 255]);

    let c: Color = "#0000ff80".parse().unwrap();
    assert_eq!(c.to_rgba8(), [0, 0, 255, 128]);

    let c: Color = "#fff".parse().unwrap();
    assert_eq!(c.to_rgba8(), [255, 255, 255, 255]);

    let c: Color = "6366F1".parse().unwrap();
    assert_eq!(c, Color::INDIGO);
}

#[test]
fn parses_functional_and_named() {
    let c: Color = "rgba(0,0,0,0.8)".parse().unwrap();
    assert_eq!(c.to_rgba8(), [0, 0, 0, 204]);

    let c: Color = "rgb(100% 50% 0%)".parse().unwrap();
    assert_eq!(c.to_rgba8(), [255, 128, 0, 255]);

    let c: Color = "hsl(0, 100%, 50%)".parse().unwrap();
    assert_eq!(c.to_rgba8(), [255, 0, 0, 255]);

    let c: Color = "White".parse().unwrap();
    assert_eq!(c, Color::WHITE);
}

#[test]
fn rejects_garbage() {
    assert!("not-a-color".parse::<Color>().is_err());
    assert!("#12345".parse::<Color>().is_err());
    assert!("rgb(1,2)".parse::<Color>().is_err());
}

#[test]
fn serde_accepts_objects_and_arrays_and_writes_hex() {
    let c: Color = serde_json::from_value(json!({"r": 1.0, "g": 0.0, "b": 0.0})).unwrap();
    assert_eq!(c.to_rgba8(), [255, 0, 0, 255]);

    let c: Color = serde_json::from_value(json!([0.0, 0.0, 1.0, 0.5])).unwrap();
    assert_eq!(c.to_hex(), "#0000ff80");

    let c: Color = serde_json::from_value(json!({"h": 120.0, "s": 1.0, "l": 0.5})).unwrap();
    assert_eq!(c.to_rgba8(), [0, 255, 0, 255]);

    assert_eq!(serde_json::to_value(Color::INDIGO).unwrap(), json!("#6366f1"));
}

#[test]
fn premul_quantization() {
    let c = Color::rgba(1.0, 0.5, 0.0, 0.5);
    let p = c.to_rgba8_premul();
    assert_eq!((p.r, p.g, p.b, p.a), (128, 64, 0, 128));
}
