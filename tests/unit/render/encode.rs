use super::*;

#[test]
fn png_round_trips_straight_pixels() {
    let canvas = Canvas::new(2, 1).unwrap();
    let premul = vec![255u8, 0, 0, 255, 64, 32, 0, 128];
    let bytes = encode_rgba8_premul(&premul, canvas, OutputFormat::Png).unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [128, 64, 0, 128]);
}

#[test]
fn jpeg_has_expected_dimensions() {
    let canvas = Canvas::new(16, 8).unwrap();
    let premul = [10u8, 200, 30, 255].repeat(16 * 8);
    let bytes = encode_rgba8_premul(&premul, canvas, OutputFormat::Jpeg { quality: 80 }).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (16, 8));
}

#[test]
fn mismatched_buffer_is_rejected() {
    let canvas = Canvas::new(2, 2).unwrap();
    assert!(encode_rgba8_premul(&[0u8; 4], canvas, OutputFormat::Png).is_err());
}

#[test]
fn format_metadata() {
    assert_eq!(OutputFormat::default(), OutputFormat::Png);
    assert_eq!(OutputFormat::Jpeg { quality: 70 }.extension(), "jpg");
    assert_eq!(OutputFormat::Png.mime(), "image/png");
    let json = serde_json::to_string(&OutputFormat::Jpeg { quality: 70 }).unwrap();
    assert_eq!(json, r#"{"kind":"jpeg","quality":70}"#);
}
