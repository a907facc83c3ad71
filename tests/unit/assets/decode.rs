use std::io::Cursor;

use super::*;

fn encode_png(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let prepared = decode_image(&encode_png(img)).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(prepared.format, Some(image::ImageFormat::Png));
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn decode_svg_parse_ok_and_err() {
    let ok = br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"#;
    parse_svg(ok).unwrap();

    let bad = br#"<svg"#;
    assert!(parse_svg(bad).is_err());
}

#[test]
fn decode_logo_sniffs_svg_and_raster() {
    let svg = br#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="red"/></svg>"#;
    let logo = decode_logo(svg).unwrap();
    assert!(matches!(logo, PreparedLogo::Svg(_)));
    assert_eq!(logo.natural_size(), (40.0, 20.0));

    let png = encode_png(image::RgbaImage::from_pixel(8, 4, image::Rgba([0, 0, 0, 255])));
    let logo = decode_logo(&png).unwrap();
    assert!(matches!(logo, PreparedLogo::Raster(_)));
    assert_eq!(logo.natural_size(), (8.0, 4.0));
}

#[test]
fn svg_rasterizes_at_requested_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#00ff00"/></svg>"##;
    let tree = parse_svg(svg).unwrap();
    let px = rasterize_svg_to_premul_rgba8(&tree.tree, 20, 20).unwrap();
    assert_eq!(px.len(), 20 * 20 * 4);
    let mid = (10 * 20 + 10) * 4;
    assert_eq!(&px[mid..mid + 4], &[0, 255, 0, 255]);

    assert!(rasterize_svg_to_premul_rgba8(&tree.tree, 0, 20).is_err());
}
