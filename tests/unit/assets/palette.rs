use std::io::Cursor;

use super::*;

fn png(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn solid_color_is_dominant() {
    let bytes = png(image::RgbaImage::from_pixel(
        64,
        64,
        image::Rgba([128, 64, 192, 255]),
    ));
    let p = extract_palette(&bytes).unwrap();
    assert_eq!(p.dominant.to_hex(), "#8040c0");
    assert_eq!(p.palette, vec![p.dominant]);
}

#[test]
fn fully_transparent_image_falls_back_to_indigo() {
    let bytes = png(image::RgbaImage::from_pixel(10, 10, image::Rgba([255, 0, 0, 0])));
    let p = extract_palette(&bytes).unwrap();
    assert_eq!(p.dominant, Color::INDIGO);
    assert_eq!(p.palette.len(), 1);
}

#[test]
fn quantization_clamps_to_255() {
    assert_eq!(quantize(255), 256);
    let bytes = png(image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 255, 255, 255])));
    let p = extract_palette(&bytes).unwrap();
    // Only one bucket exists, so the near-white filter is not applied.
    assert_eq!(p.dominant.to_hex(), "#ffffff");
}

#[test]
fn near_black_and_white_are_dropped_when_enough_colors_remain() {
    let mut img = image::RgbaImage::from_pixel(50, 50, image::Rgba([0, 0, 0, 255]));
    for y in 0..50 {
        for x in 0..50 {
            let c = match x {
                0..=9 => [0, 0, 0],
                10..=19 => [128, 0, 0],
                20..=29 => [0, 128, 0],
                30..=39 => [0, 0, 128],
                _ => [255, 255, 255],
            };
            img.put_pixel(x, y, image::Rgba([c[0], c[1], c[2], 255]));
        }
    }
    let p = extract_palette(&png(img)).unwrap();
    let hexes: Vec<String> = p.palette.iter().map(|c| c.to_hex()).collect();
    assert!(!hexes.contains(&"#000000".to_owned()));
    assert!(!hexes.contains(&"#ffffff".to_owned()));
    assert!(hexes.contains(&"#800000".to_owned()));
}
