use super::*;

#[test]
fn normal_opacity_0_is_noop() {
    let mut dst = vec![1u8, 2, 3, 4];
    composite_in_place(&mut dst, &[200, 200, 200, 200], 0.0, BlendMode::Normal).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 4]);
}

#[test]
fn normal_opaque_src_replaces_dst() {
    let mut dst = vec![0u8, 0, 0, 255];
    composite_in_place(&mut dst, &[255, 0, 0, 255], 1.0, BlendMode::Normal).unwrap();
    assert_eq!(dst, vec![255, 0, 0, 255]);
}

#[test]
fn normal_transparent_src_is_noop() {
    let mut dst = vec![10u8, 20, 30, 40];
    composite_in_place(&mut dst, &[255, 255, 255, 0], 1.0, BlendMode::Normal).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 40]);
}

#[test]
fn mismatched_lengths_error() {
    let mut dst = vec![0u8; 8];
    assert!(composite_in_place(&mut dst, &[0u8; 4], 1.0, BlendMode::Normal).is_err());
}

#[test]
fn overlay_darkens_dark_and_lightens_light_backdrops() {
    let tint = [0x63, 0x66, 0xf1, 255];

    let mut dark = vec![40u8, 40, 40, 255];
    fill_in_place(&mut dark, tint, 1.0, BlendMode::Overlay);
    // d <= 0.5 → 2*s*d
    let expect = |s: u8, d: u8| {
        ((2.0 * (f32::from(s) / 255.0) * (f32::from(d) / 255.0)) * 255.0).round() as u8
    };
    assert_eq!(dark[0], expect(0x63, 40));
    assert_eq!(dark[2], expect(0xf1, 40));
    assert_eq!(dark[3], 255);

    let mut light = vec![230u8, 230, 230, 255];
    fill_in_place(&mut light, [255, 255, 255, 255], 1.0, BlendMode::Overlay);
    assert_eq!(light, vec![255, 255, 255, 255]);
}

#[test]
fn overlay_at_thirty_percent_moves_toward_blend() {
    let mut px = vec![100u8, 100, 100, 255];
    fill_in_place(&mut px, [255, 0, 0, 255], 0.3, BlendMode::Overlay);
    // Red channel brightens, green and blue darken, alpha stays opaque.
    assert!(px[0] > 100);
    assert!(px[1] < 100);
    assert_eq!(px[1], px[2]);
    assert_eq!(px[3], 255);
}

#[test]
fn fill_normal_matches_composite_normal() {
    let color = [50u8, 60, 70, 128];
    let mut a = vec![200u8, 100, 50, 255, 0, 0, 0, 0];
    let mut b = a.clone();
    fill_in_place(&mut a, color, 0.5, BlendMode::Normal);
    composite_in_place(&mut b, &color.repeat(2), 0.5, BlendMode::Normal).unwrap();
    assert_eq!(a, b);
}
