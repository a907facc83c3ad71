use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(0, 200), 0);
}

#[test]
fn premultiply_then_unpremultiply_opaque_is_identity() {
    let mut px = vec![10u8, 20, 30, 255, 200, 100, 50, 255];
    let orig = px.clone();
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, orig);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, orig);
}

#[test]
fn unpremultiply_zero_alpha_clears_color() {
    let mut px = vec![9u8, 9, 9, 0];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0]);
}

#[test]
fn clamp_finite_rejects_nan_and_inf() {
    assert_eq!(clamp_finite(f64::NAN, 0.0, 1.0), None);
    assert_eq!(clamp_finite(f64::INFINITY, 0.0, 1.0), None);
    assert_eq!(clamp_finite(5.0, 0.0, 1.0), Some(1.0));
    assert_eq!(clamp_finite(-5.0, 0.0, 1.0), Some(0.0));
}
