/// Apply a 4×5 color matrix (row-major, last column is the offset) to premultiplied RGBA8.
///
/// Pixels are unpremultiplied before the matrix and premultiplied again afterwards.
pub(crate) fn color_matrix_rgba8_premul(buf: &mut [u8], m: [f32; 20]) {
    for px in buf.chunks_exact_mut(4) {
        let pa = f32::from(px[3]) / 255.0;
        let inv_a = if pa > 0.0 { 1.0 / pa } else { 0.0 };
        let r = f32::from(px[0]) / 255.0 * inv_a;
        let g = f32::from(px[1]) / 255.0 * inv_a;
        let b = f32::from(px[2]) / 255.0 * inv_a;
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        px[0] = to_u8(out_r * out_a);
        px[1] = to_u8(out_g * out_a);
        px[2] = to_u8(out_b * out_a);
        px[3] = to_u8(out_a);
    }
}

/// Linear brightness: every color channel is multiplied by `percent / 100`, alpha untouched.
///
/// `100` is an exact no-op.
pub fn brightness_rgba8_premul(buf: &mut [u8], percent: f32) {
    if percent == 100.0 {
        return;
    }
    let k = (percent / 100.0).max(0.0);
    #[rustfmt::skip]
    let m = [
        k, 0.0, 0.0, 0.0, 0.0,
        0.0, k, 0.0, 0.0, 0.0,
        0.0, 0.0, k, 0.0, 0.0,
        0.0, 0.0, 0.0, 1.0, 0.0,
    ];
    color_matrix_rgba8_premul(buf, m);
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color.rs"]
mod tests;
