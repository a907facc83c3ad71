use super::*;

#[test]
fn zero_sigma_is_identity() {
    let src = vec![10u8, 20, 30, 40, 50, 60, 70, 80];
    let out = gaussian_blur_rgba8_premul(&src, 2, 1, 0.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn constant_image_is_unchanged() {
    let src = [90u8, 40, 200, 255].repeat(9 * 7);
    let out = gaussian_blur_rgba8_premul(&src, 9, 7, 5.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn kernel_sums_to_one_in_q16() {
    for sigma in [0.5f32, 1.0, 4.0, 20.0] {
        let k = gaussian_kernel_q16(kernel_radius(sigma), sigma).unwrap();
        assert_eq!(k.len() as u32, kernel_radius(sigma) * 2 + 1);
        assert_eq!(k.iter().map(|&w| u64::from(w)).sum::<u64>(), 65536);
    }
}

#[test]
fn single_pixel_spreads_symmetrically() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((4 * w + 4) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = gaussian_blur_rgba8_premul(&src, w, h, 1.0).unwrap();
    let a = |x: u32, y: u32| out[((y * w + x) * 4 + 3) as usize];
    assert!(a(4, 4) < 255);
    assert!(a(3, 4) > 0);
    assert_eq!(a(3, 4), a(5, 4));
    assert_eq!(a(4, 3), a(4, 5));
}

#[test]
fn edges_stay_opaque() {
    let mut src = [0u8, 0, 0, 255].repeat(16 * 16);
    src[0..4].copy_from_slice(&[255, 255, 255, 255]);
    let out = gaussian_blur_rgba8_premul(&src, 16, 16, 3.0).unwrap();
    assert!(out.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn rejects_mismatched_buffers_and_bad_sigma() {
    assert!(gaussian_blur_rgba8_premul(&[0u8; 7], 1, 2, 1.0).is_err());
    assert!(gaussian_blur_rgba8_premul(&[0u8; 4], 1, 1, f32::NAN).is_err());
}

#[test]
fn row_and_column_blur_alike() {
    let mut line = vec![0u8; 15 * 4];
    line[7 * 4..8 * 4].copy_from_slice(&[200, 100, 50, 255]);
    let row = gaussian_blur_rgba8_premul(&line, 15, 1, 2.0).unwrap();
    let column = gaussian_blur_rgba8_premul(&line, 1, 15, 2.0).unwrap();
    assert_eq!(row, column);
    assert!(row[6 * 4 + 3] > 0 && row[6 * 4 + 3] == row[8 * 4 + 3]);
}
