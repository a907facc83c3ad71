use crate::foundation::error::{StoryError, StoryResult};

/// Gaussian blur of a premultiplied RGBA8 buffer with standard deviation `sigma_px`.
///
/// CSS `filter: blur(Npx)` is a Gaussian whose standard deviation is N, so passing the slider
/// value as `sigma_px` makes the export match the preview's filter. The separable q16 kernel
/// spans `ceil(3 * sigma)` pixels on each side. Samples clamp to the nearest edge pixel, so an
/// opaque image stays opaque. `sigma_px == 0` returns the input unchanged.
pub fn gaussian_blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    sigma_px: f32,
) -> StoryResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| StoryError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(StoryError::render(
            "blur expects src matching width*height*4",
        ));
    }
    if !sigma_px.is_finite() || sigma_px < 0.0 {
        return Err(StoryError::validation("blur sigma must be finite and >= 0"));
    }
    let radius = kernel_radius(sigma_px);
    if radius == 0 || width == 0 || height == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma_px)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    convolve_axis(src, &mut tmp, width, height, &kernel, Axis::Horizontal);
    convolve_axis(&tmp, &mut out, width, height, &kernel, Axis::Vertical);
    Ok(out)
}

pub(crate) fn kernel_radius(sigma_px: f32) -> u32 {
    if sigma_px <= 0.0 {
        return 0;
    }
    (sigma_px * 3.0).ceil() as u32
}

pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> StoryResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(StoryError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(StoryError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();

    // Push rounding drift into the center tap so the kernel sums to exactly 1.0 in q16.
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn convolve_axis(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as i64;
    let (w, h) = (i64::from(width), i64::from(height));
    // (length of the convolved axis, distance in pixels between its neighbours)
    let (len, step) = match axis {
        Axis::Horizontal => (w, 1),
        Axis::Vertical => (h, w),
    };
    for y in 0..h {
        for x in 0..w {
            let pos = match axis {
                Axis::Horizontal => x,
                Axis::Vertical => y,
            };
            let origin = y * w + x - pos * step;
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let s = (pos + ki as i64 - radius).clamp(0, len - 1);
                let idx = ((origin + s * step) * 4) as usize;
                for (a, &v) in acc.iter_mut().zip(&src[idx..idx + 4]) {
                    *a += u64::from(kw) * u64::from(v);
                }
            }
            let out_idx = ((y * w + x) * 4) as usize;
            for (d, a) in dst[out_idx..out_idx + 4].iter_mut().zip(acc) {
                *d = q16_to_u8(a);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
