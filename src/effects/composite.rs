use crate::foundation::error::{StoryError, StoryResult};
use crate::foundation::math::mul_div255_u8;

/// How a layer's color combines with what is already on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Plain source-over.
    #[default]
    Normal,
    /// Multiply or screen depending on the backdrop channel.
    Overlay,
}

/// Composite premultiplied `src` over `dst` with a layer opacity and blend mode.
pub fn composite_in_place(
    dst: &mut [u8],
    src: &[u8],
    opacity: f32,
    blend: BlendMode,
) -> StoryResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(StoryError::render(
            "composite expects equal-length rgba8 buffers",
        ));
    }
    match blend {
        BlendMode::Normal => {
            over_in_place(dst, src, opacity);
        }
        BlendMode::Overlay => {
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                blend_px(d, [s[0], s[1], s[2], s[3]], opacity, overlay);
            }
        }
    }
    Ok(())
}

/// Composite a single premultiplied color over the whole of `dst`.
pub fn fill_in_place(dst: &mut [u8], color: [u8; 4], opacity: f32, blend: BlendMode) {
    for d in dst.chunks_exact_mut(4) {
        match blend {
            BlendMode::Normal => over_px(d, color, op_u16(opacity)),
            BlendMode::Overlay => blend_px(d, color, opacity, overlay),
        }
    }
}

fn overlay(s: f32, d: f32) -> f32 {
    if d <= 0.5 {
        2.0 * s * d
    } else {
        1.0 - 2.0 * (1.0 - s) * (1.0 - d)
    }
}

fn op_u16(opacity: f32) -> u16 {
    ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) {
    let op = op_u16(opacity);
    if op == 0 {
        return;
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        over_px(d, [s[0], s[1], s[2], s[3]], op);
    }
}

fn over_px(d: &mut [u8], s: [u8; 4], op: u16) {
    let sa = mul_div255_u8(u16::from(s[3]), op);
    if sa == 0 {
        return;
    }
    let inv = 255u16 - u16::from(sa);
    d[3] = sa.saturating_add(mul_div255_u8(u16::from(d[3]), inv));
    for c in 0..3 {
        let sc = mul_div255_u8(u16::from(s[c]), op);
        let dc = mul_div255_u8(u16::from(d[c]), inv);
        d[c] = sc.saturating_add(dc);
    }
}

// Source-over with the blend applied to unpremultiplied channels:
// out_a = sa + da * (1 - sa)
// out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
#[inline(always)]
fn blend_px<F>(d: &mut [u8], s: [u8; 4], opacity: f32, blend_fn: F)
where
    F: Fn(f32, f32) -> f32,
{
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || s[3] == 0 {
        return;
    }
    let sa = f32::from(s[3]) / 255.0 * opacity;
    let da = f32::from(d[3]) / 255.0;
    let inv_sa = 1.0 - sa;
    let out_a = (sa + da * inv_sa).clamp(0.0, 1.0);

    for c in 0..3 {
        let sp = f32::from(s[c]) / 255.0 * opacity;
        let dp = f32::from(d[c]) / 255.0;
        let sc = if sa > 0.0 { (sp / sa).clamp(0.0, 1.0) } else { 0.0 };
        let dc = if da > 0.0 { (dp / da).clamp(0.0, 1.0) } else { 0.0 };
        let b = blend_fn(sc, dc).clamp(0.0, 1.0);
        let out = (sp * (1.0 - da) + dp * inv_sa + b * sa * da).clamp(0.0, 1.0);
        d[c] = (out * 255.0).round() as u8;
    }
    d[3] = (out_a * 255.0).round() as u8;
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
