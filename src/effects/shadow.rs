use crate::effects::blur::gaussian_blur_rgba8_premul;
use crate::foundation::error::StoryResult;
use crate::foundation::math::mul_div255_u8;

/// Drop shadow cast by a layer: a tinted, blurred copy of its alpha.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShadowSpec {
    /// Straight RGBA8 shadow color.
    pub color: [u8; 4],
    /// Blur amount in canvas pixels. The Gaussian sigma is half of this.
    pub blur_px: f32,
    /// Horizontal offset in canvas pixels.
    pub offset_x: f32,
    /// Vertical offset in canvas pixels.
    pub offset_y: f32,
}

impl ShadowSpec {
    /// Shadow behind overlay text: 80% black, blur 8, no offset.
    pub const TEXT: ShadowSpec = ShadowSpec {
        color: [0, 0, 0, 204],
        blur_px: 8.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    /// Outer shadow behind preview text: 80% black, blur 8, 2px down.
    pub const TEXT_PREVIEW: ShadowSpec = ShadowSpec {
        color: [0, 0, 0, 204],
        blur_px: 8.0,
        offset_x: 0.0,
        offset_y: 2.0,
    };

    /// Tight outline shadow stacked on [`ShadowSpec::TEXT_PREVIEW`]: 90% black, blur 2.
    pub const TEXT_PREVIEW_EDGE: ShadowSpec = ShadowSpec {
        color: [0, 0, 0, 230],
        blur_px: 2.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    /// Shadow behind the preview logo: 50% black, blur 8, 2px down.
    pub const LOGO_PREVIEW: ShadowSpec = ShadowSpec {
        color: [0, 0, 0, 128],
        blur_px: 8.0,
        offset_x: 0.0,
        offset_y: 2.0,
    };

    /// CSS shadow value, e.g. `0px 2px 8px rgba(0, 0, 0, 0.8)`.
    pub fn css(&self) -> String {
        let [r, g, b, a] = self.color;
        let alpha = (f64::from(a) / 255.0 * 100.0).round() / 100.0;
        format!(
            "{}px {}px {}px rgba({r}, {g}, {b}, {alpha})",
            self.offset_x, self.offset_y, self.blur_px
        )
    }
}

/// Comma-joined CSS list for a stack of shadows, first entry on top.
pub fn css_shadow_list(shadows: &[ShadowSpec]) -> String {
    shadows
        .iter()
        .map(ShadowSpec::css)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the premultiplied shadow layer for `layer`.
///
/// Offsets are rounded to whole pixels; pixels shifted in from outside the layer are transparent.
pub fn shadow_layer_rgba8_premul(
    layer: &[u8],
    width: u32,
    height: u32,
    spec: &ShadowSpec,
) -> StoryResult<Vec<u8>> {
    let [r, g, b, a] = spec.color;
    let (w, h) = (width as i64, height as i64);
    let dx = spec.offset_x.round() as i64;
    let dy = spec.offset_y.round() as i64;

    let mut tinted = vec![0u8; layer.len()];
    for y in 0..h {
        let sy = y - dy;
        if sy < 0 || sy >= h {
            continue;
        }
        for x in 0..w {
            let sx = x - dx;
            if sx < 0 || sx >= w {
                continue;
            }
            let coverage = layer[((sy * w + sx) * 4 + 3) as usize];
            if coverage == 0 {
                continue;
            }
            let sa = mul_div255_u8(u16::from(coverage), u16::from(a));
            let i = ((y * w + x) * 4) as usize;
            tinted[i] = mul_div255_u8(u16::from(r), u16::from(sa));
            tinted[i + 1] = mul_div255_u8(u16::from(g), u16::from(sa));
            tinted[i + 2] = mul_div255_u8(u16::from(b), u16::from(sa));
            tinted[i + 3] = sa;
        }
    }

    gaussian_blur_rgba8_premul(&tinted, width, height, spec.blur_px / 2.0)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/shadow.rs"]
mod tests;
