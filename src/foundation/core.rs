use crate::foundation::error::{StoryError, StoryResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Canvas width that text sizes are authored against.
pub const REFERENCE_WIDTH: f64 = 360.0;

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Largest edge the CPU rasterizer accepts.
    pub const MAX_DIM: u32 = u16::MAX as u32;

    /// Full-resolution 9:16 story canvas.
    pub const STORY: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    /// Create a validated canvas.
    pub fn new(width: u32, height: u32) -> StoryResult<Self> {
        if width == 0 || height == 0 {
            return Err(StoryError::validation("canvas width/height must be > 0"));
        }
        if width > Self::MAX_DIM || height > Self::MAX_DIM {
            return Err(StoryError::validation(format!(
                "canvas {width}x{height} exceeds {max}x{max}",
                max = Self::MAX_DIM
            )));
        }
        Ok(Self { width, height })
    }

    /// Width as `f64`.
    pub fn w(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    pub fn h(self) -> f64 {
        f64::from(self.height)
    }

    /// Linear factor from [`REFERENCE_WIDTH`] to this canvas width.
    pub fn reference_scale(self) -> f64 {
        self.w() / REFERENCE_WIDTH
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }

    pub(crate) fn dims_u16(self) -> StoryResult<(u16, u16)> {
        let w = u16::try_from(self.width)
            .map_err(|_| StoryError::validation("canvas width exceeds u16"))?;
        let h = u16::try_from(self.height)
            .map_err(|_| StoryError::validation("canvas height exceeds u16"))?;
        Ok((w, h))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::STORY
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channels as `[r, g, b, a]`.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
