use std::io::Cursor;

use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::{StoryError, StoryResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;

/// Encoded output format of a flatten.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum OutputFormat {
    /// Lossless PNG.
    #[default]
    Png,
    /// JPEG at `quality` (1..=100). Alpha is dropped.
    Jpeg {
        /// Encoder quality.
        quality: u8,
    },
}

impl OutputFormat {
    /// MIME type of the encoded bytes.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }
}

/// Encode a premultiplied canvas buffer.
pub fn encode_rgba8_premul(
    premul: &[u8],
    canvas: Canvas,
    format: OutputFormat,
) -> StoryResult<Vec<u8>> {
    if premul.len() != canvas.rgba_len() {
        return Err(StoryError::render("encode buffer does not match canvas"));
    }
    let mut straight = premul.to_vec();
    unpremultiply_rgba8_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(canvas.width, canvas.height, straight)
        .ok_or_else(|| StoryError::render("encode buffer does not match canvas"))?;

    let mut out = Vec::new();
    match format {
        OutputFormat::Png => {
            image::DynamicImage::ImageRgba8(img)
                .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
                .context("encode png")?;
        }
        OutputFormat::Jpeg { quality } => {
            let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut out,
                quality.clamp(1, 100),
            );
            rgb.write_with_encoder(encoder).context("encode jpeg")?;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
