use std::collections::HashMap;

use anyhow::Context;

use crate::assets::color::Color;
use crate::foundation::error::StoryResult;

const SAMPLE_SIZE: u32 = 50;
const QUANT_STEP: f64 = 32.0;
const MAX_COLORS: usize = 5;

/// Dominant colors of an image, most frequent first.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExtractedPalette {
    /// Most frequent usable color.
    pub dominant: Color,
    /// Up to five colors, `dominant` first. Never empty.
    pub palette: Vec<Color>,
}

/// Extract a small palette from encoded image bytes.
///
/// The image is sampled at 50×50, translucent pixels (alpha < 128) are skipped, channels are
/// quantized to steps of 32, and near-black / near-white buckets are dropped when at least three
/// other buckets remain.
pub fn extract_palette(bytes: &[u8]) -> StoryResult<ExtractedPalette> {
    let img = image::load_from_memory(bytes).context("decode image for palette")?;
    let sample = image::imageops::resize(
        &img.to_rgba8(),
        SAMPLE_SIZE,
        SAMPLE_SIZE,
        image::imageops::FilterType::Triangle,
    );

    // Insertion order is kept so equal counts sort by first appearance.
    let mut order: Vec<[u16; 3]> = Vec::new();
    let mut counts: HashMap<[u16; 3], u32> = HashMap::new();
    for px in sample.pixels() {
        let [r, g, b, a] = px.0;
        if a < 128 {
            continue;
        }
        let key = [quantize(r), quantize(g), quantize(b)];
        let n = counts.entry(key).or_insert(0);
        if *n == 0 {
            order.push(key);
        }
        *n += 1;
    }

    let mut sorted = order;
    sorted.sort_by(|a, b| counts[b].cmp(&counts[a]));

    let filtered: Vec<[u16; 3]> = sorted
        .iter()
        .copied()
        .filter(|c| {
            let brightness = f64::from(c[0] + c[1] + c[2]) / 3.0;
            brightness > 30.0 && brightness < 230.0
        })
        .collect();
    let candidates = if filtered.len() >= 3 { filtered } else { sorted };

    let palette: Vec<Color> = candidates
        .iter()
        .take(MAX_COLORS)
        .map(|c| {
            let ch = |v: u16| v.min(255) as u8;
            Color::from_rgba8(ch(c[0]), ch(c[1]), ch(c[2]), 255)
        })
        .collect();

    let dominant = palette.first().copied().unwrap_or(Color::INDIGO);
    let palette = if palette.is_empty() {
        vec![dominant]
    } else {
        palette
    };
    Ok(ExtractedPalette { dominant, palette })
}

fn quantize(c: u8) -> u16 {
    ((f64::from(c) / QUANT_STEP).round() * QUANT_STEP) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/assets/palette.rs"]
mod tests;
