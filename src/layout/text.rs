use std::collections::HashMap;

use crate::foundation::error::{StoryError, StoryResult};
use crate::layout::fonts::FontFace;

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// One shaped line of text plus the metrics needed to place it.
pub(crate) struct ShapedLine {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    /// Horizontal advance of the line.
    pub(crate) advance: f32,
    pub(crate) ascent: f32,
    pub(crate) descent: f32,
    /// Baseline offset from the layout top.
    pub(crate) baseline: f32,
}

impl ShapedLine {
    /// Baseline position that puts the middle of the em box at `center_y`.
    pub(crate) fn baseline_for_middle(&self, center_y: f32) -> f32 {
        center_y + (self.ascent - self.descent) / 2.0
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.advance <= 0.0
    }
}

/// Stateful helper for shaping single lines with Parley from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<u64, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, face: &FontFace) -> StoryResult<String> {
        let key = xxhash_rust::xxh3::xxh3_64(&face.bytes);
        if let Some(name) = self.families.get(&key) {
            return Ok(name.clone());
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.bytes.as_ref().clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            StoryError::render(format!("font '{}' registered no families", face.family))
        })?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| StoryError::render("registered font family has no name"))?
            .to_string();
        self.families.insert(key, name.clone());
        Ok(name)
    }

    /// Shape `text` as a single unwrapped line.
    pub(crate) fn shape_line(
        &mut self,
        text: &str,
        face: &FontFace,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> StoryResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(StoryError::validation(
                "text size must be finite and > 0",
            ));
        }
        let family_name = self.family_for(face)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(face.weight)),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let (advance, ascent, descent, baseline) = match layout.lines().next() {
            Some(line) => {
                let m = line.metrics();
                (m.advance, m.ascent, m.descent, m.baseline)
            }
            None => (0.0, size_px * 0.8, size_px * 0.2, size_px * 0.8),
        };

        Ok(ShapedLine {
            layout,
            advance,
            ascent,
            descent,
            baseline,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text.rs"]
mod tests;
