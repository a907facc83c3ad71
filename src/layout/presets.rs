use std::fmt;
use std::str::FromStr;

use crate::foundation::core::{Canvas, REFERENCE_WIDTH};

/// Named text-placement strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPreset {
    /// Centered block.
    #[default]
    CenterFocus,
    /// Text sits in the lower part of the canvas.
    TopHeavy,
    /// Text sits in the upper part of the canvas.
    BottomHeavy,
    /// Centered, narrow band.
    SplitHorizontal,
    /// Centered, tall band with wider side insets.
    FrameStyle,
    /// Centered, medium band.
    GradientFade,
}

impl LayoutPreset {
    /// Every preset, in declaration order.
    pub const ALL: [LayoutPreset; 6] = [
        LayoutPreset::CenterFocus,
        LayoutPreset::TopHeavy,
        LayoutPreset::BottomHeavy,
        LayoutPreset::SplitHorizontal,
        LayoutPreset::FrameStyle,
        LayoutPreset::GradientFade,
    ];

    /// Wire name (`center_focus`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CenterFocus => "center_focus",
            Self::TopHeavy => "top_heavy",
            Self::BottomHeavy => "bottom_heavy",
            Self::SplitHorizontal => "split_horizontal",
            Self::FrameStyle => "frame_style",
            Self::GradientFade => "gradient_fade",
        }
    }

    /// Parse a preset name. Unknown or empty input yields [`LayoutPreset::CenterFocus`].
    pub fn parse_lossy(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name.trim())
            .unwrap_or_default()
    }

    /// Resolve this preset to its placement region.
    pub fn spec(self) -> LayoutSpec {
        let (y_ratio, band_top, band_bottom, align) = match self {
            Self::CenterFocus => (0.50, 0.30, 0.70, VerticalAlign::Center),
            Self::TopHeavy => (0.65, 0.55, 0.80, VerticalAlign::Start),
            Self::BottomHeavy => (0.30, 0.15, 0.45, VerticalAlign::End),
            Self::SplitHorizontal => (0.50, 0.35, 0.65, VerticalAlign::Center),
            Self::FrameStyle => (0.50, 0.20, 0.80, VerticalAlign::Center),
            Self::GradientFade => (0.50, 0.25, 0.75, VerticalAlign::Center),
        };
        let inset_x = if self == Self::FrameStyle { 0.15 } else { 0.10 };
        LayoutSpec {
            preset: self,
            y_ratio,
            band_top,
            band_bottom,
            inset_x,
            align,
        }
    }
}

impl fmt::Display for LayoutPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutPreset {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lossy(s))
    }
}

impl<'de> serde::Deserialize<'de> for LayoutPreset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Anything that is not a known name, including non-strings and null, is center_focus.
        let v = serde_json::Value::deserialize(deserializer)?;
        Ok(v.as_str().map(Self::parse_lossy).unwrap_or_default())
    }
}

/// Where a text block goes for a given preset.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LayoutSpec {
    /// Preset this was resolved from.
    pub preset: LayoutPreset,
    /// Vertical anchor of the text block center on export, as a fraction of canvas height.
    pub y_ratio: f64,
    /// Preview band top, fraction of container height.
    pub band_top: f64,
    /// Preview band bottom, fraction of container height.
    pub band_bottom: f64,
    /// Preview left/right inset, fraction of container width.
    pub inset_x: f64,
    /// Where the text block sits inside the preview band.
    pub align: VerticalAlign,
}

/// Vertical alignment of text inside a preview band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    /// Top of the band.
    Start,
    /// Middle of the band.
    Center,
    /// Bottom of the band.
    End,
}

/// Resolve any layout name. Never fails.
pub fn resolve_layout(name: &str) -> LayoutSpec {
    LayoutPreset::parse_lossy(name).spec()
}

/// Export-time geometry of a multi-line text block.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextBlockPlacement {
    /// Font size in canvas pixels.
    pub font_size: f64,
    /// Distance between consecutive line centers.
    pub line_height: f64,
    /// Vertical center of each line, top to bottom.
    pub line_centers: Vec<f64>,
    /// Horizontal center shared by every line.
    pub center_x: f64,
    /// Widest a line may render before it is condensed.
    pub max_width: f64,
}

impl TextBlockPlacement {
    /// Line height as a multiple of font size.
    pub const LINE_HEIGHT: f64 = 1.5;
    /// Widest line as a fraction of canvas width.
    pub const MAX_WIDTH_RATIO: f64 = 0.8;

    /// Place `line_count` lines for `preset` on `canvas`.
    pub fn compute(
        preset: LayoutPreset,
        font_size_base: f64,
        line_count: usize,
        canvas: Canvas,
    ) -> Self {
        let font_size = font_size_base * canvas.w() / REFERENCE_WIDTH;
        let line_height = font_size * Self::LINE_HEIGHT;
        let total = line_count as f64 * line_height;
        let start_y = preset.spec().y_ratio * canvas.h() - total / 2.0 + line_height / 2.0;
        Self {
            font_size,
            line_height,
            line_centers: (0..line_count)
                .map(|i| start_y + i as f64 * line_height)
                .collect(),
            center_x: canvas.w() / 2.0,
            max_width: canvas.w() * Self::MAX_WIDTH_RATIO,
        }
    }
}

/// Split overlay text into the lines that are drawn, one per embedded line break.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split('\n').map(|l| l.trim_end_matches('\r')).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/presets.rs"]
mod tests;
