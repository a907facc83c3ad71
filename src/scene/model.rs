use crate::assets::color::Color;
use crate::assets::store::ImageRef;
use crate::layout::fonts::{DEFAULT_FONT_LABEL, FontSpec};
use crate::layout::presets::LayoutPreset;

/// Domain of [`OverlaySettings::blur_radius`].
pub const BLUR_RANGE: (u8, u8) = (0, 20);
/// Domain of [`OverlaySettings::brightness`].
pub const BRIGHTNESS_RANGE: (u16, u16) = (50, 150);
/// Domain of [`TextOverlay::font_size_base`].
pub const FONT_SIZE_RANGE: (u16, u16) = (14, 48);
/// Domain of [`LogoOverlay::scale`].
pub const LOGO_SCALE_RANGE: (f64, f64) = (0.1, 2.0);
/// Domain of [`LogoOverlay::x`] and [`LogoOverlay::y`].
pub const LOGO_POS_RANGE: (f64, f64) = (0.0, 100.0);

/// One generated background candidate and its editable overlay settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeneratedAsset {
    id: String,
    source_image: ImageRef,
    #[serde(default)]
    prompt: String,
    slide_index: u32,
    /// Overlay settings owned by this asset.
    #[serde(default)]
    pub settings: OverlaySettings,
}

impl GeneratedAsset {
    /// New asset with default settings. `slide_index` is 1-based; 0 is bumped to 1.
    pub fn new(
        id: impl Into<String>,
        source_image: ImageRef,
        prompt: impl Into<String>,
        slide_index: u32,
    ) -> Self {
        Self {
            id: id.into(),
            source_image,
            prompt: prompt.into(),
            slide_index: slide_index.max(1),
            settings: OverlaySettings::default(),
        }
    }

    /// Immutable identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Background image reference.
    pub fn source_image(&self) -> &ImageRef {
        &self.source_image
    }

    /// Prompt the background was generated from.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// 1-based position within its batch.
    pub fn slide_index(&self) -> u32 {
        self.slide_index
    }
}

/// Mutable per-asset adjustments.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Background blur in pixels, `0..=20`.
    pub blur_radius: u8,
    /// Background brightness percentage, `50..=150`.
    pub brightness: u16,
    /// Tint the background with the brand color.
    pub brand_overlay_enabled: bool,
    /// Text layer.
    pub text_overlay: TextOverlay,
    /// Logo layer; `None` draws no logo.
    pub logo_overlay: Option<LogoOverlay>,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            blur_radius: 0,
            brightness: 100,
            brand_overlay_enabled: false,
            text_overlay: TextOverlay::default(),
            logo_overlay: None,
        }
    }
}

impl OverlaySettings {
    /// Blur radius forced into its domain.
    pub fn clamped_blur_radius(&self) -> u8 {
        self.blur_radius.clamp(BLUR_RANGE.0, BLUR_RANGE.1)
    }

    /// Brightness forced into its domain.
    pub fn clamped_brightness(&self) -> u16 {
        self.brightness.clamp(BRIGHTNESS_RANGE.0, BRIGHTNESS_RANGE.1)
    }

    /// Copy with every numeric field forced into its domain.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        out.blur_radius = self.clamped_blur_radius();
        out.brightness = self.clamped_brightness();
        out.text_overlay.font_size_base = self.text_overlay.clamped_font_size_base();
        if let Some(logo) = &mut out.logo_overlay {
            *logo = logo.sanitized();
        }
        out
    }
}

/// Text drawn over the background.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextOverlay {
    /// Whether the text layer is drawn.
    pub visible: bool,
    /// Free text; each `\n`-separated line is drawn on its own.
    pub content: String,
    /// Vertical placement preset.
    pub layout: LayoutPreset,
    /// Font size at a 360-unit-wide reference canvas, `14..=48`.
    pub font_size_base: u16,
    /// Fill color.
    pub color: Color,
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self {
            visible: true,
            content: String::new(),
            layout: LayoutPreset::CenterFocus,
            font_size_base: 24,
            color: Color::WHITE,
        }
    }
}

impl TextOverlay {
    /// Font size forced into its domain.
    pub fn clamped_font_size_base(&self) -> u16 {
        self.font_size_base
            .clamp(FONT_SIZE_RANGE.0, FONT_SIZE_RANGE.1)
    }

    /// False when the layer must be skipped: hidden or empty.
    pub fn is_drawn(&self) -> bool {
        self.visible && !self.content.is_empty()
    }
}

/// Brand logo placement in percentage coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogoOverlay {
    /// Whether the logo layer is drawn.
    pub visible: bool,
    /// Center x as a percentage of canvas width.
    pub x: f64,
    /// Center y as a percentage of canvas height.
    pub y: f64,
    /// Multiplier on the logo's natural size, `0.1..=2.0`.
    pub scale: f64,
}

impl Default for LogoOverlay {
    fn default() -> Self {
        Self {
            visible: false,
            x: 50.0,
            y: 85.0,
            scale: 1.0,
        }
    }
}

impl LogoOverlay {
    /// Copy with position and scale forced into their domains. Non-finite values reset to the
    /// defaults.
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let fix = |v: f64, dv: f64, (lo, hi): (f64, f64)| {
            if v.is_finite() { v.clamp(lo, hi) } else { dv }
        };
        Self {
            visible: self.visible,
            x: fix(self.x, d.x, LOGO_POS_RANGE),
            y: fix(self.y, d.y, LOGO_POS_RANGE),
            scale: fix(self.scale, d.scale, LOGO_SCALE_RANGE),
        }
    }
}

/// Process-wide brand settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    /// Brand logo, if any.
    pub logo_image: Option<ImageRef>,
    /// Tint color for the brand overlay.
    pub primary_color: Color,
    /// Label from the font table.
    pub font_preference: String,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            logo_image: None,
            primary_color: Color::INDIGO,
            font_preference: DEFAULT_FONT_LABEL.to_owned(),
        }
    }
}

impl BrandConfig {
    /// True when every field still has its factory value.
    pub fn is_factory_default(&self) -> bool {
        *self == Self::default()
    }

    /// Font pair selected by [`BrandConfig::font_preference`].
    pub fn font(&self) -> FontSpec {
        FontSpec::from_label(&self.font_preference)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
