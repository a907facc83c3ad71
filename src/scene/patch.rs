use crate::assets::color::Color;
use crate::foundation::error::{StoryError, StoryResult};
use crate::foundation::math::clamp_finite;
use crate::layout::presets::LayoutPreset;
use crate::scene::model::{
    BLUR_RANGE, BRIGHTNESS_RANGE, FONT_SIZE_RANGE, GeneratedAsset, LOGO_POS_RANGE,
    LOGO_SCALE_RANGE, LogoOverlay, OverlaySettings, TextOverlay,
};

/// Partial update of [`OverlaySettings`]. `None` fields are left untouched.
///
/// Numeric fields take slider values as `f64`: non-finite values reject the whole patch, finite
/// out-of-range values are clamped and integers are rounded.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlaySettingsPatch {
    /// New blur radius.
    pub blur_radius: Option<f64>,
    /// New brightness percentage.
    pub brightness: Option<f64>,
    /// Toggle the brand tint.
    pub brand_overlay_enabled: Option<bool>,
    /// Text layer changes.
    pub text_overlay: Option<TextOverlayPatch>,
    /// Logo layer changes. Creates a default logo overlay first when none exists.
    pub logo_overlay: Option<LogoOverlayPatch>,
}

/// Partial update of [`TextOverlay`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextOverlayPatch {
    /// Show or hide the text.
    pub visible: Option<bool>,
    /// Replace the text.
    pub content: Option<String>,
    /// Change the layout preset.
    pub layout: Option<LayoutPreset>,
    /// New reference font size.
    pub font_size_base: Option<f64>,
    /// New fill color.
    pub color: Option<Color>,
}

/// Partial update of [`LogoOverlay`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogoOverlayPatch {
    /// Show or hide the logo.
    pub visible: Option<bool>,
    /// New center x percentage.
    pub x: Option<f64>,
    /// New center y percentage.
    pub y: Option<f64>,
    /// New scale.
    pub scale: Option<f64>,
}

fn check(field: &str, v: Option<f64>) -> StoryResult<()> {
    match v {
        Some(x) if !x.is_finite() => Err(StoryError::validation(format!(
            "{field} must be a finite number, got {x}"
        ))),
        _ => Ok(()),
    }
}

fn clamp_to(v: f64, (lo, hi): (f64, f64)) -> f64 {
    clamp_finite(v, lo, hi).unwrap_or(lo)
}

impl TextOverlayPatch {
    fn validate(&self) -> StoryResult<()> {
        check("text_overlay.font_size_base", self.font_size_base)
    }

    fn apply_to(&self, text: &mut TextOverlay) {
        if let Some(v) = self.visible {
            text.visible = v;
        }
        if let Some(c) = &self.content {
            text.content.clone_from(c);
        }
        if let Some(l) = self.layout {
            text.layout = l;
        }
        if let Some(s) = self.font_size_base {
            let range = (f64::from(FONT_SIZE_RANGE.0), f64::from(FONT_SIZE_RANGE.1));
            text.font_size_base = clamp_to(s, range).round() as u16;
        }
        if let Some(c) = self.color {
            text.color = c;
        }
    }
}

impl LogoOverlayPatch {
    fn validate(&self) -> StoryResult<()> {
        check("logo_overlay.x", self.x)?;
        check("logo_overlay.y", self.y)?;
        check("logo_overlay.scale", self.scale)
    }

    fn apply_to(&self, logo: &mut LogoOverlay) {
        if let Some(v) = self.visible {
            logo.visible = v;
        }
        if let Some(x) = self.x {
            logo.x = clamp_to(x, LOGO_POS_RANGE);
        }
        if let Some(y) = self.y {
            logo.y = clamp_to(y, LOGO_POS_RANGE);
        }
        if let Some(s) = self.scale {
            logo.scale = clamp_to(s, LOGO_SCALE_RANGE);
        }
    }
}

impl OverlaySettingsPatch {
    /// Reject the patch if any supplied number is NaN or infinite.
    pub fn validate(&self) -> StoryResult<()> {
        check("blur_radius", self.blur_radius)?;
        check("brightness", self.brightness)?;
        if let Some(t) = &self.text_overlay {
            t.validate()?;
        }
        if let Some(l) = &self.logo_overlay {
            l.validate()?;
        }
        Ok(())
    }
}

impl OverlaySettings {
    /// Merge `patch` into these settings. Either every field is applied or, on a validation
    /// error, nothing changes.
    pub fn apply(&mut self, patch: &OverlaySettingsPatch) -> StoryResult<()> {
        patch.validate()?;

        if let Some(b) = patch.blur_radius {
            let range = (f64::from(BLUR_RANGE.0), f64::from(BLUR_RANGE.1));
            self.blur_radius = clamp_to(b, range).round() as u8;
        }
        if let Some(b) = patch.brightness {
            let range = (
                f64::from(BRIGHTNESS_RANGE.0),
                f64::from(BRIGHTNESS_RANGE.1),
            );
            self.brightness = clamp_to(b, range).round() as u16;
        }
        if let Some(v) = patch.brand_overlay_enabled {
            self.brand_overlay_enabled = v;
        }
        if let Some(t) = &patch.text_overlay {
            t.apply_to(&mut self.text_overlay);
        }
        if let Some(l) = &patch.logo_overlay {
            l.apply_to(self.logo_overlay.get_or_insert_with(LogoOverlay::default));
        }
        Ok(())
    }

    /// Drop the logo layer, e.g. after the brand logo was removed or replaced.
    pub fn remove_logo(&mut self) {
        self.logo_overlay = None;
    }
}

impl GeneratedAsset {
    /// Merge a settings patch into this asset.
    pub fn update_settings(&mut self, patch: &OverlaySettingsPatch) -> StoryResult<()> {
        self.settings.apply(patch).map_err(|e| match e {
            StoryError::Validation(msg) => StoryError::validation(format!(
                "asset '{}' (slide {}): {msg}",
                self.id(),
                self.slide_index()
            )),
            other => other,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/patch.rs"]
mod tests;
