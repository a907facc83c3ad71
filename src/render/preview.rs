use crate::assets::color::Color;
use crate::assets::store::ImageRef;
use crate::effects::composite::BlendMode;
use crate::effects::shadow::{ShadowSpec, css_shadow_list};
use crate::interact::logo_drag::preview_logo_width_percent;
use crate::layout::fonts::FontSpec;
use crate::layout::presets::{TextBlockPlacement, VerticalAlign, split_lines};
use crate::render::compositor::{BRAND_TINT_OPACITY, FilterSpec};
use crate::scene::model::{BrandConfig, GeneratedAsset};

/// Padding inside the preview text band, in CSS pixels.
pub const TEXT_PADDING_PX: f64 = 16.0;

const TEXT_SHADOWS: [ShadowSpec; 2] =
    [ShadowSpec::TEXT_PREVIEW, ShadowSpec::TEXT_PREVIEW_EDGE];

/// Band edges as percentages of the container.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Insets {
    /// Distance from the top edge.
    pub top: f64,
    /// Distance from the bottom edge.
    pub bottom: f64,
    /// Distance from the left edge.
    pub left: f64,
    /// Distance from the right edge.
    pub right: f64,
}

/// One independently stacked display element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PreviewLayer {
    /// Background image, stretched to the container, with its CSS filter.
    Background {
        /// Image reference.
        source: ImageRef,
        /// Filter state.
        filter: FilterSpec,
        /// `filter` as a CSS string.
        css_filter: String,
    },
    /// Full-size brand tint.
    BrandTint {
        /// Tint color.
        color: Color,
        /// Layer opacity.
        opacity: f32,
        /// Blend mode.
        blend: BlendMode,
    },
    /// Text block laid out inside a preset band.
    Text {
        /// Band the block is laid out in.
        band: Insets,
        /// Where the block sits in the band.
        align: VerticalAlign,
        /// Font pair.
        font: FontSpec,
        /// Unscaled font size in CSS pixels.
        font_size_px: u16,
        /// Line height as a multiple of font size.
        line_height: f64,
        /// Band padding in CSS pixels.
        padding_px: f64,
        /// Fill color.
        color: Color,
        /// Stacked text shadows, first on top.
        shadows: Vec<ShadowSpec>,
        /// `shadows` as a CSS `text-shadow` value.
        css_text_shadow: String,
        /// One entry per line.
        lines: Vec<String>,
    },
    /// Brand logo centered on its percentage position.
    Logo {
        /// Image reference.
        source: ImageRef,
        /// Center x, percent of container width.
        center_x: f64,
        /// Center y, percent of container height.
        center_y: f64,
        /// Width in percent of container width.
        width_percent: f64,
        /// Drop shadow.
        shadow: ShadowSpec,
        /// Whether drag handling is attached.
        draggable: bool,
    },
    /// Non-exported platform safe-area overlay.
    SafeAreaGuide {
        /// Regions covered by platform UI.
        unsafe_margins: Insets,
        /// Recommended text region.
        text_area: Insets,
    },
}

impl PreviewLayer {
    /// Filter attached to this element, if any.
    pub fn filter(&self) -> Option<&FilterSpec> {
        match self {
            Self::Background { filter, .. } => Some(filter),
            _ => None,
        }
    }
}

/// Options for [`build_preview`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreviewOptions {
    /// Add the safe-area guide on top.
    pub show_guide: bool,
    /// Attach drag handling to the logo.
    pub logo_interactive: bool,
}

/// Layer stack for on-screen display, bottom first.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PreviewStack {
    /// Asset the stack was built from.
    pub asset_id: String,
    /// Elements, bottom first.
    pub layers: Vec<PreviewLayer>,
}

/// Platform UI margins: top 12%, bottom 15%, sides 8%.
pub const SAFE_AREA: Insets = Insets {
    top: 12.0,
    bottom: 15.0,
    left: 8.0,
    right: 8.0,
};

/// Recommended text region: 15% from the top, 20% from the bottom, 10% sides.
pub const TEXT_AREA: Insets = Insets {
    top: 15.0,
    bottom: 20.0,
    left: 10.0,
    right: 10.0,
};

/// Build the preview stack for `asset`. Reads the settings, never changes them.
pub fn build_preview(
    asset: &GeneratedAsset,
    brand: &BrandConfig,
    opts: PreviewOptions,
) -> PreviewStack {
    let settings = asset.settings.sanitized();
    let mut layers = Vec::with_capacity(5);

    let filter = FilterSpec::from_settings(&settings);
    layers.push(PreviewLayer::Background {
        source: asset.source_image().clone(),
        css_filter: filter.css(),
        filter,
    });

    if settings.brand_overlay_enabled {
        layers.push(PreviewLayer::BrandTint {
            color: brand.primary_color,
            opacity: BRAND_TINT_OPACITY,
            blend: BlendMode::Overlay,
        });
    }

    let text = &settings.text_overlay;
    if text.is_drawn() {
        let spec = text.layout.spec();
        layers.push(PreviewLayer::Text {
            band: Insets {
                top: spec.band_top * 100.0,
                bottom: (1.0 - spec.band_bottom) * 100.0,
                left: spec.inset_x * 100.0,
                right: spec.inset_x * 100.0,
            },
            align: spec.align,
            font: brand.font(),
            font_size_px: text.font_size_base,
            line_height: TextBlockPlacement::LINE_HEIGHT,
            padding_px: TEXT_PADDING_PX,
            color: text.color,
            shadows: TEXT_SHADOWS.to_vec(),
            css_text_shadow: css_shadow_list(&TEXT_SHADOWS),
            lines: split_lines(&text.content)
                .into_iter()
                .map(str::to_owned)
                .collect(),
        });
    }

    if let (Some(logo), Some(source)) = (&settings.logo_overlay, &brand.logo_image)
        && logo.visible
    {
        layers.push(PreviewLayer::Logo {
            source: source.clone(),
            center_x: logo.x,
            center_y: logo.y,
            width_percent: preview_logo_width_percent(logo.scale),
            shadow: ShadowSpec::LOGO_PREVIEW,
            draggable: opts.logo_interactive,
        });
    }

    if opts.show_guide {
        layers.push(PreviewLayer::SafeAreaGuide {
            unsafe_margins: SAFE_AREA,
            text_area: TEXT_AREA,
        });
    }

    PreviewStack {
        asset_id: asset.id().to_owned(),
        layers,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
