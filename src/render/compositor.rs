use std::sync::Arc;

use rayon::prelude::*;

use crate::assets::decode::{decode_image, decode_logo, rasterize_svg_to_premul_rgba8};
use crate::assets::store::{ByteSource, ImageRef, PreparedImage, PreparedLogo};
use crate::effects::blur::gaussian_blur_rgba8_premul;
use crate::effects::color::brightness_rgba8_premul;
use crate::effects::composite::{BlendMode, composite_in_place, fill_in_place};
use crate::effects::shadow::{ShadowSpec, shadow_layer_rgba8_premul};
use crate::foundation::core::{Canvas, Rect};
use crate::foundation::error::{DecodeTarget, StoryError, StoryResult};
use crate::layout::fonts::FontLibrary;
use crate::layout::presets::{TextBlockPlacement, split_lines};
use crate::layout::text::{TextBrushRgba8, TextLayoutEngine};
use crate::render::encode::{OutputFormat, encode_rgba8_premul};
use crate::render::raster::{draw_image, fill_line, render_layer, stretch_to_canvas};
use crate::scene::model::{BrandConfig, GeneratedAsset, LogoOverlay, OverlaySettings};

/// Opacity of the brand tint layer.
pub const BRAND_TINT_OPACITY: f32 = 0.3;
/// Widest the exported logo may be, as a fraction of canvas width.
pub const LOGO_MAX_WIDTH_RATIO: f64 = 0.4;

/// Background filter state: CSS `blur(Npx) brightness(N%)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FilterSpec {
    /// Gaussian standard deviation in canvas pixels.
    pub blur_px: u8,
    /// Linear brightness percentage.
    pub brightness_percent: u16,
}

impl FilterSpec {
    /// Filter for `settings`, clamped into domain.
    pub fn from_settings(settings: &OverlaySettings) -> Self {
        Self {
            blur_px: settings.clamped_blur_radius(),
            brightness_percent: settings.clamped_brightness(),
        }
    }

    /// CSS filter string.
    pub fn css(&self) -> String {
        format!(
            "blur({}px) brightness({}%)",
            self.blur_px, self.brightness_percent
        )
    }

    /// Apply to a premultiplied buffer of `canvas` size.
    pub fn apply(&self, buf: Vec<u8>, canvas: Canvas) -> StoryResult<Vec<u8>> {
        let mut out = if self.blur_px > 0 {
            gaussian_blur_rgba8_premul(&buf, canvas.width, canvas.height, f32::from(self.blur_px))?
        } else {
            buf
        };
        brightness_rgba8_premul(&mut out, f32::from(self.brightness_percent));
        Ok(out)
    }
}

/// Which of the four layers a record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Filtered background image.
    Background,
    /// Brand color tint.
    BrandTint,
    /// Overlay text.
    Text,
    /// Brand logo.
    Logo,
}

/// What was drawn for one layer of a flatten.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerRecord {
    /// Layer kind.
    pub kind: LayerKind,
    /// Filter applied to this layer's pixels, if any.
    pub filter: Option<FilterSpec>,
    /// Drop shadow drawn beneath this layer, if any.
    pub shadow: Option<ShadowSpec>,
    /// Blend mode used to composite the layer.
    pub blend: BlendMode,
    /// Layer opacity.
    pub opacity: f32,
    /// Destination rectangle in canvas pixels for placed layers (logo).
    pub bounds: Option<Rect>,
}

impl LayerRecord {
    fn plain(kind: LayerKind) -> Self {
        Self {
            kind,
            filter: None,
            shadow: None,
            blend: BlendMode::Normal,
            opacity: 1.0,
            bounds: None,
        }
    }
}

/// Render options for [`Compositor::flatten`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FlattenOpts {
    /// Output size.
    pub canvas: Canvas,
    /// Output encoding.
    pub format: OutputFormat,
}

/// Flattened canvas before encoding.
#[derive(Clone, Debug)]
pub struct FlattenedImage {
    /// Canvas size.
    pub canvas: Canvas,
    /// Premultiplied RGBA8 pixels.
    pub rgba8_premul: Vec<u8>,
    /// Layers in draw order.
    pub layers: Vec<LayerRecord>,
}

/// Encoded result of [`Compositor::flatten`].
#[derive(Clone, Debug)]
pub struct FlattenOutput {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Encoding used.
    pub format: OutputFormat,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Layers in draw order.
    pub layers: Vec<LayerRecord>,
}

/// Export-time logo rectangle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LogoPlacement {
    /// Left edge in canvas pixels.
    pub x: f64,
    /// Top edge in canvas pixels.
    pub y: f64,
    /// Drawn width.
    pub width: f64,
    /// Drawn height.
    pub height: f64,
    /// True when the width clamp shrank the logo.
    pub clamped: bool,
}

impl LogoPlacement {
    /// Size the logo from its natural size and `scale`, shrink it uniformly to at most 40% of the
    /// canvas width, and center it on the logo's percentage position.
    pub fn compute(natural: (f64, f64), logo: &LogoOverlay, canvas: Canvas) -> Self {
        let logo = logo.sanitized();
        let mut width = natural.0 * logo.scale;
        let mut height = natural.1 * logo.scale;
        let max_w = canvas.w() * LOGO_MAX_WIDTH_RATIO;
        let clamped = width > max_w;
        if clamped {
            height = height * max_w / width;
            width = max_w;
        }
        Self {
            x: logo.x / 100.0 * canvas.w() - width / 2.0,
            y: logo.y / 100.0 * canvas.h() - height / 2.0,
            width,
            height,
            clamped,
        }
    }

    /// As a rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Flattens assets into single raster images.
///
/// Every flatten uses freshly allocated buffers, so one compositor can serve many threads.
#[derive(Clone)]
pub struct Compositor {
    source: Arc<dyn ByteSource>,
    fonts: FontLibrary,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("fonts", &self.fonts)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// New compositor reading image bytes from `source` and drawing text with `fonts`.
    pub fn new(source: Arc<dyn ByteSource>, fonts: FontLibrary) -> Self {
        Self { source, fonts }
    }

    /// Fonts available for text.
    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Flatten and encode one asset.
    #[tracing::instrument(skip_all, fields(asset = asset.id(), slide = asset.slide_index()))]
    pub fn flatten(
        &self,
        asset: &GeneratedAsset,
        brand: &BrandConfig,
        opts: &FlattenOpts,
    ) -> StoryResult<FlattenOutput> {
        let flat = self.flatten_pixels(asset, brand, opts.canvas)?;
        let bytes = encode_rgba8_premul(&flat.rgba8_premul, flat.canvas, opts.format)?;
        tracing::debug!(bytes = bytes.len(), format = opts.format.extension(), "encoded");
        Ok(FlattenOutput {
            bytes,
            format: opts.format,
            width: flat.canvas.width,
            height: flat.canvas.height,
            layers: flat.layers,
        })
    }

    /// Flatten many assets in parallel. Results keep input order; one failure does not affect the
    /// others.
    #[tracing::instrument(skip_all, fields(count = assets.len()))]
    pub fn flatten_batch(
        &self,
        assets: &[GeneratedAsset],
        brand: &BrandConfig,
        opts: &FlattenOpts,
    ) -> Vec<StoryResult<FlattenOutput>> {
        assets
            .par_iter()
            .map(|asset| self.flatten(asset, brand, opts))
            .collect()
    }

    /// Flatten one asset to premultiplied pixels without encoding.
    pub fn flatten_pixels(
        &self,
        asset: &GeneratedAsset,
        brand: &BrandConfig,
        canvas: Canvas,
    ) -> StoryResult<FlattenedImage> {
        let canvas = Canvas::new(canvas.width, canvas.height)?;
        let settings = asset.settings.sanitized();

        // Decode everything up front so a failure never leaves a partial image.
        let bg_target = DecodeTarget::Background {
            asset_id: asset.id().to_owned(),
            slide_index: asset.slide_index(),
        };
        let background = self.load_image(asset.source_image(), bg_target)?;
        let logo = match (&settings.logo_overlay, &brand.logo_image) {
            (Some(l), Some(logo_ref)) if l.visible => {
                Some((*l, self.load_logo(logo_ref)?))
            }
            (Some(l), None) if l.visible => {
                tracing::debug!("logo overlay visible but brand has no logo; skipping");
                None
            }
            _ => None,
        };

        let mut layers = Vec::with_capacity(4);

        let filter = FilterSpec::from_settings(&settings);
        let mut px = filter.apply(stretch_to_canvas(&background, canvas)?, canvas)?;
        layers.push(LayerRecord {
            filter: Some(filter),
            ..LayerRecord::plain(LayerKind::Background)
        });

        if settings.brand_overlay_enabled {
            let tint = brand.primary_color.to_rgba8_premul().to_array();
            fill_in_place(&mut px, tint, BRAND_TINT_OPACITY, BlendMode::Overlay);
            layers.push(LayerRecord {
                blend: BlendMode::Overlay,
                opacity: BRAND_TINT_OPACITY,
                ..LayerRecord::plain(LayerKind::BrandTint)
            });
        }

        if settings.text_overlay.is_drawn() {
            self.draw_text(&mut px, &settings, brand, canvas)?;
            layers.push(LayerRecord {
                shadow: Some(ShadowSpec::TEXT),
                ..LayerRecord::plain(LayerKind::Text)
            });
        } else {
            tracing::debug!("text overlay hidden or empty; skipping");
        }

        if let Some((overlay, prepared)) = logo {
            let placement = LogoPlacement::compute(prepared.natural_size(), &overlay, canvas);
            if placement.clamped {
                tracing::debug!(width = placement.width, "logo clamped to max width");
            }
            let layer = draw_logo(&prepared, &placement, canvas)?;
            composite_in_place(&mut px, &layer, 1.0, BlendMode::Normal)?;
            layers.push(LayerRecord {
                bounds: Some(placement.rect()),
                ..LayerRecord::plain(LayerKind::Logo)
            });
        }

        Ok(FlattenedImage {
            canvas,
            rgba8_premul: px,
            layers,
        })
    }

    fn load_image(&self, image: &ImageRef, target: DecodeTarget) -> StoryResult<PreparedImage> {
        let bytes = image
            .read_bytes(self.source.as_ref())
            .map_err(|e| StoryError::decode(target.clone(), e.to_string()))?;
        decode_image(&bytes).map_err(|e| StoryError::decode(target, e.to_string()))
    }

    fn load_logo(&self, image: &ImageRef) -> StoryResult<PreparedLogo> {
        let bytes = image
            .read_bytes(self.source.as_ref())
            .map_err(|e| StoryError::decode(DecodeTarget::Logo, e.to_string()))?;
        decode_logo(&bytes).map_err(|e| StoryError::decode(DecodeTarget::Logo, e.to_string()))
    }

    fn draw_text(
        &self,
        px: &mut [u8],
        settings: &OverlaySettings,
        brand: &BrandConfig,
        canvas: Canvas,
    ) -> StoryResult<()> {
        let text = &settings.text_overlay;
        let lines = split_lines(&text.content);
        if lines.iter().all(|l| l.trim().is_empty()) {
            return Ok(());
        }

        let font = brand.font();
        let face = self.fonts.resolve(&font).ok_or_else(|| {
            StoryError::render(format!(
                "no font available for {} {} (font library is empty)",
                font.family, font.weight
            ))
        })?;

        let placement = TextBlockPlacement::compute(
            text.layout,
            f64::from(text.font_size_base),
            lines.len(),
            canvas,
        );
        let [r, g, b, a] = text.color.to_rgba8();
        let brush = TextBrushRgba8 { r, g, b, a };
        let font_data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
            0,
        );

        let mut engine = TextLayoutEngine::new();
        let layer = render_layer(canvas, |ctx| {
            for (line, center_y) in lines.iter().zip(&placement.line_centers) {
                if line.trim().is_empty() {
                    continue;
                }
                let shaped = engine.shape_line(line, face, placement.font_size as f32, brush)?;
                if shaped.is_empty() {
                    continue;
                }
                fill_line(
                    ctx,
                    &shaped,
                    &font_data,
                    placement.center_x,
                    *center_y,
                    placement.max_width,
                );
            }
            Ok(())
        })?;

        let shadow = shadow_layer_rgba8_premul(&layer, canvas.width, canvas.height, &ShadowSpec::TEXT)?;
        composite_in_place(px, &shadow, 1.0, BlendMode::Normal)?;
        composite_in_place(px, &layer, 1.0, BlendMode::Normal)
    }
}

fn draw_logo(
    logo: &PreparedLogo,
    placement: &LogoPlacement,
    canvas: Canvas,
) -> StoryResult<Vec<u8>> {
    let dest = (
        placement.x,
        placement.y,
        placement.x + placement.width,
        placement.y + placement.height,
    );
    if placement.width <= 0.0 || placement.height <= 0.0 {
        return Ok(vec![0u8; canvas.rgba_len()]);
    }
    match logo {
        PreparedLogo::Raster(img) => render_layer(canvas, |ctx| {
            draw_image(ctx, &img.rgba8_premul, img.width, img.height, dest)
        }),
        PreparedLogo::Svg(svg) => {
            let w = placement.width.ceil().max(1.0) as u32;
            let h = placement.height.ceil().max(1.0) as u32;
            let raster = rasterize_svg_to_premul_rgba8(&svg.tree, w, h)?;
            render_layer(canvas, |ctx| draw_image(ctx, &raster, w, h, dest))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
