//! Storyframe composes 9:16 story images from a generated background and a handful of overlays.
//!
//! The pieces:
//!
//! - An [`OverlaySettings`] model per [`GeneratedAsset`], edited through validated
//!   [`OverlaySettingsPatch`]es or by dragging the logo with a [`LogoPositioner`]
//! - [`resolve_layout`] mapping a layout name to the text band it occupies
//! - [`build_preview`] describing the live, non-flattened layer stack
//! - A [`Compositor`] that flattens background, brand tint, shadowed text and logo into one
//!   deterministic raster
//!
//! Around them sit the collaborators the app talks to: background providers, saved-image
//! persistence, the persisted [`BrandConfig`], batch downloads, and palette extraction.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod download;
mod effects;
mod foundation;
mod interact;
mod layout;
mod persistence;
mod provider;
mod render;
mod scene;

pub use crate::foundation::core::{Affine, Canvas, Point, REFERENCE_WIDTH, Rect, Rgba8Premul, Size, Vec2};
pub use crate::foundation::error::{DecodeTarget, StoryError, StoryResult};

pub use crate::assets::color::Color;
pub use crate::assets::decode::{decode_image, decode_logo, parse_svg, rasterize_svg_to_premul_rgba8};
pub use crate::assets::palette::{ExtractedPalette, extract_palette};
pub use crate::assets::store::{
    ByteSource, FsByteSource, ImageRef, MemoryByteSource, PreparedImage, PreparedLogo,
    PreparedSvg, normalize_rel_path,
};

pub use crate::effects::blur::gaussian_blur_rgba8_premul;
pub use crate::effects::color::brightness_rgba8_premul;
pub use crate::effects::composite::{BlendMode, composite_in_place, fill_in_place};
pub use crate::effects::shadow::{ShadowSpec, css_shadow_list, shadow_layer_rgba8_premul};

pub use crate::layout::fonts::{DEFAULT_FONT_LABEL, FontFace, FontLibrary, FontSpec};
pub use crate::layout::presets::{
    LayoutPreset, LayoutSpec, TextBlockPlacement, VerticalAlign, resolve_layout, split_lines,
};

pub use crate::scene::model::{
    BLUR_RANGE, BRIGHTNESS_RANGE, BrandConfig, FONT_SIZE_RANGE, GeneratedAsset, LOGO_POS_RANGE,
    LOGO_SCALE_RANGE, LogoOverlay, OverlaySettings, TextOverlay,
};
pub use crate::scene::patch::{LogoOverlayPatch, OverlaySettingsPatch, TextOverlayPatch};

pub use crate::interact::logo_drag::{
    DragState, LogoPositioner, PointerEvent, preview_logo_width_percent,
};

pub use crate::render::compositor::{
    BRAND_TINT_OPACITY, Compositor, FilterSpec, FlattenOpts, FlattenOutput, FlattenedImage,
    LOGO_MAX_WIDTH_RATIO, LayerKind, LayerRecord, LogoPlacement,
};
pub use crate::render::encode::{OutputFormat, encode_rgba8_premul};
pub use crate::render::preview::{
    Insets, PreviewLayer, PreviewOptions, PreviewStack, SAFE_AREA, TEXT_AREA, TEXT_PADDING_PX,
    build_preview,
};

pub use crate::provider::request::{Atmosphere, DEFAULT_THEME, GenerationRequest, StoryGoal};
pub use crate::provider::strategy::{
    BackgroundProvider, BatchOutcome, ProvidedImage, ProviderStrategy, SlideFailure,
    generate_batch,
};

pub use crate::persistence::saved::{
    SaveRequest, THUMBNAIL_QUALITY, THUMBNAIL_WIDTH, delete_saved, list_saved, make_thumbnail,
    save_generated,
};
pub use crate::persistence::storage::{
    AssetStorage, FsAssetStorage, InMemoryMetadataStore, JsonMetadataStore, MetadataStore,
    NewSavedImage, SavedImage,
};

pub use crate::config::brand_store::{
    BRAND_CONFIG_FILE, BrandConfigStore, CONFIG_DIR_ENV, JsonFileBrandStore, MemoryBrandStore,
    autosave_if_customized, load_or_default, resolve_config_dir,
};

pub use crate::download::batch::{
    BatchDownloadOpts, DEFAULT_DOWNLOAD_BASE, DirectoryDownloadTarget, DownloadFailure,
    DownloadItem, DownloadReport, DownloadTarget, download_all, download_filename, download_image,
    image_extension, single_download_filename,
};
