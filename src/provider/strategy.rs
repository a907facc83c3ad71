use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::assets::store::ImageRef;
use crate::foundation::error::{StoryError, StoryResult};
use crate::provider::request::GenerationRequest;
use crate::scene::model::GeneratedAsset;

/// One background produced by a provider.
#[derive(Clone, Debug, PartialEq)]
pub struct ProvidedImage {
    /// Encoded image or a reference to it.
    pub image: ImageRef,
    /// Prompt the image answers.
    pub prompt: String,
    /// 1-based slide position.
    pub slide_index: u32,
}

/// Source of background images for a generation request.
pub trait BackgroundProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Produce the background for one slide.
    fn generate_slide(
        &self,
        request: &GenerationRequest,
        slide_index: u32,
        prompt: &str,
    ) -> StoryResult<ProvidedImage>;
}

/// Built-in providers.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "strategy")]
pub enum ProviderStrategy {
    /// Cycle through the image files of a local directory, sorted by name, embedding each as a
    /// `data:` URL.
    Directory {
        /// Directory holding `.png`, `.jpg`, `.jpeg` or `.webp` files.
        dir: PathBuf,
    },
    /// Cycle through a fixed list of references.
    Fixed {
        /// Images handed out in order.
        images: Vec<ImageRef>,
    },
}

impl ProviderStrategy {
    fn directory_images(dir: &Path) -> StoryResult<Vec<PathBuf>> {
        let mut out = Vec::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("read provider dir '{}'", dir.display()))?
        {
            let path = entry.context("read provider dir entry")?.path();
            if mime_for_path(&path).is_some() {
                out.push(path);
            }
        }
        out.sort();
        Ok(out)
    }
}

/// MIME type for a raster file extension this crate can decode.
pub(crate) fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

impl BackgroundProvider for ProviderStrategy {
    fn name(&self) -> &str {
        match self {
            Self::Directory { .. } => "directory",
            Self::Fixed { .. } => "fixed",
        }
    }

    fn generate_slide(
        &self,
        _request: &GenerationRequest,
        slide_index: u32,
        prompt: &str,
    ) -> StoryResult<ProvidedImage> {
        let pick = slide_index.saturating_sub(1) as usize;
        let image = match self {
            Self::Directory { dir } => {
                let files = Self::directory_images(dir)?;
                if files.is_empty() {
                    return Err(StoryError::provider(format!(
                        "no images in '{}'",
                        dir.display()
                    )));
                }
                let path = &files[pick % files.len()];
                let bytes = std::fs::read(path)
                    .with_context(|| format!("read '{}'", path.display()))?;
                let mime = mime_for_path(path).unwrap_or("image/png");
                ImageRef::from_bytes(mime, &bytes)
            }
            Self::Fixed { images } => {
                if images.is_empty() {
                    return Err(StoryError::provider("fixed provider has no images"));
                }
                images[pick % images.len()].clone()
            }
        };
        Ok(ProvidedImage {
            image,
            prompt: prompt.to_owned(),
            slide_index,
        })
    }
}

/// A slide the provider could not produce.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlideFailure {
    /// 1-based slide.
    pub slide_index: u32,
    /// Error text.
    pub error: String,
}

/// Result of [`generate_batch`]: whatever succeeded plus what failed.
#[derive(Clone, Debug)]
pub struct BatchOutcome {
    /// New assets with default settings, in slide order.
    pub assets: Vec<GeneratedAsset>,
    /// Slides that failed.
    pub failures: Vec<SlideFailure>,
}

/// Ask `provider` for every slide of `request`.
///
/// Slide failures are recorded and skipped; only a batch with no successes is an error.
#[tracing::instrument(skip_all, fields(provider = provider.name()))]
pub fn generate_batch(
    provider: &dyn BackgroundProvider,
    request: &GenerationRequest,
) -> StoryResult<BatchOutcome> {
    request.validate()?;
    let count = request.slide_count();
    let mut assets = Vec::with_capacity(count as usize);
    let mut failures = Vec::new();

    for slide in 1..=count {
        let prompt = request.prompt_for(slide);
        match provider.generate_slide(request, slide, &prompt) {
            Ok(img) => {
                let id = uuid::Uuid::now_v7().to_string();
                assets.push(GeneratedAsset::new(id, img.image, img.prompt, img.slide_index));
            }
            Err(err) => {
                tracing::warn!(slide, %err, "slide generation failed");
                failures.push(SlideFailure {
                    slide_index: slide,
                    error: err.to_string(),
                });
            }
        }
    }

    if assets.is_empty() {
        return Err(StoryError::provider(format!(
            "all {count} slides failed; first error: {}",
            failures
                .first()
                .map(|f| f.error.as_str())
                .unwrap_or("unknown")
        )));
    }
    tracing::info!(ok = assets.len(), failed = failures.len(), "batch generated");
    Ok(BatchOutcome { assets, failures })
}

#[cfg(test)]
#[path = "../../tests/unit/provider/strategy.rs"]
mod tests;
