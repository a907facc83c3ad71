use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use crate::assets::store::{ByteSource, ImageRef};
use crate::foundation::error::StoryResult;

/// Base file name used by the app for downloaded backgrounds.
pub const DEFAULT_DOWNLOAD_BASE: &str = "story-background";

const KNOWN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Receives downloaded bytes under a suggested file name.
pub trait DownloadTarget: Send + Sync {
    /// Deliver `bytes` as `filename`.
    fn offer(&self, filename: &str, bytes: &[u8]) -> StoryResult<()>;
}

/// Writes every offered file into one directory.
#[derive(Clone, Debug)]
pub struct DirectoryDownloadTarget {
    dir: PathBuf,
}

impl DirectoryDownloadTarget {
    /// Target writing into `dir`, created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Destination directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadTarget for DirectoryDownloadTarget {
    fn offer(&self, filename: &str, bytes: &[u8]) -> StoryResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create download dir '{}'", self.dir.display()))?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        Ok(())
    }
}

/// Extension implied by an image reference.
///
/// `data:` URLs map their MIME subtype (`jpeg` becomes `jpg`, anything unrecognized is `png`);
/// other references use a recognized extension at the end of their path, ignoring any query
/// string or fragment.
pub fn image_extension(image: &ImageRef) -> Option<String> {
    if image.is_inline() {
        let ext = image
            .inline_mime()
            .and_then(|m| m.strip_prefix("image/"))
            .map(str::to_ascii_lowercase)
            .filter(|sub| KNOWN_EXTENSIONS.contains(&sub.as_str()))
            .map(|sub| if sub == "jpeg" { "jpg".to_owned() } else { sub })
            .unwrap_or_else(|| "png".to_owned());
        return Some(ext);
    }

    let raw = image.as_str();
    let path = raw.split(['?', '#']).next().unwrap_or(raw);
    let (_, ext) = path.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    KNOWN_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// `<base>-slide-<n>.<ext>`
pub fn download_filename(base: &str, slide_number: u32, ext: &str) -> String {
    format!("{base}-slide-{slide_number}.{ext}")
}

/// File name for a single-image download; unknown extensions default to `png`.
pub fn single_download_filename(image: &ImageRef, slide_number: u32) -> String {
    let ext = image_extension(image).unwrap_or_else(|| "png".to_owned());
    download_filename(DEFAULT_DOWNLOAD_BASE, slide_number.max(1), &ext)
}

/// Fetch `image` and offer it to `target` as `filename`.
pub fn download_image(
    source: &dyn ByteSource,
    target: &dyn DownloadTarget,
    image: &ImageRef,
    filename: &str,
) -> StoryResult<()> {
    let bytes = image.read_bytes(source)?;
    target.offer(filename, &bytes)
}

/// One entry of a batch download.
#[derive(Clone, Debug)]
pub struct DownloadItem {
    /// Image to fetch.
    pub image: ImageRef,
    /// Slide number used in the file name; defaults to the 1-based batch position.
    pub slide_number: Option<u32>,
}

/// Batch download options.
#[derive(Clone, Debug)]
pub struct BatchDownloadOpts {
    /// File name prefix.
    pub base_filename: String,
    /// Pause between consecutive items.
    pub delay: Duration,
}

impl Default for BatchDownloadOpts {
    fn default() -> Self {
        Self {
            base_filename: DEFAULT_DOWNLOAD_BASE.to_owned(),
            delay: Duration::from_millis(500),
        }
    }
}

/// A batch item that could not be delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadFailure {
    /// Slide number of the item.
    pub slide_number: u32,
    /// File name it would have used.
    pub filename: String,
    /// Error description.
    pub error: String,
}

/// Outcome of [`download_all`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// File names delivered, in batch order.
    pub delivered: Vec<String>,
    /// Items that failed.
    pub failures: Vec<DownloadFailure>,
}

impl DownloadReport {
    /// True when nothing failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Download every item in order, pausing `opts.delay` between items.
///
/// A failing item is logged and recorded; the remaining items are still attempted. Unknown
/// extensions default to `jpg`.
#[tracing::instrument(skip_all, fields(items = items.len()))]
pub fn download_all(
    source: &dyn ByteSource,
    target: &dyn DownloadTarget,
    items: &[DownloadItem],
    opts: &BatchDownloadOpts,
) -> DownloadReport {
    let mut report = DownloadReport::default();
    for (i, item) in items.iter().enumerate() {
        let slide_number = item.slide_number.unwrap_or(i as u32 + 1);
        let ext = image_extension(&item.image).unwrap_or_else(|| "jpg".to_owned());
        let filename = download_filename(&opts.base_filename, slide_number, &ext);

        match download_image(source, target, &item.image, &filename) {
            Ok(()) => {
                tracing::debug!(%filename, "downloaded");
                report.delivered.push(filename);
            }
            Err(err) => {
                tracing::warn!(slide = slide_number, %err, "download failed; continuing");
                report.failures.push(DownloadFailure {
                    slide_number,
                    filename,
                    error: err.to_string(),
                });
            }
        }

        if i + 1 < items.len() && !opts.delay.is_zero() {
            std::thread::sleep(opts.delay);
        }
    }
    report
}

#[cfg(test)]
#[path = "../../tests/unit/download/batch.rs"]
mod tests;
