use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use base64::Engine as _;

use crate::foundation::error::{StoryError, StoryResult};

#[derive(Clone, Debug)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Container format the bytes were decoded from.
    pub format: Option<image::ImageFormat>,
}

#[derive(Clone, Debug)]
/// Prepared SVG asset represented as a parsed `usvg` tree.
pub struct PreparedSvg {
    /// Parsed SVG tree.
    pub tree: Arc<usvg::Tree>,
}

/// A decoded logo: either raster pixels or a vector tree rasterized at draw size.
#[derive(Clone, Debug)]
pub enum PreparedLogo {
    /// PNG/JPEG/WebP/... logo.
    Raster(PreparedImage),
    /// SVG logo.
    Svg(PreparedSvg),
}

impl PreparedLogo {
    /// Natural size in pixels (SVG: viewport size).
    pub fn natural_size(&self) -> (f64, f64) {
        match self {
            Self::Raster(i) => (f64::from(i.width), f64::from(i.height)),
            Self::Svg(s) => (
                f64::from(s.tree.size().width()),
                f64::from(s.tree.size().height()),
            ),
        }
    }
}

/// Reference to raster bytes: an URL/path, or a `data:` URL carrying the bytes inline.
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap an URL, path, or `data:` URL.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Embed encoded bytes as a base64 `data:` URL.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self(format!("data:{mime};base64,{b64}"))
    }

    /// The raw reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the bytes are embedded.
    pub fn is_inline(&self) -> bool {
        self.0.starts_with("data:")
    }

    /// MIME type of an inline reference (`data:<mime>;...`).
    pub fn inline_mime(&self) -> Option<&str> {
        let rest = self.0.strip_prefix("data:")?;
        let end = rest.find([';', ','])?;
        let mime = &rest[..end];
        (!mime.is_empty()).then_some(mime)
    }

    /// Resolve to encoded bytes. Inline data is decoded without touching `source`.
    pub fn read_bytes(&self, source: &dyn ByteSource) -> StoryResult<Vec<u8>> {
        if self.is_inline() {
            return decode_data_url(&self.0);
        }
        source.read(&self.0)
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Inline payloads can be megabytes; show only the header.
        if self.is_inline() {
            let head = self.0.split(',').next().unwrap_or("data:");
            write!(f, "ImageRef({head},…)")
        } else {
            write!(f, "ImageRef({:?})", self.0)
        }
    }
}

fn decode_data_url(url: &str) -> StoryResult<Vec<u8>> {
    let (header, payload) = url
        .split_once(',')
        .ok_or_else(|| StoryError::validation("data url has no ',' separator"))?;
    if !header.ends_with(";base64") {
        return Err(StoryError::validation(
            "only base64-encoded data urls are supported",
        ));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| StoryError::validation(format!("invalid base64 payload: {e}")))
}

/// Read-only access to encoded bytes by URL ("read bytes for URL").
pub trait ByteSource: Send + Sync {
    /// Fetch all bytes behind `url`.
    fn read(&self, url: &str) -> StoryResult<Vec<u8>>;
}

/// Reads relative paths (or `file://` URLs) beneath a root directory.
#[derive(Clone, Debug)]
pub struct FsByteSource {
    root: PathBuf,
}

impl FsByteSource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ByteSource for FsByteSource {
    fn read(&self, url: &str) -> StoryResult<Vec<u8>> {
        let p = match url.strip_prefix("file://") {
            Some(abs) => PathBuf::from(abs),
            None => self.root.join(normalize_rel_path(url)?),
        };
        std::fs::read(&p).map_err(|e| {
            StoryError::Other(anyhow::anyhow!("failed to read '{}': {e}", p.display()))
        })
    }
}

/// In-memory URL → bytes map, for tests and pre-fetched assets.
#[derive(Debug, Default)]
pub struct MemoryByteSource {
    entries: RwLock<HashMap<String, Arc<Vec<u8>>>>,
}

impl MemoryByteSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes for `url`, replacing any previous entry.
    pub fn insert(&self, url: impl Into<String>, bytes: Vec<u8>) {
        if let Ok(mut map) = self.entries.write() {
            map.insert(url.into(), Arc::new(bytes));
        }
    }
}

impl ByteSource for MemoryByteSource {
    fn read(&self, url: &str) -> StoryResult<Vec<u8>> {
        let map = self
            .entries
            .read()
            .map_err(|_| StoryError::Other(anyhow::anyhow!("byte source lock poisoned")))?;
        map.get(url)
            .map(|b| b.as_ref().clone())
            .ok_or_else(|| StoryError::Other(anyhow::anyhow!("no bytes registered for '{url}'")))
    }
}

/// Normalize and validate relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> StoryResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(StoryError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(StoryError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(StoryError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(StoryError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
