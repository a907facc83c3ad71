use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use anyhow::Context;

use crate::assets::store::{ByteSource, normalize_rel_path};
use crate::foundation::error::{StoryError, StoryResult};
use crate::scene::model::OverlaySettings;

/// Blob storage ("write bytes, get URL").
pub trait AssetStorage: Send + Sync {
    /// Store `bytes` under `filename` and return its URL. Re-uploading the same name overwrites.
    fn upload(&self, bytes: &[u8], filename: &str) -> StoryResult<String>;

    /// Delete blobs by URL. Missing blobs are not an error.
    fn delete(&self, urls: &[String]) -> StoryResult<()>;
}

/// Metadata of one saved image.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SavedImage {
    /// Record id.
    pub id: String,
    /// Full image URL.
    pub image_url: String,
    /// Thumbnail URL.
    pub thumbnail_url: String,
    /// Generation prompt.
    pub prompt: String,
    /// 1-based slide number.
    pub slide_number: u32,
    /// User text the batch was generated from.
    #[serde(default)]
    pub original_message: Option<String>,
    /// Overlay settings at save time.
    #[serde(default)]
    pub settings: OverlaySettings,
    /// Encoded image size in bytes.
    pub file_size: u64,
    /// Image MIME type.
    pub mime_type: String,
    /// Milliseconds since the Unix epoch.
    pub created_at_ms: u64,
}

/// A record before the store assigns `id` and `created_at_ms`.
#[derive(Clone, Debug, PartialEq)]
pub struct NewSavedImage {
    /// Full image URL.
    pub image_url: String,
    /// Thumbnail URL.
    pub thumbnail_url: String,
    /// Generation prompt.
    pub prompt: String,
    /// 1-based slide number.
    pub slide_number: u32,
    /// User text the batch was generated from.
    pub original_message: Option<String>,
    /// Overlay settings at save time.
    pub settings: OverlaySettings,
    /// Encoded image size in bytes.
    pub file_size: u64,
    /// Image MIME type.
    pub mime_type: String,
}

/// Saved-image metadata table.
pub trait MetadataStore: Send + Sync {
    /// Insert a record, assigning id and creation time.
    fn insert(&self, record: NewSavedImage) -> StoryResult<SavedImage>;
    /// All records, in no particular order.
    fn list(&self) -> StoryResult<Vec<SavedImage>>;
    /// One record by id.
    fn get(&self, id: &str) -> StoryResult<Option<SavedImage>>;
    /// Remove a record. Unknown ids are not an error.
    fn delete(&self, id: &str) -> StoryResult<()>;
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn finish_record(record: NewSavedImage, existing: &[SavedImage]) -> SavedImage {
    // Strictly increasing so newest-first ordering is total.
    let last = existing.iter().map(|r| r.created_at_ms).max().unwrap_or(0);
    SavedImage {
        id: uuid::Uuid::now_v7().to_string(),
        image_url: record.image_url,
        thumbnail_url: record.thumbnail_url,
        prompt: record.prompt,
        slide_number: record.slide_number,
        original_message: record.original_message,
        settings: record.settings,
        file_size: record.file_size,
        mime_type: record.mime_type,
        created_at_ms: now_ms().max(last + 1),
    }
}

/// Stores blobs as files beneath a root directory; URLs are root-relative paths.
#[derive(Clone, Debug)]
pub struct FsAssetStorage {
    root: PathBuf,
}

impl FsAssetStorage {
    /// Storage rooted at `root` (created on first upload).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetStorage for FsAssetStorage {
    fn upload(&self, bytes: &[u8], filename: &str) -> StoryResult<String> {
        let rel = normalize_rel_path(filename)?;
        let path = self.root.join(&rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create '{}'", parent.display()))?;
        }
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        Ok(rel)
    }

    fn delete(&self, urls: &[String]) -> StoryResult<()> {
        for url in urls {
            let path = self.root.join(normalize_rel_path(url)?);
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(StoryError::persistence(format!(
                        "delete '{}': {e}",
                        path.display()
                    )));
                }
            }
        }
        Ok(())
    }
}

impl ByteSource for FsAssetStorage {
    fn read(&self, url: &str) -> StoryResult<Vec<u8>> {
        let path = self.root.join(normalize_rel_path(url)?);
        Ok(std::fs::read(&path).with_context(|| format!("read '{}'", path.display()))?)
    }
}

/// Metadata kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    rows: RwLock<Vec<SavedImage>>,
}

impl InMemoryMetadataStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoryError {
    StoryError::persistence("metadata store lock poisoned")
}

impl MetadataStore for InMemoryMetadataStore {
    fn insert(&self, record: NewSavedImage) -> StoryResult<SavedImage> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let saved = finish_record(record, &rows);
        rows.push(saved.clone());
        Ok(saved)
    }

    fn list(&self) -> StoryResult<Vec<SavedImage>> {
        Ok(self.rows.read().map_err(|_| poisoned())?.clone())
    }

    fn get(&self, id: &str) -> StoryResult<Option<SavedImage>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    fn delete(&self, id: &str) -> StoryResult<()> {
        self.rows
            .write()
            .map_err(|_| poisoned())?
            .retain(|r| r.id != id);
        Ok(())
    }
}

/// Metadata kept as a JSON array in one file.
#[derive(Debug)]
pub struct JsonMetadataStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonMetadataStore {
    /// Store backed by `path` (created on first insert).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> StoryResult<Vec<SavedImage>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StoryError::persistence(format!("parse '{}': {e}", self.path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoryError::persistence(format!(
                "read '{}': {e}",
                self.path.display()
            ))),
        }
    }

    fn store(&self, rows: &[SavedImage]) -> StoryResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create '{}'", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(rows).map_err(|e| StoryError::serde(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| StoryError::persistence(format!("write '{}': {e}", self.path.display())))
    }
}

impl MetadataStore for JsonMetadataStore {
    fn insert(&self, record: NewSavedImage) -> StoryResult<SavedImage> {
        let _guard = self.lock.lock().map_err(|_| poisoned())?;
        let mut rows = self.load()?;
        let saved = finish_record(record, &rows);
        rows.push(saved.clone());
        self.store(&rows)?;
        Ok(saved)
    }

    fn list(&self) -> StoryResult<Vec<SavedImage>> {
        let _guard = self.lock.lock().map_err(|_| poisoned())?;
        self.load()
    }

    fn get(&self, id: &str) -> StoryResult<Option<SavedImage>> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }

    fn delete(&self, id: &str) -> StoryResult<()> {
        let _guard = self.lock.lock().map_err(|_| poisoned())?;
        let mut rows = self.load()?;
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() != before {
            self.store(&rows)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persistence/storage.rs"]
mod tests;
