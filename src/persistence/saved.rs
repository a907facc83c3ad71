use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::{StoryError, StoryResult};
use crate::persistence::storage::{AssetStorage, MetadataStore, NewSavedImage, SavedImage};
use crate::scene::model::OverlaySettings;

/// Thumbnail width in pixels.
pub const THUMBNAIL_WIDTH: u32 = 300;
/// Thumbnail JPEG quality.
pub const THUMBNAIL_QUALITY: u8 = 70;

/// An image to persist together with its generation context.
#[derive(Clone, Debug)]
pub struct SaveRequest {
    /// Encoded image.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`.
    pub mime_type: String,
    /// Generation prompt.
    pub prompt: String,
    /// 1-based slide number.
    pub slide_number: u32,
    /// User text the batch came from.
    pub original_message: Option<String>,
    /// Overlay settings to keep with the image.
    pub settings: OverlaySettings,
}

/// Downscale to [`THUMBNAIL_WIDTH`] wide (aspect kept) and encode as JPEG.
pub fn make_thumbnail(bytes: &[u8]) -> StoryResult<Vec<u8>> {
    let img = image::load_from_memory(bytes).context("decode image for thumbnail")?;
    let (w, h) = (img.width(), img.height());
    if w == 0 || h == 0 {
        return Err(StoryError::validation("cannot thumbnail an empty image"));
    }
    let th = ((u64::from(h) * u64::from(THUMBNAIL_WIDTH) + u64::from(w) / 2) / u64::from(w))
        .max(1) as u32;
    let small = image::imageops::resize(
        &img.to_rgb8(),
        THUMBNAIL_WIDTH,
        th,
        image::imageops::FilterType::Triangle,
    );
    let mut out = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut out), THUMBNAIL_QUALITY);
    small
        .write_with_encoder(encoder)
        .context("encode thumbnail")?;
    Ok(out)
}

fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

/// Upload an image and its thumbnail, then record the metadata.
///
/// Every call picks fresh blob names, so two records never share a blob even when their bytes are
/// identical. If the metadata write fails, both blobs are deleted again; a failed cleanup is
/// logged and the original error is returned.
#[tracing::instrument(skip_all, fields(slide = req.slide_number, bytes = req.bytes.len()))]
pub fn save_generated(
    storage: &dyn AssetStorage,
    meta: &dyn MetadataStore,
    req: SaveRequest,
) -> StoryResult<SavedImage> {
    let thumbnail = make_thumbnail(&req.bytes)?;
    let stem = uuid::Uuid::now_v7().simple();
    let image_name = format!("generated/{stem}.{}", extension_for_mime(&req.mime_type));
    let thumb_name = format!("thumbnails/{stem}.jpg");

    let image_url = storage
        .upload(&req.bytes, &image_name)
        .map_err(|e| StoryError::persistence(format!("upload image: {e}")))?;
    let thumbnail_url = match storage.upload(&thumbnail, &thumb_name) {
        Ok(url) => url,
        Err(e) => {
            cleanup(storage, std::slice::from_ref(&image_url));
            return Err(StoryError::persistence(format!("upload thumbnail: {e}")));
        }
    };

    let record = NewSavedImage {
        image_url: image_url.clone(),
        thumbnail_url: thumbnail_url.clone(),
        prompt: req.prompt,
        slide_number: req.slide_number,
        original_message: req.original_message,
        settings: req.settings,
        file_size: req.bytes.len() as u64,
        mime_type: req.mime_type,
    };
    match meta.insert(record) {
        Ok(saved) => {
            tracing::info!(id = %saved.id, "saved generated image");
            Ok(saved)
        }
        Err(e) => {
            cleanup(storage, &[image_url, thumbnail_url]);
            Err(StoryError::persistence(format!("insert metadata: {e}")))
        }
    }
}

fn cleanup(storage: &dyn AssetStorage, urls: &[String]) {
    if let Err(err) = storage.delete(urls) {
        tracing::warn!(?urls, %err, "compensating delete failed; blobs orphaned");
    }
}

/// Saved images, newest first.
pub fn list_saved(meta: &dyn MetadataStore) -> StoryResult<Vec<SavedImage>> {
    let mut rows = meta.list()?;
    rows.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
    Ok(rows)
}

/// Delete a saved image's blobs, then its metadata.
#[tracing::instrument(skip(storage, meta))]
pub fn delete_saved(
    storage: &dyn AssetStorage,
    meta: &dyn MetadataStore,
    id: &str,
) -> StoryResult<()> {
    let record = meta
        .get(id)?
        .ok_or_else(|| StoryError::persistence(format!("no saved image with id '{id}'")))?;
    if let Err(err) = storage.delete(&[record.image_url.clone(), record.thumbnail_url.clone()]) {
        tracing::warn!(%err, "blob delete failed; removing metadata anyway");
    }
    meta.delete(id)
}

#[cfg(test)]
#[path = "../../tests/unit/persistence/saved.rs"]
mod tests;
