//! Media storage implementations.
//!
//! Uploads are content-addressed: the media id is the SHA-256 of the bytes
//! plus an extension derived from the sniffed image format, and files land
//! in `ab/cd/` sharded directories. Identical uploads deduplicate for free.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use domains::{AppError, MediaStorage, Result};
use image::ImageFormat;
use mime::Mime;
use sha2::{Digest, Sha256};

#[cfg(feature = "media-local")]
use std::path::PathBuf;
#[cfg(feature = "media-local")]
use tokio::fs;

/// Sniffs the upload and accepts only the formats the web client renders.
/// The declared Content-Type is ignored; the bytes decide.
pub(crate) fn sniff_image_format(data: &[u8]) -> Result<ImageFormat> {
    let format = image::guess_format(data)
        .map_err(|_| AppError::ValidationError("upload is not a recognized image".into()))?;
    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::WebP => Ok(format),
        other => Err(AppError::ValidationError(format!(
            "unsupported image format: {other:?}"
        ))),
    }
}

/// Derives the content-addressed media id: `<sha256-hex>.<ext>`.
pub(crate) fn media_id_for(data: &[u8], format: ImageFormat) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let hash = hex::encode(hasher.finalize());
    let ext = format.extensions_str().first().copied().unwrap_or("bin");
    format!("{hash}.{ext}")
}

/// Relative sharded path for a media id: `ab/cd/<id>`.
/// Rejects ids that could not have come from `media_id_for`.
pub(crate) fn sharded_rel_path(media_id: &str) -> Result<String> {
    // The shard prefix is hex by construction; anything else (a leading
    // dot, say) could escape the shard directories.
    let well_formed = media_id.len() > 4
        && media_id[0..4].chars().all(|c| c.is_ascii_hexdigit())
        && media_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.');
    if !well_formed {
        return Err(AppError::ValidationError("malformed media id".into()));
    }
    Ok(format!("{}/{}/{}", &media_id[0..2], &media_id[2..4], media_id))
}

/// Local filesystem implementation of `MediaStorage`.
#[cfg(feature = "media-local")]
pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g., "data/media")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/static/media")
    url_prefix: String,
}

#[cfg(feature = "media-local")]
impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self {
            root_path: root,
            url_prefix,
        }
    }

    fn absolute_path(&self, media_id: &str) -> Result<PathBuf> {
        let rel = sharded_rel_path(media_id)?;
        Ok(self.root_path.join(rel))
    }
}

#[cfg(feature = "media-local")]
#[async_trait]
impl MediaStorage for LocalMediaStore {
    async fn save(&self, data: Bytes, _content_type: Mime) -> Result<String> {
        let format = sniff_image_format(&data)?;
        let media_id = media_id_for(&data, format);

        let target_path = self.absolute_path(&media_id)?;
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(format!("media dir create failed: {e}")))?;
        }

        // Content addressing: an existing file already holds these bytes.
        if !target_path.exists() {
            fs::write(&target_path, &data)
                .await
                .map_err(|e| AppError::Internal(format!("media write failed: {e}")))?;
        }

        Ok(media_id)
    }

    async fn delete(&self, media_id: &str) -> Result<()> {
        let target_path = self.absolute_path(media_id)?;
        if !target_path.exists() {
            return Err(AppError::NotFound("media".into(), media_id.to_string()));
        }
        fs::remove_file(&target_path)
            .await
            .map_err(|e| AppError::Internal(format!("media delete failed: {e}")))?;
        Ok(())
    }

    fn public_url(&self, media_id: &str) -> String {
        match sharded_rel_path(media_id) {
            Ok(rel) => format!("{}/{}", self.url_prefix, rel),
            Err(_) => format!("{}/{}", self.url_prefix, media_id),
        }
    }
}

/// In-memory implementation of `MediaStorage` for tests and dry runs.
/// Same ids and URLs as `LocalMediaStore`, no disk involved.
pub struct MemoryMediaStore {
    objects: DashMap<String, Bytes>,
    url_prefix: String,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self {
            objects: DashMap::new(),
            url_prefix: "/static/media".into(),
        }
    }

    pub fn with_url_prefix(url_prefix: String) -> Self {
        Self {
            objects: DashMap::new(),
            url_prefix,
        }
    }

    pub fn contains(&self, media_id: &str) -> bool {
        self.objects.contains_key(media_id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl Default for MemoryMediaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaStorage for MemoryMediaStore {
    async fn save(&self, data: Bytes, _content_type: Mime) -> Result<String> {
        let format = sniff_image_format(&data)?;
        let media_id = media_id_for(&data, format);
        self.objects.insert(media_id.clone(), data);
        Ok(media_id)
    }

    async fn delete(&self, media_id: &str) -> Result<()> {
        self.objects
            .remove(media_id)
            .ok_or_else(|| AppError::NotFound("media".into(), media_id.to_string()))?;
        Ok(())
    }

    fn public_url(&self, media_id: &str) -> String {
        match sharded_rel_path(media_id) {
            Ok(rel) => format!("{}/{}", self.url_prefix, rel),
            Err(_) => format!("{}/{}", self.url_prefix, media_id),
        }
    }
}
