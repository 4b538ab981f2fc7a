//! Media service
//!
//! Photos, recordings and files attached to entries. Files imported from
//! disk are copied into the content-addressed media store; other media is
//! recorded by URI as-is.

use crate::database::{MediaAttachment, MediaKind, NewMedia, Repository};
use crate::error::{AppError, Result};
use crate::storage::BlobStore;
use std::collections::BTreeSet;
use std::path::Path;

/// Service for managing media attachments
#[derive(Clone)]
pub struct MediaService {
    repo: Repository,
    blob_store: BlobStore,
}

impl MediaService {
    pub fn new(repo: Repository, blob_store: BlobStore) -> Self {
        Self { repo, blob_store }
    }

    /// Import a file from disk and attach it to an entry
    pub async fn attach_file(
        &self,
        entry_id: &str,
        kind: MediaKind,
        source: &Path,
    ) -> Result<MediaAttachment> {
        // Fail before copying bytes for a missing entry
        self.repo.get_entry(entry_id).await?;

        let file_name = source
            .file_name()
            .map(|name| sanitize_filename(&name.to_string_lossy()))
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                AppError::Generic(format!("Not a file path: {}", source.display()))
            })?;

        tracing::info!(
            "Attaching {} '{}' to entry: {}",
            kind,
            file_name,
            entry_id
        );

        let blob = self.blob_store.import_file(source).await?;

        let media = self
            .repo
            .create_media(&NewMedia {
                entry_id: entry_id.to_string(),
                media_type: kind,
                uri: format!("file://{}", blob.path.display()),
                thumbnail_uri: None,
                blob_hash: Some(blob.hash),
                file_name,
                file_size: blob.size as i64,
                mime_type: kind.default_mime_type().to_string(),
            })
            .await?;

        tracing::info!("Media attached: {}", media.id);

        Ok(media)
    }

    /// Record media that lives at an external URI
    pub async fn create_media(&self, mut req: NewMedia) -> Result<MediaAttachment> {
        req.file_name = sanitize_filename(&req.file_name);
        if req.mime_type.trim().is_empty() {
            req.mime_type = req.media_type.default_mime_type().to_string();
        }

        let media = self.repo.create_media(&req).await?;

        tracing::info!("Media recorded: {} ({})", media.id, media.uri);

        Ok(media)
    }

    pub async fn get_media(&self, id: &str) -> Result<MediaAttachment> {
        self.repo.get_media(id).await
    }

    /// Media attached to an entry, oldest first
    pub async fn media_for_entry(&self, entry_id: &str) -> Result<Vec<MediaAttachment>> {
        self.repo.media_for_entry(entry_id).await
    }

    /// Read the bytes of an attachment
    pub async fn read_media(&self, id: &str) -> Result<Vec<u8>> {
        let media = self.repo.get_media(id).await?;

        if let Some(hash) = &media.blob_hash {
            return self.blob_store.read(hash).await;
        }

        match media.uri.strip_prefix("file://") {
            Some(path) => Ok(tokio::fs::read(path).await?),
            None => Err(AppError::Generic(format!(
                "Media is not stored locally: {}",
                media.uri
            ))),
        }
    }

    /// Delete an attachment and release its blob when nothing else uses it
    pub async fn delete_media(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting media: {}", id);

        let media = self.repo.delete_media(id).await?;
        if let Some(hash) = media.blob_hash {
            self.release_blobs([hash]).await?;
        }

        tracing::info!("Media deleted: {}", id);

        Ok(())
    }

    /// Remove blobs no media row references any more
    pub(crate) async fn release_blobs(
        &self,
        hashes: impl IntoIterator<Item = String>,
    ) -> Result<()> {
        let unique: BTreeSet<String> = hashes.into_iter().collect();

        for hash in unique {
            if self.repo.count_media_with_blob(&hash).await? == 0 {
                self.blob_store.delete(&hash).await?;
                tracing::debug!("Released blob: {}", hash);
            }
        }

        Ok(())
    }
}

/// Strip path separators and NUL bytes from a file name
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| *c != '/' && *c != '\\' && *c != '\0')
        .take(255)
        .collect()
}
