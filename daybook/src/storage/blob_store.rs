//! Content-addressed media storage
//!
//! Media bytes imported into the diary are stored under their SHA-256
//! hash in a two-level directory structure.
//!
//! Example: hash "abcd1234..." is stored at "media/ab/cd/abcd1234..."

use crate::error::{AppError, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Result of writing bytes to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub hash: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Content-addressed blob store
#[derive(Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root directory if needed
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        tracing::info!("Media store initialized at: {:?}", self.root);
        Ok(())
    }

    /// Write bytes, deduplicating on content hash
    pub async fn write(&self, data: &[u8]) -> Result<StoredBlob> {
        let hash = calculate_hash(data);
        let path = self.path_for(&hash)?;

        if fs::try_exists(&path).await? {
            tracing::debug!("Blob already exists: {}", hash);
            return Ok(StoredBlob {
                hash,
                path,
                size: data.len() as u64,
            });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to a temp file and rename so readers never see partial data
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!("Wrote blob: {} ({} bytes)", hash, data.len());

        Ok(StoredBlob {
            hash,
            path,
            size: data.len() as u64,
        })
    }

    /// Copy a file from disk into the store
    pub async fn import_file(&self, source: &Path) -> Result<StoredBlob> {
        let data = fs::read(source).await?;
        self.write(&data).await
    }

    pub async fn read(&self, hash: &str) -> Result<Vec<u8>> {
        let path = self.path_for(hash)?;

        if !fs::try_exists(&path).await? {
            return Err(AppError::BlobStore(format!("Blob not found: {}", hash)));
        }

        Ok(fs::read(&path).await?)
    }

    pub async fn exists(&self, hash: &str) -> Result<bool> {
        match self.path_for(hash) {
            Ok(path) => Ok(fs::try_exists(&path).await?),
            Err(_) => Ok(false),
        }
    }

    /// Remove a blob; missing blobs are ignored
    pub async fn delete(&self, hash: &str) -> Result<()> {
        let path = self.path_for(hash)?;

        if !fs::try_exists(&path).await? {
            return Ok(());
        }

        fs::remove_file(&path).await?;
        tracing::debug!("Deleted blob: {}", hash);
        Ok(())
    }

    /// On-disk location of a blob
    pub fn path_for(&self, hash: &str) -> Result<PathBuf> {
        if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AppError::BlobStore(format!("Invalid blob hash: {}", hash)));
        }

        Ok(self.root.join(&hash[0..2]).join(&hash[2..4]).join(hash))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// SHA-256 of the data as lowercase hex
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
