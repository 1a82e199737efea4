// SPDX-License-Identifier: GPL-3.0-only

//! Asset library contract and a filesystem-backed implementation

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::constants::{ASSET_TIMESTAMP_FORMAT, PHOTO_FILE_EXTENSION, RAW_FILE_EXTENSION};
use crate::errors::PersistenceError;

/// One transactional asset-creation request.
///
/// The compressed photo component is required; the raw file reference is
/// optional and, when `move_file` is set, consumed (moved, not copied) by the
/// library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCreationRequest {
    pub compressed: Vec<u8>,
    pub raw_file: Option<PathBuf>,
    pub move_file: bool,
}

impl AssetCreationRequest {
    /// Validate and build a request. An empty compressed buffer fails input
    /// validation; the library never accepts a RAW-only asset.
    pub fn new(
        compressed: Vec<u8>,
        raw_file: Option<PathBuf>,
        move_file: bool,
    ) -> Result<Self, PersistenceError> {
        if compressed.is_empty() {
            return Err(PersistenceError::EmptyCompressedBuffer);
        }
        Ok(Self {
            compressed,
            raw_file,
            move_file,
        })
    }
}

/// External persistent photo storage a finished capture is committed to
#[async_trait]
pub trait AssetLibrary: Send + Sync {
    /// Commit one finished capture as a single transaction.
    ///
    /// Returns the path of the created asset where the implementation has
    /// one to report.
    async fn create_asset(
        &self,
        request: AssetCreationRequest,
    ) -> Result<Option<PathBuf>, PersistenceError>;
}

/// Asset library writing timestamped files into a pictures directory
pub struct FileAssetLibrary {
    directory: PathBuf,
}

impl FileAssetLibrary {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl AssetLibrary for FileAssetLibrary {
    async fn create_asset(
        &self,
        request: AssetCreationRequest,
    ) -> Result<Option<PathBuf>, PersistenceError> {
        if request.compressed.is_empty() {
            return Err(PersistenceError::EmptyCompressedBuffer);
        }

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| PersistenceError::LibraryWrite(e.to_string()))?;

        let stem = format!(
            "IMG_{}",
            chrono::Local::now().format(ASSET_TIMESTAMP_FORMAT)
        );
        let photo_path = self
            .directory
            .join(format!("{stem}.{PHOTO_FILE_EXTENSION}"));
        tokio::fs::write(&photo_path, &request.compressed)
            .await
            .map_err(|e| PersistenceError::LibraryWrite(e.to_string()))?;

        if let Some(raw_file) = &request.raw_file {
            let raw_path = self.directory.join(format!("{stem}.{RAW_FILE_EXTENSION}"));
            if request.move_file {
                move_file(raw_file, &raw_path).await?;
            } else {
                tokio::fs::copy(raw_file, &raw_path)
                    .await
                    .map_err(|e| PersistenceError::LibraryWrite(e.to_string()))?;
            }
            debug!(raw = %raw_path.display(), "Raw component added to asset");
        }

        info!(path = %photo_path.display(), "Asset created");
        Ok(Some(photo_path))
    }
}

/// Rename with a copy+remove fallback for cross-device moves
async fn move_file(from: &PathBuf, to: &PathBuf) -> Result<(), PersistenceError> {
    match tokio::fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(_) => {
            tokio::fs::copy(from, to)
                .await
                .map_err(|e| PersistenceError::LibraryWrite(e.to_string()))?;
            crate::storage::remove_quietly(from).await;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_compressed_buffer_fails_validation() {
        assert_eq!(
            AssetCreationRequest::new(Vec::new(), None, true),
            Err(PersistenceError::EmptyCompressedBuffer)
        );
    }

    #[tokio::test]
    async fn create_asset_moves_the_raw_file() {
        let dir = std::env::temp_dir().join(format!("raw-capture-lib-{}", uuid::Uuid::new_v4()));
        let raw_path = crate::storage::write_temp_raw(b"dng-bytes").await.unwrap();

        let library = FileAssetLibrary::new(dir.clone());
        let request = AssetCreationRequest::new(b"jpeg-bytes".to_vec(), Some(raw_path.clone()), true)
            .unwrap();
        let created = library.create_asset(request).await.unwrap();

        assert!(created.is_some(), "file library reports the created path");
        assert!(!raw_path.exists(), "temp raw file must be moved, not copied");

        let mut entries = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect::<Vec<_>>();
        entries.sort();
        assert_eq!(entries.len(), 2, "one photo and one raw component");

        let _ = std::fs::remove_dir_all(dir);
    }
}
