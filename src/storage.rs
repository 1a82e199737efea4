// SPDX-License-Identifier: GPL-3.0-only

//! Temporary-file handling for in-flight raw buffers
//!
//! A raw buffer delivered by the photo-data signal is materialized to a
//! unique path in the system temp directory. The file is always either moved
//! into the asset library at finalize time or deleted on an abort path.

use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::errors::PersistenceError;

/// Build a collision-free path in the system temp directory.
///
/// The file name is derived from a freshly generated v4 UUID, so two calls
/// never collide even across concurrent processes.
pub fn unique_temp_path(extension: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}.{}", Uuid::new_v4(), extension))
}

/// Write a raw image buffer to a fresh temporary file.
///
/// Returns the path on success. The caller owns the file afterwards.
pub async fn write_temp_raw(data: &[u8]) -> Result<PathBuf, PersistenceError> {
    let path = unique_temp_path(crate::constants::RAW_FILE_EXTENSION);
    tokio::fs::write(&path, data).await?;
    debug!(path = %path.display(), bytes = data.len(), "Raw buffer written to temp file");
    Ok(path)
}

/// Remove a file, logging instead of failing.
///
/// Used on abort paths where the shot is already being discarded.
pub async fn remove_quietly(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        debug!(path = %path.display(), error = %err, "Could not remove temp file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_paths_are_unique() {
        let a = unique_temp_path("dng");
        let b = unique_temp_path("dng");
        assert_ne!(a, b, "two generated temp paths must never collide");
        assert_eq!(a.extension().unwrap(), "dng");
    }

    #[tokio::test]
    async fn write_and_remove_round_trip() {
        let path = write_temp_raw(b"raw-bytes").await.expect("write succeeds");
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"raw-bytes");
        remove_quietly(&path).await;
        assert!(!path.exists(), "file should be gone after removal");
    }

    #[tokio::test]
    async fn remove_quietly_tolerates_missing_file() {
        // Must not panic or error on an already-deleted path
        remove_quietly(Path::new("/nonexistent/raw-capture-test.dng")).await;
    }
}
