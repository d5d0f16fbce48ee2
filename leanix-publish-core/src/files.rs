//! Local manifest/SBOM files: existence checks and whole-file reads.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, error};

use crate::error::PublishError;

/// A file read fully into memory. The handle is closed once `read` returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    /// Base name sent as the multipart file name.
    pub name: String,
    pub contents: Vec<u8>,
}

impl LocalFile {
    /// Reads `path` after checking it is an existing regular file.
    pub fn read(path: &Path) -> Result<Self, PublishError> {
        ensure_file(path)?;
        let contents = fs::read(path).map_err(|e| {
            error!(error = ?e, path = %path.display(), "Failed to read file");
            PublishError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!(path = %path.display(), bytes = contents.len(), "Read local file");
        Ok(Self {
            path: path.to_path_buf(),
            name,
            contents,
        })
    }

    /// Hex-encoded SHA-256 of the contents.
    pub fn sha256(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.contents);
        format!("{:x}", hasher.finalize())
    }
}

/// Fails with [`PublishError::FileNotFound`] unless `path` is an existing regular file.
pub fn ensure_file(path: &Path) -> Result<(), PublishError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PublishError::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}
