//! Probed audio input.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// An input audio file after probing.
///
/// Immutable once built; owned by the run that probed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioAsset {
    /// Path to the source file.
    pub path: PathBuf,
    /// File name minus its last extension.
    pub display_name: String,
    /// Size of the source file on disk at probe time.
    pub size_bytes: u64,
    /// Duration reported by the media tool, in seconds.
    pub duration_secs: f64,
}

impl AudioAsset {
    /// Create an asset, deriving the display name from the path.
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64, duration_secs: f64) -> Self {
        let path = path.into();
        Self {
            display_name: display_name_for(&path),
            path,
            size_bytes,
            duration_secs,
        }
    }

    /// File name component (with extension).
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Derive a display name from a path: the file name minus its last extension.
pub fn display_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
