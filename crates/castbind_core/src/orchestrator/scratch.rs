//! Scoped scratch area for intermediate files.
//!
//! Every temp artifact a run creates is registered here. The registered
//! files (and the scratch directory, if this run created it) are removed
//! when the area is cleaned up or dropped, on success and failure alike,
//! unless the area was marked to be kept.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::fsutil::remove_if_exists;

/// Temp directory plus the files registered in it.
pub struct ScratchArea {
    dir: PathBuf,
    created_dir: AtomicBool,
    files: Mutex<Vec<PathBuf>>,
    keep: AtomicBool,
}

impl ScratchArea {
    /// Scratch area rooted at `dir`. Nothing is created until [`ensure_dir`].
    ///
    /// [`ensure_dir`]: ScratchArea::ensure_dir
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            created_dir: AtomicBool::new(false),
            files: Mutex::new(Vec::new()),
            keep: AtomicBool::new(false),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the scratch directory if it does not exist yet.
    pub fn ensure_dir(&self) -> io::Result<&Path> {
        if !self.dir.is_dir() {
            fs::create_dir_all(&self.dir)?;
            self.created_dir.store(true, Ordering::SeqCst);
            tracing::debug!("Created scratch dir {}", self.dir.display());
        }
        Ok(&self.dir)
    }

    /// Register a file for removal. The file need not exist yet.
    pub fn track(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut files = self.files.lock();
        if !files.contains(&path) {
            files.push(path);
        }
    }

    /// Files currently registered.
    pub fn tracked(&self) -> Vec<PathBuf> {
        self.files.lock().clone()
    }

    /// Leave everything on disk when the area is dropped.
    pub fn keep(&self) {
        self.keep.store(true, Ordering::SeqCst);
    }

    pub fn is_kept(&self) -> bool {
        self.keep.load(Ordering::SeqCst)
    }

    /// Remove registered files and the directory if this area created it.
    ///
    /// Does nothing once [`keep`](ScratchArea::keep) was called. Safe to
    /// call more than once. Returns the number of files removed.
    pub fn cleanup(&self) -> usize {
        if self.is_kept() {
            return 0;
        }

        let files: Vec<PathBuf> = std::mem::take(&mut *self.files.lock());
        let mut removed = 0;
        for path in &files {
            match remove_if_exists(path) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
            }
        }

        // Only an empty directory this run created is removed.
        if self.created_dir.swap(false, Ordering::SeqCst) {
            if let Err(e) = fs::remove_dir(&self.dir) {
                tracing::warn!("Failed to remove {}: {}", self.dir.display(), e);
            }
        }

        removed
    }
}

impl Drop for ScratchArea {
    fn drop(&mut self) {
        if self.is_kept() {
            tracing::info!("Keeping scratch files in {}", self.dir.display());
            return;
        }
        self.cleanup();
    }
}
