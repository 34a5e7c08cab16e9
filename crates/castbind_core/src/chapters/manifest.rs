//! Concat demuxer manifest.
//!
//! One `file '<path>'` line per intermediate, in chapter order. Single
//! quotes inside a path are closed, escaped and reopened (`'\''`), which is
//! the quoting the concat demuxer understands.

use std::path::{Path, PathBuf};

/// Path of the intermediate produced for `source` inside `temp_dir`.
///
/// `01.mp3` with extension `m4a` becomes `temp_dir/temp_01.mp3.m4a`.
pub fn intermediate_path(temp_dir: &Path, source: &Path, extension: &str) -> PathBuf {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    temp_dir.join(format!(
        "temp_{}.{}",
        file_name,
        extension.trim_start_matches('.')
    ))
}

/// A single manifest record.
pub fn manifest_line(path: &Path) -> String {
    let quoted = path.to_string_lossy().replace('\'', "'\\''");
    format!("file '{}'", quoted)
}

/// Render the manifest for the given intermediates.
pub fn render_manifest<P: AsRef<Path>>(paths: &[P]) -> String {
    paths
        .iter()
        .map(|p| manifest_line(p.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
