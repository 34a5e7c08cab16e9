//! Input file discovery and ordering.
//!
//! Lists a directory, keeps files with a recognized audio extension and
//! orders them by the first run of decimal digits in the file stem. The
//! extension is not scanned, so the `3` of `.mp3` never counts.
//!
//! # Ordering
//!
//! ```text
//! track2.mp3   -> 2
//! track10.mp3  -> 10
//! 007-intro.mp3 -> 7
//! bonus.mp3    -> (no digits, sorts last)
//! ```
//!
//! Names without digits sort after every digited name and keep their
//! enumeration order among themselves. Equal numbers also keep enumeration
//! order. The directory listing is sorted by name before ordering so the
//! result does not depend on the filesystem's readdir order.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from directory enumeration.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Failed to list directory {dir}: {source}")]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Extract the first run of ASCII digits in the stem of `name` as a number.
///
/// Runs too long for `u64` saturate to `u64::MAX`.
pub fn first_number(name: &str) -> Option<u64> {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    let start = stem.find(|c: char| c.is_ascii_digit())?;
    let digits: &str = stem[start..]
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or("");

    let mut value: u64 = 0;
    for b in digits.bytes() {
        value = match value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
        {
            Some(v) => v,
            None => return Some(u64::MAX),
        };
    }
    Some(value)
}

/// Compare two file names by their first digit run.
///
/// Digit-less names compare greater than any digited name and equal to
/// each other, so a stable sort keeps their original order.
pub fn compare_numeric(a: &str, b: &str) -> Ordering {
    match (first_number(a), first_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable-sort names into chapter/episode order.
pub fn sort_numerically<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| compare_numeric(a.as_ref(), b.as_ref()));
}

/// Check whether a file name ends with one of the given extensions.
///
/// Extensions are compared case-insensitively and may be given with or
/// without a leading dot.
pub fn has_audio_extension(name: &str, extensions: &[String]) -> bool {
    let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Order a set of file names: filter by extension, then sort numerically.
pub fn order_file_names(names: Vec<String>, extensions: &[String]) -> Vec<String> {
    let mut entries: Vec<(String, ())> = names.into_iter().map(|n| (n, ())).collect();
    order_entries(&mut entries, extensions);
    entries.into_iter().map(|(name, _)| name).collect()
}

/// Filter and order `(name, item)` pairs by name.
///
/// Ties on the name fall back to `item`, so the result never depends on
/// input order.
fn order_entries<T: Ord>(entries: &mut Vec<(String, T)>, extensions: &[String]) {
    entries.retain(|(name, _)| has_audio_extension(name, extensions));
    entries.sort();
    entries.sort_by(|a, b| compare_numeric(&a.0, &b.0));
}

/// Discover audio files in `dir` and return their paths in chapter order.
///
/// Regular files and symlinks to regular files are considered. Names that
/// are not valid UTF-8 are matched and sorted by their lossy form but keep
/// their exact on-disk path. An empty result is not an error here; callers
/// decide whether an empty input set is acceptable.
pub fn discover_audio_files(
    dir: &Path,
    extensions: &[String],
) -> Result<Vec<PathBuf>, DiscoveryError> {
    let read_err = |source| DiscoveryError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    };

    let mut entries: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        // Follows symlinks; dangling links are skipped
        let is_file = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        entries.push((entry.file_name().to_string_lossy().into_owned(), path));
    }

    order_entries(&mut entries, extensions);

    tracing::debug!(
        "Discovered {} audio file(s) in {}",
        entries.len(),
        dir.display()
    );

    Ok(entries.into_iter().map(|(_, path)| path).collect())
}
