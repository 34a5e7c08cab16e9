//! Running-total fold over probed durations.
//!
//! The floor is taken of the running total, never of each duration, so the
//! rounding error of the final end stays below one second no matter how
//! many chapters there are:
//!
//! ```text
//! durations: 1.6  1.6  1.6
//! total:     0 -> 1.6 -> 3.2 -> 4.8
//! markers:   [0,1] [1,3] [3,4]      (floor of 4.8 = 4)
//! ```
//!
//! Flooring each duration first would give `[0,1] [1,2] [2,3]` and drift by
//! almost a second per chapter.

use crate::models::AudioAsset;

use super::types::ChapterMarker;

/// Accumulator threaded through the chapter fold.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChapterFold {
    total_secs: f64,
}

impl ChapterFold {
    /// Start at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unfloored running total so far.
    pub fn total_secs(&self) -> f64 {
        self.total_secs
    }

    /// Advance by one chapter.
    ///
    /// Returns the updated accumulator together with the chapter's marker.
    pub fn step(self, title: impl Into<String>, duration_secs: f64) -> (Self, ChapterMarker) {
        let next = Self {
            total_secs: self.total_secs + duration_secs.max(0.0),
        };
        let marker = ChapterMarker::new(
            floor_secs(self.total_secs),
            floor_secs(next.total_secs),
            title,
        );
        (next, marker)
    }
}

/// Build chapter markers for assets in order.
pub fn accumulate_chapters(assets: &[AudioAsset]) -> Vec<ChapterMarker> {
    assets
        .iter()
        .scan(ChapterFold::new(), |fold, asset| {
            let (next, marker) = fold.step(asset.display_name.as_str(), asset.duration_secs);
            *fold = next;
            Some(marker)
        })
        .collect()
}

fn floor_secs(total: f64) -> u64 {
    total.floor() as u64
}
