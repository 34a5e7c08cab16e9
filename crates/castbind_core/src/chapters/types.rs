//! Chapter marker type.

use serde::{Deserialize, Serialize};

/// A named time range in the output container, in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterMarker {
    /// Floor of the running total before this chapter.
    pub start_secs: u64,
    /// Floor of the running total after this chapter.
    pub end_secs: u64,
    pub title: String,
}

impl ChapterMarker {
    pub fn new(start_secs: u64, end_secs: u64, title: impl Into<String>) -> Self {
        Self {
            start_secs,
            end_secs,
            title: title.into(),
        }
    }
}
