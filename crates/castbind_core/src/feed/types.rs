//! Feed types and errors.

use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors while building or rendering a feed.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Reading a source file or sidecar failed.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The XML writer failed.
    #[error("Failed to write feed XML: {0}")]
    Xml(String),
}

impl FeedError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        Self::Xml(err.to_string())
    }
}

/// Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// One `<item>` in the feed.
///
/// Immutable once built; items keep the order of their source files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeItem {
    /// 1-based position in sort order.
    pub episode_number: u32,
    pub title: String,
    pub description: String,
    pub pub_date: DateTime<Utc>,
    pub link: String,
    pub enclosure_url: String,
    /// Exact byte size of the source file when the item was built.
    pub enclosure_length_bytes: u64,
    pub enclosure_mime: String,
    pub guid: String,
    pub guid_is_permalink: bool,
    /// `HH:MM:SS`.
    pub duration_formatted: String,
    pub season: u32,
    pub explicit: bool,
}

/// Channel-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub title: String,
    pub description: String,
    pub link: String,
    pub language: String,
    pub author: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub explicit: bool,
    /// Public URL of the feed itself, emitted as `atom:link rel="self"`.
    pub feed_url: Option<String>,
}

impl Default for ChannelInfo {
    fn default() -> Self {
        Self {
            title: "Untitled Podcast".to_string(),
            description: String::new(),
            link: String::new(),
            language: "en-us".to_string(),
            author: String::new(),
            image_url: None,
            category: None,
            explicit: false,
            feed_url: None,
        }
    }
}
