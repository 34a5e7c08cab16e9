//! Core enums used throughout the crate.

use serde::{Deserialize, Serialize};

/// Which pipeline a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    Audiobook,
    Podcast,
}

impl std::fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineKind::Audiobook => write!(f, "audiobook"),
            PipelineKind::Podcast => write!(f, "podcast"),
        }
    }
}

/// How feed item GUIDs are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidScheme {
    /// `episode{n}@{host}`, not a permalink.
    #[default]
    EpisodeNumber,
    /// The enclosure URL itself, marked as a permalink.
    Filename,
}

impl GuidScheme {
    /// Whether GUIDs produced by this scheme are dereferenceable URLs.
    pub fn is_permalink(&self) -> bool {
        matches!(self, GuidScheme::Filename)
    }
}

impl std::fmt::Display for GuidScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuidScheme::EpisodeNumber => write!(f, "episode_number"),
            GuidScheme::Filename => write!(f, "filename"),
        }
    }
}

/// How feed item titles are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleStyle {
    /// `Chapter {n}`.
    #[default]
    ChapterNumber,
    /// The file's display name.
    DisplayName,
}
