//! Feed keying presets.
//!
//! Two hosting layouts are supported as presets rather than separate code
//! paths:
//!
//! | preset   | enclosure                              | guid                       | title        |
//! |----------|----------------------------------------|----------------------------|--------------|
//! | episode  | `https://{host}/audio/episode{n}.mp3`  | `episode{n}@{host}`        | `Chapter {n}`|
//! | filename | `https://{host}/{filename}`            | enclosure URL (permalink)  | display name |
//!
//! Templates accept `{host}`, `{episode}`, `{filename}` and `{stem}`;
//! filename and stem are percent-encoded as URL path components.

use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::models::{GuidScheme, TitleStyle};

/// Characters left unescaped, matching JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Built-in preset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetKind {
    /// Synthetic `episodeN` identifiers.
    #[default]
    Episode,
    /// Literal file names.
    Filename,
}

impl std::fmt::Display for PresetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetKind::Episode => write!(f, "episode"),
            PresetKind::Filename => write!(f, "filename"),
        }
    }
}

impl std::str::FromStr for PresetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "episode" => Ok(PresetKind::Episode),
            "filename" => Ok(PresetKind::Filename),
            other => Err(format!("unknown feed preset '{}'", other)),
        }
    }
}

/// How URLs, GUIDs and titles are derived for feed items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPreset {
    /// Enclosure URL template.
    pub url_template: String,
    /// Item `<link>` template.
    pub link_template: String,
    pub guid_scheme: GuidScheme,
    /// Hosting domain substituted for `{host}`.
    pub source_host: String,
    pub title_style: TitleStyle,
    /// Fixed MIME type of the enclosures; `None` derives it per file.
    pub enclosure_mime: Option<String>,
}

impl FeedPreset {
    /// Build a named preset for `host`.
    pub fn from_kind(kind: PresetKind, host: impl Into<String>) -> Self {
        match kind {
            PresetKind::Episode => Self::episode_keyed(host),
            PresetKind::Filename => Self::filename_keyed(host),
        }
    }

    /// Items keyed by synthetic `episodeN` identifiers.
    pub fn episode_keyed(host: impl Into<String>) -> Self {
        Self {
            url_template: "https://{host}/audio/episode{episode}.mp3".to_string(),
            link_template: "https://{host}/episode{episode}".to_string(),
            guid_scheme: GuidScheme::EpisodeNumber,
            source_host: host.into(),
            title_style: TitleStyle::ChapterNumber,
            enclosure_mime: None,
        }
    }

    /// Items keyed by their literal file name.
    pub fn filename_keyed(host: impl Into<String>) -> Self {
        Self {
            url_template: "https://{host}/{filename}".to_string(),
            link_template: "https://{host}/{filename}".to_string(),
            guid_scheme: GuidScheme::Filename,
            source_host: host.into(),
            title_style: TitleStyle::DisplayName,
            enclosure_mime: None,
        }
    }

    /// Enclosure URL for an episode.
    pub fn enclosure_url(&self, episode: u32, file_name: &str, stem: &str) -> String {
        self.expand(&self.url_template, episode, file_name, stem)
    }

    /// Item link for an episode.
    pub fn link(&self, episode: u32, file_name: &str, stem: &str) -> String {
        self.expand(&self.link_template, episode, file_name, stem)
    }

    /// GUID for an episode, given its enclosure URL.
    pub fn guid(&self, episode: u32, enclosure_url: &str) -> String {
        match self.guid_scheme {
            GuidScheme::EpisodeNumber => format!("episode{}@{}", episode, self.source_host),
            GuidScheme::Filename => enclosure_url.to_string(),
        }
    }

    /// Enclosure MIME type for a file.
    pub fn mime_for(&self, file_name: &str) -> String {
        self.enclosure_mime
            .clone()
            .unwrap_or_else(|| mime_for_extension(file_name).to_string())
    }

    /// Item title for an episode.
    pub fn title(&self, episode: u32, display_name: &str) -> String {
        match self.title_style {
            TitleStyle::ChapterNumber => format!("Chapter {}", episode),
            TitleStyle::DisplayName => display_name.to_string(),
        }
    }

    fn expand(&self, template: &str, episode: u32, file_name: &str, stem: &str) -> String {
        template
            .replace("{host}", &self.source_host)
            .replace("{episode}", &episode.to_string())
            .replace("{filename}", &encode_component(file_name))
            .replace("{stem}", &encode_component(stem))
    }
}

/// Audio MIME type for a file name's extension, `audio/mpeg` if unknown.
pub fn mime_for_extension(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "m4a" | "m4b" | "mp4" => "audio/mp4",
        "aac" => "audio/aac",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "flac" => "audio/flac",
        "wav" => "audio/wav",
        _ => "audio/mpeg",
    }
}

/// Percent-encode a single URL path component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_keyed_urls() {
        let preset = FeedPreset::episode_keyed("example.substack.com");
        let url = preset.enclosure_url(3, "Track 03.mp3", "Track 03");

        assert_eq!(url, "https://example.substack.com/audio/episode3.mp3");
        assert_eq!(
            preset.link(3, "Track 03.mp3", "Track 03"),
            "https://example.substack.com/episode3"
        );
        assert_eq!(preset.guid(3, &url), "episode3@example.substack.com");
        assert_eq!(preset.title(3, "Track 03"), "Chapter 3");
    }

    #[test]
    fn filename_keyed_urls_are_encoded() {
        let preset = FeedPreset::filename_keyed("cdn.example.org");
        let url = preset.enclosure_url(1, "Part 1 & 2.mp3", "Part 1 & 2");

        assert_eq!(url, "https://cdn.example.org/Part%201%20%26%202.mp3");
        assert_eq!(preset.guid(1, &url), url);
        assert!(preset.guid_scheme.is_permalink());
        assert_eq!(preset.title(1, "Part 1 & 2"), "Part 1 & 2");
    }

    #[test]
    fn custom_template_uses_stem() {
        let mut preset = FeedPreset::filename_keyed("h.io");
        preset.url_template = "https://{host}/m4a/{stem}.m4a?ep={episode}".to_string();
        assert_eq!(
            preset.enclosure_url(7, "a b.mp3", "a b"),
            "https://h.io/m4a/a%20b.m4a?ep=7"
        );
    }

    #[test]
    fn encode_component_matches_uri_component_rules() {
        assert_eq!(encode_component("a-b_c.d!~*'()"), "a-b_c.d!~*'()");
        assert_eq!(encode_component("ç/?"), "%C3%A7%2F%3F");
    }

    #[test]
    fn mime_follows_extension_unless_fixed() {
        let mut preset = FeedPreset::filename_keyed("h.io");
        assert_eq!(preset.mime_for("01.mp3"), "audio/mpeg");
        assert_eq!(preset.mime_for("01.M4A"), "audio/mp4");
        assert_eq!(preset.mime_for("01.ogg"), "audio/ogg");
        assert_eq!(preset.mime_for("noext"), "audio/mpeg");

        preset.enclosure_mime = Some("audio/x-m4a".to_string());
        assert_eq!(preset.mime_for("01.mp3"), "audio/x-m4a");
    }

    #[test]
    fn preset_kind_parses() {
        assert_eq!("Episode".parse::<PresetKind>().unwrap(), PresetKind::Episode);
        assert_eq!("filename".parse::<PresetKind>().unwrap(), PresetKind::Filename);
        assert!("other".parse::<PresetKind>().is_err());
    }
}
