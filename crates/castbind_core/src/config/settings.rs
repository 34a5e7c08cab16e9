//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::feed::{ChannelInfo, FeedPreset, PresetKind};
use crate::models::{GuidScheme, TitleStyle};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Working directories.
    #[serde(default)]
    pub paths: PathSettings,

    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Audiobook assembly.
    #[serde(default)]
    pub audiobook: AudiobookSettings,

    /// Podcast feed generation.
    #[serde(default)]
    pub podcast: PodcastSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Path configuration for temp and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Scratch directory for intermediates, relative to the input directory.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,

    /// Folder for run log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_temp_dir() -> String {
    "temp".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Media tool executables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
        }
    }
}

/// Audiobook assembly settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudiobookSettings {
    /// Input extensions, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Final container file name.
    #[serde(default = "default_audiobook_output")]
    pub output_file: String,

    /// Concat manifest file name.
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,

    /// Chapter metadata file name.
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Audio codec for intermediates.
    #[serde(default = "default_codec")]
    pub codec: String,

    /// Audio bitrate for intermediates.
    #[serde(default = "default_bitrate")]
    pub bitrate: String,

    /// Extension of the intermediate files.
    #[serde(default = "default_intermediate_ext")]
    pub intermediate_extension: String,

    /// Leave the scratch area on disk when a run fails.
    #[serde(default)]
    pub keep_intermediates_on_error: bool,
}

fn default_extensions() -> Vec<String> {
    vec!["mp3".to_string()]
}

fn default_audiobook_output() -> String {
    "output.m4b".to_string()
}

fn default_manifest_file() -> String {
    "concat_list.txt".to_string()
}

fn default_metadata_file() -> String {
    "metadata.txt".to_string()
}

fn default_codec() -> String {
    "aac".to_string()
}

fn default_bitrate() -> String {
    "192k".to_string()
}

fn default_intermediate_ext() -> String {
    "m4a".to_string()
}

impl Default for AudiobookSettings {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            output_file: default_audiobook_output(),
            manifest_file: default_manifest_file(),
            metadata_file: default_metadata_file(),
            codec: default_codec(),
            bitrate: default_bitrate(),
            intermediate_extension: default_intermediate_ext(),
            keep_intermediates_on_error: false,
        }
    }
}

/// Podcast feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodcastSettings {
    /// Input extensions, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Feed document file name.
    #[serde(default = "default_feed_output")]
    pub output_file: String,

    /// Built-in preset the overrides below apply to.
    #[serde(default)]
    pub preset: PresetKind,

    /// Hosting domain substituted for `{host}`.
    #[serde(default = "default_source_host")]
    pub source_host: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid_scheme: Option<GuidScheme>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_style: Option<TitleStyle>,

    /// Enclosure MIME type for every item; derived from each file's
    /// extension when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosure_mime: Option<String>,

    /// Read `<title>.txt` sidecars as item descriptions.
    #[serde(default = "default_true")]
    pub use_sidecars: bool,

    #[serde(default = "default_season")]
    pub season: u32,

    #[serde(default)]
    pub explicit: bool,

    #[serde(default = "default_channel_title")]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Channel link; defaults to `https://{host}` when empty.
    #[serde(default)]
    pub link: String,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub author: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,
}

fn default_feed_output() -> String {
    "podcast.xml".to_string()
}

fn default_source_host() -> String {
    "example.com".to_string()
}

fn default_season() -> u32 {
    1
}

fn default_channel_title() -> String {
    "Untitled Podcast".to_string()
}

fn default_language() -> String {
    "en-us".to_string()
}

impl Default for PodcastSettings {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            output_file: default_feed_output(),
            preset: PresetKind::default(),
            source_host: default_source_host(),
            url_template: None,
            link_template: None,
            guid_scheme: None,
            title_style: None,
            enclosure_mime: None,
            use_sidecars: true,
            season: default_season(),
            explicit: false,
            title: default_channel_title(),
            description: String::new(),
            link: String::new(),
            language: default_language(),
            author: String::new(),
            image_url: None,
            category: None,
            feed_url: None,
        }
    }
}

impl PodcastSettings {
    /// Resolve the configured preset with its overrides applied.
    pub fn feed_preset(&self) -> FeedPreset {
        let mut preset = FeedPreset::from_kind(self.preset, self.source_host.clone());
        if let Some(ref template) = self.url_template {
            preset.url_template = template.clone();
        }
        if let Some(ref template) = self.link_template {
            preset.link_template = template.clone();
        }
        if let Some(scheme) = self.guid_scheme {
            preset.guid_scheme = scheme;
        }
        if let Some(style) = self.title_style {
            preset.title_style = style;
        }
        if let Some(ref mime) = self.enclosure_mime {
            preset.enclosure_mime = Some(mime.clone());
        }
        preset
    }

    /// Channel metadata for the feed header.
    pub fn channel_info(&self) -> ChannelInfo {
        let link = if self.link.is_empty() {
            format!("https://{}", self.source_host)
        } else {
            self.link.clone()
        };
        ChannelInfo {
            title: self.title.clone(),
            description: self.description.clone(),
            link,
            language: self.language.clone(),
            author: self.author.clone(),
            image_url: self.image_url.clone(),
            category: self.category.clone(),
            explicit: self.explicit,
            feed_url: self.feed_url.clone(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Hide raw tool output in the run log.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of tool output lines kept for failure reports.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Prefix run log lines with `[HH:MM:SS]`.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: true,
            error_tail: default_error_tail(),
            show_timestamps: true,
            progress_step: default_progress_step(),
        }
    }
}

/// Config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Tools,
    Audiobook,
    Podcast,
    Logging,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 5] = [
        ConfigSection::Paths,
        ConfigSection::Tools,
        ConfigSection::Audiobook,
        ConfigSection::Podcast,
        ConfigSection::Logging,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Tools => "tools",
            ConfigSection::Audiobook => "audiobook",
            ConfigSection::Podcast => "podcast",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section in a fresh config file.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "# Scratch and log directories",
            ConfigSection::Tools => "# Media tool executables",
            ConfigSection::Audiobook => "# Chaptered audiobook assembly",
            ConfigSection::Podcast => "# Podcast feed generation",
            ConfigSection::Logging => "# Logging configuration",
        }
    }
}
