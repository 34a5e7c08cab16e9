//! Command-line interface definition.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use castbind_core::config::Settings;
use castbind_core::feed::PresetKind;
use castbind_core::models::PipelineKind;

/// Default location of the settings file, relative to `--dir`.
pub const DEFAULT_CONFIG: &str = ".config/castbind.toml";

/// Build chaptered audiobooks and podcast feeds from a folder of audio files.
#[derive(Parser, Debug, Clone)]
#[command(name = "castbind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Join all audio files into one chaptered .m4b
    Audiobook(AudiobookArgs),
    /// Generate an RSS podcast feed, one episode per file
    Podcast(PodcastArgs),
}

/// Flags shared by both subcommands.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory containing the input audio files
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Settings file, created with defaults if missing
    /// [default: <dir>/.config/castbind.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output file (defaults to the configured name inside --dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Debug-level logging and raw tool output
    #[arg(short, long)]
    pub verbose: bool,

    /// Input extensions to accept, comma separated (e.g. mp3,m4a)
    #[arg(long, value_delimiter = ',')]
    pub ext: Vec<String>,
}

impl CommonArgs {
    /// Settings file to load: `--config`, else the default under `--dir`.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.dir.join(DEFAULT_CONFIG))
    }
}

#[derive(Args, Debug, Clone)]
pub struct AudiobookArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Audio bitrate of the intermediates (e.g. 192k)
    #[arg(long)]
    pub bitrate: Option<String>,

    /// Leave temp files on disk if the run fails
    #[arg(long)]
    pub keep_intermediates: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PodcastArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Feed layout: episode or filename
    #[arg(long)]
    pub preset: Option<PresetKind>,

    /// Hosting domain used in enclosure URLs, links and GUIDs
    #[arg(long)]
    pub base_url: Option<String>,

    /// Date episode 1 is offset from (RFC 3339, defaults to now)
    #[arg(long)]
    pub base_date: Option<DateTime<Utc>>,

    /// Channel title
    #[arg(long)]
    pub title: Option<String>,
}

impl Command {
    pub fn kind(&self) -> PipelineKind {
        match self {
            Command::Audiobook(_) => PipelineKind::Audiobook,
            Command::Podcast(_) => PipelineKind::Podcast,
        }
    }

    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Audiobook(args) => &args.common,
            Command::Podcast(args) => &args.common,
        }
    }

    pub fn base_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Command::Audiobook(_) => None,
            Command::Podcast(args) => args.base_date,
        }
    }

    /// Apply command-line overrides on top of loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        let common = self.common();
        if common.verbose {
            settings.logging.compact = false;
        }

        match self {
            Command::Audiobook(args) => {
                if !common.ext.is_empty() {
                    settings.audiobook.extensions = common.ext.clone();
                }
                if let Some(ref bitrate) = args.bitrate {
                    settings.audiobook.bitrate = bitrate.clone();
                }
                if args.keep_intermediates {
                    settings.audiobook.keep_intermediates_on_error = true;
                }
            }
            Command::Podcast(args) => {
                if !common.ext.is_empty() {
                    settings.podcast.extensions = common.ext.clone();
                }
                if let Some(preset) = args.preset {
                    settings.podcast.preset = preset;
                }
                if let Some(ref base_url) = args.base_url {
                    settings.podcast.source_host = host_of(base_url);
                }
                if let Some(ref title) = args.title {
                    settings.podcast.title = title.clone();
                }
            }
        }
    }
}

/// Accept either a bare host or a URL and return the host part.
fn host_of(base_url: &str) -> String {
    let trimmed = base_url
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    trimmed.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_argument_subcommands_parse() {
        let cli = Cli::try_parse_from(["castbind", "audiobook"]).unwrap();
        assert_eq!(cli.command.kind(), PipelineKind::Audiobook);
        assert_eq!(cli.command.common().dir, PathBuf::from("."));
        assert_eq!(
            cli.command.common().config_path(),
            PathBuf::from(".").join(DEFAULT_CONFIG)
        );
        assert!(cli.command.common().output.is_none());

        let cli = Cli::try_parse_from(["castbind", "podcast"]).unwrap();
        assert_eq!(cli.command.kind(), PipelineKind::Podcast);
    }

    #[test]
    fn default_config_lives_under_input_dir() {
        let cli = Cli::try_parse_from(["castbind", "podcast", "--dir", "/books/mine"]).unwrap();
        assert_eq!(
            cli.command.common().config_path(),
            PathBuf::from("/books/mine/.config/castbind.toml")
        );

        let cli = Cli::try_parse_from([
            "castbind",
            "audiobook",
            "--dir",
            "/books/mine",
            "--config",
            "/etc/castbind.toml",
        ])
        .unwrap();
        assert_eq!(
            cli.command.common().config_path(),
            PathBuf::from("/etc/castbind.toml")
        );
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["castbind"]).is_err());
    }

    #[test]
    fn podcast_flags_parse() {
        let cli = Cli::try_parse_from([
            "castbind",
            "podcast",
            "--dir",
            "/books/mine",
            "--preset",
            "filename",
            "--base-url",
            "https://cdn.example.org/",
            "--base-date",
            "2026-10-19T09:30:00Z",
            "--ext",
            "mp3,m4a",
            "-v",
        ])
        .unwrap();

        let Command::Podcast(ref args) = cli.command else {
            panic!("expected podcast");
        };
        assert_eq!(args.preset, Some(PresetKind::Filename));
        assert_eq!(args.common.dir, PathBuf::from("/books/mine"));
        assert_eq!(args.common.ext, vec!["mp3", "m4a"]);
        assert!(args.common.verbose);
        assert!(cli.command.base_date().is_some());

        let mut settings = Settings::default();
        cli.command.apply(&mut settings);
        assert_eq!(settings.podcast.preset, PresetKind::Filename);
        assert_eq!(settings.podcast.source_host, "cdn.example.org");
        assert_eq!(settings.podcast.extensions, vec!["mp3", "m4a"]);
        assert!(!settings.logging.compact);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let result = Cli::try_parse_from(["castbind", "podcast", "--preset", "weekly"]);
        assert!(result.is_err());
    }

    #[test]
    fn audiobook_overrides_apply() {
        let cli = Cli::try_parse_from([
            "castbind",
            "audiobook",
            "--bitrate",
            "128k",
            "--keep-intermediates",
            "-o",
            "book.m4b",
        ])
        .unwrap();

        let mut settings = Settings::default();
        cli.command.apply(&mut settings);
        assert_eq!(settings.audiobook.bitrate, "128k");
        assert!(settings.audiobook.keep_intermediates_on_error);
        assert_eq!(settings.audiobook.extensions, vec!["mp3"]);
        assert_eq!(cli.command.common().output, Some(PathBuf::from("book.m4b")));
    }

    #[test]
    fn host_of_strips_scheme_and_slash() {
        assert_eq!(host_of("example.com"), "example.com");
        assert_eq!(host_of("http://example.com/"), "example.com");
    }
}
