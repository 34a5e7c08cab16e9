//! Configuration management for castbind.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Defaults for every missing field
//!
//! # Example
//!
//! ```no_run
//! use castbind_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/castbind.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Output: {}", config.settings().audiobook.output_file);
//!
//! config.settings_mut().audiobook.bitrate = "128k".to_string();
//! config.update_section(ConfigSection::Audiobook).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    AudiobookSettings, ConfigSection, LoggingSettings, PathSettings, PodcastSettings, Settings,
    ToolSettings,
};
