//! Podcast feed generation.
//!
//! Turns ordered, probed assets into RSS 2.0 items with iTunes extensions:
//!
//! - **Presets**: URL / GUID / title keying (`episodeN` or literal filename)
//! - **Episodes**: numbering, `HH:MM:SS` durations, enclosure sizes,
//!   placeholder publication dates, sidecar descriptions
//! - **Rendering**: the complete feed document via quick-xml
//!
//! # Usage
//!
//! ```ignore
//! use castbind_core::feed::{build_episodes, render_feed, EpisodeOptions, FeedPreset};
//!
//! let options = EpisodeOptions::new(FeedPreset::episode_keyed("example.com"), base_date);
//! let episodes = build_episodes(&assets, &options)?;
//! let xml = render_feed(&channel, &episodes)?;
//! ```

mod duration;
mod episodes;
mod preset;
mod render;
mod types;

pub use duration::{format_duration, format_duration_secs};
pub use episodes::{build_episode, build_episodes, format_pub_date, read_sidecar, EpisodeOptions};
pub use preset::{encode_component, mime_for_extension, FeedPreset, PresetKind};
pub use render::{render_feed, ITUNES_NS};
pub use types::{ChannelInfo, EpisodeItem, FeedError, FeedResult};
