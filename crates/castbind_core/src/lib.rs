//! castbind core - chaptered audiobook and podcast feed assembly.
//!
//! This crate contains all pipeline logic with no CLI dependencies.
//! Audio transcoding and muxing are delegated to an external media tool
//! (ffmpeg/ffprobe) through the [`media::MediaService`] trait.

pub mod chapters;
pub mod config;
pub mod discovery;
pub mod feed;
pub mod fsutil;
pub mod logging;
pub mod media;
pub mod models;
pub mod orchestrator;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
