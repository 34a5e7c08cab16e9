//! Data models shared by both pipelines.
//!
//! - [`AudioAsset`]: a probed input file
//! - Enums for pipeline kind and feed keying

mod asset;
mod enums;

pub use asset::{display_name_for, AudioAsset};
pub use enums::{GuidScheme, PipelineKind, TitleStyle};
