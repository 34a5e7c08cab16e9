//! Pipeline step implementations.
//!
//! Audiobook: Discover → Convert → WriteMetadata → Assemble.
//! Podcast: Discover → Probe → RenderFeed.

mod assemble;
mod convert;
mod discover;
mod probe;
mod render_feed;
mod write_metadata;

pub use assemble::AssembleStep;
pub use convert::ConvertStep;
pub use discover::DiscoverStep;
pub use probe::ProbeStep;
pub use render_feed::RenderFeedStep;
pub use write_metadata::WriteMetadataStep;
