//! Audiobook chapter assembly.
//!
//! - **Accumulation**: fold probed durations into contiguous chapter markers
//! - **Metadata**: render markers as an ffmetadata chapter block
//! - **Manifest**: render the concat demuxer's `file '<path>'` list
//!
//! # Usage
//!
//! ```ignore
//! use castbind_core::chapters::{accumulate_chapters, render_ffmetadata, render_manifest};
//!
//! let markers = accumulate_chapters(&assets);
//! fs::write("metadata.txt", render_ffmetadata(&markers))?;
//! fs::write("concat_list.txt", render_manifest(&intermediates))?;
//! ```

mod accumulate;
mod manifest;
mod metadata;
mod types;

pub use accumulate::{accumulate_chapters, ChapterFold};
pub use manifest::{intermediate_path, manifest_line, render_manifest};
pub use metadata::{escape_metadata_value, render_ffmetadata, FFMETADATA_HEADER};
pub use types::ChapterMarker;
