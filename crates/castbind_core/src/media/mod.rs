//! Media tool boundary.
//!
//! All audio work (probing, transcoding, concatenation with chapter
//! metadata) is delegated to an external tool. The pipeline only talks to it
//! through [`MediaService`]; [`FfmpegCli`] is the production implementation
//! that shells out to `ffprobe` and `ffmpeg`.
//!
//! # Usage
//!
//! ```ignore
//! use castbind_core::media::{FfmpegCli, MediaService, TranscodeRequest};
//!
//! // `logger` is any ToolLog, usually the run's RunLogger
//! let tool = FfmpegCli::new();
//! let secs = tool.probe_duration(Path::new("01.mp3"), &logger)?;
//! let request = TranscodeRequest::new("01.mp3", "temp/temp_01.mp3.m4a", "aac", "192k");
//! tool.transcode(&request, &logger)?;
//! ```

mod args;
mod ffmpeg;
mod types;

pub use args::{concat_args, probe_args, transcode_args};
pub use ffmpeg::{parse_probe_duration, FfmpegCli};
pub use types::{ConcatRequest, MediaError, MediaResult, TranscodeRequest};

use std::path::Path;

/// Receives what a media tool invocation ran and printed.
pub trait ToolLog {
    /// The full command line, logged before the tool starts.
    fn command(&self, command_line: &str);

    /// One line of tool output.
    fn output_line(&self, line: &str, is_stderr: bool);
}

/// Operations the pipelines need from the media tool.
///
/// Calls are blocking and are always issued one at a time, in file order.
/// Each call reports its command line and output to `log`.
pub trait MediaService: Send + Sync {
    /// Report the duration of an audio file in seconds.
    fn probe_duration(&self, path: &Path, log: &dyn ToolLog) -> MediaResult<f64>;

    /// Re-encode one input into a normalized intermediate file.
    fn transcode(&self, request: &TranscodeRequest, log: &dyn ToolLog) -> MediaResult<()>;

    /// Join intermediates listed in a manifest, attaching a metadata stream.
    fn concat(&self, request: &ConcatRequest, log: &dyn ToolLog) -> MediaResult<()>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "media tool"
    }
}
