//! Request and error types for media tool calls.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error from a media tool invocation.
#[derive(Error, Debug)]
pub enum MediaError {
    /// Input file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The tool could not be started.
    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The tool ran but reported failure.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// The tool's output could not be understood.
    #[error("Failed to parse {tool} output: {message}")]
    ParseError { tool: String, message: String },
}

impl MediaError {
    /// Create a command failed error.
    pub fn command_failed(
        tool: impl Into<String>,
        exit_code: i32,
        message: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            tool: tool.into(),
            exit_code,
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse_error(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// One per-file re-encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Audio codec name as the tool knows it (e.g. `aac`).
    pub codec: String,
    /// Target bitrate (e.g. `192k`).
    pub bitrate: String,
}

impl TranscodeRequest {
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        codec: impl Into<String>,
        bitrate: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            codec: codec.into(),
            bitrate: bitrate.into(),
        }
    }
}

/// Final assembly of intermediates into the output container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatRequest {
    /// Concatenation manifest (`file '<path>'` lines).
    pub manifest: PathBuf,
    /// ffmetadata chapter block.
    pub metadata: PathBuf,
    pub output: PathBuf,
    /// Copy audio data instead of re-encoding.
    pub copy_codec: bool,
}

impl ConcatRequest {
    pub fn new(
        manifest: impl Into<PathBuf>,
        metadata: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            manifest: manifest.into(),
            metadata: metadata.into(),
            output: output.into(),
            copy_codec: true,
        }
    }
}
