//! Error types for the orchestrator pipeline.
//!
//! Errors carry context that chains through layers:
//! Run → Step → Operation → Detail

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::feed::FeedError;
use crate::media::MediaError;

/// Top-level pipeline error with run context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A step failed during execution.
    #[error("Run '{run}' failed at step '{step}': {source}")]
    StepFailed {
        run: String,
        step: String,
        #[source]
        source: StepError,
    },
}

impl PipelineError {
    /// Create a step failed error.
    pub fn step_failed(run: impl Into<String>, step: impl Into<String>, source: StepError) -> Self {
        Self::StepFailed {
            run: run.into(),
            step: step.into(),
            source,
        }
    }

    /// The step error that aborted the run.
    pub fn step_error(&self) -> &StepError {
        match self {
            Self::StepFailed { source, .. } => source,
        }
    }
}

/// Error from a pipeline step with operation context.
#[derive(Error, Debug)]
pub enum StepError {
    /// Input validation failed.
    #[error("Input validation failed: {0}")]
    InvalidInput(String),

    /// Output validation failed.
    #[error("Output validation failed: {0}")]
    InvalidOutput(String),

    /// No audio files matched in the input directory.
    #[error("No input files with extension(s) {extensions} in {}", dir.display())]
    NoInputFiles { dir: PathBuf, extensions: String },

    /// Duration probe failed for a file.
    #[error("Failed to probe {}: {message}", path.display())]
    Probe { path: PathBuf, message: String },

    /// Transcoding a file to its intermediate failed.
    #[error("Failed to transcode {}: {message}", path.display())]
    Transcode { path: PathBuf, message: String },

    /// Final concatenation failed.
    #[error("Concatenation failed: {message}")]
    Concat { message: String },

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// Building or rendering the feed failed.
    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl StepError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an invalid output error.
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    /// Create a no-input error for `dir`.
    pub fn no_input_files(dir: impl Into<PathBuf>, extensions: &[String]) -> Self {
        Self::NoInputFiles {
            dir: dir.into(),
            extensions: extensions.join(", "),
        }
    }

    /// Wrap a media error from probing `path`.
    pub fn probe(path: impl Into<PathBuf>, source: &MediaError) -> Self {
        Self::Probe {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Wrap a media error from transcoding `path`.
    pub fn transcode(path: impl Into<PathBuf>, source: &MediaError) -> Self {
        Self::Transcode {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Wrap a media error from the final concat.
    pub fn concat(source: &MediaError) -> Self {
        Self::Concat {
            message: source.to_string(),
        }
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Path of the file the step failed on, when there is one.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Probe { path, .. } | Self::Transcode { path, .. } => Some(path),
            Self::NoInputFiles { dir, .. } => Some(dir),
            _ => None,
        }
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
