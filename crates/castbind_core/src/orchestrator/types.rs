//! Core types for the orchestrator pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scratch::ScratchArea;
use crate::chapters::ChapterMarker;
use crate::config::Settings;
use crate::feed::EpisodeItem;
use crate::logging::RunLogger;
use crate::media::MediaService;
use crate::models::{AudioAsset, PipelineKind};

/// Progress callback type for reporting pipeline progress.
///
/// Arguments: (step_name, percent_complete, message)
pub type ProgressCallback = Box<dyn Fn(&str, u32, &str) + Send + Sync>;

/// Read-only context passed to pipeline steps.
///
/// Mutable results go in [`RunState`].
pub struct Context {
    pub kind: PipelineKind,
    pub settings: Settings,
    /// Run name/identifier.
    pub run_name: String,
    /// Directory the input audio files are read from.
    pub input_dir: PathBuf,
    pub logger: Arc<RunLogger>,
    pub media: Arc<dyn MediaService>,
    /// Feed items are dated relative to this instant.
    pub base_date: DateTime<Utc>,
    /// Temp artifacts of this run; cleaned up when the context is dropped.
    pub scratch: ScratchArea,
    output_override: Option<PathBuf>,
    progress_callback: Option<ProgressCallback>,
}

impl Context {
    pub fn new(
        kind: PipelineKind,
        settings: Settings,
        run_name: impl Into<String>,
        input_dir: impl Into<PathBuf>,
        logger: Arc<RunLogger>,
        media: Arc<dyn MediaService>,
    ) -> Self {
        let input_dir = input_dir.into();
        let scratch = ScratchArea::new(input_dir.join(&settings.paths.temp_dir));
        Self {
            kind,
            settings,
            run_name: run_name.into(),
            input_dir,
            logger,
            media,
            base_date: Utc::now(),
            scratch,
            output_override: None,
            progress_callback: None,
        }
    }

    /// Write the final artifact here instead of the configured file name.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_override = Some(path.into());
        self
    }

    pub fn with_base_date(mut self, base_date: DateTime<Utc>) -> Self {
        self.base_date = base_date;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Report progress to callback (if set).
    pub fn report_progress(&self, step_name: &str, percent: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(step_name, percent, message);
        }
    }

    /// Extensions accepted by this run's pipeline.
    pub fn extensions(&self) -> &[String] {
        match self.kind {
            PipelineKind::Audiobook => &self.settings.audiobook.extensions,
            PipelineKind::Podcast => &self.settings.podcast.extensions,
        }
    }

    /// Final output path: the container or the feed document.
    pub fn output_path(&self) -> PathBuf {
        if let Some(ref path) = self.output_override {
            return path.clone();
        }
        let name = match self.kind {
            PipelineKind::Audiobook => &self.settings.audiobook.output_file,
            PipelineKind::Podcast => &self.settings.podcast.output_file,
        };
        self.input_dir.join(name)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.input_dir.join(&self.settings.audiobook.manifest_file)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.input_dir.join(&self.settings.audiobook.metadata_file)
    }
}

/// Mutable run state that accumulates results from pipeline steps.
///
/// Each step writes its own section once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    pub run_id: String,
    pub started_at: Option<String>,
    /// Ordered input files (from Discover).
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Probed inputs, in file order (from Convert or Probe).
    #[serde(default)]
    pub assets: Vec<AudioAsset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion: Option<ConvertOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assemble: Option<AssembleOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<FeedOutput>,
}

impl RunState {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Path of the artifact the run produced, if it got that far.
    pub fn output_path(&self) -> Option<&PathBuf> {
        self.assemble
            .as_ref()
            .map(|a| &a.output_path)
            .or_else(|| self.feed.as_ref().map(|f| &f.output_path))
    }
}

/// Output from the Convert step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertOutput {
    /// Intermediate files, in input order.
    pub intermediates: Vec<PathBuf>,
    pub markers: Vec<ChapterMarker>,
    /// Exact (unfloored) sum of all durations.
    pub total_secs: f64,
}

/// Output from the WriteMetadata step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataOutput {
    pub manifest_path: PathBuf,
    pub metadata_path: PathBuf,
}

/// Output from the Assemble step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembleOutput {
    pub output_path: PathBuf,
    pub chapter_count: usize,
}

/// Output from the RenderFeed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedOutput {
    pub output_path: PathBuf,
    pub episodes: Vec<EpisodeItem>,
}
