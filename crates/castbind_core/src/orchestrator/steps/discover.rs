//! Discover step - lists and orders the input audio files.

use std::fs;

use crate::discovery::{discover_audio_files, DiscoveryError};
use crate::models::PipelineKind;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState};

/// Finds input files in the input directory, in chapter order.
///
/// Paths are made absolute so the concat manifest does not depend on the
/// tool's working directory.
pub struct DiscoverStep;

impl DiscoverStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DiscoverStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for DiscoverStep {
    fn name(&self) -> &str {
        "Discover"
    }

    fn description(&self) -> &str {
        "List and order input audio files"
    }

    fn validate_input(&self, ctx: &Context, _state: &RunState) -> StepResult<()> {
        if !ctx.input_dir.is_dir() {
            return Err(StepError::invalid_input(format!(
                "Input directory does not exist: {}",
                ctx.input_dir.display()
            )));
        }
        if ctx.extensions().is_empty() {
            return Err(StepError::invalid_input("No audio extensions configured"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<()> {
        let dir = fs::canonicalize(&ctx.input_dir)
            .map_err(|e| StepError::io_error("resolving input directory", e))?;

        let files = discover_audio_files(&dir, ctx.extensions()).map_err(|e| match e {
            DiscoveryError::ReadDir { source, .. } => {
                StepError::io_error(format!("listing {}", dir.display()), source)
            }
        })?;

        if files.is_empty() {
            return Err(StepError::no_input_files(&dir, ctx.extensions()));
        }

        let unit = match ctx.kind {
            PipelineKind::Audiobook => "Chapters",
            PipelineKind::Podcast => "Episodes",
        };
        ctx.logger.info(&format!(
            "Found {} files to process. {} will be in the following order:",
            files.len(),
            unit
        ));
        for file in &files {
            let name = file.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            ctx.logger.info(&format!("  {}", name));
        }

        state.files = files;
        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if !state.has_files() {
            return Err(StepError::invalid_output("No input files recorded"));
        }
        Ok(())
    }
}
