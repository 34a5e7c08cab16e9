//! Convert step - probes and transcodes each input, building chapter markers.

use std::fs;

use crate::chapters::{intermediate_path, ChapterFold};
use crate::media::TranscodeRequest;
use crate::models::AudioAsset;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ConvertOutput, RunState};

/// Per-file probe + transcode, strictly in file order.
///
/// Each chapter marker is produced after its file's intermediate exists.
/// The first failure aborts the step.
pub struct ConvertStep;

impl ConvertStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConvertStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ConvertStep {
    fn name(&self) -> &str {
        "Convert"
    }

    fn description(&self) -> &str {
        "Transcode inputs to intermediates and build chapters"
    }

    fn validate_input(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if !state.has_files() {
            return Err(StepError::invalid_input("Discover has not produced any files"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<()> {
        let temp_dir = ctx
            .scratch
            .ensure_dir()
            .and_then(fs::canonicalize)
            .map_err(|e| StepError::io_error("creating temp directory", e))?;

        let settings = &ctx.settings.audiobook;
        let total = state.files.len();

        let mut fold = ChapterFold::new();
        let mut intermediates = Vec::with_capacity(total);
        let mut markers = Vec::with_capacity(total);
        let mut assets = Vec::with_capacity(total);

        for (i, path) in state.files.iter().enumerate() {
            let name = path.display();
            ctx.logger.section(&format!("File {}/{}", i + 1, total));

            ctx.logger.info(&format!("Getting duration for file: {}", name));
            ctx.logger.clear_tail();
            let duration = ctx
                .media
                .probe_duration(path, &*ctx.logger)
                .map_err(|e| {
                    ctx.logger.show_tail(ctx.media.name());
                    StepError::probe(path, &e)
                })?;
            ctx.logger
                .info(&format!("Duration for file {}: {} seconds", name, duration));

            let size = fs::metadata(path)
                .map_err(|e| StepError::io_error(format!("reading {}", name), e))?
                .len();
            let asset = AudioAsset::new(path, size, duration);

            let intermediate = intermediate_path(&temp_dir, path, &settings.intermediate_extension);
            ctx.scratch.track(&intermediate);

            ctx.logger
                .info(&format!("Converting file {} to intermediate format.", name));
            let request = TranscodeRequest::new(
                path,
                &intermediate,
                settings.codec.as_str(),
                settings.bitrate.as_str(),
            );
            ctx.logger.clear_tail();
            ctx.media
                .transcode(&request, &*ctx.logger)
                .map_err(|e| {
                    ctx.logger.show_tail(ctx.media.name());
                    StepError::transcode(path, &e)
                })?;
            ctx.logger.info(&format!("Conversion complete for file {}", name));

            let (next, marker) = fold.step(asset.display_name.clone(), duration);
            fold = next;

            intermediates.push(intermediate);
            markers.push(marker);
            assets.push(asset);

            let percent = ((i + 1) * 100 / total) as u32;
            ctx.logger.progress(percent);
            ctx.report_progress(self.name(), percent, &format!("Converted {}/{}", i + 1, total));
        }

        state.assets = assets;
        state.conversion = Some(ConvertOutput {
            intermediates,
            markers,
            total_secs: fold.total_secs(),
        });
        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        let Some(ref conversion) = state.conversion else {
            return Err(StepError::invalid_output("Conversion not recorded"));
        };
        if conversion.intermediates.len() != state.files.len() {
            return Err(StepError::invalid_output(format!(
                "Expected {} intermediates, got {}",
                state.files.len(),
                conversion.intermediates.len()
            )));
        }
        if let Some(missing) = conversion.intermediates.iter().find(|p| !p.exists()) {
            return Err(StepError::invalid_output(format!(
                "Intermediate file missing: {}",
                missing.display()
            )));
        }
        Ok(())
    }
}
