//! Probe step - measures every podcast input.

use std::fs;

use crate::models::AudioAsset;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState};

/// Probes each file in order. A single failure aborts the run.
pub struct ProbeStep;

impl ProbeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProbeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ProbeStep {
    fn name(&self) -> &str {
        "Probe"
    }

    fn description(&self) -> &str {
        "Read duration and size of each episode"
    }

    fn validate_input(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if !state.has_files() {
            return Err(StepError::invalid_input("Discover has not produced any files"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<()> {
        let total = state.files.len();
        let mut assets = Vec::with_capacity(total);

        for (i, path) in state.files.iter().enumerate() {
            ctx.logger.clear_tail();
            let duration = ctx
                .media
                .probe_duration(path, &*ctx.logger)
                .map_err(|e| {
                    ctx.logger.show_tail(ctx.media.name());
                    StepError::probe(path, &e)
                })?;

            let size = fs::metadata(path)
                .map_err(|e| StepError::io_error(format!("reading {}", path.display()), e))?
                .len();

            ctx.logger.info(&format!(
                "Duration for file {}: {} seconds",
                path.display(),
                duration
            ));
            assets.push(AudioAsset::new(path, size, duration));

            let percent = ((i + 1) * 100 / total) as u32;
            ctx.logger.progress(percent);
            ctx.report_progress(self.name(), percent, &format!("Probed {}/{}", i + 1, total));
        }

        state.assets = assets;
        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if state.assets.len() != state.files.len() {
            return Err(StepError::invalid_output(format!(
                "Expected {} probed files, got {}",
                state.files.len(),
                state.assets.len()
            )));
        }
        Ok(())
    }
}
