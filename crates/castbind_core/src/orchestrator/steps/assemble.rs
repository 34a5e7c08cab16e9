//! Assemble step - concatenates intermediates into the final container.

use crate::fsutil::remove_if_exists;
use crate::media::ConcatRequest;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{AssembleOutput, Context, RunState};

/// Joins the intermediates with the chapter metadata attached.
///
/// A partial container left by a failed concat is removed.
pub struct AssembleStep;

impl AssembleStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AssembleStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for AssembleStep {
    fn name(&self) -> &str {
        "Assemble"
    }

    fn description(&self) -> &str {
        "Concatenate intermediates into the chaptered container"
    }

    fn validate_input(&self, ctx: &Context, state: &RunState) -> StepResult<()> {
        if state.metadata.is_none() {
            return Err(StepError::invalid_input("Manifest and metadata not written"));
        }
        if let Some(parent) = ctx.output_path().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StepError::io_error("creating output directory", e))?;
            }
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<()> {
        let Some(ref metadata) = state.metadata else {
            return Err(StepError::invalid_input("Manifest and metadata not written"));
        };

        let output_path = ctx.output_path();
        ctx.logger
            .info("Starting concatenation and final audiobook creation.");
        ctx.logger.info(&format!("Output: {}", output_path.display()));

        let request = ConcatRequest::new(
            &metadata.manifest_path,
            &metadata.metadata_path,
            &output_path,
        );

        ctx.logger.clear_tail();
        if let Err(e) = ctx.media.concat(&request, &*ctx.logger) {
            ctx.logger.show_tail(ctx.media.name());

            match remove_if_exists(&output_path) {
                Ok(true) => ctx
                    .logger
                    .warn(&format!("Removed partial output {}", output_path.display())),
                Ok(false) => {}
                Err(rm) => ctx.logger.warn(&format!(
                    "Could not remove partial output {}: {}",
                    output_path.display(),
                    rm
                )),
            }
            return Err(StepError::concat(&e));
        }

        let chapter_count = state
            .conversion
            .as_ref()
            .map(|c| c.markers.len())
            .unwrap_or_default();

        ctx.logger.success("Audiobook created successfully!");
        state.assemble = Some(AssembleOutput {
            output_path,
            chapter_count,
        });
        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        match state.assemble {
            Some(ref out) if out.output_path.exists() => Ok(()),
            Some(ref out) => Err(StepError::invalid_output(format!(
                "Output file not created: {}",
                out.output_path.display()
            ))),
            None => Err(StepError::invalid_output("Assembly not recorded")),
        }
    }
}
