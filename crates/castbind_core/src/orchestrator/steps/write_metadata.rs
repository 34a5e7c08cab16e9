//! WriteMetadata step - writes the concat manifest and chapter metadata.

use crate::chapters::{render_ffmetadata, render_manifest};
use crate::fsutil::atomic_write;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, MetadataOutput, RunState};

pub struct WriteMetadataStep;

impl WriteMetadataStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WriteMetadataStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for WriteMetadataStep {
    fn name(&self) -> &str {
        "WriteMetadata"
    }

    fn description(&self) -> &str {
        "Write concat manifest and chapter metadata"
    }

    fn validate_input(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        match state.conversion {
            Some(ref c) if !c.intermediates.is_empty() => Ok(()),
            _ => Err(StepError::invalid_input("No converted intermediates")),
        }
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<()> {
        let Some(ref conversion) = state.conversion else {
            return Err(StepError::invalid_input("No converted intermediates"));
        };

        ctx.logger
            .info("Writing chapter metadata and file list for concatenation.");

        let manifest_path = ctx.manifest_path();
        let metadata_path = ctx.metadata_path();
        ctx.scratch.track(&manifest_path);
        ctx.scratch.track(&metadata_path);

        let manifest = render_manifest(&conversion.intermediates);
        atomic_write(&manifest_path, manifest.as_bytes())
            .map_err(|e| StepError::io_error(format!("writing {}", manifest_path.display()), e))?;

        let metadata = render_ffmetadata(&conversion.markers);
        atomic_write(&metadata_path, metadata.as_bytes())
            .map_err(|e| StepError::io_error(format!("writing {}", metadata_path.display()), e))?;

        ctx.logger.debug(&format!(
            "Manifest: {}, metadata: {} ({} chapters)",
            manifest_path.display(),
            metadata_path.display(),
            conversion.markers.len()
        ));

        state.metadata = Some(MetadataOutput {
            manifest_path,
            metadata_path,
        });
        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        let Some(ref out) = state.metadata else {
            return Err(StepError::invalid_output("Metadata files not recorded"));
        };
        for path in [&out.manifest_path, &out.metadata_path] {
            if !path.exists() {
                return Err(StepError::invalid_output(format!(
                    "Missing {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}
