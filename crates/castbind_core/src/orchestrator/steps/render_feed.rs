//! RenderFeed step - builds episode items and writes the RSS document.

use crate::feed::{build_episodes, render_feed, EpisodeOptions};
use crate::fsutil::atomic_write;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, FeedOutput, RunState};

pub struct RenderFeedStep;

impl RenderFeedStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RenderFeedStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for RenderFeedStep {
    fn name(&self) -> &str {
        "RenderFeed"
    }

    fn description(&self) -> &str {
        "Render the podcast RSS feed"
    }

    fn validate_input(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if state.assets.is_empty() {
            return Err(StepError::invalid_input("No probed episodes"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<()> {
        let podcast = &ctx.settings.podcast;

        let mut options = EpisodeOptions::new(podcast.feed_preset(), ctx.base_date);
        options.season = podcast.season;
        options.explicit = podcast.explicit;
        options.use_sidecars = podcast.use_sidecars;

        ctx.logger.info(&format!(
            "Using '{}' preset for host {}",
            podcast.preset, options.preset.source_host
        ));

        let episodes = build_episodes(&state.assets, &options)?;
        let xml = render_feed(&podcast.channel_info(), &episodes)?;

        let output_path = ctx.output_path();
        atomic_write(&output_path, xml.as_bytes())
            .map_err(|e| StepError::io_error(format!("writing {}", output_path.display()), e))?;

        ctx.logger.success(&format!(
            "Podcast XML file created: {} ({} episodes)",
            output_path.display(),
            episodes.len()
        ));

        state.feed = Some(FeedOutput {
            output_path,
            episodes,
        });
        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        match state.feed {
            Some(ref feed) if feed.episodes.len() == state.assets.len() => Ok(()),
            Some(_) => Err(StepError::invalid_output("Episode count does not match inputs")),
            None => Err(StepError::invalid_output("Feed not recorded")),
        }
    }
}
