//! Pipeline orchestrator for coordinating runs.
//!
//! A run is a sequence of steps that validate, execute, and record their
//! results in a [`RunState`].
//!
//! # Architecture
//!
//! ```text
//! Audiobook pipeline          Podcast pipeline
//!     ├── Discover                ├── Discover
//!     ├── Convert                 ├── Probe
//!     ├── WriteMetadata           └── RenderFeed
//!     └── Assemble
//! ```
//!
//! # Example
//!
//! ```ignore
//! use castbind_core::orchestrator::{self, Context};
//!
//! let ctx = Context::new(PipelineKind::Audiobook, settings, "audiobook", ".", logger, media);
//! let state = orchestrator::run(&ctx)?;
//! println!("Wrote {:?}", state.output_path());
//! ```

mod errors;
mod pipeline;
mod scratch;
mod step;
pub mod steps;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use scratch::ScratchArea;
pub use step::PipelineStep;
pub use steps::{
    AssembleStep, ConvertStep, DiscoverStep, ProbeStep, RenderFeedStep, WriteMetadataStep,
};
pub use types::{
    AssembleOutput, Context, ConvertOutput, FeedOutput, MetadataOutput, ProgressCallback,
    RunState,
};

use crate::models::PipelineKind;

/// Audiobook pipeline:
/// 1. Discover - list and order inputs
/// 2. Convert - probe and transcode each input, build chapters
/// 3. WriteMetadata - write concat manifest and ffmetadata
/// 4. Assemble - concat into the chaptered container
pub fn create_audiobook_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(DiscoverStep::new())
        .with_step(ConvertStep::new())
        .with_step(WriteMetadataStep::new())
        .with_step(AssembleStep::new())
}

/// Podcast pipeline:
/// 1. Discover - list and order inputs
/// 2. Probe - duration and size of each input
/// 3. RenderFeed - build items and write the RSS document
pub fn create_podcast_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(DiscoverStep::new())
        .with_step(ProbeStep::new())
        .with_step(RenderFeedStep::new())
}

/// Run the pipeline for `ctx.kind` to completion.
///
/// Scratch files are removed on both success and failure, unless the run
/// failed and `audiobook.keep_intermediates_on_error` is set.
pub fn run(ctx: &Context) -> PipelineResult<RunState> {
    let pipeline = match ctx.kind {
        PipelineKind::Audiobook => create_audiobook_pipeline(),
        PipelineKind::Podcast => create_podcast_pipeline(),
    };

    ctx.logger.info(&format!(
        "Starting {} run in {}",
        ctx.kind,
        ctx.input_dir.display()
    ));

    let mut state = RunState::new(&ctx.run_name);
    let result = pipeline.run(ctx, &mut state);

    let keep = result.is_err()
        && ctx.kind == PipelineKind::Audiobook
        && ctx.settings.audiobook.keep_intermediates_on_error;
    if keep {
        ctx.scratch.keep();
        ctx.logger.warn(&format!(
            "Keeping intermediates for inspection in {}",
            ctx.scratch.dir().display()
        ));
    } else {
        let removed = ctx.scratch.cleanup();
        ctx.logger
            .debug(&format!("Removed {} temporary file(s)", removed));
    }
    ctx.logger.flush();

    let completed = result?;
    tracing::debug!(
        "{} run finished: {}",
        ctx.kind,
        completed.steps_completed.join(" -> ")
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::testing::{test_context, test_context_with, FakeMedia};
    use super::*;
    use crate::config::Settings;
    use crate::logging::init_test_tracing;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), vec![0u8; 100]).unwrap();
        }
    }

    #[test]
    fn pipelines_have_expected_steps() {
        assert_eq!(
            create_audiobook_pipeline().step_names(),
            vec!["Discover", "Convert", "WriteMetadata", "Assemble"]
        );
        assert_eq!(
            create_podcast_pipeline().step_names(),
            vec!["Discover", "Probe", "RenderFeed"]
        );
    }

    #[test]
    fn audiobook_run_builds_chapters_in_numeric_order() {
        init_test_tracing();
        let dir = tempdir().unwrap();
        touch(dir.path(), &["track10.mp3", "track2.mp3", "track1.mp3", "cover.jpg"]);

        let media = FakeMedia::default()
            .with_duration("track1.mp3", 61.5)
            .with_duration("track2.mp3", 30.7)
            .with_duration("track10.mp3", 10.0);
        let (ctx, media) =
            test_context_with(dir.path(), PipelineKind::Audiobook, Settings::default(), media);

        let state = run(&ctx).unwrap();

        let conversion = state.conversion.as_ref().unwrap();
        let titles: Vec<_> = conversion.markers.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["track1", "track2", "track10"]);
        let bounds: Vec<_> = conversion
            .markers
            .iter()
            .map(|m| (m.start_secs, m.end_secs))
            .collect();
        assert_eq!(bounds, vec![(0, 61), (61, 92), (92, 102)]);

        let manifest = media.last_manifest.lock().clone().unwrap();
        let lines: Vec<_> = manifest.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("file '") && lines[0].ends_with("temp_track1.mp3.m4a'"));
        assert!(lines[1].ends_with("temp_track2.mp3.m4a'"));
        assert!(lines[2].ends_with("temp_track10.mp3.m4a'"));

        let metadata = media.last_metadata.lock().clone().unwrap();
        assert!(metadata.starts_with(";FFMETADATA1\n[CHAPTER]\nTIMEBASE=1/1\nSTART=0\nEND=61\n"));

        assert!(dir.path().join("output.m4b").exists());
        assert!(!dir.path().join("temp").exists());
        assert!(!dir.path().join("concat_list.txt").exists());
        assert!(!dir.path().join("metadata.txt").exists());
        assert_eq!(state.assemble.as_ref().unwrap().chapter_count, 3);
    }

    #[test]
    fn probe_failure_on_third_file_aborts_without_output() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["01.mp3", "02.mp3", "03.mp3", "04.mp3", "05.mp3"]);

        let media = FakeMedia {
            fail_probe: Some("03.mp3".to_string()),
            default_duration: 5.0,
            ..Default::default()
        };
        let (ctx, media) =
            test_context_with(dir.path(), PipelineKind::Audiobook, Settings::default(), media);

        let err = run(&ctx).unwrap_err();

        let step_err = err.step_error();
        assert!(matches!(step_err, StepError::Probe { .. }));
        assert!(step_err.path().unwrap().ends_with("03.mp3"));
        assert!(err.to_string().contains("03.mp3"));

        assert_eq!(media.calls_starting_with("transcode"), 2);
        assert_eq!(media.calls_starting_with("concat"), 0);
        assert!(!dir.path().join("output.m4b").exists());
        assert!(!dir.path().join("temp").exists());
    }

    #[test]
    fn run_log_records_tool_commands_and_failing_output() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["01.mp3", "02.mp3", "03.mp3"]);

        let media = FakeMedia {
            fail_probe: Some("03.mp3".to_string()),
            ..Default::default()
        };
        let (ctx, _media) =
            test_context_with(dir.path(), PipelineKind::Audiobook, Settings::default(), media);

        assert!(run(&ctx).is_err());
        let log = fs::read_to_string(ctx.logger.log_path()).unwrap();

        assert!(log.contains("$ ffprobe 01.mp3\n"));
        assert!(log.contains("$ ffmpeg -i 02.mp3\n"));
        assert!(log.contains("--- File 3/3 ---"));
        assert!(log.contains("[fake/tail]\n03.mp3: Invalid data found when processing input\n"));
        // Compact mode keeps successful output out of the log, and the tail
        // only holds the failing invocation.
        assert!(!log.contains("duration="));
    }

    #[test]
    fn transcode_failure_can_keep_intermediates() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["1.mp3", "2.mp3", "3.mp3"]);

        let mut settings = Settings::default();
        settings.audiobook.keep_intermediates_on_error = true;
        let media = FakeMedia {
            fail_transcode: Some("2.mp3".to_string()),
            default_duration: 5.0,
            ..Default::default()
        };
        let (ctx, _media) = test_context_with(dir.path(), PipelineKind::Audiobook, settings, media);

        let err = run(&ctx).unwrap_err();
        assert!(matches!(err.step_error(), StepError::Transcode { .. }));
        assert!(ctx.scratch.is_kept());
        assert!(dir.path().join("temp").join("temp_1.mp3.m4a").exists());
    }

    #[test]
    fn concat_failure_removes_partial_output() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["1.mp3", "2.mp3"]);

        let media = FakeMedia {
            fail_concat: true,
            default_duration: 5.0,
            ..Default::default()
        };
        let (ctx, _media) =
            test_context_with(dir.path(), PipelineKind::Audiobook, Settings::default(), media);

        let err = run(&ctx).unwrap_err();
        assert!(matches!(err.step_error(), StepError::Concat { .. }));
        assert!(!dir.path().join("output.m4b").exists());
        assert!(!dir.path().join("temp").exists());
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["notes.txt"]);
        let (ctx, _media) = test_context(dir.path(), PipelineKind::Audiobook);

        let err = run(&ctx).unwrap_err();
        assert!(matches!(err.step_error(), StepError::NoInputFiles { .. }));
    }

    #[test]
    fn podcast_run_writes_feed() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["ep2.mp3", "ep1.mp3", "ep3.mp3"]);

        let media = FakeMedia::default().with_duration("ep1.mp3", 3661.0);
        let (ctx, _media) =
            test_context_with(dir.path(), PipelineKind::Podcast, Settings::default(), media);

        let state = run(&ctx).unwrap();

        let feed = state.feed.as_ref().unwrap();
        let numbers: Vec<u32> = feed.episodes.iter().map(|e| e.episode_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(feed.episodes[0].duration_formatted, "01:01:01");
        assert_eq!(feed.episodes[0].enclosure_length_bytes, 100);

        let xml = fs::read_to_string(dir.path().join("podcast.xml")).unwrap();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(doc.descendants().filter(|n| n.has_tag_name("item")).count(), 3);
    }

    #[test]
    fn podcast_probe_failure_writes_no_feed() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["1.mp3", "2.mp3", "3.mp3", "4.mp3", "5.mp3"]);

        let media = FakeMedia {
            fail_probe: Some("3.mp3".to_string()),
            ..Default::default()
        };
        let (ctx, _media) =
            test_context_with(dir.path(), PipelineKind::Podcast, Settings::default(), media);

        let err = run(&ctx).unwrap_err();
        assert!(err.to_string().contains("3.mp3"));
        assert!(!dir.path().join("podcast.xml").exists());
    }

    #[test]
    fn output_override_is_used() {
        let dir = tempdir().unwrap();
        touch(dir.path(), &["1.mp3"]);
        let out = dir.path().join("out").join("book.m4b");

        let (ctx, _media) = test_context(dir.path(), PipelineKind::Audiobook);
        let ctx = ctx.with_output_path(&out);

        let state = run(&ctx).unwrap();
        assert_eq!(state.output_path(), Some(&out));
        assert!(out.exists());
    }
}
