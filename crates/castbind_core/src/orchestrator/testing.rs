//! Test doubles for pipeline tests.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use super::types::Context;
use crate::config::Settings;
use crate::logging::{LogConfig, RunLogger};
use crate::media::{
    ConcatRequest, MediaError, MediaResult, MediaService, ToolLog, TranscodeRequest,
};
use crate::models::PipelineKind;

/// In-memory media service. Files are keyed by file name.
///
/// Each call reports a command line and tool output to the `ToolLog`; a
/// failing call prints `<name>: <reason>` on stderr.
#[derive(Default)]
pub struct FakeMedia {
    pub durations: HashMap<String, f64>,
    pub default_duration: f64,
    pub fail_probe: Option<String>,
    pub fail_transcode: Option<String>,
    pub fail_concat: bool,
    pub calls: Mutex<Vec<String>>,
    pub last_manifest: Mutex<Option<String>>,
    pub last_metadata: Mutex<Option<String>>,
}

impl FakeMedia {
    pub fn with_duration(mut self, name: &str, secs: f64) -> Self {
        self.durations.insert(name.to_string(), secs);
        self
    }

    pub fn calls_starting_with(&self, prefix: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

impl MediaService for FakeMedia {
    fn probe_duration(&self, path: &Path, log: &dyn ToolLog) -> MediaResult<f64> {
        let name = file_name(path);
        self.calls.lock().push(format!("probe {}", name));
        log.command(&format!("ffprobe {}", name));
        if self.fail_probe.as_deref() == Some(name.as_str()) {
            log.output_line(&format!("{}: Invalid data found when processing input", name), true);
            return Err(MediaError::command_failed("ffprobe", 1, "Invalid data found"));
        }
        let secs = self.durations.get(&name).copied().unwrap_or(self.default_duration);
        log.output_line(&format!("duration={}", secs), false);
        Ok(secs)
    }

    fn transcode(&self, request: &TranscodeRequest, log: &dyn ToolLog) -> MediaResult<()> {
        let name = file_name(&request.input);
        self.calls.lock().push(format!("transcode {}", name));
        log.command(&format!("ffmpeg -i {}", name));
        if self.fail_transcode.as_deref() == Some(name.as_str()) {
            log.output_line(&format!("{}: Conversion failed", name), true);
            return Err(MediaError::command_failed("ffmpeg", 1, "Conversion failed"));
        }
        fs::write(&request.output, b"m4a").map_err(|source| MediaError::Spawn {
            tool: "fake".to_string(),
            source,
        })
    }

    fn concat(&self, request: &ConcatRequest, log: &dyn ToolLog) -> MediaResult<()> {
        self.calls.lock().push("concat".to_string());
        log.command("ffmpeg -f concat");
        *self.last_manifest.lock() = fs::read_to_string(&request.manifest).ok();
        *self.last_metadata.lock() = fs::read_to_string(&request.metadata).ok();

        let _ = fs::write(&request.output, b"partial");
        if self.fail_concat {
            log.output_line("concat: Concat error", true);
            return Err(MediaError::command_failed("ffmpeg", 1, "Concat error"));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Context over `dir` with default settings and a quiet logger.
pub fn test_context(dir: &Path, kind: PipelineKind) -> (Context, Arc<FakeMedia>) {
    test_context_with(dir, kind, Settings::default(), FakeMedia::default())
}

pub fn test_context_with(
    dir: &Path,
    kind: PipelineKind,
    settings: Settings,
    media: FakeMedia,
) -> (Context, Arc<FakeMedia>) {
    let config = LogConfig {
        show_timestamps: false,
        ..LogConfig::default()
    };
    let logger = RunLogger::new("test", dir.join(".logs"), config, None).unwrap();
    let media = Arc::new(media);
    let service: Arc<dyn MediaService> = media.clone();
    let ctx = Context::new(kind, settings, "test", dir, Arc::new(logger), service);
    (ctx, media)
}
