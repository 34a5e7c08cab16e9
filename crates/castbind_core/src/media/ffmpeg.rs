//! `ffprobe` / `ffmpeg` subprocess implementation of [`MediaService`].

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

use super::args::{concat_args, probe_args, transcode_args};
use super::types::{ConcatRequest, MediaError, MediaResult, TranscodeRequest};
use super::{MediaService, ToolLog};

/// Number of stderr lines kept in error messages.
const DEFAULT_ERROR_TAIL: usize = 20;

/// Media service backed by the ffmpeg command-line tools.
#[derive(Debug, Clone)]
pub struct FfmpegCli {
    ffmpeg_path: PathBuf,
    ffprobe_path: PathBuf,
    error_tail: usize,
}

impl FfmpegCli {
    /// Use `ffmpeg` and `ffprobe` from `PATH`.
    pub fn new() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            error_tail: DEFAULT_ERROR_TAIL,
        }
    }

    /// Set a custom path to the ffmpeg executable.
    pub fn with_ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = path.into();
        self
    }

    /// Set a custom path to the ffprobe executable.
    pub fn with_ffprobe_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffprobe_path = path.into();
        self
    }

    /// Number of trailing stderr lines to keep when a command fails.
    pub fn with_error_tail(mut self, lines: usize) -> Self {
        self.error_tail = lines.max(1);
        self
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &Path {
        &self.ffprobe_path
    }

    /// Run a tool to completion, turning non-zero exit into an error.
    ///
    /// The command line and every output line go to `log`.
    fn run(&self, program: &Path, tokens: &[String], log: &dyn ToolLog) -> MediaResult<Output> {
        let tool = program.display().to_string();
        let command_line = format!("{} {}", tool, tokens.join(" "));
        tracing::debug!("$ {}", command_line);
        log.command(&command_line);

        let output = Command::new(program)
            .args(tokens)
            .output()
            .map_err(|source| MediaError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            log.output_line(line, false);
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            log.output_line(line, true);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::command_failed(
                tool,
                output.status.code().unwrap_or(-1),
                tail_lines(&stderr, self.error_tail),
            ));
        }

        Ok(output)
    }
}

impl Default for FfmpegCli {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaService for FfmpegCli {
    fn probe_duration(&self, path: &Path, log: &dyn ToolLog) -> MediaResult<f64> {
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }

        let output = self.run(&self.ffprobe_path, &probe_args(path), log)?;
        let duration = parse_probe_duration(&output.stdout)?;

        tracing::debug!("Duration for {}: {:.3}s", path.display(), duration);
        Ok(duration)
    }

    fn transcode(&self, request: &TranscodeRequest, log: &dyn ToolLog) -> MediaResult<()> {
        if !request.input.exists() {
            return Err(MediaError::FileNotFound(request.input.clone()));
        }

        self.run(&self.ffmpeg_path, &transcode_args(request), log)?;
        Ok(())
    }

    fn concat(&self, request: &ConcatRequest, log: &dyn ToolLog) -> MediaResult<()> {
        for required in [&request.manifest, &request.metadata] {
            if !required.exists() {
                return Err(MediaError::FileNotFound(required.clone()));
            }
        }

        self.run(&self.ffmpeg_path, &concat_args(request), log)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// Parse the JSON printed by `ffprobe -show_entries format=duration -of json`.
///
/// ffprobe prints the duration as a string; a bare number is accepted too.
pub fn parse_probe_duration(stdout: &[u8]) -> MediaResult<f64> {
    let json: Value = serde_json::from_slice(stdout)
        .map_err(|e| MediaError::parse_error("ffprobe", e.to_string()))?;

    let raw = json
        .get("format")
        .and_then(|f| f.get("duration"))
        .ok_or_else(|| MediaError::parse_error("ffprobe", "no format duration reported"))?;

    let duration = match raw {
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| MediaError::parse_error("ffprobe", format!("duration '{}': {}", s, e)))?,
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| MediaError::parse_error("ffprobe", "duration out of range"))?,
        other => {
            return Err(MediaError::parse_error(
                "ffprobe",
                format!("unexpected duration value {}", other),
            ))
        }
    };

    if !duration.is_finite() || duration < 0.0 {
        return Err(MediaError::parse_error(
            "ffprobe",
            format!("invalid duration {}", duration),
        ));
    }

    Ok(duration)
}

/// Keep the last `n` non-empty lines of tool output.
fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
