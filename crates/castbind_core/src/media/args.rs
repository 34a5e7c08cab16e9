//! Command-line token builders for ffprobe and ffmpeg.
//!
//! Kept separate from process execution so the exact invocations can be
//! logged and tested without the tools installed.

use std::path::Path;

use super::types::{ConcatRequest, TranscodeRequest};

/// Flags shared by every ffmpeg invocation.
const FFMPEG_COMMON: [&str; 4] = ["-hide_banner", "-nostdin", "-loglevel", "error"];

/// ffprobe tokens reporting only the container duration as JSON.
pub fn probe_args(input: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-show_entries".to_string(),
        "format=duration".to_string(),
        "-of".to_string(),
        "json".to_string(),
        input.to_string_lossy().to_string(),
    ]
}

/// ffmpeg tokens for a single-file re-encode.
pub fn transcode_args(request: &TranscodeRequest) -> Vec<String> {
    let mut tokens: Vec<String> = FFMPEG_COMMON.iter().map(|s| s.to_string()).collect();
    tokens.push("-y".to_string());

    tokens.push("-i".to_string());
    tokens.push(request.input.to_string_lossy().to_string());

    // Cover art in mp3 sources would otherwise be carried as a video stream
    tokens.push("-vn".to_string());

    tokens.push("-c:a".to_string());
    tokens.push(request.codec.clone());
    tokens.push("-b:a".to_string());
    tokens.push(request.bitrate.clone());

    tokens.push(request.output.to_string_lossy().to_string());
    tokens
}

/// ffmpeg tokens for concatenating a manifest and attaching chapter metadata.
pub fn concat_args(request: &ConcatRequest) -> Vec<String> {
    let mut tokens: Vec<String> = FFMPEG_COMMON.iter().map(|s| s.to_string()).collect();
    tokens.push("-y".to_string());

    // Input 0: concat demuxer over the manifest
    tokens.push("-f".to_string());
    tokens.push("concat".to_string());
    tokens.push("-safe".to_string());
    tokens.push("0".to_string());
    tokens.push("-i".to_string());
    tokens.push(request.manifest.to_string_lossy().to_string());

    // Input 1: ffmetadata with chapters
    tokens.push("-i".to_string());
    tokens.push(request.metadata.to_string_lossy().to_string());
    tokens.push("-map_metadata".to_string());
    tokens.push("1".to_string());

    if request.copy_codec {
        tokens.push("-c".to_string());
        tokens.push("copy".to_string());
    }

    tokens.push(request.output.to_string_lossy().to_string());
    tokens
}
