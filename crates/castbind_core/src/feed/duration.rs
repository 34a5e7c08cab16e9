//! `HH:MM:SS` duration formatting for `itunes:duration`.

/// Format whole seconds as zero-padded `HH:MM:SS`.
///
/// Hours are not wrapped; 100 hours prints as `100:00:00`.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format a probed duration, dropping the fractional part.
pub fn format_duration_secs(secs: f64) -> String {
    let whole = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format_duration(whole)
}
