//! ffmetadata chapter block rendering.

use super::types::ChapterMarker;

/// Header line ffmpeg requires at the top of a metadata file.
pub const FFMETADATA_HEADER: &str = ";FFMETADATA1";

/// Render markers as repeated ffmetadata chapter blocks.
///
/// Every block carries the header line; only the first is significant to
/// ffmpeg, later ones read as comments.
pub fn render_ffmetadata(markers: &[ChapterMarker]) -> String {
    let mut out = String::new();
    for marker in markers {
        out.push_str(FFMETADATA_HEADER);
        out.push('\n');
        out.push_str("[CHAPTER]\n");
        out.push_str("TIMEBASE=1/1\n");
        out.push_str(&format!("START={}\n", marker.start_secs));
        out.push_str(&format!("END={}\n", marker.end_secs));
        out.push_str(&format!("title={}\n", escape_metadata_value(&marker.title)));
    }
    out
}

/// Escape a value for the ffmetadata format.
///
/// `=`, `;`, `#`, `\` and newlines are special and get a backslash.
pub fn escape_metadata_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '=' | ';' | '#' | '\\' | '\n') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
