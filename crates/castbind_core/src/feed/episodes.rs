//! Building feed items from probed assets.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};

use crate::models::AudioAsset;

use super::duration::format_duration_secs;
use super::preset::FeedPreset;
use super::types::{EpisodeItem, FeedError, FeedResult};

/// Inputs shared by every item of one feed.
#[derive(Debug, Clone)]
pub struct EpisodeOptions {
    pub preset: FeedPreset,
    /// Episode N is dated `base_date + N days`.
    pub base_date: DateTime<Utc>,
    pub season: u32,
    pub explicit: bool,
    /// Look for `<title>.txt` next to each asset.
    pub use_sidecars: bool,
}

impl EpisodeOptions {
    pub fn new(preset: FeedPreset, base_date: DateTime<Utc>) -> Self {
        Self {
            preset,
            base_date,
            season: 1,
            explicit: false,
            use_sidecars: true,
        }
    }
}

/// Build one item per asset, numbered from 1 in the given order.
///
/// Stops at the first unreadable source file or sidecar.
pub fn build_episodes(
    assets: &[AudioAsset],
    options: &EpisodeOptions,
) -> FeedResult<Vec<EpisodeItem>> {
    assets
        .iter()
        .zip(1u32..)
        .map(|(asset, number)| build_episode(asset, number, options))
        .collect()
}

/// Build a single item.
///
/// The enclosure length is read from disk now, not taken from the probe.
pub fn build_episode(
    asset: &AudioAsset,
    episode_number: u32,
    options: &EpisodeOptions,
) -> FeedResult<EpisodeItem> {
    let preset = &options.preset;
    let file_name = asset.file_name();

    let enclosure_length_bytes = fs::metadata(&asset.path)
        .map_err(|e| FeedError::io(&asset.path, e))?
        .len();

    let title = preset.title(episode_number, &asset.display_name);

    let sidecar = if options.use_sidecars {
        find_sidecar(asset, &title)?
    } else {
        None
    };
    let description = sidecar.unwrap_or_else(|| title.clone());

    let enclosure_url = preset.enclosure_url(episode_number, &file_name, &asset.display_name);
    let link = preset.link(episode_number, &file_name, &asset.display_name);
    let guid = preset.guid(episode_number, &enclosure_url);

    Ok(EpisodeItem {
        episode_number,
        title,
        description,
        pub_date: options.base_date + Duration::days(i64::from(episode_number)),
        link,
        enclosure_url,
        enclosure_length_bytes,
        enclosure_mime: preset.mime_for(&file_name),
        guid,
        guid_is_permalink: preset.guid_scheme.is_permalink(),
        duration_formatted: format_duration_secs(asset.duration_secs),
        season: options.season,
        explicit: options.explicit,
    })
}

/// Sidecar description for an asset: `<title>.txt`, then `<display_name>.txt`.
fn find_sidecar(asset: &AudioAsset, title: &str) -> FeedResult<Option<String>> {
    let dir = asset.path.parent().unwrap_or_else(|| Path::new("."));

    let mut candidates: Vec<PathBuf> = vec![dir.join(format!("{}.txt", title))];
    if asset.display_name != title {
        candidates.push(dir.join(format!("{}.txt", asset.display_name)));
    }

    for candidate in candidates {
        if let Some(text) = read_sidecar(&candidate)? {
            tracing::debug!("Using sidecar description {}", candidate.display());
            return Ok(Some(text));
        }
    }
    Ok(None)
}

/// Read a sidecar description.
///
/// Missing or blank files yield `None`; other read errors are reported.
pub fn read_sidecar(path: &Path) -> FeedResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => {
            let trimmed = text.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(FeedError::io(path, e)),
    }
}

/// RFC 2822 style date in GMT, e.g. `Tue, 20 Oct 2026 09:30:00 GMT`.
pub fn format_pub_date(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
    }

    fn write_asset(dir: &Path, name: &str, bytes: usize, duration: f64) -> AudioAsset {
        let path = dir.join(name);
        fs::write(&path, vec![0u8; bytes]).unwrap();
        AudioAsset::new(path, 0, duration)
    }

    #[test]
    fn numbers_are_one_based_and_gapless() {
        let dir = tempdir().unwrap();
        let assets: Vec<_> = (1..=5)
            .map(|i| write_asset(dir.path(), &format!("{}.mp3", i), 10, 60.0))
            .collect();

        let options = EpisodeOptions::new(FeedPreset::episode_keyed("h.com"), base());
        let items = build_episodes(&assets, &options).unwrap();

        let numbers: Vec<u32> = items.iter().map(|i| i.episode_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(items[4].title, "Chapter 5");
    }

    #[test]
    fn enclosure_length_is_read_at_build_time() {
        let dir = tempdir().unwrap();
        let asset = write_asset(dir.path(), "1.mp3", 10, 1.0);
        fs::write(&asset.path, vec![0u8; 1234]).unwrap();

        let options = EpisodeOptions::new(FeedPreset::episode_keyed("h.com"), base());
        let item = build_episode(&asset, 1, &options).unwrap();
        assert_eq!(item.enclosure_length_bytes, 1234);
    }

    #[test]
    fn pub_dates_advance_one_day_per_episode() {
        let dir = tempdir().unwrap();
        let assets = vec![
            write_asset(dir.path(), "1.mp3", 1, 1.0),
            write_asset(dir.path(), "2.mp3", 1, 1.0),
        ];
        let options = EpisodeOptions::new(FeedPreset::episode_keyed("h.com"), base());
        let items = build_episodes(&assets, &options).unwrap();

        assert_eq!(items[0].pub_date, base() + Duration::days(1));
        assert_eq!(items[1].pub_date - items[0].pub_date, Duration::days(1));
        assert_eq!(format_pub_date(&items[0].pub_date), "Tue, 20 Oct 2026 09:30:00 GMT");
    }

    #[test]
    fn enclosure_type_matches_each_file() {
        let dir = tempdir().unwrap();
        let assets = vec![
            write_asset(dir.path(), "1.mp3", 1, 1.0),
            write_asset(dir.path(), "2.m4a", 1, 1.0),
        ];
        let options = EpisodeOptions::new(FeedPreset::filename_keyed("h.com"), base());
        let items = build_episodes(&assets, &options).unwrap();
        assert_eq!(items[0].enclosure_mime, "audio/mpeg");
        assert_eq!(items[1].enclosure_mime, "audio/mp4");
    }

    #[test]
    fn duration_is_formatted() {
        let dir = tempdir().unwrap();
        let asset = write_asset(dir.path(), "1.mp3", 1, 3661.7);
        let options = EpisodeOptions::new(FeedPreset::episode_keyed("h.com"), base());
        let item = build_episode(&asset, 1, &options).unwrap();
        assert_eq!(item.duration_formatted, "01:01:01");
    }

    #[test]
    fn sidecar_supplies_description() {
        let dir = tempdir().unwrap();
        let asset = write_asset(dir.path(), "Intro 01.mp3", 1, 1.0);
        fs::write(dir.path().join("Intro 01.txt"), "  Welcome to the show.\n").unwrap();

        let options = EpisodeOptions::new(FeedPreset::filename_keyed("h.com"), base());
        let item = build_episode(&asset, 1, &options).unwrap();
        assert_eq!(item.title, "Intro 01");
        assert_eq!(item.description, "Welcome to the show.");
    }

    #[test]
    fn missing_or_blank_sidecar_falls_back_to_title() {
        let dir = tempdir().unwrap();
        let asset = write_asset(dir.path(), "2.mp3", 1, 1.0);
        fs::write(dir.path().join("Chapter 1.txt"), "   ").unwrap();

        let options = EpisodeOptions::new(FeedPreset::episode_keyed("h.com"), base());
        let item = build_episode(&asset, 1, &options).unwrap();
        assert_eq!(item.description, "Chapter 1");
    }

    #[test]
    fn missing_source_file_is_an_error() {
        let asset = AudioAsset::new("/nonexistent/1.mp3", 0, 1.0);
        let options = EpisodeOptions::new(FeedPreset::episode_keyed("h.com"), base());
        assert!(matches!(
            build_episode(&asset, 1, &options),
            Err(FeedError::Io { .. })
        ));
    }
}
