// src/youtube/mod.rs
//! YouTube helpers: identifiers, timestamps and the yt-dlp wrapper.

mod transcript;
mod ytdlp;

pub use transcript::{parse_json3, TranscriptSegment};
pub use ytdlp::{parse_search_results, VideoSearchHit, YtDlp};

use crate::types::{ClipTimestamp, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;

static BARE_VIDEO_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("video id regex is valid"));

static VIDEO_URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?:https?://)?(?:www\.)?youtube\.com/watch\?v=([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?(?:www\.)?youtu\.be/([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?(?:www\.)?youtube\.com/embed/([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?(?:www\.)?youtube\.com/v/([a-zA-Z0-9_-]{11})",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("video url regex is valid"))
    .collect()
});

/// Converts `MM:SS` or `HH:MM:SS` to seconds.
pub fn timestamp_to_seconds(timestamp: &str) -> Result<u32, ValidationError> {
    ClipTimestamp::parse(timestamp).map(|ts| ts.as_seconds())
}

/// The 11-character video id of a bare id or a watch/short/embed URL.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if BARE_VIDEO_ID.is_match(input) {
        return Some(input.to_string());
    }
    VIDEO_URL_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(input))
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
