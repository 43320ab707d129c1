// src/youtube/ytdlp.rs
//! yt-dlp as a child process: search, clip download and caption fetch.

use super::transcript::{parse_json3, TranscriptSegment};
use super::watch_url;
use crate::constants::{CLIP_FORMAT, VIDEO_SEARCH_RESULTS};
use crate::error::AppError;
use crate::types::ClipRange;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::process::Command;

const TOOL: &str = "yt-dlp";

/// One search result, as reported by `--flat-playlist`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoSearchHit {
    pub video_id: String,
    pub url: String,
    pub title: String,
    pub channel: String,
    pub duration: f64,
    pub view_count: u64,
    pub upload_date: String,
}

#[derive(Debug, Deserialize)]
struct SearchPlaylist {
    #[serde(default)]
    entries: Vec<Option<SearchEntry>>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    view_count: Option<u64>,
    #[serde(default)]
    upload_date: Option<String>,
}

/// Parses the `--dump-single-json` output of a `ytsearchN:` query.
///
/// Null entries and entries without an id are skipped; order is kept.
pub fn parse_search_results(raw: &str) -> Result<Vec<VideoSearchHit>, AppError> {
    let playlist: SearchPlaylist = serde_json::from_str(raw)?;
    Ok(playlist
        .entries
        .into_iter()
        .flatten()
        .filter_map(|entry| {
            let video_id = entry.id?;
            Some(VideoSearchHit {
                url: watch_url(&video_id),
                video_id,
                title: entry.title.unwrap_or_default(),
                channel: entry.channel.or(entry.uploader).unwrap_or_default(),
                duration: entry.duration.unwrap_or(0.0),
                view_count: entry.view_count.unwrap_or(0),
                upload_date: entry.upload_date.unwrap_or_default(),
            })
        })
        .collect())
}

/// Arguments for downloading `range` of `url` as an mp4.
pub(crate) fn clip_args(url: &str, range: &ClipRange, title: Option<&str>) -> Vec<String> {
    let output_template = match title {
        Some(title) => format!("{}.%(ext)s", title),
        None => "%(title)s_clip.%(ext)s".to_string(),
    };
    vec![
        "--format".to_string(),
        CLIP_FORMAT.to_string(),
        "--merge-output-format".to_string(),
        "mp4".to_string(),
        "--download-sections".to_string(),
        format!("*{}-{}", range.start.as_seconds(), range.end.as_seconds()),
        "--force-keyframes-at-cuts".to_string(),
        "--output".to_string(),
        output_template,
        url.to_string(),
    ]
}

/// Handle on the yt-dlp executable.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self {
            program: PathBuf::from(TOOL),
        }
    }
}

impl YtDlp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a specific executable instead of `yt-dlp` from `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs yt-dlp and returns its stdout. A non-zero exit is an error
    /// carrying the tail of stderr.
    async fn run(&self, args: &[String], working_dir: Option<&Path>) -> Result<String, AppError> {
        let mut command = Command::new(&self.program);
        command.args(args);
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }
        log::debug!("Running {} {}", self.program.display(), args.join(" "));

        let output = command.output().await.map_err(|e| AppError::ExternalTool {
            tool: TOOL,
            message: format!("could not start {}: {}", self.program.display(), e),
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            let tail: Vec<&str> = tail.into_iter().rev().collect();
            return Err(AppError::ExternalTool {
                tool: TOOL,
                message: format!("exited with {}: {}", output.status, tail.join(" | ")),
            });
        }
        if !stderr.trim().is_empty() {
            log::debug!("yt-dlp stderr: {}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// The most relevant video for `query`; the first search hit wins.
    pub async fn search_video(&self, query: &str) -> Result<VideoSearchHit, AppError> {
        let args = vec![
            "--flat-playlist".to_string(),
            "--dump-single-json".to_string(),
            "--quiet".to_string(),
            "--no-warnings".to_string(),
            format!("ytsearch{}:{}", VIDEO_SEARCH_RESULTS, query),
        ];
        let stdout = self.run(&args, None).await?;
        let hits = parse_search_results(&stdout)?;
        log::info!("Search for {:?} returned {} videos", query, hits.len());

        hits.into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("No videos found for the search query: {}", query)))
    }

    /// Downloads the `start`..`end` section of `url` into `dir`.
    ///
    /// yt-dlp runs with `dir` as its working directory; this process's own
    /// working directory is left alone.
    pub async fn download_clip(
        &self,
        url: &str,
        start: &str,
        end: &str,
        title: Option<&str>,
        dir: &Path,
    ) -> Result<(), AppError> {
        let range = ClipRange::parse(start, end)?;
        log::info!(
            "Downloading clip from {} to {} ({} seconds)",
            start,
            end,
            range.duration_seconds()
        );

        self.run(&clip_args(url, &range, title), Some(dir)).await?;
        log::info!("Download complete");
        Ok(())
    }

    /// English captions of a video, manual ones preferred over automatic.
    pub async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptSegment>, AppError> {
        let scratch = std::env::temp_dir().join(format!("podsnips-subs-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&scratch).await?;

        let result = self.fetch_transcript_into(video_id, &scratch).await;
        if let Err(e) = tokio::fs::remove_dir_all(&scratch).await {
            log::warn!("Could not remove {}: {}", scratch.display(), e);
        }
        result
    }

    async fn fetch_transcript_into(
        &self,
        video_id: &str,
        scratch: &Path,
    ) -> Result<Vec<TranscriptSegment>, AppError> {
        let args = vec![
            "--skip-download".to_string(),
            "--write-subs".to_string(),
            "--write-auto-subs".to_string(),
            "--sub-langs".to_string(),
            "en.*".to_string(),
            "--sub-format".to_string(),
            "json3".to_string(),
            "--output".to_string(),
            "%(id)s.%(ext)s".to_string(),
            "--quiet".to_string(),
            "--no-warnings".to_string(),
            watch_url(video_id),
        ];
        self.run(&args, Some(scratch)).await?;

        let mut tracks = Vec::new();
        let mut entries = tokio::fs::read_dir(scratch).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json3") {
                tracks.push(path);
            }
        }
        // "<id>.en.json3" sorts before "<id>.en-orig.json3" and auto tracks.
        tracks.sort();

        let track = tracks.first().ok_or_else(|| {
            AppError::NotFound(format!("No English transcript available for video {}", video_id))
        })?;
        let raw = tokio::fs::read_to_string(track).await?;
        parse_json3(&raw)
    }
}
