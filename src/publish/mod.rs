// src/publish/mod.rs
//! Republishing finished clips as YouTube Shorts.
//!
//! A Short is described by files sharing a prefix: `<prefix>.mp4` is the
//! video, `<prefix>.txt` an optional description and `<prefix>.png` an
//! optional thumbnail.

mod youtube_shorts;

pub use youtube_shorts::{shorts_metadata, PublishedShort, YouTubeUploader};

use crate::constants::{SHORTS_MAX_BYTES, SHORTS_VIDEO_EXTENSIONS};
use crate::error::AppError;
use crate::types::ValidationError;
use std::path::{Path, PathBuf};

/// Largest custom thumbnail YouTube accepts.
pub const THUMBNAIL_MAX_BYTES: u64 = 2 * 1024 * 1024;

const THUMBNAIL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// The files making up one Short.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortsBundle {
    pub video: PathBuf,
    pub description: String,
    pub thumbnail: Option<PathBuf>,
}

fn with_suffix(prefix: &str, extension: &str) -> PathBuf {
    PathBuf::from(format!("{}.{}", prefix, extension))
}

fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

fn invalid(path: &Path, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidVideoFile {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

impl ShortsBundle {
    /// Collects the bundle for `prefix`. Only the video is required.
    pub async fn from_prefix(prefix: &str) -> Result<Self, AppError> {
        let video = with_suffix(prefix, "mp4");
        if !tokio::fs::try_exists(&video).await? {
            return Err(invalid(&video, "file not found").into());
        }

        let description_path = with_suffix(prefix, "txt");
        let description = if tokio::fs::try_exists(&description_path).await? {
            tokio::fs::read_to_string(&description_path)
                .await?
                .trim()
                .to_string()
        } else {
            String::new()
        };

        let thumbnail_path = with_suffix(prefix, "png");
        let thumbnail = tokio::fs::try_exists(&thumbnail_path)
            .await?
            .then_some(thumbnail_path);

        Ok(Self {
            video,
            description,
            thumbnail,
        })
    }
}

/// Checks format and size of a video before upload; returns its size.
pub async fn validate_video(path: &Path) -> Result<u64, AppError> {
    let extension = lowercase_extension(path);
    if !SHORTS_VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        return Err(invalid(
            path,
            format!(
                "unsupported format .{}; use one of {}",
                extension,
                SHORTS_VIDEO_EXTENSIONS.join(", ")
            ),
        )
        .into());
    }

    let size = tokio::fs::metadata(path).await?.len();
    if size > SHORTS_MAX_BYTES {
        return Err(invalid(path, format!("{} bytes exceeds the 128 GB limit", size)).into());
    }
    log::info!("Video {} passed validation ({} bytes)", path.display(), size);
    Ok(size)
}

/// Checks a thumbnail image; returns its MIME type.
pub async fn validate_thumbnail(path: &Path) -> Result<&'static str, AppError> {
    let mime = match lowercase_extension(path).as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        other => {
            return Err(invalid(
                path,
                format!(
                    "unsupported thumbnail format .{}; use one of {}",
                    other,
                    THUMBNAIL_EXTENSIONS.join(", ")
                ),
            )
            .into())
        }
    };

    let size = tokio::fs::metadata(path).await?.len();
    if size > THUMBNAIL_MAX_BYTES {
        return Err(invalid(path, format!("thumbnail is {} bytes, max 2 MB", size)).into());
    }
    Ok(mime)
}

/// MIME type announced for a video upload.
pub fn video_mime_type(path: &Path) -> &'static str {
    match lowercase_extension(path).as_str() {
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        _ => "application/octet-stream",
    }
}
