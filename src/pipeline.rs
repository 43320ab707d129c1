// src/pipeline.rs
//! The clip pipeline: download a section of a video, then upload it to Canva.
//!
//! Stages run strictly one after another. A clip that reached Canva is
//! removed locally; a failed upload keeps the file so it can be uploaded by
//! hand.

use crate::canva::{
    check_tokens, upload_video, CanvaApi, CanvaHttpClient, TokenFile, UploadOutcome,
    UploadSettings,
};
use crate::config::Settings;
use crate::error::AppError;
use crate::types::{ClipRange, ValidationError};
use crate::youtube::{extract_video_id, watch_url, YtDlp};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// Downloads a time range of a video into a directory.
#[async_trait::async_trait]
pub trait ClipSource: Send + Sync {
    async fn download_clip(
        &self,
        url: &str,
        start: &str,
        end: &str,
        title: Option<&str>,
        dir: &Path,
    ) -> Result<(), AppError>;
}

#[async_trait::async_trait]
impl ClipSource for YtDlp {
    async fn download_clip(
        &self,
        url: &str,
        start: &str,
        end: &str,
        title: Option<&str>,
        dir: &Path,
    ) -> Result<(), AppError> {
        YtDlp::download_clip(self, url, start, end, title, dir).await
    }
}

/// A validated `POST /create` body.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRequest {
    pub title: String,
    pub video_id: String,
    pub start: String,
    pub end: String,
}

impl ClipRequest {
    /// All four fields are required; the video id may also be a YouTube URL.
    pub fn new(
        title: Option<String>,
        video_id: Option<String>,
        start: Option<String>,
        end: Option<String>,
    ) -> Result<Self, ValidationError> {
        fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ValidationError::MissingField(field))
        }

        let title = required(title, "title")?;
        let raw_video = required(video_id, "video_id")?;
        let start = required(start, "start")?;
        let end = required(end, "end")?;

        let video_id =
            extract_video_id(&raw_video).ok_or(ValidationError::InvalidVideoId(raw_video))?;
        ClipRange::parse(&start, &end)?;

        Ok(Self {
            title,
            video_id,
            start,
            end,
        })
    }

    /// The title as a file name: path separators are replaced.
    pub fn file_stem(&self) -> String {
        self.title.replace(['/', '\\'], "_")
    }
}

/// Result of a pipeline run that got as far as a local file.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipOutcome {
    pub file_path: PathBuf,
    pub upload: UploadOutcome,
}

pub struct ClipPipeline {
    source: Arc<dyn ClipSource>,
    canva: Arc<dyn CanvaApi>,
    token_file: TokenFile,
    content_dir: PathBuf,
    upload: UploadSettings,
}

impl ClipPipeline {
    pub fn new(
        source: Arc<dyn ClipSource>,
        canva: Arc<dyn CanvaApi>,
        token_file: TokenFile,
        content_dir: PathBuf,
        upload: UploadSettings,
    ) -> Self {
        Self {
            source,
            canva,
            token_file,
            content_dir,
            upload,
        }
    }

    /// yt-dlp and the Canva REST API, as configured by the environment.
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        Ok(Self::new(
            Arc::new(YtDlp::new()),
            Arc::new(CanvaHttpClient::new()?),
            TokenFile::new(settings.token_file.clone()),
            settings.content_dir.clone(),
            UploadSettings {
                folder_id: settings.canva_folder_id.clone(),
                ..UploadSettings::default()
            },
        ))
    }

    /// Confirms the stored Canva token is accepted; returns the Canva user id.
    pub async fn check_tokens(&self) -> Result<String, AppError> {
        check_tokens(self.canva.as_ref(), &self.token_file).await
    }

    /// Downloads the clip and returns the newest mp4 in the content directory.
    pub async fn download(
        &self,
        url: &str,
        start: &str,
        end: &str,
        title: Option<&str>,
    ) -> Result<PathBuf, AppError> {
        tokio::fs::create_dir_all(&self.content_dir).await?;
        self.source
            .download_clip(url, start, end, title, &self.content_dir)
            .await?;
        newest_video(&self.content_dir).await
    }

    /// Uploads `path` with the stored Canva token.
    ///
    /// The local file is deleted once Canva reports success. Failing to
    /// delete it is only logged.
    pub async fn upload(&self, path: &Path) -> Result<UploadOutcome, AppError> {
        let token = self.token_file.access_token()?;
        let outcome = upload_video(self.canva.as_ref(), &token, path, &self.upload).await;
        if matches!(outcome, UploadOutcome::Success { .. }) {
            match tokio::fs::remove_file(path).await {
                Ok(()) => log::info!("Removed uploaded clip {}", path.display()),
                Err(e) => log::warn!("Could not remove {}: {}", path.display(), e),
            }
        }
        Ok(outcome)
    }

    /// Checks the Canva token, downloads the clip and uploads it.
    pub async fn create_clip(&self, request: &ClipRequest) -> Result<ClipOutcome, AppError> {
        self.check_tokens().await?;

        let url = watch_url(&request.video_id);
        log::info!(
            "Creating clip {:?} from {} ({} - {})",
            request.title,
            url,
            request.start,
            request.end
        );
        let file_path = self
            .download(&url, &request.start, &request.end, Some(&request.file_stem()))
            .await?;
        let upload = self.upload(&file_path).await?;

        Ok(ClipOutcome { file_path, upload })
    }
}

/// The most recently modified `.mp4` directly inside `dir`.
pub async fn newest_video(dir: &Path) -> Result<PathBuf, AppError> {
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_mp4 = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"));
        if !is_mp4 {
            continue;
        }
        let modified = entry.metadata().await?.modified()?;
        match &newest {
            Some((time, _)) if modified < *time => {}
            _ => newest = Some((modified, path)),
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| AppError::NotFound(format!("No video found in {}", dir.display())))
}
