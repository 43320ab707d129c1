// src/publish/youtube_shorts.rs
//! YouTube Data API uploads using the resumable protocol.

use super::{validate_thumbnail, validate_video, video_mime_type, ShortsBundle};
use crate::canva::client::ensure_success;
use crate::constants::{SHORTS_CATEGORY_ID, YOUTUBE_API_BASE_URL};
use crate::error::AppError;
use crate::types::AccessToken;
use reqwest::{header, Body, Client};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

const SERVICE: &str = "YouTube";

/// A Short that was accepted by YouTube.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedShort {
    pub video_id: String,
    pub thumbnail_set: bool,
}

impl PublishedShort {
    pub fn watch_url(&self) -> String {
        crate::youtube::watch_url(&self.video_id)
    }

    pub fn shorts_url(&self) -> String {
        format!("https://www.youtube.com/shorts/{}", self.video_id)
    }
}

#[derive(Debug, Deserialize)]
struct VideoResource {
    id: String,
}

/// `snippet` and `status` parts of a public upload.
pub fn shorts_metadata(title: &str, description: &str) -> Value {
    json!({
        "snippet": {
            "title": title,
            "description": description,
            "categoryId": SHORTS_CATEGORY_ID,
        },
        "status": {
            "privacyStatus": "public",
            "selfDeclaredMadeForKids": false,
        },
    })
}

#[derive(Clone)]
pub struct YouTubeUploader {
    client: Client,
    base_url: String,
}

impl YouTubeUploader {
    pub fn new() -> Result<Self, AppError> {
        Self::with_base_url(YOUTUBE_API_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Opens an upload session and returns its `Location`.
    async fn start_session(
        &self,
        token: &AccessToken,
        metadata: &Value,
        mime_type: &str,
        content_length: u64,
    ) -> Result<String, AppError> {
        let url = format!("{}/upload/youtube/v3/videos", self.base_url);
        log::debug!("POST {} (resumable, {} bytes)", url, content_length);
        let response = self
            .client
            .post(url)
            .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
            .bearer_auth(token.as_str())
            .header("X-Upload-Content-Type", mime_type)
            .header("X-Upload-Content-Length", content_length.to_string())
            .json(metadata)
            .send()
            .await?;
        let response = ensure_success(SERVICE, response, &[200]).await?;

        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::MalformedResponse("upload session has no Location header".to_string())
            })
    }

    /// Streams the file to an open session in one request.
    async fn send_video(
        &self,
        token: &AccessToken,
        session: &str,
        mime_type: &str,
        path: &Path,
        size: u64,
    ) -> Result<String, AppError> {
        log::debug!("PUT {} ({} bytes)", session, size);
        let file = tokio::fs::File::open(path).await?;
        let response = self
            .client
            .put(session)
            .bearer_auth(token.as_str())
            .header(header::CONTENT_TYPE, mime_type)
            .header(header::CONTENT_LENGTH, size)
            .body(Body::from(file))
            .send()
            .await?;
        let video: VideoResource = ensure_success(SERVICE, response, &[200, 201])
            .await?
            .json()
            .await?;
        Ok(video.id)
    }

    /// Uploads a video with the given metadata; returns the new video id.
    pub async fn upload_video(
        &self,
        token: &AccessToken,
        path: &Path,
        metadata: &Value,
    ) -> Result<String, AppError> {
        let size = validate_video(path).await?;
        let mime_type = video_mime_type(path);
        let session = self.start_session(token, metadata, mime_type, size).await?;
        self.send_video(token, &session, mime_type, path, size).await
    }

    pub async fn set_thumbnail(
        &self,
        token: &AccessToken,
        video_id: &str,
        path: &Path,
    ) -> Result<(), AppError> {
        let mime_type = validate_thumbnail(path).await?;
        let bytes = tokio::fs::read(path).await?;
        let url = format!("{}/upload/youtube/v3/thumbnails/set", self.base_url);
        log::debug!("POST {} for {}", url, video_id);
        let response = self
            .client
            .post(url)
            .query(&[("videoId", video_id)])
            .bearer_auth(token.as_str())
            .header(header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await?;
        ensure_success(SERVICE, response, &[200]).await?;
        Ok(())
    }

    /// Uploads the bundle as a public Short. A rejected thumbnail is logged
    /// and leaves the video published.
    pub async fn publish_short(
        &self,
        token: &AccessToken,
        bundle: &ShortsBundle,
        title: &str,
    ) -> Result<PublishedShort, AppError> {
        log::info!("Uploading {} as {:?}", bundle.video.display(), title);
        let metadata = shorts_metadata(title, &bundle.description);
        let video_id = self.upload_video(token, &bundle.video, &metadata).await?;
        log::info!("Uploaded video {}", video_id);

        let thumbnail_set = match &bundle.thumbnail {
            Some(thumbnail) => match self.set_thumbnail(token, &video_id, thumbnail).await {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Thumbnail upload failed: {}", e);
                    false
                }
            },
            None => false,
        };

        Ok(PublishedShort {
            video_id,
            thumbnail_set,
        })
    }
}
