// src/canva/upload.rs
//! Upload a local video to Canva and wait for it to become an asset.
//!
//! ```text
//! Uploading --(job accepted)--> Polling --success--> Success
//!     |                           |  \---failed----> Failed
//!     \--(request rejected)--> Failed  \--attempts--> TimedOut
//! ```
//!
//! Every poll is preceded by a fixed wait. Any status other than `success`
//! or `failed` consumes one attempt. A poll request that itself fails ends
//! the workflow.

use super::client::{CanvaApi, UploadStatus};
use crate::constants::{UPLOAD_MAX_POLL_ATTEMPTS, UPLOAD_POLL_INTERVAL};
use crate::types::AccessToken;
use std::path::Path;
use std::time::Duration;

/// Timing and destination of an upload.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub poll_interval: Duration,
    pub max_attempts: u32,
    /// Folder the finished asset is moved into, if any.
    pub folder_id: Option<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            poll_interval: UPLOAD_POLL_INTERVAL,
            max_attempts: UPLOAD_MAX_POLL_ATTEMPTS,
            folder_id: None,
        }
    }
}

/// Terminal state of an upload.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Success {
        asset_id: String,
        asset_name: String,
        /// Whether the asset reached the configured folder.
        moved: bool,
    },
    Failed {
        reason: String,
    },
    TimedOut {
        attempts: u32,
    },
}

impl UploadOutcome {
    pub fn asset_id(&self) -> Option<&str> {
        match self {
            UploadOutcome::Success { asset_id, .. } => Some(asset_id),
            _ => None,
        }
    }

    fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        log::error!("Upload failed: {}", reason);
        UploadOutcome::Failed { reason }
    }
}

/// Uploads `path` and polls until the job finishes or attempts run out.
pub async fn upload_video(
    api: &dyn CanvaApi,
    token: &AccessToken,
    path: &Path,
    settings: &UploadSettings,
) -> UploadOutcome {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => return UploadOutcome::failed(format!("cannot read {}: {}", path.display(), e)),
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video.mp4".to_string());

    log::info!(
        "Uploading {} ({:.2} MB) to Canva",
        path.display(),
        bytes.len() as f64 / (1024.0 * 1024.0)
    );

    let job = match api.create_asset_upload(token, &file_name, bytes).await {
        Ok(job) => job,
        Err(e) => return UploadOutcome::failed(format!("upload request rejected: {}", e)),
    };
    log::info!("Upload job {} started ({:?})", job.id, job.status);

    for attempt in 1..=settings.max_attempts {
        tokio::time::sleep(settings.poll_interval).await;

        let job = match api.get_asset_upload(token, &job.id).await {
            Ok(job) => job,
            Err(e) => return UploadOutcome::failed(format!("status check failed: {}", e)),
        };

        match job.status {
            UploadStatus::Success => {
                let Some(asset) = job.asset else {
                    return UploadOutcome::failed("job succeeded without an asset");
                };
                log::info!("Upload complete: asset {} ({})", asset.id, asset.name);
                let moved = match &settings.folder_id {
                    Some(folder) => move_asset(api, token, &asset.id, folder).await,
                    None => false,
                };
                return UploadOutcome::Success {
                    asset_id: asset.id,
                    asset_name: asset.name,
                    moved,
                };
            }
            UploadStatus::Failed => {
                let error = job.error.unwrap_or_default();
                let message = if error.message.is_empty() {
                    "Unknown error".to_string()
                } else {
                    error.message
                };
                let code = if error.code.is_empty() {
                    "unknown".to_string()
                } else {
                    error.code
                };
                return UploadOutcome::failed(format!("{} (code: {})", message, code));
            }
            UploadStatus::InProgress | UploadStatus::Unknown => {
                log::info!(
                    "Processing... ({}/{}) status {:?}",
                    attempt,
                    settings.max_attempts,
                    job.status
                );
            }
        }
    }

    log::error!("Upload timed out after {} polls", settings.max_attempts);
    UploadOutcome::TimedOut {
        attempts: settings.max_attempts,
    }
}

/// Best-effort move into `folder_id`; failures are logged and ignored.
async fn move_asset(api: &dyn CanvaApi, token: &AccessToken, asset_id: &str, folder_id: &str) -> bool {
    match api.move_to_folder(token, asset_id, folder_id).await {
        Ok(()) => {
            log::info!("Moved asset {} to folder {}", asset_id, folder_id);
            true
        }
        Err(e) => {
            log::warn!("Could not move asset {} to folder {}: {}", asset_id, folder_id, e);
            false
        }
    }
}
