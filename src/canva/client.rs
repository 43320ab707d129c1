// src/canva/client.rs
//! Canva Connect REST client.

use crate::constants::{CANVA_API_BASE_URL, ERROR_BODY_PREVIEW_LENGTH};
use crate::error::AppError;
use crate::types::AccessToken;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::{header, Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

const SERVICE: &str = "Canva";

/// Processing state of an asset upload job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    InProgress,
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadJob {
    pub id: String,
    pub status: UploadStatus,
    #[serde(default)]
    pub asset: Option<Asset>,
    #[serde(default)]
    pub error: Option<JobError>,
}

#[derive(Debug, Deserialize)]
struct UploadJobEnvelope {
    job: UploadJob,
}

/// The signed-in Canva user (`GET users/me`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CanvaUser {
    #[serde(default)]
    pub team_user: Option<TeamUser>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TeamUser {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
}

/// Response of the OAuth token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Confidential client credentials used to redeem authorization codes.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// The Canva operations used by the upload workflow and the auth flow.
#[async_trait::async_trait]
pub trait CanvaApi: Send + Sync {
    /// Starts an upload job for `bytes` named `file_name`.
    async fn create_asset_upload(
        &self,
        token: &AccessToken,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadJob, AppError>;

    async fn get_asset_upload(&self, token: &AccessToken, job_id: &str) -> Result<UploadJob, AppError>;

    async fn move_to_folder(
        &self,
        token: &AccessToken,
        item_id: &str,
        folder_id: &str,
    ) -> Result<(), AppError>;

    async fn current_user(&self, token: &AccessToken) -> Result<CanvaUser, AppError>;

    async fn exchange_code(
        &self,
        credentials: &ClientCredentials,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, AppError>;
}

/// `Asset-Upload-Metadata` header value for a file name.
pub fn upload_metadata_header(file_name: &str) -> String {
    json!({ "name_base64": STANDARD.encode(file_name.as_bytes()) }).to_string()
}

#[derive(Clone)]
pub struct CanvaHttpClient {
    client: Client,
    base_url: String,
}

impl CanvaHttpClient {
    pub fn new() -> Result<Self, AppError> {
        Self::with_base_url(CANVA_API_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }
}

/// Maps a response whose status is not in `accepted` to
/// [`AppError::ServiceError`] for `service`.
pub(crate) async fn ensure_success(
    service: &'static str,
    response: Response,
    accepted: &[u16],
) -> Result<Response, AppError> {
    let status = response.status().as_u16();
    if accepted.contains(&status) {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
    Err(AppError::ServiceError {
        service,
        status,
        message,
    })
}

#[async_trait::async_trait]
impl CanvaApi for CanvaHttpClient {
    async fn create_asset_upload(
        &self,
        token: &AccessToken,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadJob, AppError> {
        let url = self.url("asset-uploads");
        log::debug!("POST {} ({} bytes)", url, bytes.len());
        let response = self
            .client
            .post(url)
            .bearer_auth(token.as_str())
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header("Asset-Upload-Metadata", upload_metadata_header(file_name))
            .body(bytes)
            .send()
            .await?;
        let envelope: UploadJobEnvelope = ensure_success(SERVICE, response, &[200])
            .await?
            .json()
            .await?;
        Ok(envelope.job)
    }

    async fn get_asset_upload(&self, token: &AccessToken, job_id: &str) -> Result<UploadJob, AppError> {
        let url = self.url(&format!("asset-uploads/{}", job_id));
        log::debug!("GET {}", url);
        let response = self.client.get(url).bearer_auth(token.as_str()).send().await?;
        let envelope: UploadJobEnvelope = ensure_success(SERVICE, response, &[200])
            .await?
            .json()
            .await?;
        Ok(envelope.job)
    }

    async fn move_to_folder(
        &self,
        token: &AccessToken,
        item_id: &str,
        folder_id: &str,
    ) -> Result<(), AppError> {
        let url = self.url("folders/move");
        log::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .bearer_auth(token.as_str())
            .json(&json!({ "item_id": item_id, "to_folder_id": folder_id }))
            .send()
            .await?;
        ensure_success(SERVICE, response, &[200, 204]).await?;
        Ok(())
    }

    async fn current_user(&self, token: &AccessToken) -> Result<CanvaUser, AppError> {
        let url = self.url("users/me");
        let response = self
            .client
            .get(url)
            .bearer_auth(token.as_str())
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await?;
        Ok(ensure_success(SERVICE, response, &[200]).await?.json().await?)
    }

    async fn exchange_code(
        &self,
        credentials: &ClientCredentials,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, AppError> {
        let url = self.url("oauth/token");
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "authorization_code")
            .append_pair("code_verifier", code_verifier)
            .append_pair("code", code)
            .append_pair("redirect_uri", &credentials.redirect_uri)
            .finish();
        let response = self
            .client
            .post(url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await?;
        Ok(ensure_success(SERVICE, response, &[200]).await?.json().await?)
    }
}
