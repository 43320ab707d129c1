// src/canva/mod.rs
//! Canva Connect: authorization, token storage and video uploads.

pub mod auth;
pub mod client;
pub mod tokens;
pub mod upload;

pub use auth::{check_tokens, OAuthSession, PkcePair};
pub use client::{CanvaApi, CanvaHttpClient, ClientCredentials, UploadJob, UploadStatus};
pub use tokens::{TokenFile, TokenSet};
pub use upload::{upload_video, UploadOutcome, UploadSettings};
