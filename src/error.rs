// src/error.rs
//! Application error types.
//!
//! Every failure the service can report is an [`AppError`]. The HTTP layer
//! does not look at variants directly; it asks [`AppError::kind`] which of
//! the four response classes a failure belongs to.

use std::fmt;
use thiserror::Error;

/// The `code` field of a Notion error body.
///
/// Only `Unauthorized` changes how podsnips answers (401); the rest are
/// carried through for logs and error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    RateLimited,
    /// Missing, or not shared with the integration.
    ObjectNotFound,
    Unauthorized,
    RestrictedResource,
    InvalidJson,
    ValidationFailed,
    Conflict,
    InternalError,
    ServiceUnavailable,
    /// No readable body; only the status survived.
    HttpStatus(u16),
    Unknown(String),
}

const NOTION_CODES: &[(&str, NotionErrorCode)] = &[
    ("rate_limited", NotionErrorCode::RateLimited),
    ("object_not_found", NotionErrorCode::ObjectNotFound),
    ("unauthorized", NotionErrorCode::Unauthorized),
    ("restricted_resource", NotionErrorCode::RestrictedResource),
    ("invalid_json", NotionErrorCode::InvalidJson),
    ("validation_error", NotionErrorCode::ValidationFailed),
    ("conflict_error", NotionErrorCode::Conflict),
    ("internal_server_error", NotionErrorCode::InternalError),
    ("service_unavailable", NotionErrorCode::ServiceUnavailable),
];

impl NotionErrorCode {
    pub fn from_api_response(code: &str) -> Self {
        NOTION_CODES
            .iter()
            .find(|(wire, _)| *wire == code)
            .map(|(_, parsed)| parsed.clone())
            .unwrap_or_else(|| Self::Unknown(code.to_string()))
    }

    /// Fallback for bodies that are not Notion JSON (proxies, gateways).
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            404 => Self::ObjectNotFound,
            429 => Self::RateLimited,
            other => Self::HttpStatus(other),
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => f.write_str(code),
            known => {
                let wire = NOTION_CODES
                    .iter()
                    .find(|(_, parsed)| parsed == known)
                    .map_or("unknown", |(wire, _)| wire);
                f.write_str(wire)
            }
        }
    }
}

/// Response class of a failure, as seen by HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input from the caller (400).
    Validation,
    /// Missing or rejected credentials; re-authenticate rather than retry (401).
    Authentication,
    /// A third-party API or tool failed (500).
    Upstream,
    /// Anything else (500).
    Internal,
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: u16,
    },

    #[error("{service} API returned HTTP {status}: {message}")]
    ServiceError {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{tool} failed: {message}")]
    ExternalTool { tool: &'static str, message: String },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AppError {
    /// Classifies this error for the response layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Authentication(_) => ErrorKind::Authentication,
            AppError::NotionService { code, .. } if code.is_auth_failure() => {
                ErrorKind::Authentication
            }
            AppError::ServiceError { status: 401, .. } => ErrorKind::Authentication,
            AppError::NetworkFailure(_)
            | AppError::NotionService { .. }
            | AppError::ServiceError { .. }
            | AppError::MalformedResponse(_)
            | AppError::ExternalTool { .. } => ErrorKind::Upstream,
            AppError::MissingConfiguration(_)
            | AppError::NotFound(_)
            | AppError::Io(_)
            | AppError::InternalError { .. } => ErrorKind::Internal,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}
