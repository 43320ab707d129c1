use thiserror::Error;

mod domain_types;
mod ids;
mod rich_text;

pub use domain_types::*;
pub use ids::*;
pub use rich_text::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },

    #[error("Invalid timestamp format: {0}. Use MM:SS or HH:MM:SS")]
    InvalidTimestamp(String),

    #[error("Start time must be before end time ({start} >= {end})")]
    InvalidClipRange { start: String, end: String },

    #[error("{field} must be a positive integer, got {value}")]
    NotPositive { field: &'static str, value: i64 },

    #[error("{field} must be an integer, got {value:?}")]
    NotAnInteger { field: &'static str, value: String },

    #[error("Invalid YouTube URL or video ID: {0}")]
    InvalidVideoId(String),

    #[error("Invalid video file: {path} - {reason}")]
    InvalidVideoFile { path: String, reason: String },
}
