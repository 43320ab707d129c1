// src/lib.rs
//! podsnips library: turns Snipd podcast highlights kept in Notion into
//! clipped, uploaded and published short-form videos.
//!
//! # Public API
//!
//! - **Error handling**: `AppError`, `ErrorKind`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `Settings`
//! - **Domain model**: `Project`, `Snip`, `TaskBatch`, `Block`, `Page`
//! - **Notion access**: `NotionRepository`, `NotionHttpClient`, `InMemoryNotion`
//! - **Workflows**: `ProjectService`, `ClipPipeline`, `run_export`, Shorts publishing
//! - **HTTP**: `run_api_server`, `run_auth_server`

pub mod canva;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod model;
pub mod notion;
pub mod pipeline;
pub mod publish;
pub mod server;
pub mod service;
pub mod snips;
pub mod types;
pub mod youtube;

// --- Error Handling ---
pub use crate::error::{AppError, ErrorKind, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{Command, CommandLineInput, Settings};

// --- Domain Model ---
pub use crate::model::{Block, BlockKind, Page, Project, PropertyValue, Snip, SnipExport, TaskBatch};

// --- Domain Types ---
pub use crate::types::{AccessToken, ApiKey, ClipRange, ClipTimestamp, NotionId, RichTextItem};

// --- Notion ---
pub use crate::notion::{InMemoryNotion, NotionHttpClient, NotionRepository};

// --- Workflows ---
pub use crate::export::{run_export, ExportReport};
pub use crate::pipeline::{ClipOutcome, ClipPipeline, ClipRequest, ClipSource};
pub use crate::publish::{ShortsBundle, YouTubeUploader};
pub use crate::service::ProjectService;

// --- HTTP ---
pub use crate::server::{run_api_server, run_auth_server};
