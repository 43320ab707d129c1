// src/config.rs
use crate::canva::ClientCredentials;
use crate::types::{AccessToken, ApiKey, NotionId};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Directory downloaded clips are written to (defaults to ./content)
    #[arg(short = 'd', long, global = true)]
    pub content_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Serve the JSON API used by the web frontend
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 5000)]
        port: u16,
    },
    /// Run the local Canva authorization server and store the tokens
    Auth {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Download a section of a YouTube video
    Clip {
        /// YouTube URL or video id
        url: String,
        /// Start time (MM:SS or HH:MM:SS)
        start: String,
        /// End time (MM:SS or HH:MM:SS)
        end: String,
        /// Output file name without extension (defaults to the video title)
        title: Option<String>,
        /// Upload the clip to Canva once downloaded
        #[arg(long, default_value_t = false)]
        upload: bool,
    },
    /// Copy the snips of every pending project into the curated database
    Export,
    /// Publish `<prefix>.mp4` as a YouTube Short
    Publish {
        /// File prefix: `<prefix>.mp4`, optional `<prefix>.txt` and `<prefix>.png`
        prefix: String,
        /// Title of the Short
        #[arg(long)]
        title: String,
    },
}

/// Everything read from the environment. Absent or invalid values are
/// `None`; the operations that need them report the gap when called.
#[derive(Debug, Clone)]
pub struct Settings {
    pub notion_api_key: Option<ApiKey>,
    pub source_database_id: Option<NotionId>,
    pub target_database_id: Option<NotionId>,
    pub canva_credentials: Option<ClientCredentials>,
    pub canva_folder_id: Option<String>,
    pub token_file: PathBuf,
    pub content_dir: PathBuf,
    pub youtube_access_token: Option<AccessToken>,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env(content_dir: Option<String>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), content_dir)
    }

    /// Reads settings through `lookup`, so tests need not touch the real
    /// environment.
    pub fn from_lookup<F>(lookup: F, content_dir: Option<String>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let notion_api_key = var("NOTION_API_KEY").and_then(|key| {
            ApiKey::new(key)
                .map_err(|e| log::warn!("Ignoring NOTION_API_KEY: {}", e))
                .ok()
        });
        let database = |key: &str| {
            var(key).and_then(|raw| {
                NotionId::parse(&raw)
                    .map_err(|e| log::warn!("Ignoring {}: {}", key, e))
                    .ok()
            })
        };

        let canva_credentials = match (
            var("CANVA_CLIENT_ID"),
            var("CANVA_CLIENT_SECRET"),
            var("CANVA_REDIRECT_URI"),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_uri)) => Some(ClientCredentials {
                client_id,
                client_secret,
                redirect_uri,
            }),
            _ => None,
        };

        let content_dir = content_dir
            .or_else(|| var("PODSNIPS_CONTENT_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("content"));

        Self {
            notion_api_key,
            source_database_id: database("SOURCE_DATABASE_ID"),
            target_database_id: database("TARGET_DATABASE_ID"),
            canva_credentials,
            canva_folder_id: var("CANVA_FOLDER_ID"),
            token_file: var("CANVA_TOKENS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".tokens")),
            content_dir,
            youtube_access_token: var("YOUTUBE_ACCESS_TOKEN").and_then(|t| AccessToken::new(t).ok()),
        }
    }
}
