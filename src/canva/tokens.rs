// src/canva/tokens.rs
//! The flat token file written by `podsnips auth`.
//!
//! One `KEY=VALUE` pair per line:
//!
//! ```text
//! ACCESS_TOKEN=...
//! REFRESH_TOKEN=...
//! ```
//!
//! The file is re-read on every call so a fresh `auth` run takes effect
//! without restarting the server.

use crate::error::AppError;
use crate::types::AccessToken;
use std::path::{Path, PathBuf};

const ACCESS_TOKEN_KEY: &str = "ACCESS_TOKEN";
const REFRESH_TOKEN_KEY: &str = "REFRESH_TOKEN";

#[derive(Debug, Clone)]
pub struct TokenSet {
    pub access_token: AccessToken,
    pub refresh_token: Option<String>,
}

impl TokenSet {
    fn parse(contents: &str) -> Option<Self> {
        let mut access_token = None;
        let mut refresh_token = None;

        for line in contents.lines() {
            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                ACCESS_TOKEN_KEY => access_token = AccessToken::new(value).ok(),
                REFRESH_TOKEN_KEY if !value.is_empty() && value != "None" => {
                    refresh_token = Some(value.to_string())
                }
                _ => {}
            }
        }

        Some(Self {
            access_token: access_token?,
            refresh_token,
        })
    }

    fn render(&self) -> String {
        let mut out = format!("{}={}\n", ACCESS_TOKEN_KEY, self.access_token.as_str());
        if let Some(refresh) = &self.refresh_token {
            out.push_str(&format!("{}={}\n", REFRESH_TOKEN_KEY, refresh));
        }
        out
    }
}

/// Location of the token file.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the tokens from disk. A missing file or a file without an
    /// access token is an authentication error.
    pub fn load(&self) -> Result<TokenSet, AppError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            AppError::Authentication(format!(
                "No Canva token file at {} ({}). Run `podsnips auth` first",
                self.path.display(),
                e
            ))
        })?;

        TokenSet::parse(&contents).ok_or_else(|| {
            AppError::Authentication(format!(
                "No access token found in {}",
                self.path.display()
            ))
        })
    }

    pub fn access_token(&self) -> Result<AccessToken, AppError> {
        self.load().map(|tokens| tokens.access_token)
    }

    pub fn save(&self, tokens: &TokenSet) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, tokens.render())?;
        log::info!("Tokens saved to {}", self.path.display());
        Ok(())
    }
}
