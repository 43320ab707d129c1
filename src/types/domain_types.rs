// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API key for Notion API authentication
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API key with validation
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();

        if key.is_empty() {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key cannot be empty".to_string(),
            });
        }

        if !key.starts_with("secret_") && !key.starts_with("ntn_") {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key must start with 'secret_' or 'ntn_'".to_string(),
            });
        }

        if key.len() < 20 {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key is too short".to_string(),
            });
        }

        Ok(Self(key))
    }

    /// Get the API key as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact API key in display
        write!(f, "{}...", &self.0[..10])
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self)
    }
}

/// An OAuth bearer token (Canva Connect or the YouTube Data API).
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ValidationError::EmptyField("access token"));
        }
        Ok(Self(token.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: String = self.0.chars().take(6).collect();
        write!(f, "AccessToken({}...)", shown)
    }
}

/// A clip boundary given as `MM:SS` or `HH:MM:SS`, held as whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipTimestamp {
    seconds: u32,
}

impl ClipTimestamp {
    /// Converts `MM:SS` or `HH:MM:SS` to a timestamp. Each component must
    /// be a plain non-negative integer.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTimestamp(input.to_string());

        let parts = input
            .trim()
            .split(':')
            .map(|part| part.parse::<u64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        let seconds = match parts.as_slice() {
            [minutes, seconds] => minutes.saturating_mul(60).saturating_add(*seconds),
            [hours, minutes, seconds] => hours
                .saturating_mul(3600)
                .saturating_add(minutes.saturating_mul(60))
                .saturating_add(*seconds),
            _ => return Err(invalid()),
        };

        let seconds = u32::try_from(seconds).map_err(|_| invalid())?;
        Ok(Self { seconds })
    }

    pub fn as_seconds(&self) -> u32 {
        self.seconds
    }
}

impl fmt::Display for ClipTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.seconds / 3600;
        let minutes = (self.seconds % 3600) / 60;
        let secs = self.seconds % 60;
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, secs)
    }
}

/// An inclusive-exclusive clip range, validated so that `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRange {
    pub start: ClipTimestamp,
    pub end: ClipTimestamp,
}

impl ClipRange {
    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        let start = ClipTimestamp::parse(start)?;
        let end = ClipTimestamp::parse(end)?;
        if start >= end {
            return Err(ValidationError::InvalidClipRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn duration_seconds(&self) -> u32 {
        self.end.as_seconds() - self.start.as_seconds()
    }
}
