// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// Notion API version sent with every request. Data sources need 2025-09-03.
pub const NOTION_VERSION: &str = "2025-09-03";

pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Notion rejects rich text content longer than this.
pub const NOTION_RICH_TEXT_LIMIT: usize = 2000;

// ---------------------------------------------------------------------------
// Snipd page conventions
// ---------------------------------------------------------------------------

/// Paragraphs containing this text are the "play snip" deep link, not summary.
pub const PLAY_SNIP_MARKER: &str = "🎧 Play snip";

/// Toggle under a snip heading that holds the snip's transcript.
pub const TRANSCRIPT_MARKER: &str = "📚 Transcript";

/// Status of source pages that still need to be processed.
pub const PENDING_STATUS: &str = "Not started";

pub const STATUS_DONE: &str = "Done";
pub const STATUS_IN_PROGRESS: &str = "In progress";

/// Status given to every entry created in the curated database.
pub const STATUS_TO_REVIEW: &str = "To Review";

// ---------------------------------------------------------------------------
// Task listing
// ---------------------------------------------------------------------------

pub const DEFAULT_TASK_PAGE: usize = 1;
pub const DEFAULT_TASK_PAGE_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Canva
// ---------------------------------------------------------------------------

pub const CANVA_API_BASE_URL: &str = "https://api.canva.com/rest/v1";
pub const CANVA_AUTHORIZE_URL: &str = "https://www.canva.com/api/oauth/authorize";

/// Scopes requested during authorisation.
pub const CANVA_SCOPES: &str =
    "asset:read asset:write design:content:read design:content:write design:meta:read folder:write";

/// Wait before each upload status poll.
pub const UPLOAD_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Poll attempts before an upload is declared timed out (5 minutes).
pub const UPLOAD_MAX_POLL_ATTEMPTS: u32 = 60;

// ---------------------------------------------------------------------------
// YouTube
// ---------------------------------------------------------------------------

/// How many search results yt-dlp is asked for; the first one wins.
pub const VIDEO_SEARCH_RESULTS: usize = 3;

/// Format selector for clip downloads: best stream up to 1080p.
pub const CLIP_FORMAT: &str = "bestvideo[height<=1080]+bestaudio/best[height<=1080]/best";

pub const YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com";

/// "People & Blogs", the category uploaded Shorts are filed under.
pub const SHORTS_CATEGORY_ID: &str = "22";

/// Largest upload accepted for unverified YouTube accounts.
pub const SHORTS_MAX_BYTES: u64 = 128 * 1024 * 1024 * 1024;

pub const SHORTS_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "wmv", "flv", "webm", "mkv"];

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;
