// src/service.rs
//! Read-side entry points used by the HTTP API.

use crate::config::Settings;
use crate::constants::PENDING_STATUS;
use crate::error::{AppError, ErrorKind};
use crate::model::{Page, Project, TaskBatch};
use crate::notion::{DataSourceQuery, NotionHttpClient, NotionRepository};
use crate::snips::{page_content, paginate_tasks, project_from_page, toggle_headings};
use crate::types::{NotionId, ValidationError};
use crate::youtube::{TranscriptSegment, YtDlp};
use serde::Serialize;
use std::sync::Arc;

/// Captions of the video matching a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTranscript {
    pub video_id: String,
    pub transcript: Vec<TranscriptSegment>,
}

/// Projects and their snips, read from the source database.
///
/// Every call goes back to Notion; nothing is cached between calls.
#[derive(Clone)]
pub struct ProjectService {
    notion: Option<Arc<dyn NotionRepository>>,
    source_database: Option<NotionId>,
    ytdlp: YtDlp,
}

impl ProjectService {
    pub fn new(
        notion: Option<Arc<dyn NotionRepository>>,
        source_database: Option<NotionId>,
        ytdlp: YtDlp,
    ) -> Self {
        Self {
            notion,
            source_database,
            ytdlp,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let notion: Option<Arc<dyn NotionRepository>> = match &settings.notion_api_key {
            Some(key) => Some(Arc::new(NotionHttpClient::new(key)?)),
            None => None,
        };
        Ok(Self::new(notion, settings.source_database_id.clone(), YtDlp::new()))
    }

    fn notion(&self) -> Result<&dyn NotionRepository, AppError> {
        self.notion
            .as_deref()
            .ok_or_else(|| AppError::MissingConfiguration("NOTION_API_KEY not set".to_string()))
    }

    /// The Notion client and source database, or `None` with the gap logged.
    fn source(&self) -> Option<(&dyn NotionRepository, &NotionId)> {
        match (self.notion.as_deref(), self.source_database.as_ref()) {
            (Some(notion), Some(database)) => Some((notion, database)),
            _ => {
                log::error!("NOTION_API_KEY or SOURCE_DATABASE_ID not set");
                None
            }
        }
    }

    /// Source pages still waiting to be processed, oldest first.
    pub async fn pending_pages(&self) -> Result<Vec<Page>, AppError> {
        let Some((notion, database)) = self.source() else {
            return Ok(Vec::new());
        };
        let data_source = notion.primary_data_source(database).await?;
        notion
            .query_all(&data_source, &DataSourceQuery::with_status(PENDING_STATUS))
            .await
    }

    /// Projects whose status is "Not started".
    ///
    /// Missing configuration and upstream failures give an empty list;
    /// rejected credentials are reported.
    pub async fn list_pending_projects(&self) -> Result<Vec<Project>, AppError> {
        match self.pending_pages().await {
            Ok(pages) => Ok(pages.iter().map(project_from_page).collect()),
            Err(e) if e.kind() == ErrorKind::Authentication => Err(e),
            Err(e) => {
                log::error!("Error querying pending projects: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub async fn project_details(&self, id: &NotionId) -> Result<Project, AppError> {
        let page = self.notion()?.retrieve_page(id).await?;
        Ok(project_from_page(&page))
    }

    /// One page of a project's snips. `page` is 1-indexed.
    pub async fn project_tasks(
        &self,
        id: &NotionId,
        page: usize,
        page_size: usize,
    ) -> Result<TaskBatch, AppError> {
        if page == 0 {
            return Err(ValidationError::NotPositive { field: "page", value: 0 }.into());
        }
        if page_size == 0 {
            return Err(ValidationError::NotPositive {
                field: "page_size",
                value: 0,
            }
            .into());
        }

        let Some((notion, _)) = self.source() else {
            return Ok(TaskBatch::empty(page, page_size));
        };

        let headings = toggle_headings(page_content(notion, id).await);
        log::info!("Project {} has {} snips", id, headings.len());
        Ok(paginate_tasks(notion, &headings, page, page_size).await)
    }

    /// Finds the project's episode on YouTube and fetches its captions.
    pub async fn project_transcript(&self, id: &NotionId) -> Result<ProjectTranscript, AppError> {
        let project = self.project_details(id).await?;
        let query = format!("{} {}", project.podcast_show, project.episode);
        log::info!("Searching YouTube for {:?}", query.trim());

        let hit = self.ytdlp.search_video(query.trim()).await?;
        let transcript = self.ytdlp.fetch_transcript(&hit.video_id).await?;
        Ok(ProjectTranscript {
            video_id: hit.video_id,
            transcript,
        })
    }
}
