// src/notion/memory.rs
//! An in-memory workspace implementing [`NotionRepository`].
//!
//! Lets the snip walker, the project service and the export job run without
//! network access. Children are stored as pre-split result pages so cursor
//! handling can be exercised; the cursor is the index of the next page.

use super::types::{DataSourceQuery, PaginatedResponse};
use super::NotionRepository;
use crate::error::{AppError, NotionErrorCode};
use crate::model::{Block, DataSourceRef, Database, Page, PropertyValue};
use crate::types::NotionId;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryNotion {
    pages: HashMap<NotionId, Page>,
    databases: HashMap<NotionId, Database>,
    children: HashMap<NotionId, Vec<Vec<Block>>>,
    data_sources: HashMap<NotionId, Vec<Page>>,
    failing_children: HashMap<NotionId, usize>,
    rejected_marker: Option<String>,
    created: Mutex<Vec<serde_json::Value>>,
    status_updates: Mutex<Vec<(NotionId, String)>>,
}

fn not_found(what: &str, id: &NotionId) -> AppError {
    AppError::NotionService {
        code: NotionErrorCode::ObjectNotFound,
        message: format!("Could not find {} with ID: {}", what, id.to_hyphenated()),
        status: 404,
    }
}

fn page_status(page: &Page) -> Option<&str> {
    match page.properties.get("Status") {
        Some(PropertyValue::Status { status: Some(option) }) => Some(option.name.as_str()),
        _ => None,
    }
}

impl InMemoryNotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.insert(page.id.clone(), page);
        self
    }

    /// Children of `parent`, already split into API result pages.
    pub fn with_children(mut self, parent: NotionId, pages: Vec<Vec<Block>>) -> Self {
        self.children.insert(parent, pages);
        self
    }

    /// A database whose only data source holds `rows`.
    pub fn with_database(mut self, database: NotionId, data_source: NotionId, rows: Vec<Page>) -> Self {
        self.databases.insert(
            database.clone(),
            Database {
                id: database,
                data_sources: vec![DataSourceRef {
                    id: data_source.clone(),
                    name: None,
                }],
            },
        );
        for row in &rows {
            self.pages.insert(row.id.clone(), row.clone());
        }
        self.data_sources.insert(data_source, rows);
        self
    }

    /// Child listings of `parent` fail from result page `index` onwards.
    pub fn failing_children_from(mut self, parent: NotionId, index: usize) -> Self {
        self.failing_children.insert(parent, index);
        self
    }

    /// `create_page` rejects any body whose JSON contains `marker`.
    pub fn rejecting_pages_containing(mut self, marker: &str) -> Self {
        self.rejected_marker = Some(marker.to_string());
        self
    }

    /// Bodies of every page created so far, in order.
    pub fn created_pages(&self) -> Vec<serde_json::Value> {
        self.created
            .lock()
            .map(|created| created.clone())
            .unwrap_or_default()
    }

    pub fn status_updates(&self) -> Vec<(NotionId, String)> {
        self.status_updates
            .lock()
            .map(|updates| updates.clone())
            .unwrap_or_default()
    }

    fn lock_error() -> AppError {
        AppError::InternalError {
            message: "in-memory workspace lock poisoned".to_string(),
            source: None,
        }
    }
}

fn cursor_index(cursor: Option<&str>) -> Result<usize, AppError> {
    match cursor {
        None => Ok(0),
        Some(raw) => raw.parse().map_err(|_| AppError::NotionService {
            code: NotionErrorCode::ValidationFailed,
            message: format!("start_cursor {} is invalid", raw),
            status: 400,
        }),
    }
}

#[async_trait::async_trait]
impl NotionRepository for InMemoryNotion {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError> {
        self.pages
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("page", id))
    }

    async fn retrieve_database(&self, id: &NotionId) -> Result<Database, AppError> {
        self.databases
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("database", id))
    }

    async fn list_children(
        &self,
        parent: &NotionId,
        start_cursor: Option<String>,
        _page_size: Option<usize>,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        let index = cursor_index(start_cursor.as_deref())?;
        if let Some(&failing) = self.failing_children.get(parent) {
            if index >= failing {
                return Err(AppError::NotionService {
                    code: NotionErrorCode::InternalError,
                    message: "Unexpected error listing children".to_string(),
                    status: 500,
                });
            }
        }

        let pages = self.children.get(parent);
        let results = pages
            .and_then(|pages| pages.get(index))
            .cloned()
            .unwrap_or_default();
        let has_more = pages.map(|pages| index + 1 < pages.len()).unwrap_or(false);

        Ok(PaginatedResponse {
            object: "list".to_string(),
            results,
            next_cursor: has_more.then(|| (index + 1).to_string()),
            has_more,
        })
    }

    async fn query_data_source(
        &self,
        data_source: &NotionId,
        query: &DataSourceQuery,
        start_cursor: Option<String>,
        page_size: usize,
    ) -> Result<PaginatedResponse<Page>, AppError> {
        let rows = self
            .data_sources
            .get(data_source)
            .ok_or_else(|| not_found("data source", data_source))?;
        let matching: Vec<&Page> = rows
            .iter()
            .filter(|page| match &query.status_equals {
                Some(status) => page_status(page) == Some(status.as_str()),
                None => true,
            })
            .collect();

        let start = cursor_index(start_cursor.as_deref())?;
        let end = (start + page_size.max(1)).min(matching.len());
        let results = matching
            .get(start..end)
            .map(|slice| slice.iter().map(|page| (*page).clone()).collect())
            .unwrap_or_default();
        let has_more = end < matching.len();

        Ok(PaginatedResponse {
            object: "list".to_string(),
            results,
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }

    async fn create_page(&self, body: &serde_json::Value) -> Result<Page, AppError> {
        if let Some(marker) = &self.rejected_marker {
            if body.to_string().contains(marker.as_str()) {
                return Err(AppError::NotionService {
                    code: NotionErrorCode::ValidationFailed,
                    message: format!("body rejected ({})", marker),
                    status: 400,
                });
            }
        }

        self.created
            .lock()
            .map_err(|_| Self::lock_error())?
            .push(body.clone());

        let id = NotionId::parse(&uuid::Uuid::new_v4().to_string())?;
        Ok(Page {
            id,
            properties: Default::default(),
            url: None,
            archived: false,
        })
    }

    async fn update_page_status(&self, page: &NotionId, status: &str) -> Result<(), AppError> {
        if !self.pages.contains_key(page) {
            return Err(not_found("page", page));
        }
        self.status_updates
            .lock()
            .map_err(|_| Self::lock_error())?
            .push((page.clone(), status.to_string()));
        Ok(())
    }
}
