// src/notion/mod.rs
//! Notion API interaction: the ability to read and write workspace content.
//!
//! Business logic depends on [`NotionRepository`], never on HTTP details.

mod client;
mod memory;
pub mod parser;
mod simple_pagination;
mod types;

use crate::error::AppError;
use crate::model::{Block, Database, Page};
use crate::types::NotionId;

pub use client::{extract_response_text, ApiResponse, NotionHttpClient};
pub use memory::InMemoryNotion;
pub use simple_pagination::fetch_all_pages_simple;
pub use types::{DataSourceQuery, NotionErrorBody, PaginatedResponse, PaginationResult};

/// The Notion operations the pipeline needs, one request per call.
///
/// Listing methods return a single page of results; callers that need the
/// whole listing drive [`fetch_all_pages_simple`] themselves.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError>;

    async fn retrieve_database(&self, id: &NotionId) -> Result<Database, AppError>;

    /// One page of a block's direct children. `page_size: None` leaves the
    /// size to the API default.
    async fn list_children(
        &self,
        parent: &NotionId,
        start_cursor: Option<String>,
        page_size: Option<usize>,
    ) -> Result<PaginatedResponse<Block>, AppError>;

    async fn query_data_source(
        &self,
        data_source: &NotionId,
        query: &DataSourceQuery,
        start_cursor: Option<String>,
        page_size: usize,
    ) -> Result<PaginatedResponse<Page>, AppError>;

    /// `POST pages` with a fully built request body.
    async fn create_page(&self, body: &serde_json::Value) -> Result<Page, AppError>;

    async fn update_page_status(&self, page: &NotionId, status: &str) -> Result<(), AppError>;

    /// Resolves a database id to the id of its first data source.
    async fn primary_data_source(&self, database: &NotionId) -> Result<NotionId, AppError> {
        let db = self.retrieve_database(database).await?;
        db.data_sources
            .into_iter()
            .next()
            .map(|source| source.id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Database {} has no data sources", database))
            })
    }

    /// Every page of a data source matching `query`, following cursors.
    async fn query_all(
        &self,
        data_source: &NotionId,
        query: &DataSourceQuery,
    ) -> Result<Vec<Page>, AppError> {
        let result = fetch_all_pages_simple(
            |page_size, cursor| self.query_data_source(data_source, query, cursor, page_size),
            crate::constants::NOTION_API_PAGE_SIZE,
            None,
        )
        .await?;
        log::debug!(
            "Query on {} returned {} pages in {} requests",
            data_source,
            result.items.len(),
            result.pages_fetched
        );
        Ok(result.items)
    }
}
