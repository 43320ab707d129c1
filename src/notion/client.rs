// src/notion/client.rs
//! Thin reqwest wrapper for the Notion API.
//!
//! Handles authentication headers and raw request/response plumbing. Parsing
//! lives in [`super::parser`]; business logic never sees this type directly.

use super::parser;
use super::types::{DataSourceQuery, PaginatedResponse};
use crate::constants::{NOTION_API_BASE_URL, NOTION_VERSION};
use crate::error::AppError;
use crate::model::{Block, Database, Page};
use crate::types::{ApiKey, NotionId};
use reqwest::{header, Client, Response};
use serde::Serialize;
use serde_json::json;

/// Notion REST transport: one reqwest client carrying the auth and version headers.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Client against the public Notion API.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        Self::with_base_url(api_key, NOTION_API_BASE_URL)
    }

    /// Same as [`NotionHttpClient::new`] against another API root.
    pub fn with_base_url(api_key: &ApiKey, base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );
        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response, AppError> {
        let url = self.url(endpoint);
        log::debug!("GET {}", url);
        Ok(self.client.get(url).query(query).send().await?)
    }

    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = self.url(endpoint);
        if endpoint.ends_with("/query") {
            log::debug!(
                "POST {} body={}",
                url,
                serde_json::to_string(body).unwrap_or_else(|_| "<unserializable>".to_string())
            );
        } else {
            log::debug!("POST {}", url);
        }
        Ok(self.client.post(url).json(body).send().await?)
    }

    pub async fn patch<T: Serialize>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Response, AppError> {
        let url = self.url(endpoint);
        log::debug!("PATCH {}", url);
        Ok(self.client.patch(url).json(body).send().await?)
    }
}

#[async_trait::async_trait]
impl super::NotionRepository for NotionHttpClient {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError> {
        let endpoint = format!("pages/{}", id.to_hyphenated());
        let response = self.get(&endpoint, &[]).await?;
        parser::parse_page_response(extract_response_text(response).await?)
    }

    async fn retrieve_database(&self, id: &NotionId) -> Result<Database, AppError> {
        let endpoint = format!("databases/{}", id.to_hyphenated());
        let response = self.get(&endpoint, &[]).await?;
        parser::parse_database_response(extract_response_text(response).await?)
    }

    async fn list_children(
        &self,
        parent: &NotionId,
        start_cursor: Option<String>,
        page_size: Option<usize>,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_hyphenated());
        let mut query = Vec::new();
        if let Some(size) = page_size {
            query.push(("page_size", size.to_string()));
        }
        if let Some(cursor) = start_cursor {
            query.push(("start_cursor", cursor));
        }
        let response = self.get(&endpoint, &query).await?;
        parser::parse_blocks_pagination(extract_response_text(response).await?)
    }

    async fn query_data_source(
        &self,
        data_source: &NotionId,
        query: &DataSourceQuery,
        start_cursor: Option<String>,
        page_size: usize,
    ) -> Result<PaginatedResponse<Page>, AppError> {
        let endpoint = format!("data_sources/{}/query", data_source.to_hyphenated());
        let body = query.to_body(page_size, start_cursor.as_deref());
        let response = self.post(&endpoint, &body).await?;
        parser::parse_pages_pagination(extract_response_text(response).await?)
    }

    async fn create_page(&self, body: &serde_json::Value) -> Result<Page, AppError> {
        let response = self.post("pages", body).await?;
        parser::parse_page_response(extract_response_text(response).await?)
    }

    async fn update_page_status(&self, page: &NotionId, status: &str) -> Result<(), AppError> {
        let endpoint = format!("pages/{}", page.to_hyphenated());
        let body = json!({ "properties": { "Status": { "status": { "name": status } } } });
        let response = self.patch(&endpoint, &body).await?;
        let _: serde_json::Value = parser::parse_api_response(extract_response_text(response).await?)?;
        Ok(())
    }
}

/// Body text of a response plus the status and URL it came from.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
    pub url: String,
}

/// Reads the body as text, keeping status and URL for error reporting.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
