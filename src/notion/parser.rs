// src/notion/parser.rs
//! Turns raw Notion API responses into domain values or typed errors.

use super::client::ApiResponse;
use super::types::{NotionErrorBody, PaginatedResponse};
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionErrorCode};
use crate::model::{Block, Database, Page};

/// Parse any Notion API response: the body on success, a typed error otherwise.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if (200..300).contains(&result.status) {
        parse_success(&result.data, &result.url)
    } else {
        Err(parse_error(&result.data, result.status, &result.url))
    }
}

fn parse_success<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        AppError::MalformedResponse(format!("{} (body: {})", e, preview(body)))
    })
}

/// Builds the error for a non-2xx response, preferring Notion's own error body.
pub fn parse_error(body: &str, status: u16, url: &str) -> AppError {
    if let Ok(notion_error) = serde_json::from_str::<NotionErrorBody>(body) {
        log::debug!(
            "Notion error {} from {} (request {:?})",
            notion_error.code,
            url,
            notion_error.request_id
        );
        return AppError::NotionService {
            code: NotionErrorCode::from_api_response(&notion_error.code),
            message: notion_error.message,
            status,
        };
    }

    AppError::NotionService {
        code: NotionErrorCode::from_http_status(status),
        message: format!("HTTP {} from {}: {}", status, url, preview(body)),
        status,
    }
}

pub(crate) fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

pub fn parse_page_response(result: ApiResponse<String>) -> Result<Page, AppError> {
    parse_api_response(result)
}

pub fn parse_database_response(result: ApiResponse<String>) -> Result<Database, AppError> {
    parse_api_response(result)
}

pub fn parse_blocks_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Block>, AppError> {
    parse_api_response(result)
}

pub fn parse_pages_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Page>, AppError> {
    parse_api_response(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status,
            url: "https://api.notion.com/v1/pages/x".to_string(),
        }
    }

    #[test]
    fn notion_error_body_becomes_typed_code() {
        let body = r#"{
            "object": "error",
            "status": 404,
            "code": "object_not_found",
            "message": "Could not find page with ID: abc123",
            "request_id": "req_123"
        }"#;

        match parse_page_response(response(404, body)) {
            Err(AppError::NotionService { code, status, .. }) => {
                assert_eq!(code, NotionErrorCode::ObjectNotFound);
                assert_eq!(status, 404);
            }
            other => panic!("expected NotionService error, got {:?}", other),
        }
    }

    #[test]
    fn unparseable_error_falls_back_to_status() {
        match parse_page_response(response(502, "<html>Bad Gateway</html>")) {
            Err(AppError::NotionService { code, .. }) => {
                assert_eq!(code, NotionErrorCode::HttpStatus(502));
            }
            other => panic!("expected NotionService error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_success_body() {
        assert!(matches!(
            parse_page_response(response(200, "{not json")),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn block_listing_parses() {
        let body = r#"{
            "object": "list",
            "results": [{
                "object": "block",
                "id": "9f4b1c62-0d5e-4c3a-8a77-2b6f1e0d9c11",
                "type": "paragraph",
                "paragraph": {"rich_text": [{"plain_text": "hello"}]}
            }],
            "next_cursor": "cursor-2",
            "has_more": true
        }"#;
        let page = parse_blocks_pagination(response(200, body)).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].plain_text(), "hello");
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("cursor-2"));
    }
}
