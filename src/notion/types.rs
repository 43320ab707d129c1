// src/notion/types.rs
//! Request and response shapes of the Notion API that are not domain model.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Generic paginated response from Notion API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub object: String,
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Result of a pagination operation.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
}

/// Error body returned by Notion for every non-2xx response.
#[derive(Debug, Clone, Deserialize)]
pub struct NotionErrorBody {
    #[serde(default)]
    pub status: u16,
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Query against a data source: an optional status filter, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceQuery {
    pub status_equals: Option<String>,
}

impl DataSourceQuery {
    pub fn with_status(status: &str) -> Self {
        Self {
            status_equals: Some(status.to_string()),
        }
    }

    /// Request body for one page of this query.
    pub fn to_body(&self, page_size: usize, start_cursor: Option<&str>) -> serde_json::Value {
        let mut body = json!({
            "page_size": page_size,
            "sorts": [{ "timestamp": "created_time", "direction": "ascending" }],
        });
        if let Some(status) = &self.status_equals {
            body["filter"] = json!({ "property": "Status", "status": { "equals": status } });
        }
        if let Some(cursor) = start_cursor {
            body["start_cursor"] = json!(cursor);
        }
        body
    }
}
