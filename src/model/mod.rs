mod block;
mod property_value;

pub use block::{Block, BlockKind, HeadingContent, TextContent};
pub use property_value::{DateValue, PropertyValue, SelectOption};

use crate::types::NotionId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Properties of a page in API order.
pub type PropertyBag = IndexMap<String, PropertyValue>;

/// A Notion page as returned by `GET pages/{id}` or a data source query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: NotionId,
    #[serde(default)]
    pub properties: PropertyBag,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

/// Reference to one data source of a database (`GET databases/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceRef {
    pub id: NotionId,
    #[serde(default)]
    pub name: Option<String>,
}

/// The parts of a database object this service needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub id: NotionId,
    #[serde(default)]
    pub data_sources: Vec<DataSourceRef>,
}

/// One podcast episode page in the source database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: NotionId,
    pub status: String,
    pub episode: String,
    pub podcast_show: String,
    pub snips: u32,
}

/// A highlight extracted from one toggle heading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snip {
    pub title: String,
    pub summary: String,
    pub timestamp: String,
}

/// A snip together with its verbatim transcript blocks, as exported to the
/// curated database.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnipExport {
    pub snip: Snip,
    pub transcript: Vec<Block>,
}

/// One page of snips plus the metadata a client needs to page through them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBatch {
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub tasks: Vec<Snip>,
}

impl TaskBatch {
    /// The batch answered when the source database is not configured.
    pub fn empty(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size,
            total_count: 0,
            total_pages: 0,
            has_next: false,
            has_previous: false,
            tasks: Vec::new(),
        }
    }
}
