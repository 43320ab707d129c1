// src/types/rich_text.rs
//! Rich text spans and their plain-text flattening.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// One styled span of Notion rich text.
///
/// The extractors only read `plain_text`. Everything else the API sent
/// (`type`, the typed payload, `annotations`) is kept in `details` so a span
/// can be written back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RichTextItem {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl RichTextItem {
    /// Create a plain text span, mostly for builders and tests.
    pub fn plain_text(text: &str) -> Self {
        Self {
            plain_text: text.to_string(),
            ..Self::default()
        }
    }

    /// The span as a request object for creating blocks.
    ///
    /// Spans read from the API keep their type, payload and annotations;
    /// spans without a `type` are sent as plain text. Empty untyped spans
    /// yield `None`.
    pub fn to_request(&self) -> Option<Value> {
        if self.details.contains_key("type") {
            return Some(Value::Object(self.details.clone()));
        }
        if self.plain_text.is_empty() {
            return None;
        }
        Some(json!({ "type": "text", "text": { "content": self.plain_text } }))
    }
}

/// Concatenates the `plain_text` of every span, in order.
///
/// An empty slice yields an empty string. Spans without text contribute
/// nothing.
pub fn extract_plain_text(items: &[RichTextItem]) -> String {
    items.iter().map(|item| item.plain_text.as_str()).collect()
}
