use crate::types::{extract_plain_text, NotionId, RichTextItem};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

/// A content block as returned by `GET blocks/{id}/children`.
///
/// Only the block types the snip extractor looks at are modelled; every
/// other type lands in [`BlockKind::Unsupported`] with the received JSON
/// kept in `raw`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub id: NotionId,
    #[serde(flatten)]
    pub kind: BlockKind,
    #[serde(skip)]
    pub raw: Option<Value>,
}

#[derive(Deserialize)]
struct BlockShape {
    id: NotionId,
    #[serde(flatten)]
    kind: BlockKind,
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let shape: BlockShape = serde_json::from_value(value.clone()).map_err(de::Error::custom)?;
        let raw = matches!(shape.kind, BlockKind::Unsupported).then_some(value);
        Ok(Block {
            id: shape.id,
            kind: shape.kind,
            raw,
        })
    }
}

/// Types Notion returns but refuses in a create request.
const NOT_APPENDABLE: &[&str] = &["unsupported", "child_page", "child_database"];

/// Text payload shared by paragraphs, list items, toggles and quotes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
}

/// Heading payload; `is_toggleable` marks a collapsible heading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadingContent {
    #[serde(default)]
    pub rich_text: Vec<RichTextItem>,
    #[serde(default)]
    pub is_toggleable: bool,
}

/// Block payload keyed by the Notion `type` discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlockKind {
    #[serde(rename = "paragraph")]
    Paragraph { paragraph: TextContent },
    #[serde(rename = "heading_1")]
    Heading1 { heading_1: HeadingContent },
    #[serde(rename = "heading_2")]
    Heading2 { heading_2: HeadingContent },
    #[serde(rename = "heading_3")]
    Heading3 { heading_3: HeadingContent },
    #[serde(rename = "bulleted_list_item")]
    BulletedListItem { bulleted_list_item: TextContent },
    #[serde(rename = "numbered_list_item")]
    NumberedListItem { numbered_list_item: TextContent },
    #[serde(rename = "toggle")]
    Toggle { toggle: TextContent },
    #[serde(rename = "quote")]
    Quote { quote: TextContent },
    #[serde(rename = "callout")]
    Callout { callout: TextContent },
    #[serde(other)]
    Unsupported,
}

impl BlockKind {
    pub fn paragraph(text: &str) -> Self {
        BlockKind::Paragraph {
            paragraph: TextContent::from_text(text),
        }
    }

    pub fn bulleted_list_item(text: &str) -> Self {
        BlockKind::BulletedListItem {
            bulleted_list_item: TextContent::from_text(text),
        }
    }

    pub fn toggle(text: &str) -> Self {
        BlockKind::Toggle {
            toggle: TextContent::from_text(text),
        }
    }

    pub fn toggle_heading(text: &str) -> Self {
        BlockKind::Heading3 {
            heading_3: HeadingContent {
                rich_text: vec![RichTextItem::plain_text(text)],
                is_toggleable: true,
            },
        }
    }
}

impl TextContent {
    pub fn from_text(text: &str) -> Self {
        Self {
            rich_text: vec![RichTextItem::plain_text(text)],
        }
    }
}

impl Block {
    pub fn new(id: NotionId, kind: BlockKind) -> Self {
        Self {
            id,
            kind,
            raw: None,
        }
    }

    /// The Notion type name of this block.
    pub fn block_type(&self) -> &'static str {
        match &self.kind {
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::Heading1 { .. } => "heading_1",
            BlockKind::Heading2 { .. } => "heading_2",
            BlockKind::Heading3 { .. } => "heading_3",
            BlockKind::BulletedListItem { .. } => "bulleted_list_item",
            BlockKind::NumberedListItem { .. } => "numbered_list_item",
            BlockKind::Toggle { .. } => "toggle",
            BlockKind::Quote { .. } => "quote",
            BlockKind::Callout { .. } => "callout",
            BlockKind::Unsupported => "unsupported",
        }
    }

    /// The rich text spans of a text-bearing block; empty for anything else.
    pub fn rich_text(&self) -> &[RichTextItem] {
        match &self.kind {
            BlockKind::Paragraph { paragraph: c }
            | BlockKind::BulletedListItem {
                bulleted_list_item: c,
            }
            | BlockKind::NumberedListItem {
                numbered_list_item: c,
            }
            | BlockKind::Toggle { toggle: c }
            | BlockKind::Quote { quote: c }
            | BlockKind::Callout { callout: c } => &c.rich_text,
            BlockKind::Heading1 { heading_1: h }
            | BlockKind::Heading2 { heading_2: h }
            | BlockKind::Heading3 { heading_3: h } => &h.rich_text,
            BlockKind::Unsupported => &[],
        }
    }

    pub fn plain_text(&self) -> String {
        extract_plain_text(self.rich_text())
    }

    /// A collapsible `heading_3`, i.e. the root of one snip.
    pub fn is_toggle_heading(&self) -> bool {
        matches!(
            &self.kind,
            BlockKind::Heading3 { heading_3 } if heading_3.is_toggleable
        )
    }

    /// Request body fragment for appending this block to another page.
    ///
    /// Modelled blocks keep their spans as received. Other types are
    /// forwarded from `raw` unless Notion cannot create them.
    pub fn to_append_payload(&self) -> Option<Value> {
        if matches!(self.kind, BlockKind::Unsupported) {
            return self.raw_append_payload();
        }
        let block_type = self.block_type();
        let rich_text: Vec<Value> = self
            .rich_text()
            .iter()
            .filter_map(RichTextItem::to_request)
            .collect();
        Some(json!({
            "object": "block",
            "type": block_type,
            block_type: { "rich_text": rich_text },
        }))
    }

    fn raw_append_payload(&self) -> Option<Value> {
        let raw = self.raw.as_ref()?;
        let block_type = raw.get("type")?.as_str()?;
        if NOT_APPENDABLE.contains(&block_type) {
            return None;
        }
        let content = raw.get(block_type)?.clone();
        Some(json!({
            "object": "block",
            "type": block_type,
            block_type: content,
        }))
    }
}
