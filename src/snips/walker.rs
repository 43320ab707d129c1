// src/snips/walker.rs
//! Walks the block tree of a Snipd episode page.

use crate::constants::NOTION_API_PAGE_SIZE;
use crate::model::Block;
use crate::notion::{fetch_all_pages_simple, NotionRepository};
use crate::types::NotionId;

/// All direct child blocks of a page, in order.
///
/// A failed request anywhere in the walk yields an empty list rather than a
/// partial one. The failure is logged; callers see the same result as for a
/// page without content.
pub async fn page_content(repo: &dyn NotionRepository, page_id: &NotionId) -> Vec<Block> {
    let walk = fetch_all_pages_simple(
        |page_size, cursor| repo.list_children(page_id, cursor, Some(page_size)),
        NOTION_API_PAGE_SIZE,
        None,
    )
    .await;

    match walk {
        Ok(result) => {
            log::debug!(
                "Fetched {} blocks of page {} in {} requests",
                result.items.len(),
                page_id,
                result.pages_fetched
            );
            result.items
        }
        Err(e) => {
            log::error!("Error fetching content for page {}: {}", page_id, e);
            Vec::new()
        }
    }
}

/// Direct children of one block from a single request.
///
/// Only the first page of children is returned; a toggle with more children
/// than the API page size is truncated.
pub async fn toggle_children(repo: &dyn NotionRepository, block_id: &NotionId) -> Vec<Block> {
    match repo.list_children(block_id, None, None).await {
        Ok(response) => {
            if response.has_more {
                log::warn!(
                    "Block {} has more children than one page; extra children are ignored",
                    block_id
                );
            }
            response.results
        }
        Err(e) => {
            log::error!("Error fetching children of block {}: {}", block_id, e);
            Vec::new()
        }
    }
}

/// The collapsible `heading_3` blocks, in page order.
pub fn toggle_headings(blocks: Vec<Block>) -> Vec<Block> {
    blocks.into_iter().filter(Block::is_toggle_heading).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockKind, HeadingContent};
    use crate::notion::InMemoryNotion;
    use crate::types::RichTextItem;

    fn id(n: u32) -> NotionId {
        NotionId::parse(&format!("{:032x}", n)).unwrap()
    }

    fn paragraph(n: u32, text: &str) -> Block {
        Block::new(id(n), BlockKind::paragraph(text))
    }

    #[tokio::test]
    async fn page_content_follows_every_cursor() {
        let notion = InMemoryNotion::new().with_children(
            id(1),
            vec![vec![paragraph(10, "a"), paragraph(11, "b")], vec![paragraph(12, "c")]],
        );

        let blocks = page_content(&notion, &id(1)).await;
        let texts: Vec<String> = blocks.iter().map(Block::plain_text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn failed_walk_yields_nothing() {
        let notion = InMemoryNotion::new()
            .with_children(id(1), vec![vec![paragraph(10, "a")], vec![paragraph(11, "b")]])
            .failing_children_from(id(1), 1);

        assert!(page_content(&notion, &id(1)).await.is_empty());
    }

    #[tokio::test]
    async fn toggle_children_reads_only_the_first_page() {
        let notion = InMemoryNotion::new().with_children(
            id(2),
            vec![vec![paragraph(20, "first")], vec![paragraph(21, "second")]],
        );

        let children = toggle_children(&notion, &id(2)).await;
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].plain_text(), "first");
    }

    #[tokio::test]
    async fn toggle_children_of_unknown_block_is_empty() {
        let notion = InMemoryNotion::new().failing_children_from(id(3), 0);
        assert!(toggle_children(&notion, &id(3)).await.is_empty());
    }

    #[test]
    fn only_toggleable_h3_headings_survive() {
        let static_heading = Block::new(
            id(3),
            BlockKind::Heading3 {
                heading_3: HeadingContent {
                    rich_text: vec![RichTextItem::plain_text("static")],
                    is_toggleable: false,
                },
            },
        );
        let blocks = vec![
            Block::new(id(1), BlockKind::toggle_heading("[01:00] one")),
            paragraph(2, "text"),
            static_heading,
            Block::new(id(4), BlockKind::toggle("a toggle")),
            Block::new(id(5), BlockKind::toggle_heading("[02:00] two")),
        ];

        let titles: Vec<String> = toggle_headings(blocks).iter().map(Block::plain_text).collect();
        assert_eq!(titles, vec!["[01:00] one", "[02:00] two"]);
    }
}
