// src/snips/pagination.rs
//! Page-numbered views over the toggle headings of a project.

use super::extract::extract_snip;
use super::walker::toggle_children;
use crate::model::{Block, TaskBatch};
use crate::notion::NotionRepository;

/// Counts and flags for one page of a listing of `total_count` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageWindow {
    /// `page` is 1-indexed; both `page` and `page_size` must be at least 1.
    pub fn new(page: usize, page_size: usize, total_count: usize) -> Self {
        let total_pages = total_count.div_ceil(page_size.max(1));
        Self {
            page,
            page_size,
            total_count,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }

    /// Index range of this page, clamped to the listing. Empty past the end.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.page.saturating_sub(1).saturating_mul(self.page_size);
        let end = start.saturating_add(self.page_size);
        start.min(self.total_count)..end.min(self.total_count)
    }
}

/// Extracts the snips of one page of `headings`.
///
/// Children are fetched only for the headings inside the requested slice,
/// one after another.
pub async fn paginate_tasks(
    repo: &dyn NotionRepository,
    headings: &[Block],
    page: usize,
    page_size: usize,
) -> TaskBatch {
    let window = PageWindow::new(page, page_size, headings.len());

    let mut tasks = Vec::with_capacity(window.range().len());
    for heading in &headings[window.range()] {
        let children = toggle_children(repo, &heading.id).await;
        tasks.push(extract_snip(heading, &children));
    }

    TaskBatch {
        page: window.page,
        page_size: window.page_size,
        total_count: window.total_count,
        total_pages: window.total_pages,
        has_next: window.has_next,
        has_previous: window.has_previous,
        tasks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;
    use crate::notion::InMemoryNotion;
    use crate::types::NotionId;

    fn headings(count: u32) -> Vec<Block> {
        (1..=count)
            .map(|n| {
                Block::new(
                    NotionId::parse(&format!("{:032x}", n)).unwrap(),
                    BlockKind::toggle_heading(&format!("[00:{:02}] Snip {}", n, n)),
                )
            })
            .collect()
    }

    #[test]
    fn second_page_of_fifteen() {
        let window = PageWindow::new(2, 10, 15);
        assert_eq!(window.total_pages, 2);
        assert!(!window.has_next);
        assert!(window.has_previous);
        assert_eq!(window.range(), 10..15);
    }

    #[test]
    fn counts_and_flags_agree() {
        // (page, page_size, total_count) -> (total_pages, has_next, has_previous, range)
        let cases = [
            ((1, 10, 0), (0, false, false, 0..0)),
            ((1, 10, 5), (1, false, false, 0..5)),
            ((1, 10, 15), (2, true, false, 0..10)),
            ((2, 10, 15), (2, false, true, 10..15)),
            ((2, 5, 15), (3, true, true, 5..10)),
            ((3, 5, 15), (3, false, true, 10..15)),
            ((4, 5, 15), (3, false, true, 15..15)),
            ((1, 1, 1), (1, false, false, 0..1)),
        ];
        for ((page, page_size, total), (pages, next, previous, range)) in cases {
            let window = PageWindow::new(page, page_size, total);
            assert_eq!(
                (window.total_pages, window.has_next, window.has_previous, window.range()),
                (pages, next, previous, range),
                "page={} page_size={} total={}",
                page,
                page_size,
                total
            );
        }
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(PageWindow::new(1, 10, 0).total_pages, 0);
        assert_eq!(PageWindow::new(1, 10, 10).total_pages, 1);
        assert_eq!(PageWindow::new(1, 10, 11).total_pages, 2);
        assert_eq!(PageWindow::new(1, 1, 3).total_pages, 3);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let window = PageWindow::new(5, 10, 15);
        assert!(window.range().is_empty());
        assert!(!window.has_next);
        assert!(window.has_previous);
    }

    #[tokio::test]
    async fn batch_holds_only_the_requested_slice() {
        let notion = InMemoryNotion::new();
        let batch = paginate_tasks(&notion, &headings(15), 2, 10).await;

        assert_eq!(batch.tasks.len(), 5);
        assert_eq!(batch.tasks[0].title, "[00:11] Snip 11");
        assert_eq!(batch.tasks[4].timestamp, "00:15");
        assert_eq!(batch.total_count, 15);
        assert_eq!(batch.total_pages, 2);
    }

    #[tokio::test]
    async fn far_page_yields_no_tasks() {
        let notion = InMemoryNotion::new();
        let batch = paginate_tasks(&notion, &headings(3), 9, 2).await;
        assert!(batch.tasks.is_empty());
        assert!(!batch.has_next);
        assert_eq!(batch.total_pages, 2);
    }
}
