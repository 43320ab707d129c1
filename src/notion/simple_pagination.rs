// src/notion/simple_pagination.rs
//! Cursor pagination over the Notion list endpoints.

use super::types::{PaginatedResponse, PaginationResult};
use crate::error::AppError;

/// Fetches every page of a cursor-paginated listing, one request at a time.
///
/// `fetch_fn` receives the page size and the cursor returned by the previous
/// response (`None` for the first request). The loop stops when the API
/// reports `has_more: false`, when no cursor comes back, or after
/// `max_pages` requests. The first failing request aborts the whole walk.
pub async fn fetch_all_pages_simple<T, F, Fut>(
    mut fetch_fn: F,
    page_size: usize,
    max_pages: Option<u32>,
) -> Result<PaginationResult<T>, AppError>
where
    F: FnMut(usize, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    let mut all_items = Vec::new();
    let mut cursor = None;
    let mut pages_fetched = 0u32;

    loop {
        if let Some(max) = max_pages {
            if pages_fetched >= max {
                log::debug!("Reached maximum page limit: {}", max);
                break;
            }
        }

        let response = fetch_fn(page_size, cursor).await?;

        let has_more = response.has_more;
        cursor = response.next_cursor;
        all_items.extend(response.results);
        pages_fetched += 1;

        if !has_more || cursor.is_none() {
            break;
        }
    }

    Ok(PaginationResult {
        items: all_items,
        pages_fetched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: Vec<u32>, next: Option<&str>) -> PaginatedResponse<u32> {
        PaginatedResponse {
            object: "list".to_string(),
            results: items,
            next_cursor: next.map(str::to_string),
            has_more: next.is_some(),
        }
    }

    #[tokio::test]
    async fn follows_cursors_until_exhausted() {
        let mut seen_cursors = Vec::new();
        let result = fetch_all_pages_simple(
            |_, cursor: Option<String>| {
                seen_cursors.push(cursor.clone());
                let response = match cursor.as_deref() {
                    None => page(vec![1, 2], Some("c1")),
                    Some("c1") => page(vec![3], Some("c2")),
                    _ => page(vec![4], None),
                };
                async move { Ok(response) }
            },
            2,
            None,
        )
        .await
        .unwrap();

        assert_eq!(result.items, vec![1, 2, 3, 4]);
        assert_eq!(result.pages_fetched, 3);
        assert_eq!(
            seen_cursors,
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn max_pages_caps_the_walk() {
        let result = fetch_all_pages_simple(
            |_, _| async { Ok(page(vec![7], Some("again"))) },
            100,
            Some(1),
        )
        .await
        .unwrap();
        assert_eq!(result.items, vec![7]);
    }

    #[tokio::test]
    async fn failure_discards_collected_items() {
        let result = fetch_all_pages_simple(
            |_, cursor: Option<String>| async move {
                match cursor {
                    None => Ok(page(vec![1], Some("c1"))),
                    Some(_) => Err(AppError::MalformedResponse("boom".to_string())),
                }
            },
            100,
            None,
        )
        .await;
        assert!(result.is_err());
    }
}
