//! Page-number pagination.
//!
//! Listings are sliced into fixed-size pages addressed by a 1-based page
//! number. Out-of-range page numbers clamp to the nearest valid page, so a
//! request for page 999 of a three-page listing returns page 3 and a request
//! for page 0 returns page 1.

use sea_orm::{ConnectionTrait, Paginator, SelectorTrait};
use zine_common::{AppError, AppResult};

/// Default page size for post listings and the feed.
pub const PAGE_SIZE: u64 = 10;

/// Page size for a group's post listing.
pub const GROUP_PAGE_SIZE: u64 = 12;

/// One page of an ordered listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// The 1-based page number actually served (after clamping).
    pub page: u64,
    /// Total number of pages (at least 1).
    pub page_count: u64,
    /// Total number of items across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// An empty first page.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_count: 1,
            total: 0,
        }
    }

    /// Map the items of this page, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_count: self.page_count,
            total: self.total,
        }
    }
}

/// Fetch one page from a sea-orm paginator, clamping the requested page
/// number into the valid range.
pub async fn fetch_page<C, S>(
    paginator: &Paginator<'_, C, S>,
    requested: Option<u64>,
) -> AppResult<Page<S::Item>>
where
    C: ConnectionTrait,
    S: SelectorTrait + Send + Sync,
{
    let counts = paginator
        .num_items_and_pages()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let page_count = counts.number_of_pages.max(1);
    let page = requested.unwrap_or(1).clamp(1, page_count);

    let items = paginator
        .fetch_page(page - 1)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Page {
        items,
        page,
        page_count,
        total: counts.number_of_items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page() {
        let page: Page<()> = Page::empty();
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page {
            items: vec![1, 2, 3],
            page: 2,
            page_count: 5,
            total: 42,
        };
        let mapped = page.map(|n| n * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.page, 2);
        assert_eq!(mapped.page_count, 5);
        assert_eq!(mapped.total, 42);
    }
}
