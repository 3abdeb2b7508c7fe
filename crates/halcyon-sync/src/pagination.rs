//! Paginated fetch loop
//!
//! Pages are 1-based. A full page (exactly `limit` items) means there may be
//! more; a partial or empty page ends the loop.

use crate::Result;
use std::future::Future;

/// Items gathered across pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    /// Every item, in page order
    pub items: Vec<T>,
    /// Number of requests issued
    pub requests: u32,
    /// Last page fetched
    pub last_page: u32,
}

/// Fetch every page starting from page 1
pub async fn fetch_all_pages<T, F, Fut>(limit: usize, fetch: F) -> Result<Paged<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    fetch_pages_from(1, limit, fetch).await
}

/// Fetch pages starting at `first_page` until a partial or empty page
pub async fn fetch_pages_from<T, F, Fut>(first_page: u32, limit: usize, mut fetch: F) -> Result<Paged<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut items = Vec::new();
    let mut page = first_page.max(1);
    let mut requests = 0u32;

    loop {
        let batch = fetch(page).await?;
        requests += 1;
        let full = limit > 0 && batch.len() >= limit;
        items.extend(batch);
        if !full {
            break;
        }
        page += 1;
    }

    Ok(Paged {
        items,
        requests,
        last_page: page,
    })
}
