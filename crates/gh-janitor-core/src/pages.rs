//! Pagination helper

use gh_janitor_client::Page;
use std::future::Future;

/// Fetch every page starting at page 1, following `next_page` until absent
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> anyhow::Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = anyhow::Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page = 1;
    loop {
        let result = fetch(page).await?;
        items.extend(result.items);
        match result.next_page {
            Some(next) => {
                log::debug!("Next page: {}", next);
                page = next;
            }
            None => return Ok(items),
        }
    }
}
