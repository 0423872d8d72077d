//! Shared pagination loop for paged search endpoints

use std::future::Future;

/// Collect every page from a paged endpoint.
///
/// Requests page 1, 2, ... and keeps going while the previous page came
/// back with exactly `page_size` entries -- a full page means the endpoint
/// cannot yet tell us whether more results exist. A short page (including
/// an empty one) ends the loop.
///
/// Any page error aborts the whole collection; callers decide how to
/// degrade.
pub async fn collect_pages<T, F, Fut>(page_size: usize, mut fetch_page: F) -> anyhow::Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = anyhow::Result<Vec<T>>>,
{
    let mut all = Vec::new();
    let mut page = 1u32;

    loop {
        let batch = fetch_page(page).await?;
        let batch_len = batch.len();
        all.extend(batch);

        if batch_len < page_size {
            break;
        }
        page += 1;
    }

    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn run_with_pages(pages: Vec<Vec<u32>>) -> (Vec<u32>, usize) {
        let calls = AtomicUsize::new(0);
        let items = collect_pages(100, |page| {
            calls.fetch_add(1, Ordering::SeqCst);
            let batch = pages
                .get((page - 1) as usize)
                .cloned()
                .unwrap_or_default();
            async move { Ok(batch) }
        })
        .await
        .unwrap();
        (items, calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_full_page_then_empty_page() {
        let (items, calls) = run_with_pages(vec![(0..100).collect(), vec![]]).await;
        assert_eq!(items.len(), 100);
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_full_page_then_partial_page() {
        let (items, calls) = run_with_pages(vec![(0..100).collect(), (0..50).collect()]).await;
        assert_eq!(items.len(), 150);
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_single_partial_page() {
        let (items, calls) = run_with_pages(vec![(0..50).collect()]).await;
        assert_eq!(items.len(), 50);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_empty_first_page() {
        let (items, calls) = run_with_pages(vec![]).await;
        assert!(items.is_empty());
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_page_error_propagates() {
        let result: anyhow::Result<Vec<u32>> =
            collect_pages(100, |_page| async { anyhow::bail!("boom") }).await;
        assert!(result.is_err());
    }
}
