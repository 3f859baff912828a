//! crates/mood_journal_core/src/scan.rs
//!
//! Cancellation and pagination helpers shared by the read and write paths.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::ports::{Document, DocumentStore, Filter, PageRequest, PortError, PortResult};

/// Races `fut` against `token`. A token that is already cancelled wins, so the
/// store call is never started.
pub(crate) async fn cancellable<T, F>(token: &CancellationToken, fut: F) -> PortResult<T>
where
    F: Future<Output = PortResult<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(PortError::Cancelled),
        res = fut => res,
    }
}

/// Walks every page of `filter` in `collection`, handing each document to `visit`.
///
/// Any page failure, visitor failure, or cancellation aborts the whole walk;
/// the caller never sees a partial scan as success. Returns the number of pages read.
pub(crate) async fn drain<F>(
    store: &dyn DocumentStore,
    collection: &str,
    filter: &Filter,
    page_size: usize,
    token: &CancellationToken,
    mut visit: F,
) -> PortResult<usize>
where
    F: FnMut(Document) -> PortResult<()>,
{
    let mut request = PageRequest::first(page_size);
    let mut pages = 0usize;

    loop {
        let page = cancellable(token, store.query(collection, filter, request.clone())).await?;
        pages += 1;
        debug!(
            collection,
            page = pages,
            documents = page.documents.len(),
            "Fetched result page"
        );

        for doc in page.documents {
            visit(doc)?;
        }

        match page.next_cursor {
            Some(cursor) => {
                request = PageRequest {
                    cursor: Some(cursor),
                    limit: page_size,
                }
            }
            None => return Ok(pages),
        }
    }
}
