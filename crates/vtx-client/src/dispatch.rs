//! Bounded-concurrency batch dispatch.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use vtx_core::LookupError;

use crate::request::{RawResponse, RequestDescriptor};
use crate::transport::Transport;

/// Default number of requests in flight per batch.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Execute every descriptor with at most `concurrency` requests in flight.
///
/// The returned responses are positionally aligned with `descriptors`,
/// whatever order the requests complete in. 401 responses are returned like
/// any other response; the caller decides whether the batch needs a replay.
///
/// # Errors
///
/// Returns the first [`LookupError`] raised by the transport. Requests still
/// in flight are aborted.
pub async fn dispatch<T: Transport>(
    transport: &Arc<T>,
    descriptors: &[RequestDescriptor],
    concurrency: usize,
) -> Result<Vec<RawResponse>, LookupError> {
    let limit = concurrency.max(1);
    tracing::debug!(requests = descriptors.len(), concurrency = limit, "dispatching batch");

    let semaphore = Arc::new(Semaphore::new(limit));
    let mut set = JoinSet::new();
    for (idx, descriptor) in descriptors.iter().cloned().enumerate() {
        let transport = Arc::clone(transport);
        let sem = Arc::clone(&semaphore);
        set.spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return (idx, Err(LookupError::network("dispatch pool closed", None)));
            };
            (idx, transport.execute(&descriptor).await)
        });
    }

    let mut slots: Vec<Option<RawResponse>> = vec![None; descriptors.len()];
    while let Some(joined) = set.join_next().await {
        let (idx, result) = joined
            .map_err(|e| LookupError::network(format!("request task failed: {e}"), None))?;
        slots[idx] = Some(result?);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(idx, slot)| {
            slot.ok_or_else(|| LookupError::network(format!("request {idx} produced no response"), None))
        })
        .collect()
}
