//! Bounded-concurrency detail retrieval

use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, warn};

use crate::transport::Transport;

/// Fetches a batch of detail locators with at most `concurrency` requests in flight.
///
/// The in-flight set only lives for the duration of one [`DetailFetcher::fetch_all`]
/// call; dropping the returned future cancels whatever is still pending.
pub struct DetailFetcher<'a> {
    transport: &'a dyn Transport,
    concurrency: usize,
}

impl<'a> DetailFetcher<'a> {
    pub fn new(transport: &'a dyn Transport, concurrency: usize) -> Self {
        Self {
            transport,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch every locator, returning one slot per input in input order.
    ///
    /// A failed fetch leaves its slot empty and never affects the others.
    pub async fn fetch_all(&self, locators: &[String]) -> Vec<Option<Value>> {
        let mut slots: Vec<Option<Value>> = vec![None; locators.len()];
        let mut failed = 0usize;

        let mut completions = stream::iter(locators.iter().enumerate())
            .map(|(index, locator)| async move { (index, self.transport.fetch(locator).await) })
            .buffer_unordered(self.concurrency);

        while let Some((index, result)) = completions.next().await {
            match result {
                Ok(payload) => slots[index] = Some(payload),
                Err(e) => {
                    failed += 1;
                    warn!(locator = %e.locator, error = %e.kind, "Dropping record after failed detail fetch");
                },
            }
        }

        debug!(
            requested = locators.len(),
            failed = failed,
            concurrency = self.concurrency,
            "Detail batch complete"
        );

        slots
    }
}
