//! One bounded round of concurrent attempts with a join barrier.
//!
//! A round spawns every attempt up front (full fan-out), waits for all of
//! them to finish, then reports aggregate counts. Nothing escapes the
//! barrier: the caller never observes a round that is still in flight, and
//! no attempt from round N+1 starts before round N has fully completed.

use std::sync::Arc;

use bytes::Bytes;
use tokio::task::JoinSet;
use tracing::warn;

use crate::{
    credential::CredentialPool,
    executor::{AttemptOutcome, RequestExecutor},
    DEFAULT_ROUND_CAP,
};

/// Aggregate outcome of one dispatch round.
#[derive(Debug, Clone, Default)]
pub struct RoundResult {
    /// Number of successful attempts in the round.
    pub success_count: usize,
    /// Number of attempts issued; equals the requested batch size.
    pub attempted: usize,
    /// Body of the first successful attempt in completion order, present
    /// only when capture was requested.
    pub first_success: Option<Bytes>,
}

/// Issues bounded rounds of concurrent attempts against one executor.
#[derive(Debug, Clone)]
pub struct BatchDispatcher {
    executor: Arc<RequestExecutor>,
    round_cap: usize,
}

impl BatchDispatcher {
    /// Creates a dispatcher over a shared executor.
    ///
    /// `round_cap` bounds peak concurrency (and open sockets) per round; a
    /// zero cap is treated as [`DEFAULT_ROUND_CAP`].
    pub fn new(executor: Arc<RequestExecutor>, round_cap: usize) -> Self {
        let round_cap = if round_cap == 0 { DEFAULT_ROUND_CAP } else { round_cap };
        Self { executor, round_cap }
    }

    /// Peak attempts permitted per round.
    pub fn round_cap(&self) -> usize {
        self.round_cap
    }

    /// Runs one round of `batch_size` concurrent attempts.
    ///
    /// Attempt `k` uses the credential at rotation index `start_index + k`
    /// and sends `payload` to `url`. All attempts start without waiting for
    /// one another; the round returns only after every attempt has finished.
    /// When `capture_first_success` is set, the body of the first success in
    /// completion order is retained in the result.
    ///
    /// `batch_size` is clamped to the round cap.
    pub async fn run_round(
        &self,
        pool: &CredentialPool,
        url: &str,
        payload: &Bytes,
        start_index: usize,
        batch_size: usize,
        capture_first_success: bool,
    ) -> RoundResult {
        let batch_size = batch_size.min(self.round_cap);

        let mut attempts = JoinSet::new();
        for k in 0..batch_size {
            let executor = Arc::clone(&self.executor);
            let credential = pool.select(start_index + k).clone();
            let url = url.to_string();
            let payload = payload.clone();

            attempts.spawn(async move {
                executor.execute(&credential, &url, payload, capture_first_success).await
            });
        }

        let mut success_count = 0;
        let mut first_success = None;

        // Join barrier: drain every attempt before reporting.
        while let Some(joined) = attempts.join_next().await {
            match joined {
                Ok(AttemptOutcome::Success(body)) => {
                    success_count += 1;
                    if capture_first_success && first_success.is_none() {
                        if let Some(bytes) = body {
                            first_success = Some(bytes);
                        }
                    }
                },
                Ok(AttemptOutcome::Failure) => {},
                Err(e) => {
                    // A panicked attempt counts as a plain failure.
                    warn!(error = %e, "attempt task did not complete");
                },
            }
        }

        RoundResult { success_count, attempted: batch_size, first_success }
    }
}
