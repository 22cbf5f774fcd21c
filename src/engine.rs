//! Dispatch engine: burst and target-seeking orchestration.
//!
//! The engine drives the batch dispatcher in strictly sequential rounds.
//! Burst mode runs exactly one round and tallies it. Target-seeking mode
//! loops, sizing each round to the remaining success deficit, rotating the
//! credential index by the number of attempts already sent, and capturing
//! the first successful response body exactly once per run.

use std::{num::NonZeroU32, sync::Arc};

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::{
    batch::BatchDispatcher,
    credential::CredentialPool,
    error::{DispatchError, Result},
    executor::{ExecutorConfig, RequestExecutor},
    DEFAULT_ROUND_CAP,
};

/// Configuration for the dispatch engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on attempts issued in a single round. A zero cap is
    /// treated as [`DEFAULT_ROUND_CAP`].
    pub round_cap: usize,

    /// Ceiling on rounds per target-seeking run. `None` reproduces the
    /// unbounded behavior: an all-failing pool loops until cancelled. When
    /// set, hitting the ceiling surfaces
    /// [`DispatchError::TargetUnreachable`] with the run's tallies.
    pub max_rounds: Option<NonZeroU32>,

    /// Whole-run cancellation signal, checked between rounds. Attempts
    /// already in flight run to completion; the round barrier is preserved.
    pub cancel: CancellationToken,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            round_cap: DEFAULT_ROUND_CAP,
            max_rounds: None,
            cancel: CancellationToken::new(),
        }
    }
}

/// Tally of a one-shot burst round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstResult {
    /// Attempts that returned HTTP 200.
    pub success_count: usize,
    /// Attempts that failed for any reason.
    pub failure_count: usize,
}

/// Aggregate outcome of a target-seeking run.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    /// Cumulative successes across all rounds.
    pub total_success: usize,
    /// Cumulative attempts across all rounds.
    pub total_sent: usize,
    /// First successful response body seen in the run, captured once and
    /// never overwritten.
    pub captured_payload: Option<Bytes>,
}

/// Drives bounded concurrent dispatch rounds against a credential pool.
#[derive(Debug, Clone)]
pub struct DispatchEngine {
    dispatcher: BatchDispatcher,
    config: EngineConfig,
}

impl DispatchEngine {
    /// Creates an engine with a fresh executor built from `executor_config`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Configuration`] if the HTTP client cannot be
    /// built.
    pub fn new(executor_config: ExecutorConfig, config: EngineConfig) -> Result<Self> {
        let executor = Arc::new(RequestExecutor::new(executor_config)?);
        Ok(Self::with_executor(executor, config))
    }

    /// Creates an engine over an existing shared executor.
    pub fn with_executor(executor: Arc<RequestExecutor>, config: EngineConfig) -> Self {
        let dispatcher = BatchDispatcher::new(executor, config.round_cap);
        Self { dispatcher, config }
    }

    /// One-shot broadcast: a single round of `count` concurrent attempts.
    ///
    /// Attempt `k` uses the credential at rotation index `k`, so with
    /// `count <= pool.len()` each credential acts at most once. There is no
    /// continuation: the round completes and its tally is returned. `count`
    /// is clamped to the round cap.
    pub async fn burst(
        &self,
        pool: &CredentialPool,
        url: &str,
        payload: Bytes,
        count: usize,
    ) -> BurstResult {
        let span = info_span!("burst", run_id = %Uuid::new_v4(), count);

        async move {
            let round = self.dispatcher.run_round(pool, url, &payload, 0, count, false).await;
            let result = BurstResult {
                success_count: round.success_count,
                failure_count: round.attempted - round.success_count,
            };
            info!(
                success = result.success_count,
                fail = result.failure_count,
                "burst complete"
            );
            result
        }
        .instrument(span)
        .await
    }

    /// Repeats rounds until `target` cumulative successes are reached.
    ///
    /// Each round is sized to `min(target - total_success, round_cap)` and
    /// starts its credential rotation at index `total_sent`, so rotation
    /// continues seamlessly across rounds. The first successful response
    /// body of the run is captured once; later successes never replace it.
    /// A `target` of zero returns immediately without issuing any attempt.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::TargetUnreachable`] when
    /// [`EngineConfig::max_rounds`] is set and the ceiling is reached first,
    /// and [`DispatchError::Cancelled`] when the cancellation token fires
    /// between rounds. Both carry no further attempts past the point of
    /// detection.
    pub async fn seek_target(
        &self,
        pool: &CredentialPool,
        url: &str,
        payload: Bytes,
        target: usize,
    ) -> Result<RunResult> {
        let span = info_span!("seek_target", run_id = %Uuid::new_v4(), target);

        async move {
            let mut total_success = 0;
            let mut total_sent = 0;
            let mut captured_payload: Option<Bytes> = None;
            let mut rounds: u32 = 0;

            while total_success < target {
                if self.config.cancel.is_cancelled() {
                    info!(total_success, total_sent, rounds, "run cancelled");
                    return Err(DispatchError::Cancelled);
                }
                if let Some(max_rounds) = self.config.max_rounds {
                    if rounds >= max_rounds.get() {
                        info!(total_success, total_sent, rounds, "round ceiling reached");
                        return Err(DispatchError::target_unreachable(
                            target,
                            total_success,
                            total_sent,
                            rounds,
                        ));
                    }
                }

                // The dispatcher holds the normalized cap: a zero config
                // value means the default, never a zero-size round.
                let batch_size = (target - total_success).min(self.dispatcher.round_cap());
                let round = self
                    .dispatcher
                    .run_round(
                        pool,
                        url,
                        &payload,
                        total_sent,
                        batch_size,
                        captured_payload.is_none(),
                    )
                    .await;

                total_success += round.success_count;
                total_sent += round.attempted;
                rounds += 1;
                if captured_payload.is_none() {
                    captured_payload = round.first_success;
                }

                debug!(
                    round = rounds,
                    batch = batch_size,
                    round_success = round.success_count,
                    total_success,
                    total_sent,
                    "round complete"
                );
            }

            info!(total_success, total_sent, rounds, "target reached");
            Ok(RunResult { total_success, total_sent, captured_payload })
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_target_returns_without_attempts() {
        let engine = DispatchEngine::new(ExecutorConfig::default(), EngineConfig::default())
            .expect("engine builds");
        let pool = CredentialPool::new(vec!["a".into()]).expect("pool builds");

        // The URL is never contacted: the loop body never runs.
        let run = engine
            .seek_target(&pool, "http://127.0.0.1:9/", Bytes::new(), 0)
            .await
            .expect("zero target succeeds");

        assert_eq!(run.total_success, 0);
        assert_eq!(run.total_sent, 0);
        assert!(run.captured_payload.is_none());
    }

    #[tokio::test]
    async fn pre_cancelled_run_aborts_before_any_round() {
        let config = EngineConfig::default();
        config.cancel.cancel();
        let engine =
            DispatchEngine::new(ExecutorConfig::default(), config).expect("engine builds");
        let pool = CredentialPool::new(vec!["a".into()]).expect("pool builds");

        let result = engine.seek_target(&pool, "http://127.0.0.1:9/", Bytes::new(), 5).await;
        assert!(matches!(result, Err(DispatchError::Cancelled)));
    }
}
