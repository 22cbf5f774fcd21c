//! Campaign orchestration wiring collaborator seams to the engine.
//!
//! A [`DispatchService`] owns the credential store, payload builder and
//! profile decoder for a deployment and exposes the two campaign shapes:
//! a one-shot broadcast of engage actions across the pool, and a saturation
//! run that keeps issuing inspect actions until a success target is met.
//!
//! Transports are scoped to one campaign: each call builds a fresh executor,
//! and dropping it on any exit path releases every connection it opened.

use std::{num::NonZeroU32, sync::Arc};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    credential::CredentialPool,
    engine::{DispatchEngine, EngineConfig},
    error::Result,
    executor::{AttemptOutcome, ExecutorConfig, RequestExecutor},
    providers::{ActionKind, CredentialStore, PayloadBuilder, PlayerProfile, ProfileDecoder},
    region::RegionTable,
    DEFAULT_BROADCAST_CAP, DEFAULT_PROBE_LIMIT,
};

/// When no explicit round ceiling is configured, a saturation run is allowed
/// this many times the minimum round count before it is declared unreachable.
const SATURATE_ROUND_MARGIN: u32 = 10;

/// Configuration for the campaign service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Credentials tried sequentially when probing for a profile.
    pub probe_limit: usize,
    /// Ceiling on credentials used by one broadcast.
    pub broadcast_cap: usize,
    /// Base executor settings; TLS verification is adjusted per traffic kind.
    pub executor: ExecutorConfig,
    /// Engine settings shared by every campaign.
    pub engine: EngineConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            probe_limit: DEFAULT_PROBE_LIMIT,
            broadcast_cap: DEFAULT_BROADCAST_CAP,
            executor: ExecutorConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

/// Aggregate report of one campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignReport {
    /// Attempts that succeeded.
    pub success: usize,
    /// Attempts that failed.
    pub fail: usize,
    /// Decoded profile of the target, when one could be obtained.
    pub profile: Option<PlayerProfile>,
}

/// Runs dispatch campaigns against a region table.
pub struct DispatchService<S, B, D> {
    store: S,
    builder: B,
    decoder: D,
    table: RegionTable,
    config: ServiceConfig,
}

impl<S, B, D> DispatchService<S, B, D>
where
    S: CredentialStore,
    B: PayloadBuilder,
    D: ProfileDecoder,
{
    /// Creates a service over the given collaborators and region table.
    pub fn new(store: S, builder: B, decoder: D, table: RegionTable, config: ServiceConfig) -> Self {
        Self { store, builder, decoder, table, config }
    }

    /// One-shot broadcast of engage actions, one per credential.
    ///
    /// Looks the region up strictly (no alias folding), probes the target's
    /// profile with up to `probe_limit` credentials, then bursts one engage
    /// request per credential, capped at `broadcast_cap`. A probe that finds
    /// no decodable profile does not abort the burst; the report simply
    /// carries `profile: None`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown region, a failed credential lookup,
    /// an empty pool, or a payload that cannot be built. Attempt-level
    /// failures are reported through the counts.
    pub async fn broadcast(&self, region: &str, target_id: u64) -> Result<CampaignReport> {
        let endpoints = self.table.get(region)?;
        let credentials = self.store.fetch(&endpoints.credential_namespace).await?;
        let pool = CredentialPool::new(credentials)?;

        let inspect_payload = self.builder.build(target_id, ActionKind::Inspect)?;
        let inspect_executor = self.executor(false)?;
        let profile = self
            .probe_profile(&inspect_executor, &pool, &endpoints.inspect_url, &inspect_payload)
            .await;

        let engage_payload = self.builder.build(target_id, ActionKind::Engage)?;
        let engage_executor = self.executor(true)?;
        let engine = DispatchEngine::with_executor(engage_executor, self.config.engine.clone());

        let count = pool.len().min(self.config.broadcast_cap);
        let burst = engine.burst(&pool, &endpoints.engage_url, engage_payload, count).await;

        info!(
            region,
            target_id,
            success = burst.success_count,
            fail = burst.failure_count,
            profile_found = profile.is_some(),
            "broadcast campaign complete"
        );

        Ok(CampaignReport {
            success: burst.success_count,
            fail: burst.failure_count,
            profile,
        })
    }

    /// Saturation run: inspect actions until `target` successes accumulate.
    ///
    /// The region code is canonicalized (aliases folded, unknown codes sent
    /// to the fallback region) before lookup. The first captured success
    /// body is decoded into the report's profile; an undecodable capture is
    /// absorbed as `profile: None`.
    ///
    /// # Errors
    ///
    /// Setup errors as for [`broadcast`](Self::broadcast), plus
    /// [`crate::DispatchError::TargetUnreachable`] when the run's round
    /// ceiling is hit before the target.
    pub async fn saturate(
        &self,
        region: &str,
        target_id: u64,
        target: usize,
    ) -> Result<CampaignReport> {
        let region = self.table.canonicalize(region);
        let endpoints = self.table.get(&region)?;
        let credentials = self.store.fetch(&endpoints.credential_namespace).await?;
        let pool = CredentialPool::new(credentials)?;

        let payload = self.builder.build(target_id, ActionKind::Inspect)?;
        let executor = self.executor(false)?;
        let engine =
            DispatchEngine::with_executor(executor, self.saturate_engine_config(target));

        let run = engine.seek_target(&pool, &endpoints.inspect_url, payload, target).await?;

        let profile = run.captured_payload.as_ref().and_then(|body| {
            self.decoder
                .decode(body)
                .map_err(|e| warn!(error = %e, "captured payload is undecodable"))
                .ok()
        });

        info!(
            region,
            target_id,
            success = run.total_success,
            sent = run.total_sent,
            profile_found = profile.is_some(),
            "saturation campaign complete"
        );

        Ok(CampaignReport {
            success: run.total_success,
            fail: run.total_sent - run.total_success,
            profile,
        })
    }

    /// Tries up to `probe_limit` credentials sequentially until one yields
    /// an HTTP 200 with a body.
    ///
    /// The first 200 wins: if its body does not decode, the probe reports no
    /// profile rather than spending further credentials.
    async fn probe_profile(
        &self,
        executor: &Arc<RequestExecutor>,
        pool: &CredentialPool,
        url: &str,
        payload: &Bytes,
    ) -> Option<PlayerProfile> {
        for i in 0..self.config.probe_limit {
            let credential = pool.select(i);
            match executor.execute(credential, url, payload.clone(), true).await {
                AttemptOutcome::Success(Some(body)) => {
                    return self
                        .decoder
                        .decode(&body)
                        .map_err(|e| warn!(error = %e, "profile body is undecodable"))
                        .ok();
                },
                AttemptOutcome::Success(None) | AttemptOutcome::Failure => {},
            }
        }
        warn!(probe_limit = self.config.probe_limit, "profile probe exhausted its credentials");
        None
    }

    fn executor(&self, verify_tls: bool) -> Result<Arc<RequestExecutor>> {
        let config = ExecutorConfig { verify_tls, ..self.config.executor.clone() };
        Ok(Arc::new(RequestExecutor::new(config)?))
    }

    /// Engine settings for one saturation run.
    ///
    /// Campaigns always run bounded: when no explicit ceiling is configured,
    /// the run may use `SATURATE_ROUND_MARGIN` times the minimum number of
    /// rounds the target requires before it is declared unreachable.
    fn saturate_engine_config(&self, target: usize) -> EngineConfig {
        let mut config = self.config.engine.clone();
        if config.max_rounds.is_none() {
            let min_rounds = target.div_ceil(config.round_cap.max(1)).max(1) as u32;
            config.max_rounds = NonZeroU32::new(min_rounds.saturating_mul(SATURATE_ROUND_MARGIN));
        }
        config
    }
}
