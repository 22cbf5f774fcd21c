//! Credential-rotating bulk HTTP dispatch engine.
//!
//! Volley issues large numbers of outbound HTTP requests against a remote
//! service, rotating through a pool of bearer credentials, and stops either
//! when a configured count of successful responses has been reached or when
//! further progress is impossible.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐
//! │ DispatchEngine  │──▶│ BatchDispatcher │──▶│ RequestExecutor │
//! └─────────────────┘   └─────────────────┘   └─────────────────┘
//!        │                      │                      │
//!        ▼                      ▼                      ▼
//! ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐
//! │ Round loop,     │   │ Bounded fan-out │   │ One HTTP call,  │
//! │ success target  │   │ + join barrier  │   │ outcome only    │
//! └─────────────────┘   └─────────────────┘   └─────────────────┘
//! ```
//!
//! Rounds run strictly sequentially; within a round every attempt runs
//! concurrently and the round is a synchronization barrier. Each attempt
//! draws its credential from a read-only [`CredentialPool`] by rotation
//! index, so the same credential may serve many attempts in one run.
//!
//! # Modes
//!
//! - **Burst** ([`DispatchEngine::burst`]): a single one-shot round, one
//!   attempt per selected credential, tallied as success/failure counts.
//! - **Target-seeking** ([`DispatchEngine::seek_target`]): repeated rounds
//!   until a cumulative success target is met, capturing the first successful
//!   response body once for downstream decoding.
//!
//! Credential storage, payload construction and response decoding are out of
//! scope and consumed through the seams in [`providers`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod credential;
pub mod engine;
pub mod error;
pub mod executor;
pub mod providers;
pub mod region;
pub mod service;

pub use batch::{BatchDispatcher, RoundResult};
pub use credential::{Credential, CredentialPool};
pub use engine::{BurstResult, DispatchEngine, EngineConfig, RunResult};
pub use error::{DispatchError, Result};
pub use executor::{AttemptOutcome, ExecutorConfig, RequestExecutor};
pub use providers::{ActionKind, CredentialStore, PayloadBuilder, PlayerProfile, ProfileDecoder};
pub use region::{RegionEndpoints, RegionTable};
pub use service::{CampaignReport, DispatchService, ServiceConfig};

/// Upper bound on the number of attempts issued in a single round.
pub const DEFAULT_ROUND_CAP: usize = 1000;

/// Default per-attempt timeout in seconds.
pub const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 10;

/// Default number of credentials tried sequentially when probing a profile.
pub const DEFAULT_PROBE_LIMIT: usize = 25;

/// Default ceiling on credentials used by a broadcast campaign.
pub const DEFAULT_BROADCAST_CAP: usize = 110;
