//! Error types for dispatch operations.
//!
//! Only preconditions and setup problems surface as errors: an empty
//! credential pool, an unknown region, a payload that cannot be built, or a
//! run that hit its safety bound. Per-attempt trouble (timeouts, connection
//! failures, non-200 responses) is absorbed into success/failure counters and
//! never propagates as an error.

use thiserror::Error;

/// Result type alias for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Error conditions that abort or bound a dispatch operation.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// No credentials available; checked once before any round runs.
    #[error("credential pool is empty")]
    EmptyPool,

    /// Region code not present in the endpoint table.
    #[error("unknown region: {region}")]
    UnknownRegion {
        /// Region code as supplied by the caller.
        region: String,
    },

    /// HTTP client or engine could not be configured.
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Configuration error message.
        message: String,
    },

    /// Credential store lookup failed.
    #[error("credential store error: {message}")]
    CredentialStore {
        /// Store error message.
        message: String,
    },

    /// Request payload could not be constructed.
    #[error("payload construction failed: {message}")]
    PayloadBuild {
        /// Builder error message.
        message: String,
    },

    /// Captured response body could not be decoded.
    #[error("response decoding failed: {message}")]
    Decode {
        /// Decoder error message.
        message: String,
    },

    /// Round ceiling reached before the success target was met.
    #[error(
        "target unreachable: {successes}/{target} successes after {attempts} attempts in {rounds} rounds"
    )]
    TargetUnreachable {
        /// Success count the run was asked to reach.
        target: usize,
        /// Successes accumulated before the bound was hit.
        successes: usize,
        /// Total attempts issued across all rounds.
        attempts: usize,
        /// Rounds completed before the bound was hit.
        rounds: u32,
    },

    /// Run cancelled via its cancellation token.
    #[error("dispatch cancelled")]
    Cancelled,
}

impl DispatchError {
    /// Creates an unknown-region error.
    pub fn unknown_region(region: impl Into<String>) -> Self {
        Self::UnknownRegion { region: region.into() }
    }

    /// Creates a configuration error from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Creates a credential store error from a message.
    pub fn credential_store(message: impl Into<String>) -> Self {
        Self::CredentialStore { message: message.into() }
    }

    /// Creates a payload construction error from a message.
    pub fn payload_build(message: impl Into<String>) -> Self {
        Self::PayloadBuild { message: message.into() }
    }

    /// Creates a decode error from a message.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into() }
    }

    /// Creates a target-unreachable error with the run's final tallies.
    pub fn target_unreachable(target: usize, successes: usize, attempts: usize, rounds: u32) -> Self {
        Self::TargetUnreachable { target, successes, attempts, rounds }
    }

    /// Returns `true` for setup errors that abort before any round runs.
    ///
    /// `TargetUnreachable` and `Cancelled` can carry partial progress;
    /// `Decode` occurs after a run has already completed.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            Self::EmptyPool
                | Self::UnknownRegion { .. }
                | Self::Configuration { .. }
                | Self::CredentialStore { .. }
                | Self::PayloadBuild { .. }
        )
    }
}
