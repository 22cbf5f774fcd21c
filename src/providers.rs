//! Collaborator seams consumed by the dispatch engine.
//!
//! Credential persistence, payload cryptography and response decoding live
//! outside this crate. They are consumed through narrow traits so production
//! implementations and lightweight test doubles are interchangeable.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{credential::Credential, error::Result};

/// Which kind of action a payload authorizes against the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Informational read of a target's public profile.
    Inspect,
    /// Mutating action directed at the target.
    Engage,
}

/// Source of credentials for a region's namespace.
///
/// Implementations typically back onto a datastore. Returning an empty list
/// is not an error at this seam; the caller maps it to an empty-pool abort
/// before any round runs.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetches the ordered credential list stored under `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DispatchError::CredentialStore`] when the lookup
    /// itself fails.
    async fn fetch(&self, namespace: &str) -> Result<Vec<Credential>>;
}

/// Builds the opaque request payload for a target and action.
///
/// Deterministic for given inputs; the engine builds a payload once per run
/// and reuses it across every attempt.
pub trait PayloadBuilder: Send + Sync {
    /// Constructs the wire payload for `target_id` and `action`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DispatchError::PayloadBuild`] when the payload
    /// cannot be constructed; this aborts the operation before any round.
    fn build(&self, target_id: u64, action: ActionKind) -> Result<Bytes>;
}

/// Structured player record decoded from a captured response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Numeric account identifier.
    pub id: u64,
    /// Display name.
    pub nickname: String,
    /// Like count.
    pub likes: u64,
    /// Region the account is homed in.
    pub region: String,
    /// Account level.
    pub level: u32,
}

/// Decodes a captured response body into a [`PlayerProfile`].
pub trait ProfileDecoder: Send + Sync {
    /// Decodes `body` into a profile.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DispatchError::Decode`] on malformed input. Callers
    /// absorb this as "no profile available" rather than aborting the
    /// dispatch that produced the body.
    fn decode(&self, body: &[u8]) -> Result<PlayerProfile>;
}
