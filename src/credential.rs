//! Credential tokens and the rotating pool they are drawn from.
//!
//! A pool is an ordered, read-only sequence of opaque bearer tokens.
//! Attempts select credentials by rotation index, wrapping modulo the pool
//! length, so one credential may serve many attempts within a single run.
//! Non-emptiness is checked exactly once, at construction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};

/// Opaque authentication token authorizing one outbound request.
///
/// The raw token never appears in `Debug` or `Display` output; only a short
/// suffix is shown so log lines can be correlated with a stored credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for header construction.
    pub fn token(&self) -> &str {
        &self.0
    }

    fn redacted(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let start = chars.len().saturating_sub(4);
        format!("…{}", chars[start..].iter().collect::<String>())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.redacted()).finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.redacted())
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

/// Ordered, cyclic sequence of credentials shared read-only across a run.
///
/// Selection wraps indefinitely: `select(i)` returns the credential at
/// `i % len`, so `select(i) == select(i + len)` for every `i`. The pool is
/// never mutated while a dispatch is running.
#[derive(Debug, Clone)]
pub struct CredentialPool {
    credentials: Vec<Credential>,
}

impl CredentialPool {
    /// Builds a pool from an ordered credential list.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::EmptyPool`] when `credentials` is empty, so
    /// no dispatch round can ever observe a zero-length pool.
    pub fn new(credentials: Vec<Credential>) -> Result<Self> {
        if credentials.is_empty() {
            return Err(DispatchError::EmptyPool);
        }
        Ok(Self { credentials })
    }

    /// Returns the credential at rotation index `i`, wrapping modulo the
    /// pool length.
    pub fn select(&self, i: usize) -> &Credential {
        &self.credentials[i % self.credentials.len()]
    }

    /// Number of distinct credentials in the pool. Always at least 1.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Always `false`: construction rejects empty pools.
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pool_rejected_at_construction() {
        let result = CredentialPool::new(Vec::new());
        assert!(matches!(result, Err(DispatchError::EmptyPool)));
    }

    #[test]
    fn selection_wraps_with_pool_length() {
        let pool = CredentialPool::new(vec!["a".into(), "b".into(), "c".into()])
            .expect("pool should build");

        for i in 0..10 {
            assert_eq!(pool.select(i), pool.select(i + pool.len()));
        }
        assert_eq!(pool.select(0).token(), "a");
        assert_eq!(pool.select(4).token(), "b");
        assert_eq!(pool.select(5).token(), "c");
    }

    #[test]
    fn single_credential_serves_every_index() {
        let pool = CredentialPool::new(vec!["only".into()]).expect("pool should build");
        for i in 0..5 {
            assert_eq!(pool.select(i).token(), "only");
        }
    }

    #[test]
    fn debug_and_display_redact_token() {
        let cred = Credential::new("secret-token-abcd");
        assert_eq!(cred.to_string(), "…abcd");
        assert!(!format!("{cred:?}").contains("secret"));

        let short = Credential::new("ab");
        assert_eq!(short.to_string(), "…ab");
    }
}
