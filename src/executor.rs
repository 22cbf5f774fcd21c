//! HTTP request executor with per-attempt outcome classification.
//!
//! Performs exactly one network call per invocation and reduces whatever
//! happens (status codes, timeouts, connection failures) to a binary
//! [`AttemptOutcome`]. The executor never retries; reissuing attempts is the
//! batch dispatcher's job.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::{info_span, Instrument};

use crate::{
    credential::Credential,
    error::{DispatchError, Result},
    DEFAULT_ATTEMPT_TIMEOUT_SECS,
};

/// Configuration for the request executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Whether to verify TLS certificates. Informational-read endpoints are
    /// historically served with certificates that fail verification; mutating
    /// endpoints keep verification on.
    pub verify_tls: bool,
    /// User agent string for requests.
    pub user_agent: String,
    /// Static protocol headers sent with every attempt, credential aside.
    pub static_headers: Vec<(String, String)>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_ATTEMPT_TIMEOUT_SECS),
            verify_tls: true,
            user_agent: concat!("volley/", env!("CARGO_PKG_VERSION")).to_string(),
            static_headers: vec![(
                "Content-Type".to_string(),
                "application/octet-stream".to_string(),
            )],
        }
    }
}

/// Result of a single dispatch attempt.
///
/// `Success` carries the response body only when the caller asked for it;
/// bulk attempts skip the body read entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// HTTP 200 response, optionally with the raw body retained.
    Success(Option<Bytes>),
    /// Anything else: non-200 status, timeout, connection error.
    Failure,
}

impl AttemptOutcome {
    /// Returns `true` for successful attempts.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Executes individual dispatch attempts over a shared HTTP transport.
///
/// One executor owns one `reqwest::Client` and with it the connection pool
/// for a whole dispatch operation; dropping the executor releases every
/// connection, including on early-abort paths.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: reqwest::Client,
    config: ExecutorConfig,
}

impl RequestExecutor {
    /// Creates an executor with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Configuration`] if the HTTP client cannot be
    /// built with the provided settings.
    pub fn new(config: ExecutorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| {
                DispatchError::configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// Creates an executor with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ExecutorConfig::default())
    }

    /// Issues one POST attempt and classifies the result.
    ///
    /// Sends `body` to `url` with the static header template plus a bearer
    /// authorization built from `credential`. An HTTP 200 response is a
    /// success; when `capture_body` is set the full response body is read and
    /// returned with it. Every other condition, whether a non-200 status, a
    /// timeout, a connection failure or a body read failure, is absorbed as
    /// [`AttemptOutcome::Failure`]. This method never returns an error and
    /// never retries.
    pub async fn execute(
        &self,
        credential: &Credential,
        url: &str,
        body: Bytes,
        capture_body: bool,
    ) -> AttemptOutcome {
        let span = info_span!("dispatch_attempt", credential = %credential, url = %url);

        async move {
            let mut request = self
                .client
                .post(url)
                .header(AUTHORIZATION, format!("Bearer {}", credential.token()))
                .body(body);

            for (name, value) in &self.config.static_headers {
                request = request.header(name, value);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    if e.is_timeout() {
                        tracing::warn!(timeout_secs = self.config.timeout.as_secs(), "attempt timed out");
                    } else {
                        tracing::warn!(error = %e, "attempt failed to send");
                    }
                    return AttemptOutcome::Failure;
                },
            };

            let status = response.status();
            if status != reqwest::StatusCode::OK {
                tracing::debug!(status = status.as_u16(), "non-200 response");
                return AttemptOutcome::Failure;
            }

            if !capture_body {
                return AttemptOutcome::Success(None);
            }

            match response.bytes().await {
                Ok(bytes) => {
                    tracing::debug!(body_len = bytes.len(), "captured response body");
                    AttemptOutcome::Success(Some(bytes))
                },
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read response body");
                    AttemptOutcome::Failure
                },
            }
        }
        .instrument(span)
        .await
    }
}
