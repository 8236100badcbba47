//! High-level client — `ClearingClient` with nested sub-client accessors.
//!
//! This module keeps the builder (endpoint configuration) and the
//! [`TradeTransport`] binding that lets a `SubmissionController` drive the
//! real service.

use crate::domain::submission::{SubmissionController, TradeTransport};
use crate::domain::trade::client::Trades;
use crate::domain::trade::{TradeRequest, TradeResponse};
use crate::error::{HttpError, SdkError};
use crate::http::ClearingHttp;
use crate::network;

use async_trait::async_trait;
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::trade::client::Trades as TradesClient;

/// The primary entry point for the Clearing Engine SDK.
#[derive(Clone)]
pub struct ClearingClient {
    pub(crate) http: ClearingHttp,
}

impl ClearingClient {
    pub fn builder() -> ClearingClientBuilder {
        ClearingClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn trades(&self) -> Trades<'_> {
        Trades { client: self }
    }

    /// A fresh submission session bound to this client.
    pub fn controller(&self) -> SubmissionController<ClearingClient> {
        SubmissionController::new(self.clone())
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

#[async_trait]
impl TradeTransport for ClearingClient {
    async fn submit_trade(&self, trade: &TradeRequest) -> Result<TradeResponse, HttpError> {
        self.http.submit_trade(trade).await
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct ClearingClientBuilder {
    base_url: String,
    function_key: Option<String>,
    timeout: Duration,
}

impl Default for ClearingClientBuilder {
    fn default() -> Self {
        Self {
            base_url: network::DEFAULT_API_URL.to_string(),
            function_key: None,
            timeout: network::DEFAULT_TIMEOUT,
        }
    }
}

impl ClearingClientBuilder {
    /// Start from the defaults, overridden by `CLEARING_API_URL`,
    /// `CLEARING_FUNCTION_KEY` and `CLEARING_TIMEOUT_SECS` when set.
    pub fn from_env() -> Result<Self, SdkError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SdkError> {
        let mut builder = Self::default();
        if let Some(url) = lookup(network::ENV_API_URL) {
            builder = builder.base_url(&url);
        }
        if let Some(key) = lookup(network::ENV_FUNCTION_KEY) {
            builder = builder.function_key(key);
        }
        if let Some(raw) = lookup(network::ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                SdkError::Validation(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    network::ENV_TIMEOUT_SECS,
                    raw
                ))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(builder)
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn function_key(mut self, key: impl Into<String>) -> Self {
        self.function_key = Some(key.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ClearingClient, SdkError> {
        if self.base_url.trim().is_empty() {
            return Err(SdkError::Validation("base URL must not be empty".to_string()));
        }
        Ok(ClearingClient {
            http: ClearingHttp::new(&self.base_url, self.function_key, self.timeout)?,
        })
    }
}
