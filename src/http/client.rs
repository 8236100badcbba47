//! Low-level HTTP client — `ClearingHttp`.
//!
//! One method per service endpoint. Internal to the SDK: `ClearingClient`
//! wraps it.

use crate::domain::trade::{decode_trade_response, TradeRequest, TradeResponse};
use crate::error::HttpError;
use crate::network::TRADE_PROCESSING_PATH;

use reqwest::Client;
use std::time::Duration;
use tracing;

/// Low-level HTTP client for the trade-processing service.
#[derive(Clone)]
pub struct ClearingHttp {
    base_url: String,
    client: Client,
    /// Function key appended as `?code=`. NEVER logged.
    function_key: Option<String>,
}

impl ClearingHttp {
    pub fn new(
        base_url: &str,
        function_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            function_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Trades ───────────────────────────────────────────────────────────

    /// POST one trade for processing. Never retried.
    pub async fn submit_trade(&self, trade: &TradeRequest) -> Result<TradeResponse, HttpError> {
        let url = self.trade_processing_url();

        if let Ok(body) = serde_json::to_string(trade) {
            tracing::debug!(body = %body, "Request body");
        }

        let resp = self
            .client
            .post(&url)
            .json(trade)
            .send()
            .await
            .map_err(classify)?;
        let status = resp.status();
        tracing::debug!(status = status.as_u16(), "HTTP response");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(HttpError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(classify)?;
        if bytes.is_empty() {
            return Err(HttpError::EmptyBody {
                status: status.as_u16(),
            });
        }

        match decode_trade_response(&bytes) {
            Ok(decoded) => {
                tracing::debug!(trade_id = %decoded.trade.id, "Decoded response");
                Ok(decoded)
            }
            Err(e) => {
                if let HttpError::Decode { message, raw } = &e {
                    tracing::warn!(error = %message, raw = %raw, "Error decoding response");
                }
                Err(e)
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────────

    fn trade_processing_url(&self) -> String {
        let url = format!("{}{}", self.base_url, TRADE_PROCESSING_PATH);
        match &self.function_key {
            Some(key) => format!("{}?code={}", url, urlencoding::encode(key)),
            None => url,
        }
    }
}

fn classify(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Reqwest(e)
    }
}
