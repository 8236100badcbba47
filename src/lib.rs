//! # Clearing Engine SDK
//!
//! Client-side trade submission for the Clearing Engine trade-processing
//! service: validate trade terms, submit them, and model the service's answer
//! (matched trade, netting result, settlement instruction).
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Types, form validation, the submission state machine (no I/O)
//! 2. **HTTP API** — `ClearingHttp`, one POST per submission, no retries
//! 3. **High-Level Client** — `ClearingClient` with a builder and sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use clearing_sdk::prelude::*;
//!
//! let client = ClearingClient::builder()
//!     .function_key("...")
//!     .build()?;
//!
//! let controller = client.controller();
//! controller.set_field(FormField::Buyer, "A").await;
//! // ... remaining fields ...
//! let response = controller.submit().await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client for the trade-processing endpoint.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: High-Level Client ───────────────────────────────────────────────

/// `ClearingClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::TradeId;

    // Domain types — trade
    pub use crate::domain::trade::{
        MatchedTradeOrMessage, NettingResult, TradeHistory, TradeRequest, TradeResponse,
        TradeTerms,
    };

    // Domain types — form
    pub use crate::domain::form::{FormField, FormModel, FormValidation};

    // Domain types — submission
    pub use crate::domain::submission::{
        SessionSnapshot, StatusMessage, SubmissionController, SubmissionPhase, TradeTransport,
    };

    // Errors
    pub use crate::error::{ConversionError, HttpError, SdkError, SubmitError};

    // Network
    pub use crate::network::DEFAULT_API_URL;

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{ClearingClient, ClearingClientBuilder, TradesClient};
}
