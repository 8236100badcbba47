//! Submission domain — the submit/await/settle lifecycle.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──▶ Succeeded ─┐
//!   ▲                  │                         │
//!   │                  └───err──▶ Failed ────────┤
//!   └──────────── next submit() ◀────────────────┘
//! ```
//!
//! `Succeeded` and `Failed` are resting phases: they keep the last result on
//! display and accept the next `submit()` exactly like `Idle`.

pub mod controller;

use crate::domain::trade::{TradeHistory, TradeRequest, TradeResponse};
use crate::error::HttpError;
use async_trait::async_trait;
use std::fmt;

pub use controller::SubmissionController;

// ─── SubmissionPhase ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionPhase {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmissionPhase::Submitting)
    }
}

impl fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionPhase::Idle => write!(f, "Idle"),
            SubmissionPhase::Submitting => write!(f, "Submitting"),
            SubmissionPhase::Succeeded => write!(f, "Succeeded"),
            SubmissionPhase::Failed => write!(f, "Failed"),
        }
    }
}

// ─── StatusMessage ───────────────────────────────────────────────────────────

/// User-visible status line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusMessage {
    #[default]
    None,
    Success(String),
    Error(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            StatusMessage::None => "",
            StatusMessage::Success(s) | StatusMessage::Error(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::Error(_))
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

// ─── SessionSnapshot ─────────────────────────────────────────────────────────

/// Point-in-time copy of everything an observer renders.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: SubmissionPhase,
    pub is_loading: bool,
    pub status: StatusMessage,
    pub trade_response: Option<TradeResponse>,
    pub history: TradeHistory,
    pub is_form_valid: bool,
    pub form_errors: Vec<String>,
}

// ─── TradeTransport ──────────────────────────────────────────────────────────

/// The single outbound call to the trade-processing service.
///
/// Implementations perform exactly one request per call and never retry.
/// Undecodable bodies must surface as [`HttpError::Decode`] so they stay
/// distinguishable from transport failures.
#[async_trait]
pub trait TradeTransport: Send + Sync {
    async fn submit_trade(&self, trade: &TradeRequest) -> Result<TradeResponse, HttpError>;
}

#[async_trait]
impl<T: TradeTransport + ?Sized> TradeTransport for std::sync::Arc<T> {
    async fn submit_trade(&self, trade: &TradeRequest) -> Result<TradeResponse, HttpError> {
        (**self).submit_trade(trade).await
    }
}
