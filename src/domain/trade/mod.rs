//! Trade domain — trade requests, processing results, session history.

#[cfg(feature = "http")]
pub mod client;
pub mod state;
pub mod wire;

use crate::shared::{format_price, TradeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use state::TradeHistory;
pub use wire::{decode_trade_response, MatchedTradeOrMessage, NettingResult, TradeResponse};

/// Converted trade terms, before an identifier is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeTerms {
    pub buyer: String,
    pub seller: String,
    pub instrument: String,
    pub quantity: u64,
    pub price: Decimal,
}

/// A trade submitted for processing.
///
/// Built once per submission attempt and never mutated afterwards. The same
/// shape comes back from the service inside a [`TradeResponse`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeRequest {
    pub id: TradeId,
    pub buyer: String,
    pub seller: String,
    pub instrument: String,
    pub quantity: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl TradeRequest {
    /// Attach a freshly generated id to `terms`.
    pub fn new(terms: TradeTerms) -> Self {
        Self::with_id(TradeId::generate(), terms)
    }

    pub fn with_id(id: TradeId, terms: TradeTerms) -> Self {
        Self {
            id,
            buyer: terms.buyer,
            seller: terms.seller,
            instrument: terms.instrument,
            quantity: terms.quantity,
            price: terms.price,
        }
    }
}

impl fmt::Display for TradeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Buyer: {} | Seller: {} | Instrument: {} | Quantity: {} | Price: ${}",
            self.buyer,
            self.seller,
            self.instrument,
            self.quantity,
            format_price(&self.price)
        )
    }
}
