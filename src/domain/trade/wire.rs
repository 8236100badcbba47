//! Wire types for the trade-processing response.

use super::TradeRequest;
use crate::error::HttpError;
use serde::{Deserialize, Deserializer, Serialize};

/// Result of processing one submitted trade.
///
/// Each optional field is independent: a match does not imply netting, and
/// netting does not imply a settlement instruction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeResponse {
    pub trade: TradeRequest,
    #[serde(default)]
    pub matched_trade: Option<MatchedTradeOrMessage>,
    #[serde(default)]
    pub netting_result: Option<NettingResult>,
    #[serde(default)]
    pub settlement_instruction: Option<String>,
}

impl TradeResponse {
    /// The counterparty trade, when the service returned one.
    pub fn matched_trade(&self) -> Option<&TradeRequest> {
        match &self.matched_trade {
            Some(MatchedTradeOrMessage::Trade(trade)) => Some(trade),
            _ => None,
        }
    }

    /// The diagnostic text sent in place of a matched trade (e.g. "No match found").
    pub fn match_message(&self) -> Option<&str> {
        match &self.matched_trade {
            Some(MatchedTradeOrMessage::Message(msg)) => Some(msg),
            _ => None,
        }
    }

    /// Settlement instruction split into its lines. Empty when absent.
    pub fn settlement_lines(&self) -> Vec<&str> {
        self.settlement_instruction
            .as_deref()
            .map(|s| s.split('\n').collect())
            .unwrap_or_default()
    }
}

/// Net position between the trade's parties, computed by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NettingResult {
    pub trade_id: String,
    pub counterparty: String,
    pub net_position: i64,
}

/// A slot the service fills with either a full trade or a plain message.
///
/// There is no discriminator on the wire, so the decode order is part of the
/// contract: try [`TradeRequest`] first, then a plain string. Anything else
/// (numbers, partial trade objects) is a decode error.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum MatchedTradeOrMessage {
    Trade(TradeRequest),
    Message(String),
}

impl<'de> Deserialize<'de> for MatchedTradeOrMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;

        if let Ok(trade) = TradeRequest::deserialize(&value) {
            return Ok(MatchedTradeOrMessage::Trade(trade));
        }
        if let serde_json::Value::String(message) = value {
            return Ok(MatchedTradeOrMessage::Message(message));
        }

        Err(serde::de::Error::custom(
            "matched trade could not be decoded as a trade or a message",
        ))
    }
}

/// Decode a response body, keeping the raw payload on failure.
pub fn decode_trade_response(body: &[u8]) -> Result<TradeResponse, HttpError> {
    serde_json::from_slice(body).map_err(|e| HttpError::Decode {
        message: e.to_string(),
        raw: String::from_utf8_lossy(body).into_owned(),
    })
}
