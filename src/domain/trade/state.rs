//! Trade state containers — session-owned, append-only.

use super::TradeRequest;
use crate::shared::TradeId;

/// Trades accepted by the service during this session, oldest first.
///
/// Append-only: there is no way to remove or mutate a recorded trade.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeHistory {
    trades: Vec<TradeRequest>,
}

impl TradeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted trade.
    pub fn push(&mut self, trade: TradeRequest) {
        self.trades.push(trade);
    }

    pub fn trades(&self) -> &[TradeRequest] {
        &self.trades
    }

    pub fn latest(&self) -> Option<&TradeRequest> {
        self.trades.last()
    }

    pub fn get(&self, id: &TradeId) -> Option<&TradeRequest> {
        self.trades.iter().find(|t| &t.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TradeRequest> {
        self.trades.iter()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

impl<'a> IntoIterator for &'a TradeHistory {
    type Item = &'a TradeRequest;
    type IntoIter = std::slice::Iter<'a, TradeRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}
