//! Trades sub-client — direct trade submission, bypassing the form.

use crate::client::ClearingClient;
use crate::domain::trade::{TradeRequest, TradeResponse, TradeTerms};
use crate::error::SdkError;

pub struct Trades<'a> {
    pub(crate) client: &'a ClearingClient,
}

impl<'a> Trades<'a> {
    /// Send an already-built request.
    pub async fn submit(&self, request: &TradeRequest) -> Result<TradeResponse, SdkError> {
        Ok(self.client.http.submit_trade(request).await?)
    }

    /// Attach a fresh id to `terms` and send them.
    pub async fn submit_terms(&self, terms: TradeTerms) -> Result<TradeResponse, SdkError> {
        let request = TradeRequest::new(terms);
        self.submit(&request).await
    }
}
