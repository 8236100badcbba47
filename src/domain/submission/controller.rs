//! `SubmissionController` — owns the form, drives one submission at a time,
//! and keeps the session's results.

use super::{SessionSnapshot, StatusMessage, SubmissionPhase, TradeTransport};
use crate::domain::form::{FormField, FormModel};
use crate::domain::trade::{TradeHistory, TradeRequest, TradeResponse};
use crate::error::SubmitError;

use async_lock::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const SUBMIT_SUCCESS: &str = "Trade submitted successfully!";
pub const SUBMIT_CANCELLED: &str = "Error: submission was cancelled";

/// Callback invoked with a fresh snapshot after every observable change.
///
/// It runs on whichever task drove the change; hop to the UI context inside
/// the callback if needed.
pub type SessionObserver = Arc<dyn Fn(&SessionSnapshot) + Send + Sync>;

#[derive(Debug, Default)]
struct Session {
    phase: SubmissionPhase,
    status: StatusMessage,
    trade_response: Option<TradeResponse>,
    history: TradeHistory,
}

/// Drives the trade submission lifecycle against a [`TradeTransport`].
///
/// Single-flight: while one `submit()` is awaiting the service, further calls
/// fail fast with [`SubmitError::Busy`]. They only replace the status line;
/// the in-flight phase and loading flag stay as they are. Form edits stay
/// possible during a submission and never cancel it.
pub struct SubmissionController<T> {
    transport: T,
    form: Mutex<FormModel>,
    session: Mutex<Session>,
    in_flight: AtomicBool,
    /// Set when a `submit()` future was dropped before it settled the session.
    abandoned: AtomicBool,
    observer: Option<SessionObserver>,
}

/// Releases the single-flight flag when the submission ends, however it ends.
/// A guard dropped before [`InFlight::complete`] marks the submission abandoned.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    abandoned: &'a AtomicBool,
    completed: bool,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, abandoned: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight {
                flag,
                abandoned,
                completed: false,
            })
    }

    fn complete(&mut self) {
        self.completed = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.abandoned.store(true, Ordering::Release);
        }
        self.flag.store(false, Ordering::Release);
    }
}

impl<T: TradeTransport> SubmissionController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            form: Mutex::new(FormModel::new()),
            session: Mutex::new(Session::default()),
            in_flight: AtomicBool::new(false),
            abandoned: AtomicBool::new(false),
            observer: None,
        }
    }

    /// Register the snapshot observer.
    pub fn with_observer(
        mut self,
        observer: impl Fn(&SessionSnapshot) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Form ─────────────────────────────────────────────────────────────

    /// Set one field (revalidating the form) and notify the observer.
    /// Returns the new validity.
    pub async fn set_field(&self, field: FormField, value: impl Into<String>) -> bool {
        self.edit_form(|form| form.set(field, value)).await
    }

    /// Apply an arbitrary edit to the form, then notify the observer.
    pub async fn edit_form<R>(&self, edit: impl FnOnce(&mut FormModel) -> R) -> R {
        let out = {
            let mut form = self.form.lock().await;
            edit(&mut form)
        };
        self.notify().await;
        out
    }

    /// Direct access to the form. Edits made through the guard are
    /// validated but not broadcast to the observer.
    pub async fn form(&self) -> MutexGuard<'_, FormModel> {
        self.form.lock().await
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Validate, build a [`TradeRequest`], and send it once.
    ///
    /// Every outcome updates the status message before returning. A request
    /// rejected before sending (validation or conversion) returns the phase to
    /// `Idle`. Only accepted trades are added to the history.
    ///
    /// Dropping the returned future mid-flight abandons the call. The session
    /// resolves to `Failed` with a cancellation status the next time it is
    /// read, and the controller accepts a new `submit()` straight away.
    pub async fn submit(&self) -> Result<TradeResponse, SubmitError> {
        let Some(mut guard) = InFlight::acquire(&self.in_flight, &self.abandoned) else {
            tracing::warn!("Submission rejected: another submission is in flight");
            let err = SubmitError::Busy;
            self.lock_session().await.status = StatusMessage::Error(err.status_text());
            self.notify().await;
            return Err(err);
        };

        let prepared = {
            let form = self.form.lock().await;
            prepare_request(&form)
        };

        let request = {
            let mut session = self.lock_session().await;
            session.status = StatusMessage::None;
            session.trade_response = None;

            match prepared {
                Ok(request) => {
                    session.phase = SubmissionPhase::Submitting;
                    request
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Submission rejected before sending");
                    session.phase = SubmissionPhase::Idle;
                    session.status = StatusMessage::Error(err.status_text());
                    guard.complete();
                    drop(session);
                    self.notify().await;
                    return Err(err);
                }
            }
        };
        self.notify().await;

        tracing::debug!(trade_id = %request.id, "Submitting trade");
        let result = self.transport.submit_trade(&request).await;

        let outcome = {
            let mut session = self.lock_session().await;
            guard.complete();
            match result {
                Ok(response) => {
                    session.history.push(request);
                    session.trade_response = Some(response.clone());
                    session.phase = SubmissionPhase::Succeeded;
                    session.status = StatusMessage::Success(SUBMIT_SUCCESS.to_string());
                    tracing::info!(
                        trade_id = %response.trade.id,
                        history_len = session.history.len(),
                        "Trade submitted"
                    );
                    Ok(response)
                }
                Err(e) => {
                    let err = SubmitError::from(e);
                    match &err {
                        SubmitError::Decoding { message, raw } => {
                            tracing::warn!(error = %message, raw = %raw, "Undecodable trade response")
                        }
                        other => tracing::warn!(error = %other, "Trade submission failed"),
                    }
                    session.phase = SubmissionPhase::Failed;
                    session.status = StatusMessage::Error(err.status_text());
                    Err(err)
                }
            }
        };
        self.notify().await;
        outcome
    }

    // ── Session accessors ────────────────────────────────────────────────

    pub async fn phase(&self) -> SubmissionPhase {
        self.lock_session().await.phase
    }

    pub async fn is_loading(&self) -> bool {
        self.phase().await.is_in_flight()
    }

    pub async fn status(&self) -> StatusMessage {
        self.lock_session().await.status.clone()
    }

    pub async fn trade_response(&self) -> Option<TradeResponse> {
        self.lock_session().await.trade_response.clone()
    }

    pub async fn history(&self) -> TradeHistory {
        self.lock_session().await.history.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.lock_session().await;
        let form = self.form.lock().await;
        SessionSnapshot {
            phase: session.phase,
            is_loading: session.phase.is_in_flight(),
            status: session.status.clone(),
            trade_response: session.trade_response.clone(),
            history: session.history.clone(),
            is_form_valid: form.is_valid(),
            form_errors: form.errors().to_vec(),
        }
    }

    /// Lock the session, first settling a submission whose future was dropped.
    async fn lock_session(&self) -> MutexGuard<'_, Session> {
        let mut session = self.session.lock().await;
        if self.abandoned.swap(false, Ordering::AcqRel) && session.phase.is_in_flight() {
            tracing::warn!("Submission abandoned before the service replied");
            session.phase = SubmissionPhase::Failed;
            session.status = StatusMessage::Error(SUBMIT_CANCELLED.to_string());
        }
        session
    }

    async fn notify(&self) {
        if let Some(observer) = &self.observer {
            let snapshot = self.snapshot().await;
            observer(&snapshot);
        }
    }
}

/// Guard on the validity signal, then convert. No request exists unless both pass.
fn prepare_request(form: &FormModel) -> Result<TradeRequest, SubmitError> {
    if !form.is_valid() {
        return Err(SubmitError::Validation(form.errors().to_vec()));
    }
    let terms = form.to_terms()?;
    Ok(TradeRequest::new(terms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::{decode_trade_response, MatchedTradeOrMessage};
    use crate::error::HttpError;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    enum Reply {
        Echo,
        EchoWithMessage(&'static str),
        Fail(fn() -> HttpError),
    }

    /// Replays scripted replies and records every request it sees.
    #[derive(Default)]
    struct ScriptedTransport {
        calls: AtomicUsize,
        replies: StdMutex<VecDeque<Reply>>,
        seen: StdMutex<Vec<TradeRequest>>,
    }

    impl ScriptedTransport {
        fn with(replies: Vec<Reply>) -> Self {
            Self {
                replies: StdMutex::new(replies.into()),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TradeTransport for ScriptedTransport {
        async fn submit_trade(&self, trade: &TradeRequest) -> Result<TradeResponse, HttpError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(trade.clone());
            let reply = self.replies.lock().unwrap().pop_front().unwrap_or(Reply::Echo);
            match reply {
                Reply::Echo => Ok(echo(trade, None)),
                Reply::EchoWithMessage(msg) => Ok(echo(
                    trade,
                    Some(MatchedTradeOrMessage::Message(msg.to_string())),
                )),
                Reply::Fail(make) => Err(make()),
            }
        }
    }

    fn echo(trade: &TradeRequest, matched: Option<MatchedTradeOrMessage>) -> TradeResponse {
        TradeResponse {
            trade: trade.clone(),
            matched_trade: matched,
            netting_result: None,
            settlement_instruction: None,
        }
    }

    async fn fill<T: TradeTransport>(controller: &SubmissionController<T>) {
        controller
            .edit_form(|form| {
                form.set_buyer("A");
                form.set_seller("B");
                form.set_instrument("XYZ");
                form.set_quantity("100");
                form.set_price("50.25");
            })
            .await;
    }

    #[tokio::test]
    async fn test_round_trip_succeeds_and_records_history() {
        let controller = SubmissionController::new(ScriptedTransport::default());
        fill(&controller).await;

        let response = controller.submit().await.unwrap();
        let sent = controller.transport().seen.lock().unwrap()[0].clone();
        assert_eq!(sent.buyer, "A");
        assert_eq!(sent.seller, "B");
        assert_eq!(sent.instrument, "XYZ");
        assert_eq!(sent.quantity, 100);
        assert_eq!(sent.price, Decimal::new(5025, 2));
        assert!(!sent.id.is_empty());
        assert_eq!(response.trade, sent);

        assert_eq!(controller.phase().await, SubmissionPhase::Succeeded);
        assert!(!controller.is_loading().await);
        assert_eq!(
            controller.status().await,
            StatusMessage::Success(SUBMIT_SUCCESS.to_string())
        );
        assert_eq!(controller.trade_response().await, Some(response));
        assert_eq!(controller.history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_never_calls_transport() {
        let controller = SubmissionController::new(ScriptedTransport::default());
        controller.set_field(FormField::Buyer, "A").await;

        let err = controller.submit().await.unwrap_err();
        match err {
            SubmitError::Validation(messages) => assert_eq!(messages.len(), 4),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(controller.transport().calls(), 0);
        assert_eq!(controller.phase().await, SubmissionPhase::Idle);
        assert_eq!(
            controller.status().await.text(),
            "Please correct the errors before submitting."
        );
        assert!(controller.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_conversion_failure_never_calls_transport() {
        let controller = SubmissionController::new(ScriptedTransport::default());
        fill(&controller).await;
        controller
            .form()
            .await
            .set_unvalidated(FormField::Price, "fifty");

        let err = controller.submit().await.unwrap_err();
        assert!(matches!(err, SubmitError::Conversion(_)));
        assert_eq!(controller.transport().calls(), 0);
        assert_eq!(
            controller.status().await.text(),
            "Invalid quantity or price. Please enter valid numbers."
        );
    }

    #[tokio::test]
    async fn test_server_error_fails_without_history() {
        let transport = ScriptedTransport::with(vec![Reply::Fail(|| HttpError::ServerError {
            status: 500,
            body: "internal".to_string(),
        })]);
        let controller = SubmissionController::new(transport);
        fill(&controller).await;

        let err = controller.submit().await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(controller.phase().await, SubmissionPhase::Failed);
        let status = controller.status().await;
        assert!(status.is_error());
        assert!(status.text().starts_with("Error: "));
        assert!(controller.history().await.is_empty());
        assert!(controller.trade_response().await.is_none());
    }

    #[tokio::test]
    async fn test_decode_failure_is_reported_separately() {
        let transport = ScriptedTransport::with(vec![Reply::Fail(|| {
            decode_trade_response(br#"{"settlementInstruction":"x"}"#).unwrap_err()
        })]);
        let controller = SubmissionController::new(transport);
        fill(&controller).await;

        let err = controller.submit().await.unwrap_err();
        assert!(err.is_decoding());
        assert_eq!(controller.phase().await, SubmissionPhase::Failed);
        assert!(controller.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_identical_submissions_get_distinct_ids() {
        let controller = SubmissionController::new(ScriptedTransport::default());
        fill(&controller).await;

        controller.submit().await.unwrap();
        controller.submit().await.unwrap();

        let seen = controller.transport().seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert_ne!(seen[0].id, seen[1].id);
        assert_eq!(controller.history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_after_success_keeps_history_and_clears_response() {
        let transport = ScriptedTransport::with(vec![
            Reply::EchoWithMessage("No match found"),
            Reply::Fail(|| HttpError::Timeout),
        ]);
        let controller = SubmissionController::new(transport);
        fill(&controller).await;

        let first = controller.submit().await.unwrap();
        assert_eq!(first.match_message(), Some("No match found"));
        assert!(controller.submit().await.is_err());

        assert_eq!(controller.phase().await, SubmissionPhase::Failed);
        assert_eq!(controller.history().await.len(), 1);
        assert!(controller.trade_response().await.is_none());
    }

    #[tokio::test]
    async fn test_rejection_after_success_returns_to_idle() {
        let controller = SubmissionController::new(ScriptedTransport::default());
        fill(&controller).await;
        controller.submit().await.unwrap();

        controller.set_field(FormField::Buyer, "").await;
        let err = controller.submit().await.unwrap_err();

        assert!(matches!(err, SubmitError::Validation(_)));
        assert_eq!(controller.phase().await, SubmissionPhase::Idle);
        assert!(controller.trade_response().await.is_none());
        assert!(controller.status().await.is_error());
        assert_eq!(controller.history().await.len(), 1);
        assert_eq!(controller.transport().calls(), 1);
    }

    #[tokio::test]
    async fn test_conversion_failure_after_failure_returns_to_idle() {
        let transport = ScriptedTransport::with(vec![Reply::Fail(|| HttpError::Timeout)]);
        let controller = SubmissionController::new(transport);
        fill(&controller).await;
        assert!(controller.submit().await.is_err());
        assert_eq!(controller.phase().await, SubmissionPhase::Failed);

        controller
            .form()
            .await
            .set_unvalidated(FormField::Quantity, "many");
        let err = controller.submit().await.unwrap_err();

        assert!(matches!(err, SubmitError::Conversion(_)));
        assert_eq!(controller.phase().await, SubmissionPhase::Idle);
        assert_eq!(controller.transport().calls(), 1);
    }

    #[tokio::test]
    async fn test_observer_sees_loading_then_result() {
        let seen: Arc<StdMutex<Vec<(SubmissionPhase, bool)>>> = Arc::default();
        let sink = seen.clone();
        let controller = SubmissionController::new(ScriptedTransport::default())
            .with_observer(move |snap| sink.lock().unwrap().push((snap.phase, snap.is_loading)));
        fill(&controller).await;
        seen.lock().unwrap().clear();

        controller.submit().await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (SubmissionPhase::Submitting, true),
                (SubmissionPhase::Succeeded, false)
            ]
        );
    }

    /// Holds every call until the gate is opened.
    struct GatedTransport {
        gate: Arc<Notify>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TradeTransport for GatedTransport {
        async fn submit_trade(&self, trade: &TradeRequest) -> Result<TradeResponse, HttpError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(echo(trade, None))
        }
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_busy() {
        let gate = Arc::new(Notify::new());
        let controller = Arc::new(SubmissionController::new(GatedTransport {
            gate: gate.clone(),
            calls: AtomicUsize::new(0),
        }));
        fill(&*controller).await;

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit().await }
        });
        while !controller.is_loading().await {
            tokio::task::yield_now().await;
        }

        let second = controller.submit().await;
        assert!(matches!(second, Err(SubmitError::Busy)));
        assert!(controller.is_loading().await);
        assert_eq!(
            controller.status().await,
            StatusMessage::Error("A trade submission is already in progress.".to_string())
        );

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(
            controller.status().await,
            StatusMessage::Success(SUBMIT_SUCCESS.to_string())
        );

        assert_eq!(controller.transport().calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.phase().await, SubmissionPhase::Succeeded);
        assert_eq!(controller.history().await.len(), 1);

        // Ready again once resolved.
        gate.notify_one();
        controller.submit().await.unwrap();
        assert_eq!(controller.history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_editing_during_flight_does_not_cancel() {
        let gate = Arc::new(Notify::new());
        let controller = Arc::new(SubmissionController::new(GatedTransport {
            gate: gate.clone(),
            calls: AtomicUsize::new(0),
        }));
        fill(&*controller).await;

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit().await }
        });
        while !controller.is_loading().await {
            tokio::task::yield_now().await;
        }

        assert!(!controller.set_field(FormField::Quantity, "abc").await);
        gate.notify_one();
        let response = first.await.unwrap().unwrap();

        assert_eq!(response.trade.quantity, 100);
        assert_eq!(controller.phase().await, SubmissionPhase::Succeeded);
    }

    #[tokio::test]
    async fn test_dropped_submission_resolves_to_failed() {
        let gate = Arc::new(Notify::new());
        let controller = SubmissionController::new(GatedTransport {
            gate: gate.clone(),
            calls: AtomicUsize::new(0),
        });
        fill(&controller).await;

        let abandoned =
            tokio::time::timeout(Duration::from_millis(20), controller.submit()).await;
        assert!(abandoned.is_err());

        assert_eq!(controller.phase().await, SubmissionPhase::Failed);
        assert!(!controller.is_loading().await);
        assert_eq!(
            controller.status().await,
            StatusMessage::Error(SUBMIT_CANCELLED.to_string())
        );
        assert!(controller.history().await.is_empty());

        gate.notify_one();
        controller.submit().await.unwrap();
        assert_eq!(controller.phase().await, SubmissionPhase::Succeeded);
        assert_eq!(controller.history().await.len(), 1);
        assert_eq!(controller.transport().calls.load(Ordering::SeqCst), 2);
    }
}
