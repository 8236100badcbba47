//! Domain modules organized as vertical slices.
//!
//! - `trade` — request/response types (`wire.rs`), session history
//!   (`state.rs`), and the direct-submission sub-client (`client.rs`)
//! - `form` — trade-entry fields and validation rules
//! - `submission` — the single-flight submission lifecycle

pub mod form;
pub mod submission;
pub mod trade;
