//! HTTP client layer — `ClearingHttp`.

pub mod client;

pub use client::ClearingHttp;
