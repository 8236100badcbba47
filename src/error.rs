//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid server response (status {status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("No data received from server (status {status})")]
    EmptyBody { status: u16 },

    /// The body arrived but is not a valid `TradeResponse`. `raw` keeps the
    /// payload for diagnosis.
    #[error("Could not decode server response: {message}")]
    Decode { message: String, raw: String },

    #[error("Timeout")]
    Timeout,
}

/// A numeric field that passed validation but still failed to convert.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("quantity {0:?} is not a positive integer")]
    Quantity(String),

    #[error("price {0:?} is not a decimal number")]
    Price(String),
}

/// Terminal outcome of a rejected or failed `submit()`.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// One or more form rules failed; messages are in rule order.
    #[error("Validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("{0}")]
    Network(HttpError),

    #[error("Decoding failed: {message}")]
    Decoding { message: String, raw: String },

    /// A submission is already in flight.
    #[error("A submission is already in progress")]
    Busy,
}

impl From<HttpError> for SubmitError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::Decode { message, raw } => SubmitError::Decoding { message, raw },
            other => SubmitError::Network(other),
        }
    }
}

impl SubmitError {
    /// The single user-facing status line for this failure.
    pub fn status_text(&self) -> String {
        match self {
            SubmitError::Validation(_) => {
                "Please correct the errors before submitting.".to_string()
            }
            SubmitError::Conversion(_) => {
                "Invalid quantity or price. Please enter valid numbers.".to_string()
            }
            SubmitError::Network(e) => format!("Error: {}", e),
            SubmitError::Decoding { message, .. } => format!("Error: {}", message),
            SubmitError::Busy => "A trade submission is already in progress.".to_string(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, SubmitError::Network(_))
    }

    pub fn is_decoding(&self) -> bool {
        matches!(self, SubmitError::Decoding { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_routes_to_decoding() {
        let err: SubmitError = HttpError::Decode {
            message: "missing field `trade`".to_string(),
            raw: "{}".to_string(),
        }
        .into();
        match err {
            SubmitError::Decoding { raw, .. } => assert_eq!(raw, "{}"),
            other => panic!("expected Decoding, got {other:?}"),
        }
    }

    #[test]
    fn test_server_error_routes_to_network() {
        let err: SubmitError = HttpError::ServerError {
            status: 500,
            body: "boom".to_string(),
        }
        .into();
        assert!(err.is_network());
        assert!(err.status_text().starts_with("Error: "));
        assert!(err.status_text().contains("500"));
    }

    #[test]
    fn test_validation_status_text() {
        let err = SubmitError::Validation(vec!["Buyer field is required.".to_string()]);
        assert_eq!(
            err.status_text(),
            "Please correct the errors before submitting."
        );
    }
}
