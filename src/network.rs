//! Network constants for the Clearing Engine SDK.

use std::time::Duration;

/// Default base URL of the trade-processing function app.
pub const DEFAULT_API_URL: &str = "https://cdexchangefunctionapp.azurewebsites.net";

/// Path of the trade-processing endpoint, relative to the base URL.
pub const TRADE_PROCESSING_PATH: &str = "/api/TradeProcessingFunction";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable overriding the base URL.
pub const ENV_API_URL: &str = "CLEARING_API_URL";

/// Environment variable holding the function key (sent as `?code=`).
pub const ENV_FUNCTION_KEY: &str = "CLEARING_FUNCTION_KEY";

/// Environment variable overriding the request timeout, in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "CLEARING_TIMEOUT_SECS";
