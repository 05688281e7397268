use serde_json::Value;

use crate::error::{AppError, Result};
use crate::transport::FetchResponse;

pub const AUTHENTICATION_ERROR_PREFIX: &str = "Authentication Error: ";
pub const UNEXPECTED_STATUS_PREFIX: &str = "Unexpected error2: ";
pub const TRANSPORT_FAILURE_TEXT: &str = "Network or server error.";

/// Result of one request attempt against the protected resource.
#[derive(Debug)]
pub enum ResponseOutcome {
    Success(Value),
    Unauthorized(u16),
    UnexpectedStatus(u16),
    TransportFailure(AppError),
}

impl ResponseOutcome {
    /// Classify a received response. Reads the body only for status 200.
    ///
    /// A 200 whose body cannot be read or parsed is a `TransportFailure`,
    /// the same as a request that never got a response.
    pub async fn classify(response: FetchResponse) -> Self {
        match response.status() {
            200 => match response.json::<Value>().await {
                Ok(payload) => Self::Success(payload),
                Err(e) => Self::TransportFailure(e),
            },
            401 => Self::Unauthorized(401),
            status => Self::UnexpectedStatus(status),
        }
    }

    /// Fold a transport result into an outcome.
    pub async fn from_result(result: Result<FetchResponse>) -> Self {
        match result {
            Ok(response) => Self::classify(response).await,
            Err(e) => Self::TransportFailure(e),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Success(_) => Some(200),
            Self::Unauthorized(code) | Self::UnexpectedStatus(code) => Some(*code),
            Self::TransportFailure(_) => None,
        }
    }

    /// User-facing text for this outcome.
    pub fn render(&self) -> String {
        match self {
            Self::Success(payload) => pretty_json(payload),
            Self::Unauthorized(code) => format!("{AUTHENTICATION_ERROR_PREFIX}{code}"),
            Self::UnexpectedStatus(code) => format!("{UNEXPECTED_STATUS_PREFIX}{code}"),
            Self::TransportFailure(_) => TRANSPORT_FAILURE_TEXT.to_string(),
        }
    }
}

// 2-space indent; key order is kept as received (serde_json preserve_order).
fn pretty_json(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}
