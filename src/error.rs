//! Error types and the result record returned by every LootPay operation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for fallible setup code (configuration, client construction)
pub type Result<T> = std::result::Result<T, LootPayError>;

/// Message surfaced when the response body is not a usable envelope
pub const INVALID_RESPONSE: &str = "Invalid response";

/// Message surfaced for any transport or body-decoding failure
pub const REQUEST_FAILED: &str = "Request failed";

/// Everything that can go wrong while talking to LootPay.
///
/// The `Display` output of each variant is exactly the string callers see in
/// [`ApiResult::err`].
#[derive(Error, Debug)]
pub enum LootPayError {
    /// Body decoded as JSON but is not an envelope object
    #[error("Invalid response")]
    InvalidResponse,

    /// The service flagged the request as failed
    #[error("{message}")]
    RemoteFailure { message: String },

    /// The request could not be sent or its body could not be read
    #[error("Request failed")]
    RequestFailed(#[from] reqwest::Error),

    /// The body was not valid JSON
    #[error("Request failed")]
    MalformedBody(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl LootPayError {
    /// Create a remote failure error carrying the service's message
    pub fn remote_failure(message: impl Into<String>) -> Self {
        Self::RemoteFailure {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True for failures that happened before a usable body was received
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::RequestFailed(_) | Self::MalformedBody(_))
    }
}

/// Normalized outcome of a LootPay operation.
///
/// Exactly one of `err` and `data` is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            err: None,
            data: Some(data),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            err: Some(message.into()),
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.err.is_none()
    }

    pub fn is_err(&self) -> bool {
        self.err.is_some()
    }

    /// Convert into a standard `Result`, with the error message as the error
    pub fn into_result(self) -> std::result::Result<T, String> {
        match (self.err, self.data) {
            (Some(err), _) => Err(err),
            (None, Some(data)) => Ok(data),
            (None, None) => Err(INVALID_RESPONSE.to_string()),
        }
    }
}

impl<T> From<std::result::Result<T, LootPayError>> for ApiResult<T> {
    fn from(result: std::result::Result<T, LootPayError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(error) => Self::err(error.to_string()),
        }
    }
}
