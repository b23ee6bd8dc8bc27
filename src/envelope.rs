//! The success/failure envelope wrapped around every LootPay response

use crate::{LootPayError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Decoded envelope, discriminated on the `success` flag
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success {
        message: String,
        data: T,
        request_id: Option<String>,
    },
    Failure {
        message: String,
        request_id: Option<String>,
    },
}

impl<T> Envelope<T> {
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Success { request_id, .. } | Self::Failure { request_id, .. } => {
                request_id.as_deref()
            }
        }
    }

    /// Payload on success, the remote message as an error otherwise
    pub fn into_data(self) -> Result<T> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { message, .. } => Err(LootPayError::remote_failure(message)),
        }
    }
}

/// Envelope as it comes off the wire, before the flag is checked
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default, rename = "requestID")]
    request_id: Option<Value>,
}

impl RawEnvelope {
    /// Request ids are opaque; numeric ones are kept in their JSON text form
    fn request_id(&self) -> Option<String> {
        match self.request_id.as_ref()? {
            Value::String(id) => Some(id.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Decode a response body into an envelope carrying a `T` payload.
///
/// Non-JSON bodies fail with [`LootPayError::MalformedBody`]; JSON that is
/// not an object, or an object that does not fit the envelope or payload
/// shape, fails with [`LootPayError::InvalidResponse`].
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<Envelope<T>> {
    let value: Value = serde_json::from_slice(body)?;

    if !value.is_object() {
        return Err(LootPayError::InvalidResponse);
    }

    let raw: RawEnvelope =
        serde_json::from_value(value).map_err(|_| LootPayError::InvalidResponse)?;

    let request_id = raw.request_id();

    if raw.success != Some(true) {
        let message = match raw.message {
            Some(Value::String(message)) => message,
            _ => return Err(LootPayError::InvalidResponse),
        };
        return Ok(Envelope::Failure {
            message,
            request_id,
        });
    }

    // absent and `null` data both land here
    let data = raw.data.ok_or(LootPayError::InvalidResponse)?;
    let data = serde_json::from_value(data).map_err(|_| LootPayError::InvalidResponse)?;

    Ok(Envelope::Success {
        message: match raw.message {
            Some(Value::String(message)) => message,
            _ => String::new(),
        },
        data,
        request_id,
    })
}

/// Decode a response body straight to its payload
pub fn parse_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    decode_envelope(body)?.into_data()
}
