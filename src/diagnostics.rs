//! Where the client reports failures it swallows.
//!
//! Operations never return transport errors to the caller, so the underlying
//! error is handed to a [`DiagnosticSink`] instead. The default sink logs
//! through `tracing`; tests and embedders can plug in their own.

use crate::LootPayError;

/// Receives transport-level failures absorbed by the client
pub trait DiagnosticSink: Send + Sync {
    /// Called once per operation that ended in `"Request failed"`
    fn request_failed(&self, operation: &'static str, error: &LootPayError);
}

/// Logs absorbed failures at error level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn request_failed(&self, operation: &'static str, error: &LootPayError) {
        match error {
            LootPayError::MalformedBody(source) => {
                tracing::error!(operation, error = %source, "LootPay returned a non-JSON body")
            }
            LootPayError::RequestFailed(source) => {
                tracing::error!(operation, error = %source, "LootPay request failed")
            }
            other => tracing::error!(operation, error = %other, "LootPay request failed"),
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn request_failed(&self, _operation: &'static str, _error: &LootPayError) {}
}
