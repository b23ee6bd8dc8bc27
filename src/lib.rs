//! # lootpay - LootPay API client
//!
//! An async client for the LootPay payments API: crypto payouts, crypto
//! prices, account balance and balance history.
//!
//! Every operation resolves to an [`ApiResult`], a record with either an
//! `err` message or the typed `data`. Nothing is thrown across the public
//! boundary; transport failures are reported to a
//! [`DiagnosticSink`](diagnostics::DiagnosticSink) and surface to the
//! caller as `"Request failed"`.
//!
//! ```no_run
//! use lootpay::{CryptoNetwork, LootPayClient, SendCryptoPayment};
//!
//! # async fn run() {
//! let client = LootPayClient::new("my-api-key");
//!
//! let balance = client.get_balance().await;
//! match balance.into_result() {
//!     Ok(balance) => println!("balance: ${}", balance.balance),
//!     Err(err) => eprintln!("failed: {err}"),
//! }
//!
//! let payment = SendCryptoPayment::new(10.0, "bc1q...", CryptoNetwork::Bitcoin);
//! let sent = client.send_crypto_payment(&payment).await;
//! if let Some(err) = sent.err {
//!     eprintln!("payout rejected: {err}");
//! }
//! # }
//! ```

pub mod client;
pub mod config;
pub mod diagnostics;
pub mod envelope;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use client::LootPayClient;
pub use config::ClientConfig;
pub use error::{ApiResult, LootPayError, Result};
pub use types::*;

/// Current version of the lootpay library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
    }
}
