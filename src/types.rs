//! Request parameters and response payloads for the LootPay API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Blockchain networks LootPay can pay out on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CryptoNetwork {
    Litecoin,
    Bitcoin,
    Ethereum,
}

impl CryptoNetwork {
    /// All supported networks
    pub const ALL: [CryptoNetwork; 3] = [Self::Litecoin, Self::Bitcoin, Self::Ethereum];

    /// Name used in request paths and as the price table key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Litecoin => "litecoin",
            Self::Bitcoin => "bitcoin",
            Self::Ethereum => "ethereum",
        }
    }
}

impl fmt::Display for CryptoNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CryptoNetwork {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "litecoin" => Ok(Self::Litecoin),
            "bitcoin" => Ok(Self::Bitcoin),
            "ethereum" => Ok(Self::Ethereum),
            other => Err(format!("unsupported network: {other}")),
        }
    }
}

/// Parameters for a crypto payout.
///
/// Values are sent as given; the service is the one that rejects bad
/// amounts or addresses.
#[derive(Debug, Clone, PartialEq)]
pub struct SendCryptoPayment {
    /// Amount in USD
    pub amount: f64,
    /// Recipient wallet address
    pub address: String,
    pub network: CryptoNetwork,
}

impl SendCryptoPayment {
    pub fn new(amount: f64, address: impl Into<String>, network: CryptoNetwork) -> Self {
        Self {
            amount,
            address: address.into(),
            network,
        }
    }

    pub(crate) fn body(&self) -> SendCryptoBody<'_> {
        SendCryptoBody {
            recipient_address: &self.address,
            amount: self.amount,
        }
    }
}

/// JSON body of `POST /v1/crypto/{network}/send`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendCryptoBody<'a> {
    pub recipient_address: &'a str,
    pub amount: f64,
}

/// Confirmation returned after a payout is accepted.
///
/// The record is kept exactly as the service sent it; the accessors read the
/// commonly returned fields and yield `None` when a field is absent or has
/// an unexpected type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CryptoPaymentReceipt(pub Map<String, Value>);

impl CryptoPaymentReceipt {
    pub fn transaction_id(&self) -> Option<&str> {
        str_field(&self.0, "transactionId")
    }

    pub fn transaction_hash(&self) -> Option<&str> {
        str_field(&self.0, "transactionHash")
    }

    pub fn network(&self) -> Option<&str> {
        str_field(&self.0, "network")
    }

    pub fn recipient_address(&self) -> Option<&str> {
        str_field(&self.0, "recipientAddress")
    }

    /// Amount in USD
    pub fn amount(&self) -> Option<f64> {
        number_field(&self.0, "amount")
    }

    /// Amount in the network's native unit
    pub fn crypto_amount(&self) -> Option<f64> {
        number_field(&self.0, "cryptoAmount")
    }

    pub fn fee(&self) -> Option<f64> {
        number_field(&self.0, "fee")
    }

    /// Any field by its wire name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

/// Price entry for a single crypto currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoPriceData {
    pub name: String,
    /// Price in USD
    pub price: f64,
    /// Average network fee in USD
    pub avg_fee: f64,
}

/// Price table keyed by crypto symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CryptoPrices(pub HashMap<String, CryptoPriceData>);

impl CryptoPrices {
    pub fn get(&self, symbol: &str) -> Option<&CryptoPriceData> {
        self.0.get(symbol)
    }

    /// Price entry for one of the supported payout networks
    pub fn for_network(&self, network: CryptoNetwork) -> Option<&CryptoPriceData> {
        self.get(network.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CryptoPriceData)> {
        self.0.iter()
    }
}

/// Account balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Balance in USD
    pub balance: f64,
}

/// One entry of the balance history, in the order the service returns them.
///
/// Like [`CryptoPaymentReceipt`], the record is kept as sent and read
/// through accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceTransaction(pub Map<String, Value>);

impl BalanceTransaction {
    pub fn id(&self) -> Option<&str> {
        str_field(&self.0, "id")
    }

    /// Signed amount in USD
    pub fn amount(&self) -> Option<f64> {
        number_field(&self.0, "amount")
    }

    /// Transaction type, e.g. `deposit` or `payout`
    pub fn kind(&self) -> Option<&str> {
        str_field(&self.0, "type")
    }

    pub fn description(&self) -> Option<&str> {
        str_field(&self.0, "description")
    }

    pub fn balance_after(&self) -> Option<f64> {
        number_field(&self.0, "balanceAfter")
    }

    /// Creation time, from an RFC 3339 string or an epoch timestamp in
    /// seconds or milliseconds
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self.0.get("createdAt")? {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Value::Number(n) => {
                let n = n.as_i64()?;
                // values this large are milliseconds; seconds would be past year 5000
                if n.abs() >= 100_000_000_000 {
                    DateTime::from_timestamp_millis(n)
                } else {
                    DateTime::from_timestamp(n, 0)
                }
            }
            _ => None,
        }
    }

    /// Any field by its wire name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

fn str_field<'a>(record: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    record.get(field)?.as_str()
}

/// Numbers, or numbers sent as strings
fn number_field(record: &Map<String, Value>, field: &str) -> Option<f64> {
    match record.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
