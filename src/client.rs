//! LootPay HTTP client

use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::envelope::parse_envelope;
use crate::error::ApiResult;
use crate::types::*;
use crate::{LootPayError, Result};
use http::header::{HeaderName, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Header carrying the API key on every request
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

const PRICES_PATH: &str = "/v1/crypto/prices/get";
const BALANCE_PATH: &str = "/v1/balance/get";
const BALANCE_HISTORY_PATH: &str = "/v1/balance/history";

/// Client for the LootPay API.
///
/// Every operation issues exactly one request and resolves to an
/// [`ApiResult`]; failures are reported in `err`, never as a panic or `Err`.
/// Clones share the underlying connection pool.
#[derive(Clone)]
pub struct LootPayClient {
    api_key: String,
    base_url: String,
    client: Client,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for LootPayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LootPayClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("diagnostics", &"<sink>")
            .finish()
    }
}

impl LootPayClient {
    /// Create a client for the production endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
            diagnostics: Arc::new(TracingSink),
        }
    }

    /// Create a client from a validated configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder
            .build()
            .map_err(|e| LootPayError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key,
            base_url: config.base_url,
            client,
            diagnostics: Arc::new(TracingSink),
        })
    }

    /// Use a custom reqwest client (proxies, TLS settings, timeouts)
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Report absorbed failures to `sink` instead of the tracing log
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Get the base URL of this client
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a crypto payment of `amount` USD to `address` on `network`
    pub async fn send_crypto_payment(
        &self,
        payment: &SendCryptoPayment,
    ) -> ApiResult<CryptoPaymentReceipt> {
        let path = format!("/v1/crypto/{}/send", payment.network);
        self.post_json("send_crypto_payment", &path, &payment.body()).await
    }

    /// Current price and average fee for each supported crypto currency
    pub async fn get_crypto_prices(&self) -> ApiResult<CryptoPrices> {
        self.get_json("get_crypto_prices", PRICES_PATH).await
    }

    /// Current account balance
    pub async fn get_balance(&self) -> ApiResult<Balance> {
        self.get_json("get_balance", BALANCE_PATH).await
    }

    /// Account transactions, in the order the service returns them
    pub async fn get_balance_history(&self) -> ApiResult<Vec<BalanceTransaction>> {
        self.get_json("get_balance_history", BALANCE_HISTORY_PATH).await
    }

    fn join_url(base: &str, path: &str) -> String {
        let base = base.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    fn request(&self, method: http::Method, path: &str) -> RequestBuilder {
        let url = Self::join_url(&self.base_url, path);
        tracing::debug!(%method, %url, "sending LootPay request");

        self.client
            .request(method, url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(CONTENT_TYPE, "application/json")
    }

    async fn get_json<Res>(&self, operation: &'static str, path: &str) -> ApiResult<Res>
    where
        Res: DeserializeOwned,
    {
        let builder = self.request(http::Method::GET, path);
        self.dispatch(operation, builder).await
    }

    async fn post_json<Req, Res>(
        &self,
        operation: &'static str,
        path: &str,
        req: &Req,
    ) -> ApiResult<Res>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let builder = self.request(http::Method::POST, path).json(req);
        self.dispatch(operation, builder).await
    }

    /// Send the request and fold every outcome into an `ApiResult`
    async fn dispatch<Res>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> ApiResult<Res>
    where
        Res: DeserializeOwned,
    {
        let result = Self::round_trip(operation, builder).await;

        if let Err(error) = &result {
            if error.is_transport() {
                self.diagnostics.request_failed(operation, error);
            }
        }

        result.into()
    }

    async fn round_trip<Res>(operation: &'static str, builder: RequestBuilder) -> Result<Res>
    where
        Res: DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!(
            operation,
            status = status.as_u16(),
            bytes = body.len(),
            "received LootPay response"
        );

        parse_envelope(&body)
    }
}
