//! End-to-end tests for the LootPay client against a mock server

use lootpay::diagnostics::{DiagnosticSink, NoopSink};
use lootpay::{
    ApiResult, Balance, ClientConfig, CryptoNetwork, LootPayClient, LootPayError,
    SendCryptoPayment,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct RecordingSink {
    failures: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingSink {
    fn failures(&self) -> Vec<(&'static str, String)> {
        self.failures.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn request_failed(&self, operation: &'static str, error: &LootPayError) {
        let kind = match error {
            LootPayError::RequestFailed(_) => "transport",
            LootPayError::MalformedBody(_) => "malformed",
            _ => "other",
        };
        self.failures
            .lock()
            .unwrap()
            .push((operation, kind.to_string()));
    }
}

fn client_for(server: &ServerGuard) -> (LootPayClient, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let config = ClientConfig::new("test-key").with_base_url(server.url());
    let client = LootPayClient::with_config(config)
        .unwrap()
        .with_diagnostics(sink.clone());
    (client, sink)
}

async fn mock_json(server: &mut ServerGuard, method: &str, path: &str, body: Value) {
    server
        .mock(method, path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;
}

async fn mock_raw(server: &mut ServerGuard, method: &str, path: &str, body: &str) {
    server
        .mock(method, path)
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;
}

fn bitcoin_payment() -> SendCryptoPayment {
    SendCryptoPayment::new(10.0, "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh", CryptoNetwork::Bitcoin)
}

const ENDPOINTS: [(&str, &str); 4] = [
    ("POST", "/v1/crypto/bitcoin/send"),
    ("GET", "/v1/crypto/prices/get"),
    ("GET", "/v1/balance/get"),
    ("GET", "/v1/balance/history"),
];

/// Run all four operations and collect their `err` fields
async fn all_errors(client: &LootPayClient) -> Vec<Option<String>> {
    vec![
        client.send_crypto_payment(&bitcoin_payment()).await.err,
        client.get_crypto_prices().await.err,
        client.get_balance().await.err,
        client.get_balance_history().await.err,
    ]
}

#[tokio::test]
async fn test_get_balance_success() {
    let mut server = Server::new_async().await;
    mock_raw(
        &mut server,
        "GET",
        "/v1/balance/get",
        r#"{"success":true,"message":"ok","data":{"balance":42.5},"requestID":"r1"}"#,
    )
    .await;

    let (client, sink) = client_for(&server);
    let result = client.get_balance().await;

    assert_eq!(
        result,
        ApiResult {
            err: None,
            data: Some(Balance { balance: 42.5 }),
        }
    );
    assert!(sink.failures().is_empty());
}

#[tokio::test]
async fn test_send_crypto_payment_remote_failure() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/v1/crypto/bitcoin/send")
        .match_header("x-api-key", "test-key")
        .match_body(Matcher::PartialJson(json!({ "amount": 10.0 })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":false,"message":"insufficient funds","requestID":"r2"}"#)
        .create_async()
        .await;

    let (client, sink) = client_for(&server);
    let result = client.send_crypto_payment(&bitcoin_payment()).await;

    assert_eq!(result.err.as_deref(), Some("insufficient funds"));
    assert!(result.data.is_none());
    assert!(sink.failures().is_empty());
    m.assert_async().await;
}

#[tokio::test]
async fn test_get_crypto_prices_malformed_json() {
    let mut server = Server::new_async().await;
    mock_raw(&mut server, "GET", "/v1/crypto/prices/get", "{\"success\": tru").await;

    let (client, sink) = client_for(&server);
    let result = client.get_crypto_prices().await;

    assert_eq!(result.err.as_deref(), Some("Request failed"));
    assert!(result.data.is_none());
    assert_eq!(
        sink.failures(),
        vec![("get_crypto_prices", "malformed".to_string())]
    );
}

#[tokio::test]
async fn test_get_crypto_prices_success() {
    let mut server = Server::new_async().await;
    mock_json(
        &mut server,
        "GET",
        "/v1/crypto/prices/get",
        json!({
            "success": true,
            "message": "ok",
            "data": {
                "bitcoin": { "name": "Bitcoin", "price": 64000.0, "avgFee": 2.5 },
                "litecoin": { "name": "Litecoin", "price": 80.25, "avgFee": 0.02 },
                "ethereum": { "name": "Ethereum", "price": 3100.0, "avgFee": 1.1 }
            },
            "requestID": "r4"
        }),
    )
    .await;

    let (client, _sink) = client_for(&server);
    let prices = client.get_crypto_prices().await.into_result().unwrap();

    assert_eq!(prices.len(), 3);
    for network in CryptoNetwork::ALL {
        assert!(prices.for_network(network).is_some(), "missing {network}");
    }
    assert_eq!(prices.for_network(CryptoNetwork::Litecoin).unwrap().avg_fee, 0.02);
}

#[tokio::test]
async fn test_get_balance_history_keeps_order() {
    let mut server = Server::new_async().await;
    mock_json(
        &mut server,
        "GET",
        "/v1/balance/history",
        json!({
            "success": true,
            "message": "ok",
            "data": [
                { "id": "tx_3", "amount": -10.0, "type": "payout" },
                { "id": "tx_2", "amount": 50.0, "type": "deposit" },
                { "id": "tx_1", "amount": 5.0, "type": "deposit" }
            ],
            "requestID": "r5"
        }),
    )
    .await;

    let (client, _sink) = client_for(&server);
    let history = client.get_balance_history().await.data.unwrap();

    let ids: Vec<_> = history.iter().filter_map(|tx| tx.id()).collect();
    assert_eq!(ids, ["tx_3", "tx_2", "tx_1"]);
    assert_eq!(history[0].amount(), Some(-10.0));
}

#[tokio::test]
async fn test_history_records_pass_through_as_sent() {
    let mut server = Server::new_async().await;
    mock_json(
        &mut server,
        "GET",
        "/v1/balance/history",
        json!({
            "success": true,
            "message": "ok",
            "data": [
                { "id": "tx_1", "amount": 5, "createdAt": 1704067200000i64 },
                { "id": "tx_2", "usdAmount": 5 }
            ],
            "requestID": "r10"
        }),
    )
    .await;

    let (client, _sink) = client_for(&server);
    let result = client.get_balance_history().await;

    assert!(result.err.is_none(), "unexpected error: {:?}", result.err);
    let history = result.data.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(
        history[0].created_at().unwrap().to_rfc3339(),
        "2024-01-01T00:00:00+00:00"
    );
    assert_eq!(history[1].amount(), None);
    assert_eq!(history[1].get("usdAmount"), Some(&json!(5)));
}

#[tokio::test]
async fn test_empty_history_is_success() {
    let mut server = Server::new_async().await;
    mock_json(
        &mut server,
        "GET",
        "/v1/balance/history",
        json!({ "success": true, "message": "ok", "data": [], "requestID": "r6" }),
    )
    .await;

    let (client, _sink) = client_for(&server);
    let result = client.get_balance_history().await;

    assert!(result.err.is_none());
    assert_eq!(result.data, Some(vec![]));
}

#[tokio::test]
async fn test_remote_failure_on_every_operation() {
    let mut server = Server::new_async().await;
    for (method, path) in ENDPOINTS {
        mock_json(
            &mut server,
            method,
            path,
            json!({ "success": false, "message": "API key revoked", "requestID": "r7" }),
        )
        .await;
    }

    let (client, sink) = client_for(&server);
    for err in all_errors(&client).await {
        assert_eq!(err.as_deref(), Some("API key revoked"));
    }
    assert!(sink.failures().is_empty());
}

#[tokio::test]
async fn test_non_object_bodies_are_invalid_responses() {
    for body in ["[1,2,3]", "\"ok\"", "42", "null"] {
        let mut server = Server::new_async().await;
        for (method, path) in ENDPOINTS {
            mock_raw(&mut server, method, path, body).await;
        }

        let (client, sink) = client_for(&server);
        for err in all_errors(&client).await {
            assert_eq!(err.as_deref(), Some("Invalid response"), "body: {body}");
        }
        assert!(sink.failures().is_empty());
    }
}

#[tokio::test]
async fn test_connection_refused_is_request_failed() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let sink = Arc::new(RecordingSink::default());
    let config = ClientConfig::new("test-key").with_base_url(format!("http://127.0.0.1:{port}"));
    let client = LootPayClient::with_config(config)
        .unwrap()
        .with_diagnostics(sink.clone());

    for err in all_errors(&client).await {
        assert_eq!(err.as_deref(), Some("Request failed"));
    }

    let failures = sink.failures();
    assert_eq!(failures.len(), 4);
    assert!(failures.iter().all(|(_, kind)| kind == "transport"));
    assert_eq!(failures[0].0, "send_crypto_payment");
    assert_eq!(failures[3].0, "get_balance_history");
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let mut server = Server::new_async().await;
    mock_json(
        &mut server,
        "GET",
        "/v1/balance/get",
        json!({ "success": true, "message": "ok", "data": { "balance": 7.0 }, "requestID": "r8" }),
    )
    .await;
    mock_json(
        &mut server,
        "GET",
        "/v1/balance/history",
        json!({ "success": false, "message": "try later", "requestID": "r9" }),
    )
    .await;

    let config = ClientConfig::new("test-key").with_base_url(server.url());
    let client = LootPayClient::with_config(config)
        .unwrap()
        .with_diagnostics(Arc::new(NoopSink));
    let (balance, history) = tokio::join!(client.get_balance(), client.get_balance_history());

    assert_eq!(balance.data, Some(Balance { balance: 7.0 }));
    assert_eq!(history.err.as_deref(), Some("try later"));
}

#[tokio::test]
async fn test_timeout_is_request_failed() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Accept the connection and never answer
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    let sink = Arc::new(RecordingSink::default());
    let config = ClientConfig::new("test-key")
        .with_base_url(format!("http://{addr}"))
        .with_timeout(Duration::from_millis(100));
    let client = LootPayClient::with_config(config)
        .unwrap()
        .with_diagnostics(sink.clone());

    let result = client.get_balance().await;

    assert_eq!(result.err.as_deref(), Some("Request failed"));
    assert!(result.data.is_none());
    assert_eq!(
        sink.failures(),
        vec![("get_balance", "transport".to_string())]
    );
}
