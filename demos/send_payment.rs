//! Send a crypto payout
//!
//! Usage: `cargo run --example send_payment -- <network> <address> <amount-usd>`

use lootpay::{ClientConfig, CryptoNetwork, LootPayClient, SendCryptoPayment};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [network, address, amount] = args.as_slice() else {
        eprintln!("usage: send_payment <litecoin|bitcoin|ethereum> <address> <amount-usd>");
        std::process::exit(2);
    };

    let network: CryptoNetwork = network.parse()?;
    let amount: f64 = amount.parse()?;

    let client = LootPayClient::with_config(ClientConfig::from_env())?;
    let payment = SendCryptoPayment::new(amount, address.as_str(), network);

    let result = client.send_crypto_payment(&payment).await;
    match (result.err, result.data) {
        (Some(err), _) => println!("Payout failed: {err}"),
        (None, Some(receipt)) => println!("Payout accepted: {receipt:?}"),
        (None, None) => println!("Payout returned no data"),
    }

    Ok(())
}
