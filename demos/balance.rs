//! Print the account balance, current crypto prices and recent transactions
//!
//! Reads `LOOTPAY_API_KEY` (and optionally `LOOTPAY_BASE_URL`) from the environment.

use lootpay::{ClientConfig, CryptoNetwork, LootPayClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let client = LootPayClient::with_config(ClientConfig::from_env())?;

    let (balance, prices, history) = tokio::join!(
        client.get_balance(),
        client.get_crypto_prices(),
        client.get_balance_history(),
    );

    match balance.into_result() {
        Ok(balance) => println!("Balance: ${:.2}", balance.balance),
        Err(err) => println!("Balance unavailable: {err}"),
    }

    match prices.into_result() {
        Ok(prices) => {
            for network in CryptoNetwork::ALL {
                if let Some(price) = prices.for_network(network) {
                    println!(
                        "{:<10} ${:>12.2}  (avg fee ${:.2})",
                        price.name, price.price, price.avg_fee
                    );
                }
            }
        }
        Err(err) => println!("Prices unavailable: {err}"),
    }

    match history.into_result() {
        Ok(transactions) => {
            println!("{} transactions", transactions.len());
            for tx in transactions.iter().take(10) {
                println!(
                    "  {:<12} {:>10.2}  {}",
                    tx.kind().unwrap_or("-"),
                    tx.amount().unwrap_or_default(),
                    tx.description().unwrap_or("")
                );
            }
        }
        Err(err) => println!("History unavailable: {err}"),
    }

    Ok(())
}
