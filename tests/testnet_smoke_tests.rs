use binance_api::{BinanceClient, ExchangeConfig};
use std::time::Duration;
use tokio::time::timeout;

/// Public-only testnet configuration
fn create_test_config() -> ExchangeConfig {
    ExchangeConfig::read_only().testnet(true)
}

#[cfg(test)]
mod smoke_tests {
    use super::*;

    #[tokio::test]
    async fn test_testnet_ping() {
        let client = BinanceClient::new(&create_test_config()).unwrap();

        match timeout(Duration::from_secs(30), client.ping()).await {
            Ok(Ok(())) => println!("testnet ping ok"),
            Ok(Err(e)) => println!("testnet ping failed: {}", e),
            Err(_) => println!("testnet ping timed out"),
        }
    }

    #[tokio::test]
    async fn test_testnet_depth() {
        let client = BinanceClient::new(&create_test_config()).unwrap();

        match timeout(Duration::from_secs(30), client.depth("BTCUSDT", Some(5))).await {
            Ok(Ok(book)) => {
                assert!(book.bids.len() <= 5);
                assert!(book.asks.len() <= 5);
            }
            Ok(Err(e)) => println!("testnet depth failed: {}", e),
            Err(_) => println!("testnet depth timed out"),
        }
    }
}
