use binance_api::endpoints::{CandlesticksRequest, Ticker24hRequest};
use binance_api::{BinanceClient, ExchangeConfig, KlineInterval};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Public market data only; set BINANCE_API_KEY / BINANCE_SECRET_KEY for account calls
    let config =
        ExchangeConfig::from_env("BINANCE").unwrap_or_else(|_| ExchangeConfig::read_only());
    let client = BinanceClient::new(&config)?;

    client.ping().await?;
    let time = client.server_time().await?;
    info!(server_time = %time.server_time, delta_ms = time.delta.num_milliseconds(), "server time");

    let book = client.depth("BTCUSDT", Some(5)).await?;
    for level in &book.bids {
        info!(price = %level.price, quantity = %level.quantity, "bid");
    }

    let ticker = client.send(&Ticker24hRequest::new("BTCUSDT")).await?;
    info!(last = %ticker.last_price, change = %ticker.price_change_percent, "24h ticker");

    let candles = client
        .send(&CandlesticksRequest::new("BTCUSDT", KlineInterval::Hours1).with_limit(3))
        .await?;
    for candle in &candles {
        info!(open_time = %candle.open_time, close = %candle.close, "candle");
    }

    if config.has_credentials() {
        match client.account().await {
            Ok(account) => {
                for (asset, balance) in &account.balances.entries {
                    info!(asset = %asset, total = %balance.total, "balance");
                }
            }
            Err(e) => error!(error = %e, "account request failed"),
        }
    }

    Ok(())
}
