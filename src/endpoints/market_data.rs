use crate::core::errors::ExchangeError;
use crate::core::kernel::builder::Method;
use crate::core::kernel::codec::{self, QueryParams};
use crate::core::kernel::shapes::{
    decode_keyed, decode_rows, scan_filters, FilterRange, KeyedCollection, PositionalRow,
    RowCursor,
};
use crate::core::traits::Request;
use crate::core::types::{KlineInterval, SymbolPair};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExchangeInfoRequest;

/// Trading rules of one symbol. The filter trios are zero when the exchange
/// sent no matching filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    pub base_asset: String,
    pub base_asset_precision: u32,
    pub quote_asset: String,
    pub quote_precision: u32,
    pub order_types: Vec<String>,
    pub iceberg_allowed: bool,
    pub quantity_filter: FilterRange,
    pub price_filter: FilterRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

impl ExchangeInfo {
    pub fn symbol(&self, symbol: &str) -> Option<&SymbolInfo> {
        self.symbols.iter().find(|s| s.symbol == symbol)
    }
}

#[derive(Debug, Deserialize)]
struct RawSymbol {
    symbol: String,
    status: String,
    #[serde(rename = "baseAsset")]
    base_asset: String,
    #[serde(rename = "baseAssetPrecision")]
    base_asset_precision: u32,
    #[serde(rename = "quoteAsset")]
    quote_asset: String,
    #[serde(rename = "quotePrecision")]
    quote_precision: u32,
    #[serde(rename = "orderTypes")]
    order_types: Vec<String>,
    #[serde(rename = "icebergAllowed")]
    iceberg_allowed: bool,
    filters: Vec<Value>,
}

fn decode_symbol(value: &Value) -> Result<SymbolInfo, ExchangeError> {
    let raw: RawSymbol = codec::from_json(value.clone(), "symbol info")?;
    let scan = scan_filters(&raw.filters)?;

    Ok(SymbolInfo {
        quantity_filter: scan.quantity_or_zero(),
        price_filter: scan.price_or_zero(),
        symbol: raw.symbol,
        status: raw.status,
        base_asset: raw.base_asset,
        base_asset_precision: raw.base_asset_precision,
        quote_asset: raw.quote_asset,
        quote_precision: raw.quote_precision,
        order_types: raw.order_types,
        iceberg_allowed: raw.iceberg_allowed,
    })
}

impl Request for ExchangeInfoRequest {
    const ENDPOINT: &'static str = "/api/v3/exchangeInfo";
    const METHOD: Method = Method::Get;
    type Response = ExchangeInfo;

    fn write_params(&self, _params: &mut QueryParams) {}

    fn decode_response(value: Value) -> Result<ExchangeInfo, ExchangeError> {
        let symbols = codec::array_field(&value, "exchange info", "symbols")?
            .iter()
            .map(decode_symbol)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ExchangeInfo { symbols })
    }
}

/// Order book snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthRequest {
    pub symbol: String,
    /// Default 100; zero means "not provided"
    pub limit: Option<u32>,
}

impl DepthRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            limit: None,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// `[price, quantity]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevel {
    pub price: Decimal,
    pub quantity: Decimal,
}

impl PositionalRow for PriceLevel {
    const SHAPE: &'static str = "price level";
    const ARITY: usize = 2;

    fn read(cursor: &mut RowCursor<'_>) -> Result<Self, ExchangeError> {
        Ok(Self {
            price: cursor.decimal("price")?,
            quantity: cursor.decimal("quantity")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBook {
    pub last_update_id: u64,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl Request for DepthRequest {
    const ENDPOINT: &'static str = "/api/v3/depth";
    const METHOD: Method = Method::Get;
    type Response = OrderBook;

    fn write_params(&self, params: &mut QueryParams) {
        params
            .push("symbol", &self.symbol)
            .push_nonzero("limit", self.limit);
    }

    fn decode_response(value: Value) -> Result<OrderBook, ExchangeError> {
        Ok(OrderBook {
            last_update_id: codec::u64_field(&value, "depth", "lastUpdateId")?,
            bids: decode_rows(codec::field(&value, "depth", "bids")?)?,
            asks: decode_rows(codec::field(&value, "depth", "asks")?)?,
        })
    }
}

/// Compressed trades: fills at the same time, price and side are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateTradesRequest {
    pub symbol: String,
    /// Inclusive; zero means "not provided"
    pub from_id: Option<u64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Default 500; zero means "not provided"
    pub limit: Option<u32>,
}

impl AggregateTradesRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            from_id: None,
            start_time: None,
            end_time: None,
            limit: None,
        }
    }

    #[must_use]
    pub fn from_id(mut self, from_id: u64) -> Self {
        self.from_id = Some(from_id);
        self
    }

    #[must_use]
    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTrade {
    #[serde(rename = "a")]
    pub id: u64,
    #[serde(rename = "p", with = "codec::decimal")]
    pub price: Decimal,
    #[serde(rename = "q", with = "codec::decimal")]
    pub quantity: Decimal,
    #[serde(rename = "f")]
    pub first_trade_id: u64,
    #[serde(rename = "l")]
    pub last_trade_id: u64,
    #[serde(rename = "T", with = "codec::timestamp_ms")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "m")]
    pub buyer_is_maker: bool,
    #[serde(rename = "M")]
    pub best_match: bool,
}

impl Request for AggregateTradesRequest {
    const ENDPOINT: &'static str = "/api/v3/aggTrades";
    const METHOD: Method = Method::Get;
    type Response = Vec<AggregateTrade>;

    fn write_params(&self, params: &mut QueryParams) {
        params
            .push("symbol", &self.symbol)
            .push_nonzero("fromId", self.from_id)
            .push_optional("startTime", self.start_time)
            .push_optional("endTime", self.end_time)
            .push_nonzero("limit", self.limit);
    }

    fn decode_response(value: Value) -> Result<Vec<AggregateTrade>, ExchangeError> {
        codec::from_json(value, "aggregate trade")
    }
}

/// Kline bars for a symbol, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandlesticksRequest {
    pub symbol: String,
    pub interval: KlineInterval,
    /// Default 500; zero means "not provided"
    pub limit: Option<u32>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl CandlesticksRequest {
    pub fn new(symbol: impl Into<String>, interval: KlineInterval) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            limit: None,
            start_time: None,
            end_time: None,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }
}

/// One kline row. The exchange sends it as a positional array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candlestick {
    pub open_time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub close_time: DateTime<Utc>,
    pub quote_volume: Decimal,
    pub trades: u64,
    pub taker_buy_base_volume: Decimal,
    pub taker_buy_quote_volume: Decimal,
    /// Unused trailing field
    pub ignore: Option<String>,
}

impl PositionalRow for Candlestick {
    const SHAPE: &'static str = "candlestick";
    const ARITY: usize = 11;

    fn read(cursor: &mut RowCursor<'_>) -> Result<Self, ExchangeError> {
        Ok(Self {
            open_time: cursor.timestamp("openTime")?,
            open: cursor.decimal("open")?,
            high: cursor.decimal("high")?,
            low: cursor.decimal("low")?,
            close: cursor.decimal("close")?,
            volume: cursor.decimal("volume")?,
            close_time: cursor.timestamp("closeTime")?,
            quote_volume: cursor.decimal("quoteAssetVolume")?,
            trades: cursor.uint("numberOfTrades")?,
            taker_buy_base_volume: cursor.decimal("takerBuyBaseAssetVolume")?,
            taker_buy_quote_volume: cursor.decimal("takerBuyQuoteAssetVolume")?,
            ignore: cursor.optional_text("ignore")?,
        })
    }
}

impl Request for CandlesticksRequest {
    const ENDPOINT: &'static str = "/api/v3/klines";
    const METHOD: Method = Method::Get;
    type Response = Vec<Candlestick>;

    fn write_params(&self, params: &mut QueryParams) {
        params
            .push("symbol", &self.symbol)
            .push("interval", self.interval)
            .push_nonzero("limit", self.limit)
            .push_optional("startTime", self.start_time)
            .push_optional("endTime", self.end_time);
    }

    fn decode_response(value: Value) -> Result<Vec<Candlestick>, ExchangeError> {
        decode_rows(&value)
    }
}

/// Rolling 24 hour statistics for one symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker24hRequest {
    pub symbol: String,
}

impl Ticker24hRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker24h {
    pub symbol: String,
    #[serde(rename = "priceChange", with = "codec::decimal")]
    pub price_change: Decimal,
    #[serde(rename = "priceChangePercent", with = "codec::decimal")]
    pub price_change_percent: Decimal,
    #[serde(rename = "weightedAvgPrice", with = "codec::decimal")]
    pub weighted_avg_price: Decimal,
    #[serde(rename = "prevClosePrice", with = "codec::decimal")]
    pub prev_close_price: Decimal,
    #[serde(rename = "lastPrice", with = "codec::decimal")]
    pub last_price: Decimal,
    #[serde(rename = "bidPrice", with = "codec::decimal")]
    pub bid_price: Decimal,
    #[serde(rename = "askPrice", with = "codec::decimal")]
    pub ask_price: Decimal,
    #[serde(rename = "openPrice", with = "codec::decimal")]
    pub open_price: Decimal,
    #[serde(rename = "highPrice", with = "codec::decimal")]
    pub high_price: Decimal,
    #[serde(rename = "lowPrice", with = "codec::decimal")]
    pub low_price: Decimal,
    #[serde(default, with = "codec::option_decimal")]
    pub volume: Option<Decimal>,
    #[serde(rename = "quoteVolume", default, with = "codec::option_decimal")]
    pub quote_volume: Option<Decimal>,
    #[serde(rename = "openTime", with = "codec::timestamp_ms")]
    pub open_time: DateTime<Utc>,
    #[serde(rename = "closeTime", with = "codec::timestamp_ms")]
    pub close_time: DateTime<Utc>,
    /// -1 when no trade happened in the window
    #[serde(rename = "firstId")]
    pub first_id: i64,
    #[serde(rename = "lastId")]
    pub last_id: i64,
    pub count: u64,
}

impl Request for Ticker24hRequest {
    const ENDPOINT: &'static str = "/api/v3/ticker/24hr";
    const METHOD: Method = Method::Get;
    type Response = Ticker24h;

    fn write_params(&self, params: &mut QueryParams) {
        params.push("symbol", &self.symbol);
    }

    fn decode_response(value: Value) -> Result<Ticker24h, ExchangeError> {
        codec::from_json(value, "24hr ticker")
    }
}

/// Latest price of every symbol, keyed by symbol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllPricesRequest;

fn price_entry(item: &Value) -> Result<Option<(String, Decimal)>, ExchangeError> {
    Ok(Some((
        codec::string_field(item, "price ticker", "symbol")?,
        codec::decimal_field(item, "price ticker", "price")?,
    )))
}

impl Request for AllPricesRequest {
    const ENDPOINT: &'static str = "/api/v3/ticker/price";
    const METHOD: Method = Method::Get;
    type Response = KeyedCollection<Decimal>;

    fn write_params(&self, _params: &mut QueryParams) {}

    fn decode_response(value: Value) -> Result<KeyedCollection<Decimal>, ExchangeError> {
        decode_keyed(&value, "price ticker", price_entry)
    }
}

/// Best bid and ask of every symbol, keyed by symbol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookTickersRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookTicker {
    pub symbol: String,
    pub pair: SymbolPair,
    pub bid_price: Decimal,
    pub bid_quantity: Decimal,
    pub ask_price: Decimal,
    pub ask_quantity: Decimal,
}

fn book_ticker_entry(item: &Value) -> Result<Option<(String, BookTicker)>, ExchangeError> {
    const SHAPE: &str = "book ticker";

    let symbol = codec::string_field(item, SHAPE, "symbol")?;
    let pair = SymbolPair::parse(&symbol).map_err(|e| ExchangeError::decode(SHAPE, e))?;
    let ticker = BookTicker {
        pair,
        bid_price: codec::decimal_field(item, SHAPE, "bidPrice")?,
        bid_quantity: codec::decimal_field(item, SHAPE, "bidQty")?,
        ask_price: codec::decimal_field(item, SHAPE, "askPrice")?,
        ask_quantity: codec::decimal_field(item, SHAPE, "askQty")?,
        symbol: symbol.clone(),
    };
    Ok(Some((symbol, ticker)))
}

impl Request for BookTickersRequest {
    const ENDPOINT: &'static str = "/api/v3/ticker/bookTicker";
    const METHOD: Method = Method::Get;
    type Response = KeyedCollection<BookTicker>;

    fn write_params(&self, _params: &mut QueryParams) {}

    fn decode_response(value: Value) -> Result<KeyedCollection<BookTicker>, ExchangeError> {
        decode_keyed(&value, "book ticker", book_ticker_entry)
    }
}
