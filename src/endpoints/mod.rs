//! Concrete request/response pairs for the spot REST API.
//!
//! Each request implements [`Request`](crate::core::traits::Request); signed
//! ones also implement [`SignedRequest`](crate::core::traits::SignedRequest).

pub mod account;
pub mod general;
pub mod market_data;
pub mod trading;

pub use account::{AccountInfo, AccountInformationRequest, AccountTrade, AccountTradeListRequest};
pub use general::{PingRequest, ServerTime, ServerTimeRequest};
pub use market_data::{
    AggregateTrade, AggregateTradesRequest, AllPricesRequest, BookTicker, BookTickersRequest,
    Candlestick, CandlesticksRequest, DepthRequest, ExchangeInfo, ExchangeInfoRequest, OrderBook,
    PriceLevel, SymbolInfo, Ticker24h, Ticker24hRequest,
};
pub use trading::{
    AllOrdersRequest, CancelOrderRequest, CanceledOrder, Fill, NewOrderBuilder, NewOrderRequest,
    OpenOrdersRequest, Order, OrderResult, QueryOrderRequest, TestNewOrderRequest, TestOrderAck,
};
