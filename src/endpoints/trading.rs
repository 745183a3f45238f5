use crate::core::errors::ExchangeError;
use crate::core::kernel::builder::Method;
use crate::core::kernel::codec::{self, QueryParams};
use crate::core::traits::{Request, Security, SignedParams, SignedRequest};
use crate::core::types::{OrderResponseType, OrderSide, OrderStatus, OrderType, TimeInForce};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ORDER_ENDPOINT: &str = "/api/v3/order";

/// Validated new-order request. Construct it through [`NewOrderRequest::builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderRequest {
    symbol: String,
    side: OrderSide,
    order_type: OrderType,
    time_in_force: Option<TimeInForce>,
    quantity: Decimal,
    price: Option<Decimal>,
    new_client_order_id: Option<String>,
    stop_price: Option<Decimal>,
    iceberg_quantity: Option<Decimal>,
    response_type: OrderResponseType,
    signed: SignedParams,
}

impl NewOrderRequest {
    pub fn builder(
        symbol: impl Into<String>,
        side: OrderSide,
        order_type: OrderType,
        quantity: Decimal,
    ) -> NewOrderBuilder {
        NewOrderBuilder {
            symbol: symbol.into(),
            side,
            order_type,
            quantity,
            time_in_force: None,
            price: None,
            new_client_order_id: None,
            stop_price: None,
            iceberg_quantity: None,
            response_type: OrderResponseType::Result,
        }
    }

    /// Shorthand for a MARKET order
    pub fn market(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<Self, ExchangeError> {
        Self::builder(symbol, side, OrderType::Market, quantity).build()
    }

    /// Shorthand for a GTC LIMIT order
    pub fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<Self, ExchangeError> {
        Self::builder(symbol, side, OrderType::Limit, quantity)
            .price(price)
            .time_in_force(TimeInForce::Gtc)
            .build()
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self) -> OrderSide {
        self.side
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn time_in_force(&self) -> Option<TimeInForce> {
        self.time_in_force
    }

    pub fn stop_price(&self) -> Option<Decimal> {
        self.stop_price
    }

    /// RESULT unless the builder asked for ACK or FULL
    pub fn response_type(&self) -> OrderResponseType {
        self.response_type
    }

    /// The same order sent to the validation-only endpoint
    pub fn into_test(self) -> TestNewOrderRequest {
        TestNewOrderRequest { order: self }
    }
}

/// Collects the optional parts of a new order; [`build`](Self::build)
/// checks them against the order type.
#[derive(Debug, Clone)]
pub struct NewOrderBuilder {
    symbol: String,
    side: OrderSide,
    order_type: OrderType,
    quantity: Decimal,
    time_in_force: Option<TimeInForce>,
    price: Option<Decimal>,
    new_client_order_id: Option<String>,
    stop_price: Option<Decimal>,
    iceberg_quantity: Option<Decimal>,
    response_type: OrderResponseType,
}

impl NewOrderBuilder {
    #[must_use]
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    #[must_use]
    pub fn stop_price(mut self, stop_price: Decimal) -> Self {
        self.stop_price = Some(stop_price);
        self
    }

    #[must_use]
    pub fn iceberg_quantity(mut self, quantity: Decimal) -> Self {
        self.iceberg_quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn new_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.new_client_order_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn response_type(mut self, response_type: OrderResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    fn require<T>(&self, value: Option<T>, name: &str) -> Result<T, ExchangeError> {
        value.ok_or_else(|| {
            ExchangeError::validation(
                ORDER_ENDPOINT,
                format!("{} order requires {}", self.order_type, name),
            )
        })
    }

    /// Check the order against its type's rules.
    ///
    /// Fields a type does not use (`price` on MARKET, `timeInForce` on
    /// STOP_LOSS, ...) are dropped rather than rejected.
    pub fn build(self) -> Result<NewOrderRequest, ExchangeError> {
        if self.quantity <= Decimal::ZERO {
            return Err(ExchangeError::validation(
                ORDER_ENDPOINT,
                format!("quantity must be positive, got {}", self.quantity),
            ));
        }

        let (price, time_in_force) = match self.order_type {
            OrderType::Limit => (
                Some(self.require(self.price, "price")?),
                Some(self.require(self.time_in_force, "timeInForce")?),
            ),
            OrderType::Market => (None, None),
            OrderType::StopLoss => {
                self.require(self.stop_price, "stopPrice")?;
                (self.price, None)
            }
            OrderType::StopLossLimit | OrderType::TakeProfitLimit => {
                self.require(self.stop_price, "stopPrice")?;
                (
                    Some(self.require(self.price, "price")?),
                    Some(self.require(self.time_in_force, "timeInForce")?),
                )
            }
            OrderType::TakeProfit => {
                self.require(self.stop_price, "stopPrice")?;
                (None, None)
            }
            OrderType::LimitMaker => (Some(self.require(self.price, "price")?), None),
        };

        Ok(NewOrderRequest {
            symbol: self.symbol,
            side: self.side,
            order_type: self.order_type,
            time_in_force,
            quantity: self.quantity,
            price,
            new_client_order_id: self.new_client_order_id,
            stop_price: self.stop_price,
            iceberg_quantity: self.iceberg_quantity,
            response_type: self.response_type,
            signed: SignedParams::default(),
        })
    }
}

fn write_order_params(order: &NewOrderRequest, params: &mut QueryParams) {
    params
        .push("symbol", &order.symbol)
        .push("side", order.side)
        .push("type", order.order_type)
        .push_optional("timeInForce", order.time_in_force)
        .push("quantity", order.quantity)
        .push_optional("price", order.price)
        .push_optional("newClientOrderId", order.new_client_order_id.as_ref())
        .push_optional("stopPrice", order.stop_price)
        .push_optional("icebergQty", order.iceberg_quantity)
        .push("newOrderRespType", order.response_type);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    #[serde(with = "codec::decimal")]
    pub price: Decimal,
    #[serde(rename = "qty", with = "codec::decimal")]
    pub quantity: Decimal,
    #[serde(with = "codec::decimal")]
    pub commission: Decimal,
    #[serde(rename = "commissionAsset")]
    pub commission_asset: String,
}

/// Response to a placed order. ACK responses carry only the identifiers;
/// the rest is filled in for RESULT and FULL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    pub symbol: String,
    #[serde(rename = "orderId")]
    pub order_id: u64,
    #[serde(rename = "clientOrderId")]
    pub client_order_id: String,
    #[serde(rename = "transactTime", with = "codec::timestamp_ms")]
    pub transact_time: DateTime<Utc>,
    #[serde(default, with = "codec::option_decimal")]
    pub price: Option<Decimal>,
    #[serde(rename = "origQty", default, with = "codec::option_decimal")]
    pub orig_quantity: Option<Decimal>,
    #[serde(rename = "executedQty", default, with = "codec::option_decimal")]
    pub executed_quantity: Option<Decimal>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(rename = "timeInForce", default)]
    pub time_in_force: Option<TimeInForce>,
    #[serde(rename = "type", default)]
    pub order_type: Option<OrderType>,
    #[serde(default)]
    pub side: Option<OrderSide>,
    #[serde(default)]
    pub fills: Vec<Fill>,
}

impl Request for NewOrderRequest {
    const ENDPOINT: &'static str = ORDER_ENDPOINT;
    const METHOD: Method = Method::Post;
    type Response = OrderResult;

    fn write_params(&self, params: &mut QueryParams) {
        write_order_params(self, params);
    }

    fn security(&self) -> Security {
        Security::Signed(self.signed)
    }

    fn decode_response(value: Value) -> Result<OrderResult, ExchangeError> {
        codec::from_json(value, "order result")
    }
}

impl SignedRequest for NewOrderRequest {
    fn signed_params_mut(&mut self) -> &mut SignedParams {
        &mut self.signed
    }
}

/// A new order checked by the matching engine but never placed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestNewOrderRequest {
    order: NewOrderRequest,
}

impl TestNewOrderRequest {
    pub fn new(order: NewOrderRequest) -> Self {
        Self { order }
    }

    pub fn order(&self) -> &NewOrderRequest {
        &self.order
    }
}

/// The test endpoint answers with an empty object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestOrderAck;

impl Request for TestNewOrderRequest {
    const ENDPOINT: &'static str = "/api/v3/order/test";
    const METHOD: Method = Method::Post;
    type Response = TestOrderAck;

    fn write_params(&self, params: &mut QueryParams) {
        write_order_params(&self.order, params);
    }

    fn security(&self) -> Security {
        Security::Signed(self.order.signed)
    }

    fn decode_response(value: Value) -> Result<TestOrderAck, ExchangeError> {
        match value {
            Value::Object(_) => Ok(TestOrderAck),
            other => Err(ExchangeError::decode(
                "test order",
                format!("expected object, found {}", other),
            )),
        }
    }
}

impl SignedRequest for TestNewOrderRequest {
    fn signed_params_mut(&mut self) -> &mut SignedParams {
        &mut self.order.signed
    }
}

/// An order as reported by the query, open-orders and all-orders endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub symbol: String,
    #[serde(rename = "orderId")]
    pub order_id: u64,
    #[serde(rename = "clientOrderId")]
    pub client_order_id: String,
    #[serde(with = "codec::decimal")]
    pub price: Decimal,
    #[serde(rename = "origQty", with = "codec::decimal")]
    pub orig_quantity: Decimal,
    #[serde(rename = "executedQty", with = "codec::decimal")]
    pub executed_quantity: Decimal,
    #[serde(rename = "cummulativeQuoteQty", default, with = "codec::option_decimal")]
    pub cumulative_quote_quantity: Option<Decimal>,
    pub status: OrderStatus,
    #[serde(rename = "timeInForce")]
    pub time_in_force: TimeInForce,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: OrderSide,
    #[serde(rename = "stopPrice", default, with = "codec::option_decimal")]
    pub stop_price: Option<Decimal>,
    #[serde(rename = "icebergQty", default, with = "codec::option_decimal")]
    pub iceberg_quantity: Option<Decimal>,
    #[serde(with = "codec::timestamp_ms")]
    pub time: DateTime<Utc>,
    #[serde(rename = "isWorking", default)]
    pub is_working: bool,
}

/// `orderId` (nonzero) or `origClientOrderId` (non-empty) must identify
/// the order.
fn order_reference(
    endpoint: &str,
    order_id: Option<u64>,
    orig_client_order_id: Option<String>,
) -> Result<(Option<u64>, Option<String>), ExchangeError> {
    let order_id = order_id.filter(|id| *id != 0);
    let orig_client_order_id = orig_client_order_id.filter(|id| !id.is_empty());
    if order_id.is_none() && orig_client_order_id.is_none() {
        return Err(ExchangeError::validation(
            endpoint,
            "either orderId or origClientOrderId must be sent",
        ));
    }
    Ok((order_id, orig_client_order_id))
}

/// Status of one order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOrderRequest {
    symbol: String,
    order_id: Option<u64>,
    orig_client_order_id: Option<String>,
    signed: SignedParams,
}

impl QueryOrderRequest {
    pub fn new(
        symbol: impl Into<String>,
        order_id: Option<u64>,
        orig_client_order_id: Option<String>,
    ) -> Result<Self, ExchangeError> {
        let (order_id, orig_client_order_id) =
            order_reference(ORDER_ENDPOINT, order_id, orig_client_order_id)?;
        Ok(Self {
            symbol: symbol.into(),
            order_id,
            orig_client_order_id,
            signed: SignedParams::default(),
        })
    }

    pub fn by_order_id(symbol: impl Into<String>, order_id: u64) -> Result<Self, ExchangeError> {
        Self::new(symbol, Some(order_id), None)
    }

    pub fn by_client_order_id(
        symbol: impl Into<String>,
        orig_client_order_id: impl Into<String>,
    ) -> Result<Self, ExchangeError> {
        Self::new(symbol, None, Some(orig_client_order_id.into()))
    }
}

impl Request for QueryOrderRequest {
    const ENDPOINT: &'static str = ORDER_ENDPOINT;
    const METHOD: Method = Method::Get;
    type Response = Order;

    fn write_params(&self, params: &mut QueryParams) {
        params
            .push("symbol", &self.symbol)
            .push_nonzero("orderId", self.order_id)
            .push_optional("origClientOrderId", self.orig_client_order_id.as_ref());
    }

    fn security(&self) -> Security {
        Security::Signed(self.signed)
    }

    fn decode_response(value: Value) -> Result<Order, ExchangeError> {
        codec::from_json(value, "order")
    }
}

impl SignedRequest for QueryOrderRequest {
    fn signed_params_mut(&mut self) -> &mut SignedParams {
        &mut self.signed
    }
}

/// Cancel an active order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelOrderRequest {
    symbol: String,
    order_id: Option<u64>,
    orig_client_order_id: Option<String>,
    /// Identifies this cancel; generated by the exchange when absent
    new_client_order_id: Option<String>,
    signed: SignedParams,
}

impl CancelOrderRequest {
    pub fn new(
        symbol: impl Into<String>,
        order_id: Option<u64>,
        orig_client_order_id: Option<String>,
    ) -> Result<Self, ExchangeError> {
        let (order_id, orig_client_order_id) =
            order_reference(ORDER_ENDPOINT, order_id, orig_client_order_id)?;
        Ok(Self {
            symbol: symbol.into(),
            order_id,
            orig_client_order_id,
            new_client_order_id: None,
            signed: SignedParams::default(),
        })
    }

    pub fn by_order_id(symbol: impl Into<String>, order_id: u64) -> Result<Self, ExchangeError> {
        Self::new(symbol, Some(order_id), None)
    }

    #[must_use]
    pub fn with_new_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.new_client_order_id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanceledOrder {
    pub symbol: String,
    #[serde(rename = "origClientOrderId")]
    pub orig_client_order_id: String,
    #[serde(rename = "orderId")]
    pub order_id: u64,
    #[serde(rename = "clientOrderId")]
    pub client_order_id: String,
}

impl Request for CancelOrderRequest {
    const ENDPOINT: &'static str = ORDER_ENDPOINT;
    const METHOD: Method = Method::Delete;
    type Response = CanceledOrder;

    fn write_params(&self, params: &mut QueryParams) {
        params
            .push("symbol", &self.symbol)
            .push_nonzero("orderId", self.order_id)
            .push_optional("origClientOrderId", self.orig_client_order_id.as_ref())
            .push_optional("newClientOrderId", self.new_client_order_id.as_ref());
    }

    fn security(&self) -> Security {
        Security::Signed(self.signed)
    }

    fn decode_response(value: Value) -> Result<CanceledOrder, ExchangeError> {
        codec::from_json(value, "canceled order")
    }
}

impl SignedRequest for CancelOrderRequest {
    fn signed_params_mut(&mut self) -> &mut SignedParams {
        &mut self.signed
    }
}

/// Every open order on a symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOrdersRequest {
    symbol: String,
    signed: SignedParams,
}

impl OpenOrdersRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            signed: SignedParams::default(),
        }
    }
}

impl Request for OpenOrdersRequest {
    const ENDPOINT: &'static str = "/api/v3/openOrders";
    const METHOD: Method = Method::Get;
    type Response = Vec<Order>;

    fn write_params(&self, params: &mut QueryParams) {
        params.push("symbol", &self.symbol);
    }

    fn security(&self) -> Security {
        Security::Signed(self.signed)
    }

    fn decode_response(value: Value) -> Result<Vec<Order>, ExchangeError> {
        codec::from_json(value, "open orders")
    }
}

impl SignedRequest for OpenOrdersRequest {
    fn signed_params_mut(&mut self) -> &mut SignedParams {
        &mut self.signed
    }
}

/// Active, canceled and filled orders. With `order_id` set, returns orders
/// from that id onward; otherwise the most recent ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllOrdersRequest {
    symbol: String,
    order_id: Option<u64>,
    /// Default 500, max 1000
    limit: Option<u32>,
    signed: SignedParams,
}

impl AllOrdersRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            order_id: None,
            limit: None,
            signed: SignedParams::default(),
        }
    }

    #[must_use]
    pub fn from_order_id(mut self, order_id: u64) -> Self {
        self.order_id = Some(order_id);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl Request for AllOrdersRequest {
    const ENDPOINT: &'static str = "/api/v3/allOrders";
    const METHOD: Method = Method::Get;
    type Response = Vec<Order>;

    fn write_params(&self, params: &mut QueryParams) {
        params
            .push("symbol", &self.symbol)
            .push_nonzero("orderId", self.order_id)
            .push_nonzero("limit", self.limit);
    }

    fn security(&self) -> Security {
        Security::Signed(self.signed)
    }

    fn decode_response(value: Value) -> Result<Vec<Order>, ExchangeError> {
        codec::from_json(value, "all orders")
    }
}

impl SignedRequest for AllOrdersRequest {
    fn signed_params_mut(&mut self) -> &mut SignedParams {
        &mut self.signed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn declared(request: &impl Request) -> Vec<(String, String)> {
        let mut params = QueryParams::new();
        request.write_params(&mut params);
        params.encode()
    }

    #[test]
    fn test_limit_requires_price_and_time_in_force() {
        let err = NewOrderRequest::builder("BTCUSDT", OrderSide::Buy, OrderType::Limit, dec!(1))
            .time_in_force(TimeInForce::Gtc)
            .build()
            .unwrap_err();
        assert!(matches!(err, ExchangeError::ValidationError(ref m) if m.contains("price")));

        let err = NewOrderRequest::builder("BTCUSDT", OrderSide::Buy, OrderType::Limit, dec!(1))
            .price(dec!(0.1))
            .build()
            .unwrap_err();
        assert!(matches!(err, ExchangeError::ValidationError(ref m) if m.contains("timeInForce")));
    }

    #[test]
    fn test_market_drops_price_and_time_in_force() {
        let order = NewOrderRequest::builder("BTCUSDT", OrderSide::Sell, OrderType::Market, dec!(2))
            .price(dec!(100))
            .time_in_force(TimeInForce::Ioc)
            .build()
            .unwrap();
        assert_eq!(order.price(), None);
        assert_eq!(order.time_in_force(), None);
    }

    #[test]
    fn test_stop_types_require_stop_price() {
        for order_type in [
            OrderType::StopLoss,
            OrderType::TakeProfit,
            OrderType::StopLossLimit,
            OrderType::TakeProfitLimit,
        ] {
            let err = NewOrderRequest::builder("BTCUSDT", OrderSide::Buy, order_type, dec!(1))
                .price(dec!(10))
                .time_in_force(TimeInForce::Gtc)
                .build()
                .unwrap_err();
            assert!(err.is_pre_flight(), "{:?}", order_type);
        }

        let order =
            NewOrderRequest::builder("BTCUSDT", OrderSide::Buy, OrderType::StopLoss, dec!(1))
                .stop_price(dec!(9))
                .price(dec!(10))
                .time_in_force(TimeInForce::Gtc)
                .build()
                .unwrap();
        assert_eq!(order.price(), Some(dec!(10)));
        assert_eq!(order.time_in_force(), None);

        let order =
            NewOrderRequest::builder("BTCUSDT", OrderSide::Buy, OrderType::TakeProfit, dec!(1))
                .stop_price(dec!(9))
                .price(dec!(10))
                .build()
                .unwrap();
        assert_eq!(order.price(), None);
    }

    #[test]
    fn test_limit_maker_drops_time_in_force() {
        let order =
            NewOrderRequest::builder("BTCUSDT", OrderSide::Buy, OrderType::LimitMaker, dec!(1))
                .price(dec!(10))
                .time_in_force(TimeInForce::Gtc)
                .build()
                .unwrap();
        assert_eq!(order.time_in_force(), None);
        assert!(
            NewOrderRequest::builder("BTCUSDT", OrderSide::Buy, OrderType::LimitMaker, dec!(1))
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_quantity_must_be_positive() {
        assert!(NewOrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(0)).is_err());
        assert!(NewOrderRequest::market("BTCUSDT", OrderSide::Buy, dec!(-1)).is_err());
    }

    #[test]
    fn test_order_param_order() {
        let order = NewOrderRequest::limit("LTCBTC", OrderSide::Buy, dec!(1), dec!(0.1)).unwrap();
        let names: Vec<String> = declared(&order).into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            ["symbol", "side", "type", "timeInForce", "quantity", "price", "newOrderRespType"]
        );
    }

    #[test]
    fn test_response_type_defaults_to_result() {
        let order = NewOrderRequest::market("BTCUSDT", OrderSide::Sell, dec!(2)).unwrap();
        assert_eq!(order.response_type(), OrderResponseType::Result);
        assert!(declared(&order)
            .contains(&("newOrderRespType".to_string(), "RESULT".to_string())));

        let order = NewOrderRequest::builder("BTCUSDT", OrderSide::Sell, OrderType::Market, dec!(2))
            .response_type(OrderResponseType::Full)
            .build()
            .unwrap();
        assert!(declared(&order).contains(&("newOrderRespType".to_string(), "FULL".to_string())));
    }

    #[test]
    fn test_query_and_cancel_need_a_reference() {
        assert!(QueryOrderRequest::new("BTCUSDT", None, None).is_err());
        assert!(QueryOrderRequest::by_order_id("BTCUSDT", 0).is_err());
        assert!(CancelOrderRequest::new("BTCUSDT", Some(0), Some(String::new())).is_err());

        let query = QueryOrderRequest::by_client_order_id("BTCUSDT", "myOrder1").unwrap();
        assert_eq!(
            declared(&query),
            vec![
                ("symbol".to_string(), "BTCUSDT".to_string()),
                ("origClientOrderId".to_string(), "myOrder1".to_string()),
            ]
        );
    }

    #[test]
    fn test_all_orders_omits_zero() {
        let request = AllOrdersRequest::new("BTCUSDT").from_order_id(0).with_limit(5);
        assert_eq!(
            declared(&request),
            vec![
                ("symbol".to_string(), "BTCUSDT".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_ack_result_decodes_without_details() {
        let result = NewOrderRequest::decode_response(json!({
            "symbol": "BTCUSDT",
            "orderId": 28,
            "clientOrderId": "6gCrw2kRUAF9CvJDGP16IP",
            "transactTime": 1507725176595_i64
        }))
        .unwrap();
        assert_eq!(result.order_id, 28);
        assert!(result.fills.is_empty());
        assert_eq!(result.status, None);
    }

    #[test]
    fn test_full_result_decodes_fills() {
        let result = NewOrderRequest::decode_response(json!({
            "symbol": "BTCUSDT",
            "orderId": 28,
            "clientOrderId": "6gCrw2kRUAF9CvJDGP16IP",
            "transactTime": 1507725176595_i64,
            "price": "0.00000000",
            "origQty": "10.00000000",
            "executedQty": "10.00000000",
            "status": "FILLED",
            "timeInForce": "GTC",
            "type": "MARKET",
            "side": "SELL",
            "fills": [
                {"price": "4000.00000000", "qty": "1.00000000", "commission": "4.00000000", "commissionAsset": "USDT"}
            ]
        }))
        .unwrap();
        assert_eq!(result.status, Some(OrderStatus::Filled));
        assert_eq!(result.order_type, Some(OrderType::Market));
        assert_eq!(result.fills[0].commission, dec!(4));
    }

    #[test]
    fn test_test_order_ack() {
        assert!(TestNewOrderRequest::decode_response(json!({})).is_ok());
        assert!(TestNewOrderRequest::decode_response(json!([])).is_err());
    }

    #[test]
    fn test_order_decodes() {
        let orders = OpenOrdersRequest::decode_response(json!([{
            "symbol": "LTCBTC",
            "orderId": 1,
            "clientOrderId": "myOrder1",
            "price": "0.1",
            "origQty": "1.0",
            "executedQty": "0.0",
            "cummulativeQuoteQty": "0.0",
            "status": "NEW",
            "timeInForce": "GTC",
            "type": "LIMIT",
            "side": "BUY",
            "stopPrice": "0.0",
            "icebergQty": "0.0",
            "time": 1499827319559_i64,
            "isWorking": true
        }]))
        .unwrap();
        assert_eq!(orders[0].status, OrderStatus::New);
        assert_eq!(orders[0].price, dec!(0.1));
        assert!(orders[0].is_working);
    }
}
