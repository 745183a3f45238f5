use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::builder::RequestBuilder;
use crate::core::kernel::rest::{ReqwestRest, RestClientBuilder, RestClientConfig, Transport};
use crate::core::kernel::shapes::KeyedCollection;
use crate::core::traits::Request;
use crate::endpoints::{
    AccountInfo, AccountInformationRequest, DepthRequest, ExchangeInfo, ExchangeInfoRequest,
    NewOrderRequest, OrderBook, OrderResult, PingRequest, ServerTime, ServerTimeRequest,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{instrument, warn};

const EXCHANGE_NAME: &str = "binance";

/// Build → transport → decode, for any [`Request`]
pub struct BinanceClient<T: Transport = ReqwestRest> {
    builder: RequestBuilder,
    transport: T,
}

impl<T: Transport> std::fmt::Debug for BinanceClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceClient")
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

impl BinanceClient<ReqwestRest> {
    /// Client over reqwest. Signs only when the config carries credentials.
    pub fn new(config: &ExchangeConfig) -> Result<Self, ExchangeError> {
        let rest = RestClientBuilder::new(RestClientConfig::new(
            config.rest_base_url(),
            EXCHANGE_NAME.to_string(),
        ))
        .build()?;

        Ok(Self::with_transport(RequestBuilder::from_config(config)?, rest))
    }
}

impl<T: Transport> BinanceClient<T> {
    pub fn with_transport(builder: RequestBuilder, transport: T) -> Self {
        Self { builder, transport }
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one request and decode its response.
    #[instrument(skip(self, request), fields(exchange = EXCHANGE_NAME, endpoint = R::ENDPOINT))]
    pub async fn send<R: Request + Sync>(&self, request: &R) -> Result<R::Response, ExchangeError> {
        let call = self.builder.build(request)?;
        let body = self.transport.execute(&call).await?;

        let value: Value = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "response body is not JSON");
            ExchangeError::decode(R::ENDPOINT, format!("invalid JSON body: {}", e))
        })?;

        R::decode_response(value)
    }

    pub async fn ping(&self) -> Result<(), ExchangeError> {
        self.send(&PingRequest).await
    }

    pub async fn server_time(&self) -> Result<ServerTime, ExchangeError> {
        self.send(&ServerTimeRequest).await
    }

    pub async fn exchange_info(&self) -> Result<ExchangeInfo, ExchangeError> {
        self.send(&ExchangeInfoRequest).await
    }

    pub async fn depth(
        &self,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<OrderBook, ExchangeError> {
        let mut request = DepthRequest::new(symbol);
        request.limit = limit;
        self.send(&request).await
    }

    pub async fn all_prices(&self) -> Result<KeyedCollection<Decimal>, ExchangeError> {
        self.send(&crate::endpoints::AllPricesRequest).await
    }

    pub async fn account(&self) -> Result<AccountInfo, ExchangeError> {
        self.send(&AccountInformationRequest::new()).await
    }

    pub async fn place_order(&self, order: &NewOrderRequest) -> Result<OrderResult, ExchangeError> {
        self.send(order).await
    }
}
