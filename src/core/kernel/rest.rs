use crate::core::errors::ExchangeError;
use crate::core::kernel::builder::{CallDescriptor, Method, Placement};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{instrument, trace};

/// Transport trait for executing built calls
///
/// Implementations send a [`CallDescriptor`] exactly as built and hand back
/// the raw response body. Decoding happens above this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, call: &CallDescriptor) -> Result<Vec<u8>, ExchangeError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl RestClientConfig {
    /// Create a new configuration
    ///
    /// # Arguments
    /// * `base_url` - Base URL for the API
    /// * `exchange_name` - Name of the exchange
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            exchange_name,
            timeout_seconds: 30,
            user_agent: concat!("binance-api/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
}

impl RestClientBuilder {
    pub fn new(config: RestClientConfig) -> Self {
        Self { config }
    }

    /// Build the REST client
    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
        })
    }
}

/// Error body the exchange returns alongside non-2xx statuses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i32,
    msg: String,
}

/// Map a failed response body to `ApiError`, preferring the exchange's own
/// `{"code": .., "msg": ..}` over the HTTP status.
pub(crate) fn api_error(status: u16, body: &[u8]) -> ExchangeError {
    match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(parsed) => ExchangeError::ApiError {
            code: parsed.code,
            message: parsed.msg,
        },
        Err(_) => ExchangeError::ApiError {
            code: i32::from(status),
            message: String::from_utf8_lossy(body).into_owned(),
        },
    }
}

/// Implementation of `Transport` using reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    pub fn new(base_url: String, exchange_name: String) -> Result<Self, ExchangeError> {
        RestClientBuilder::new(RestClientConfig::new(base_url, exchange_name)).build()
    }

    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Full URL for a call; query placement appends the canonical string.
    pub fn build_url(&self, call: &CallDescriptor) -> String {
        match (call.placement(), call.query_string()) {
            (Placement::Query, query) if !query.is_empty() => {
                format!("{}{}?{}", self.config.base_url, call.path(), query)
            }
            _ => format!("{}{}", self.config.base_url, call.path()),
        }
    }

    /// Form body for a call, present only with body placement.
    pub fn form_body<'a>(&self, call: &'a CallDescriptor) -> Option<&'a str> {
        match call.placement() {
            Placement::Body => Some(call.query_string()),
            Placement::Query => None,
        }
    }

    /// Handle the response and extract the body
    #[instrument(
        skip(self, response),
        fields(exchange = %self.config.exchange_name, status = %response.status())
    )]
    async fn handle_response(&self, response: Response) -> Result<Vec<u8>, ExchangeError> {
        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            ExchangeError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        trace!("Response body: {}", String::from_utf8_lossy(&body));

        if status.is_success() {
            Ok(body.to_vec())
        } else {
            Err(api_error(status.as_u16(), &body))
        }
    }
}

#[async_trait]
impl Transport for ReqwestRest {
    #[instrument(
        skip(self, call),
        fields(
            exchange = %self.config.exchange_name,
            method = %call.method(),
            endpoint = %call.path()
        )
    )]
    async fn execute(&self, call: &CallDescriptor) -> Result<Vec<u8>, ExchangeError> {
        let method = match call.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut request = self.client.request(method, self.build_url(call));
        for (key, value) in call.headers() {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(body) = self.form_body(call) {
            request = request
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ExchangeError::NetworkError(format!("Request failed: {}", e)))?;

        self.handle_response(response).await
    }
}
