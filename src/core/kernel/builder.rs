//! Turns a typed [`Request`] into a transport-ready [`CallDescriptor`].

use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::codec::{ParamValue, QueryParams};
use crate::core::kernel::signer::{HmacSigner, Signer};
use crate::core::traits::{Request, Security};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }

    /// Where this method carries its parameters
    pub const fn placement(self) -> Placement {
        match self {
            Self::Post => Placement::Body,
            Self::Get | Self::Delete => Placement::Query,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Appended to the URL after `?`
    Query,
    /// Sent as an `application/x-www-form-urlencoded` body
    Body,
}

/// A fully built call, ready for any transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDescriptor {
    method: Method,
    path: &'static str,
    params: Vec<(String, String)>,
    placement: Placement,
    headers: Vec<(String, String)>,
    query_string: String,
}

impl CallDescriptor {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        self.path
    }

    /// Wire pairs in send order; `signature` is last on signed calls.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Percent-encoded `name=value&...` form, exactly as sent
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_signed(&self) -> bool {
        self.param("signature").is_some()
    }
}

fn canonical(pairs: &[(String, String)]) -> Result<String, ExchangeError> {
    serde_urlencoded::to_string(pairs).map_err(|e| {
        ExchangeError::ConfigurationError(format!("Failed to encode parameters: {}", e))
    })
}

/// Builds call descriptors, signing the ones that need it.
#[derive(Clone, Default)]
pub struct RequestBuilder {
    signer: Option<Arc<dyn Signer>>,
    default_recv_window: Option<u64>,
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("has_signer", &self.signer.is_some())
            .field("default_recv_window", &self.default_recv_window)
            .finish()
    }
}

impl RequestBuilder {
    /// Builder for public calls only
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    #[must_use]
    pub fn with_recv_window(mut self, millis: u64) -> Self {
        self.default_recv_window = Some(millis);
        self
    }

    /// Signs with HMAC when the config carries credentials; takes the
    /// default `recvWindow` from the config.
    pub fn from_config(config: &ExchangeConfig) -> Result<Self, ExchangeError> {
        let mut builder = Self::new();
        if config.has_credentials() {
            builder = builder.with_signer(Arc::new(HmacSigner::from_config(config)?));
        }
        if let Some(millis) = config.recv_window {
            builder = builder.with_recv_window(millis);
        }
        Ok(builder)
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    /// Build a call; signed requests without a timestamp use the current time.
    pub fn build<R: Request>(&self, request: &R) -> Result<CallDescriptor, ExchangeError> {
        self.build_at(request, Utc::now())
    }

    /// Build a call, using `now` for signed requests without a timestamp.
    pub fn build_at<R: Request>(
        &self,
        request: &R,
        now: DateTime<Utc>,
    ) -> Result<CallDescriptor, ExchangeError> {
        let mut params = QueryParams::new();
        request.write_params(&mut params);

        let mut headers = Vec::new();
        let pairs = match request.security() {
            Security::Public => params.encode(),
            Security::Signed(signed) => {
                let signer = self.signer.as_ref().ok_or_else(|| {
                    ExchangeError::ConfigurationError(format!(
                        "{} is signed but no API secret is configured",
                        R::ENDPOINT
                    ))
                })?;

                params.push(
                    "timestamp",
                    ParamValue::Timestamp(signed.timestamp.unwrap_or(now)),
                );
                params.push_nonzero("recvWindow", signed.recv_window.or(self.default_recv_window));

                let mut pairs = params.encode();
                let signature = signer.sign(&canonical(&pairs)?)?;
                pairs.push(("signature".to_string(), signature));
                headers = signer.headers();
                pairs
            }
        };

        let query_string = canonical(&pairs)?;
        debug!(
            method = %R::METHOD,
            endpoint = R::ENDPOINT,
            param_count = pairs.len(),
            signed = !headers.is_empty(),
            "built request"
        );

        Ok(CallDescriptor {
            method: R::METHOD,
            path: R::ENDPOINT,
            params: pairs,
            placement: R::METHOD.placement(),
            headers,
            query_string,
        })
    }
}
