use crate::core::errors::ExchangeError;
use crate::core::kernel::builder::Method;
use crate::core::kernel::codec::QueryParams;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Signing inputs carried by a signed request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignedParams {
    /// Defaults to the build time when absent
    pub timestamp: Option<DateTime<Utc>>,
    /// Overrides the builder default when present
    pub recv_window: Option<u64>,
}

/// Capability marker: only `Signed` requests ever receive a signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Security {
    #[default]
    Public,
    Signed(SignedParams),
}

/// One REST call: where it goes, what it sends and how its answer decodes.
pub trait Request {
    const ENDPOINT: &'static str;
    const METHOD: Method;
    type Response;

    /// Append the endpoint's declared parameters, in wire order.
    fn write_params(&self, params: &mut QueryParams);

    fn security(&self) -> Security {
        Security::Public
    }

    fn decode_response(value: Value) -> Result<Self::Response, ExchangeError>;
}

/// Setters shared by every signed request
pub trait SignedRequest: Request + Sized {
    fn signed_params_mut(&mut self) -> &mut SignedParams;

    #[must_use]
    fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.signed_params_mut().timestamp = Some(timestamp);
        self
    }

    #[must_use]
    fn with_recv_window(mut self, millis: u64) -> Self {
        self.signed_params_mut().recv_window = Some(millis);
        self
    }
}
