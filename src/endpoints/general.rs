use crate::core::errors::ExchangeError;
use crate::core::kernel::builder::Method;
use crate::core::kernel::codec::{self, QueryParams};
use crate::core::traits::Request;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Connectivity check; the exchange answers with an empty object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PingRequest;

impl Request for PingRequest {
    const ENDPOINT: &'static str = "/api/v3/ping";
    const METHOD: Method = Method::Get;
    type Response = ();

    fn write_params(&self, _params: &mut QueryParams) {}

    fn decode_response(_value: Value) -> Result<(), ExchangeError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerTimeRequest;

/// Server clock next to the local clock at the moment of decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerTime {
    pub server_time: DateTime<Utc>,
    pub local_time: DateTime<Utc>,
    /// `server_time - local_time`
    pub delta: Duration,
}

impl ServerTime {
    pub fn new(server_time: DateTime<Utc>, local_time: DateTime<Utc>) -> Self {
        Self {
            server_time,
            local_time,
            delta: server_time - local_time,
        }
    }
}

impl Request for ServerTimeRequest {
    const ENDPOINT: &'static str = "/api/v3/time";
    const METHOD: Method = Method::Get;
    type Response = ServerTime;

    fn write_params(&self, _params: &mut QueryParams) {}

    fn decode_response(value: Value) -> Result<ServerTime, ExchangeError> {
        let raw = codec::field(&value, "server time", "serverTime")?;
        let server_time = codec::timestamp_from_value(raw).map_err(|e| {
            ExchangeError::decode("server time", format!("field 'serverTime': {}", e))
        })?;
        Ok(ServerTime::new(server_time, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_time_delta() {
        let time = ServerTimeRequest::decode_response(json!({"serverTime": 1_499_827_319_559_i64}))
            .unwrap();
        assert_eq!(time.server_time.timestamp_millis(), 1_499_827_319_559);
        assert_eq!(time.delta, time.server_time - time.local_time);
        assert!(time.delta < Duration::zero());
    }

    #[test]
    fn test_server_time_missing_field() {
        assert!(ServerTimeRequest::decode_response(json!({})).is_err());
    }
}
