use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    /// A signed request was attempted without a usable API secret, or the
    /// client could not be configured.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A caller-constructed request broke one of its structural rules.
    /// Raised before anything is built or sent.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The response body did not have the shape the endpoint expects.
    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("API error: {code} - {message}")]
    ApiError { code: i32, message: String },

    /// The request never produced a response: connection, timeout, or an
    /// unreadable body.
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),
}

impl ExchangeError {
    pub(crate) fn decode(shape: &str, message: impl std::fmt::Display) -> Self {
        Self::DecodeError(format!("{}: {}", shape, message))
    }

    pub(crate) fn validation(endpoint: &str, message: impl std::fmt::Display) -> Self {
        Self::ValidationError(format!("{}: {}", endpoint, message))
    }

    /// Whether the error was raised before any network action took place.
    pub fn is_pre_flight(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationError(_) | Self::ValidationError(_) | Self::ConfigError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pre_flight_classification() {
        assert!(ExchangeError::ConfigurationError("no secret".to_string()).is_pre_flight());
        assert!(ExchangeError::validation("/api/v3/order", "price missing").is_pre_flight());
        assert!(!ExchangeError::decode("depth", "bids missing").is_pre_flight());
        assert!(!ExchangeError::ApiError {
            code: -1121,
            message: "Invalid symbol.".to_string()
        }
        .is_pre_flight());
    }

    #[test]
    fn test_decode_message_names_shape() {
        let err = ExchangeError::decode("candlestick", "row has 10 elements");
        assert_eq!(err.to_string(), "Decode error: candlestick: row has 10 elements");
    }
}
