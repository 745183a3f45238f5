pub mod client;
pub mod core;
pub mod endpoints;

pub use self::client::BinanceClient;
pub use self::core::config::ExchangeConfig;
pub use self::core::errors::ExchangeError;
pub use self::core::traits::{Request, Security, SignedParams, SignedRequest};
pub use self::core::types::*;
