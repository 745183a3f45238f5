//! Kernel - request codec, signing and transport
//!
//! Everything between a typed request value and the raw bytes on the wire,
//! and back again.
//!
//! # Architecture
//!
//! ## Encoding
//! - `QueryParams`: ordered parameters with presence rules
//! - `RequestBuilder`: typed request → `CallDescriptor`
//! - `Signer` / `HmacSigner`: HMAC-SHA256 over the canonical query string
//!
//! ## Decoding
//! - `codec`: exact decimals, millisecond timestamps, field lookup
//! - `shapes`: positional rows, filter scans, arrays re-keyed into maps
//!
//! ## Transport
//! - `Transport`: pluggable async executor for built calls
//! - `ReqwestRest`: reqwest-backed implementation
//!
//! # Usage
//!
//! ```rust,no_run
//! use binance_api::core::config::ExchangeConfig;
//! use binance_api::core::kernel::*;
//! use binance_api::endpoints::market_data::DepthRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExchangeConfig::read_only();
//! let builder = RequestBuilder::from_config(&config)?;
//! let rest = RestClientBuilder::new(RestClientConfig::new(
//!     config.rest_base_url(),
//!     "binance".to_string(),
//! ))
//! .build()?;
//!
//! let call = builder.build(&DepthRequest::new("BTCUSDT").with_limit(5))?;
//! assert_eq!(call.query_string(), "symbol=BTCUSDT&limit=5");
//! let body = rest.execute(&call).await?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod codec;
pub mod rest;
pub mod shapes;
pub mod signer;

// Re-export key types for convenience
pub use builder::{CallDescriptor, Method, Placement, RequestBuilder};
pub use codec::{ParamValue, Presence, QueryParams};
pub use rest::{ReqwestRest, RestClientBuilder, RestClientConfig, Transport};
pub use shapes::{Balance, FilterRange, FilterScan, FilterShape, KeyedCollection, SkippedEntry};
pub use signer::{HmacSigner, Signer};
