use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;

/// Header carrying the API key on signed calls
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Signer trait for request authentication
///
/// Implementations produce the `signature` value for a canonical query
/// string and the headers that must accompany a signed call.
pub trait Signer: Send + Sync {
    /// Sign the canonical query string, returning the wire signature.
    fn sign(&self, payload: &str) -> Result<String, ExchangeError>;

    /// Headers to attach to every signed call.
    fn headers(&self) -> Vec<(String, String)>;
}

/// HMAC-SHA256 signer with lowercase hex output
pub struct HmacSigner {
    api_key: String,
    secret_key: Secret<String>,
}

impl HmacSigner {
    /// Create a new HMAC signer
    ///
    /// # Errors
    /// `ConfigurationError` when the secret is empty.
    pub fn new(api_key: String, secret_key: Secret<String>) -> Result<Self, ExchangeError> {
        if secret_key.expose_secret().is_empty() {
            return Err(ExchangeError::ConfigurationError(
                "signed requests need a non-empty API secret".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            secret_key,
        })
    }

    pub fn from_config(config: &ExchangeConfig) -> Result<Self, ExchangeError> {
        Self::new(
            config.api_key().to_string(),
            Secret::new(config.secret_key().to_string()),
        )
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSigner")
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl Signer for HmacSigner {
    fn sign(&self, payload: &str) -> Result<String, ExchangeError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret_key.expose_secret().as_bytes())
            .map_err(|e| ExchangeError::ConfigurationError(format!("Invalid secret key: {}", e)))?;

        mac.update(payload.as_bytes());
        let result = mac.finalize();

        Ok(hex::encode(result.into_bytes()))
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![(API_KEY_HEADER.to_string(), self.api_key.clone())]
    }
}
