use crate::error::{PalmError, PalmResult};
use secrecy::{ExposeSecret, SecretString};

/// Environment variable consulted when no API key is given explicitly.
pub const API_KEY_ENV_VAR: &str = "PALM_API_KEY";

/// An API key for the Generative Language API.
///
/// The key is sent as the `key` query parameter on every request. It is held
/// as a [`SecretString`] so it never appears in `Debug` output.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Wrap an API key string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Read the API key from the `PALM_API_KEY` environment variable.
    pub fn from_env() -> PalmResult<Self> {
        match std::env::var(API_KEY_ENV_VAR) {
            Ok(key) if !key.is_empty() => Ok(Self::new(key)),
            _ => Err(PalmError::MissingConfig(format!(
                "api_key is required. Set it via builder or the {API_KEY_ENV_VAR} env var."
            ))),
        }
    }

    /// The raw key value, for use as the `key` query parameter.
    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey(****)")
    }
}
