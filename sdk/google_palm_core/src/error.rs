use thiserror::Error;

/// Errors that can occur when interacting with the Generative Language API.
#[derive(Error, Debug)]
pub enum PalmError {
    /// The server returned a non-2xx status without a parseable error payload.
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// The API returned a structured error response.
    #[error("API error ({status}): {message}")]
    Api { status: String, message: String },

    /// The request payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request failed at the transport level.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint URL is invalid.
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// A required configuration value is missing.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// A required request field was not set before building.
    #[error("Builder error: {0}")]
    Builder(String),
}

/// Result type alias for Generative Language operations.
pub type PalmResult<T> = std::result::Result<T, PalmError>;
