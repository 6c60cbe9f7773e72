use thiserror::Error;

/// Message returned when a request names a model the endpoint does not serve.
pub const MODEL_NOT_SUPPORTED: &str = "model specified is not supported";

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PgError>;

/// Main error type for the client library
#[derive(Error, Debug)]
pub enum PgError {
    /// Request rejected locally before any network call was made
    #[error("{message}")]
    Validation { message: String },

    /// Client configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// DNS, connect, TLS or body read failures
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The transport gave up waiting on the server
    #[error("Request timed out")]
    Timeout,

    /// The governing cancellation token fired
    #[error("Request cancelled")]
    Cancelled,

    /// The server understood the request but refused to authorize it.
    ///
    /// Returned for every 401/403 response regardless of body, so callers can
    /// match on the variant instead of the message.
    #[error("api understands the request but refuses to authorize it")]
    Unauthorized,

    /// Any other non-success status, carrying the server provided message
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Malformed JSON in a request or response body
    #[error("Serialization error: {message}: response: {body}")]
    Serialization {
        message: String,
        body: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A string that is not a member of its token registry
    #[error("invalid {kind} {value:?}")]
    InvalidToken { kind: &'static str, value: String },

    /// An image source could not produce its base64 payload
    #[error("Image error: {message}")]
    Image {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PgError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// The validation error for a model outside an endpoint's supported set
    pub fn model_not_supported() -> Self {
        Self::validation(MODEL_NOT_SUPPORTED)
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a network error with source
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create an API error from a status code and the server message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a serialization error that keeps the offending text
    pub fn serialization(
        message: impl Into<String>,
        body: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Serialization {
            message: message.into(),
            body: body.into(),
            source: source.into(),
        }
    }

    /// Create an unknown-token error
    pub fn invalid_token(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidToken {
            kind,
            value: value.into(),
        }
    }

    /// Create an image error
    pub fn image(message: impl Into<String>) -> Self {
        Self::Image {
            message: message.into(),
            source: None,
        }
    }

    /// Create an image error with source
    pub fn image_with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Image {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// True for the authorization sentinel
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PgError::Unauthorized)
    }

    /// True for errors raised before the request left the process
    pub fn is_validation(&self) -> bool {
        matches!(self, PgError::Validation { .. })
    }
}

/// Convert from reqwest errors
impl From<reqwest::Error> for PgError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PgError::Timeout
        } else if err.is_connect() {
            PgError::network_with_source("Connection failed", err)
        } else if err.is_builder() {
            PgError::configuration(format!("Invalid request: {err}"))
        } else {
            PgError::network_with_source("HTTP request failed", err)
        }
    }
}

/// Convert from serde_json errors raised while encoding request bodies
impl From<serde_json::Error> for PgError {
    fn from(err: serde_json::Error) -> Self {
        PgError::serialization("JSON encoding failed", String::new(), err)
    }
}
