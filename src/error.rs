//! Error types for the C2CX client library.

use thiserror::Error;

/// User-facing message shown when the credentials document cannot be loaded.
pub const CREDENTIALS_LOAD_MESSAGE: &str = "Unable to load credentials, please check that the \
     credentials file exists and is in valid json format.";

/// The main error type for all C2CX client operations.
#[derive(Error, Debug)]
pub enum C2cxError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// The server answered with a non-success HTTP status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status returned by the transport
        status: reqwest::StatusCode,
        /// Raw response body
        body: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Request parameters could not be encoded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// C2CX API returned a non-200 code
    #[error("C2CX API error: {0}")]
    Api(ApiError),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Order side was neither buy nor sell
    #[error("Invalid order side {0:?}: expected \"Buy\" or \"Sell\"")]
    InvalidSide(String),

    /// Credentials could not be loaded
    #[error("{CREDENTIALS_LOAD_MESSAGE} ({0})")]
    Credentials(String),

    /// Missing required credentials
    #[error("Missing credentials: API key and secret key required for private endpoints")]
    MissingCredentials,
}

impl C2cxError {
    /// Business failure reported by the exchange, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            C2cxError::Api(e) => Some(e),
            _ => None,
        }
    }

    /// True for failures below the API envelope (network, HTTP status, undecodable body).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            C2cxError::Http(_)
                | C2cxError::HttpMiddleware(_)
                | C2cxError::HttpStatus { .. }
                | C2cxError::Json(_)
                | C2cxError::InvalidResponse(_)
        )
    }
}

/// Business error returned by the exchange inside the response envelope.
///
/// Any envelope whose `code` is not 200, including one with no code at all,
/// is reported this way. The message is kept exactly as the exchange sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The envelope code, `None` if the exchange omitted it
    pub code: Option<i64>,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "Error {}: {}", code, self.message),
            None => write!(f, "Error (no code): {}", self.message),
        }
    }
}

impl ApiError {
    /// Create a new API error from code and message.
    pub fn new(code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Check if the exchange rejected the request signature.
    pub fn is_invalid_signature(&self) -> bool {
        self.message.to_ascii_lowercase().contains("sign")
    }

    /// Check if the exchange rejected the API key.
    pub fn is_invalid_key(&self) -> bool {
        self.message.to_ascii_lowercase().contains("apikey")
    }

    /// Check if the order was refused for lack of funds.
    pub fn is_insufficient_balance(&self) -> bool {
        let message = self.message.to_ascii_lowercase();
        message.contains("insufficient") || message.contains("balance")
    }
}
