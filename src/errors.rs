use serde::{Deserialize, Serialize};
use std::fmt;

use crate::services::session::TokenStoreError;

/// Main error type for the tawsil client
#[derive(Debug)]
pub enum TawsilError {
    // Backend API errors
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Api { status: u16, detail: String },

    // Network and HTTP client errors
    NetworkTimeout,
    NetworkConnection(String),
    HttpClient(String),
    InvalidUrl(String),

    // Serialization and parsing errors
    JsonParsing(String),
    JsonSerialization(String),
    InvalidFormat(String),
    MalformedSnapshot(String),

    // Validation errors
    ValidationFailed(Vec<ValidationError>),
    MissingRequiredField(String),
    InvalidFieldValue { field: String, value: String, reason: String },

    // Configuration and setup errors
    ConfigurationError(String),
    InvalidConfiguration(String),
    Io(String),

    // Session errors
    NotAuthenticated,
    TokenStore(String),

    // Live tracking errors
    TrackingClosed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Error body returned by the backend: `{"detail": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl fmt::Display for TawsilError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TawsilError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            TawsilError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            TawsilError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            TawsilError::NotFound(msg) => write!(f, "Not found: {}", msg),
            TawsilError::Api { status, detail } => write!(f, "API error {}: {}", status, detail),

            TawsilError::NetworkTimeout => write!(f, "Network request timed out"),
            TawsilError::NetworkConnection(msg) => write!(f, "Network connection error: {}", msg),
            TawsilError::HttpClient(msg) => write!(f, "HTTP client error: {}", msg),
            TawsilError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),

            TawsilError::JsonParsing(msg) => write!(f, "JSON parsing error: {}", msg),
            TawsilError::JsonSerialization(msg) => write!(f, "JSON serialization error: {}", msg),
            TawsilError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            TawsilError::MalformedSnapshot(msg) => write!(f, "Malformed tracking snapshot: {}", msg),

            TawsilError::ValidationFailed(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            TawsilError::MissingRequiredField(field) => write!(f, "Missing required field: {}", field),
            TawsilError::InvalidFieldValue { field, value, reason } => {
                write!(f, "Invalid value '{}' for field '{}': {}", value, field, reason)
            }

            TawsilError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            TawsilError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            TawsilError::Io(msg) => write!(f, "I/O error: {}", msg),

            TawsilError::NotAuthenticated => write!(f, "No session token, log in first"),
            TawsilError::TokenStore(msg) => write!(f, "Token store error: {}", msg),

            TawsilError::TrackingClosed => write!(f, "Tracking session already closed"),
        }
    }
}

impl std::error::Error for TawsilError {}

// Convenience type alias for Results
pub type TawsilResult<T> = Result<T, TawsilError>;

impl From<reqwest::Error> for TawsilError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TawsilError::NetworkTimeout
        } else if err.is_connect() {
            TawsilError::NetworkConnection(err.to_string())
        } else if err.is_decode() {
            TawsilError::JsonParsing(err.to_string())
        } else {
            TawsilError::HttpClient(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TawsilError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            TawsilError::JsonParsing(err.to_string())
        } else {
            TawsilError::JsonSerialization(err.to_string())
        }
    }
}

impl From<std::io::Error> for TawsilError {
    fn from(err: std::io::Error) -> Self {
        TawsilError::Io(err.to_string())
    }
}

impl From<TokenStoreError> for TawsilError {
    fn from(err: TokenStoreError) -> Self {
        TawsilError::TokenStore(err.to_string())
    }
}

impl TawsilError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        TawsilError::BadRequest(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        TawsilError::NotFound(resource.into())
    }

    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        TawsilError::ValidationFailed(vec![ValidationError {
            field: field.into(),
            message: message.into(),
        }])
    }

    /// Builds the error for a non-success backend response.
    ///
    /// The backend reports failures as `{"detail": "..."}`. FastAPI validation
    /// failures carry a list in `detail`, which is kept as its JSON text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody { detail: serde_json::Value::String(text) }) => text,
            Ok(ErrorBody { detail }) => detail.to_string(),
            Err(_) if body.trim().is_empty() => format!("HTTP {}", status),
            Err(_) => body.trim().to_string(),
        };

        match status {
            400 => TawsilError::BadRequest(detail),
            401 => TawsilError::Unauthorized(detail),
            403 => TawsilError::Forbidden(detail),
            404 => TawsilError::NotFound(detail),
            _ => TawsilError::Api { status, detail },
        }
    }

    /// The backend's `detail` text, when the error came from the backend.
    pub fn detail(&self) -> Option<&str> {
        match self {
            TawsilError::BadRequest(detail)
            | TawsilError::Unauthorized(detail)
            | TawsilError::Forbidden(detail)
            | TawsilError::NotFound(detail)
            | TawsilError::Api { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(
            self,
            TawsilError::NetworkTimeout | TawsilError::NetworkConnection(_) | TawsilError::HttpClient(_)
        )
    }

    /// Localized message for an alert: the backend detail when present, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            TawsilError::NotAuthenticated => "يرجى تسجيل الدخول أولاً".to_string(),
            TawsilError::NetworkTimeout | TawsilError::NetworkConnection(_) => {
                "تعذر الاتصال بالخادم".to_string()
            }
            TawsilError::ValidationFailed(errors) if !errors.is_empty() => errors[0].message.clone(),
            other => other.detail().map(str::to_string).unwrap_or_else(|| fallback.to_string()),
        }
    }
}
