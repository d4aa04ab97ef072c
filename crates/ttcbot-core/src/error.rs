//! Error types for the ttcbot application.

use thiserror::Error;

/// A shared error type for the entire bot.
///
/// Every fallible operation in the library crates returns this type; the
/// command layer converts it into a single user-facing line, so upstream
/// failures never surface as raw transport errors or panics.
#[derive(Error, Debug)]
pub enum BotError {
    /// Entity not found (stop, route, browser row, ...)
    #[error("{entity_type} not found: '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Upstream API error (non-2xx status or transport failure)
    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A control event arrived for a browser session that already expired
    #[error("Session expired")]
    SessionExpired,

    /// Invalid user-supplied parameter (value outside the allowed range)
    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BotError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an Api error without a status code (transport-level failure)
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            status: None,
            message: message.into(),
        }
    }

    /// Creates an Api error carrying the upstream HTTP status
    pub fn api_status(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an InvalidParam error
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidParam(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from a stale browser interaction
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// One-line rendering for chat output.
    ///
    /// Keeps upstream detail out of user-visible messages while remaining
    /// specific enough to act on.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { entity_type, id } => {
                format!("{entity_type} '{id}' not found")
            }
            Self::Api {
                status: Some(s), ..
            } => format!("the upstream service answered with status {s} 😔"),
            Self::Api { status: None, .. } => "the upstream service is unreachable 😔".to_string(),
            Self::Serialization { .. } => "received a malformed answer from the service 😔".to_string(),
            Self::SessionExpired => "this view expired - please re-run the command".to_string(),
            Self::InvalidParam(msg) => msg.clone(),
            Self::Config(_) | Self::Internal(_) => "an error occurred 😔".to_string(),
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        Self::Api {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for BotError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for BotError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(format!("{} (kind: {:?})", err, err.kind()))
    }
}

/// A type alias for `Result<T, BotError>`.
pub type Result<T> = std::result::Result<T, BotError>;
