//! # Client Error Types
//!
//! Error type for everything that can fail between the user and the backend.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Backend      │  │   Transport     │  │     Local               │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Api{status,    │  │  Http           │  │  Storage                │ │
//! │  │      message}   │  │  Decode         │  │  Config / InvalidUrl    │ │
//! │  │  NotAuthenticated│ │                 │  │  Import                 │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Core(CoreError): rejected before any request was sent          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant renders as a single human-readable line; that line is what
//! the stores keep in their error slot.

use gestock_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Fallback message when the backend gives none.
pub const GENERIC_ERROR_MESSAGE: &str = "Une erreur est survenue";

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// The backend answered with a non-2xx status.
    ///
    /// `message` is the body's `message` field, or the generic fallback.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// An operation needs a session and none is active.
    #[error("Not authenticated")]
    NotAuthenticated,

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The body was not the JSON we expected.
    #[error("Invalid response: {0}")]
    Decode(String),

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Reading or writing the session file failed.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The import file could not be read or parsed.
    #[error("{0}")]
    Import(String),

    /// Rejected by a business rule before any request.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<csv::Error> for ClientError {
    fn from(err: csv::Error) -> Self {
        ClientError::Import(format!("Erreurs dans le fichier: {}", err))
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// True for a 401 from the backend or a missing session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ClientError::Api { status: 401, .. } | ClientError::NotAuthenticated
        )
    }

    /// True when the request never reached the backend or its answer was
    /// unreadable.
    pub fn is_network_error(&self) -> bool {
        matches!(self, ClientError::Http(_) | ClientError::Decode(_))
    }

    pub fn is_config_error(&self) -> bool {
        matches!(self, ClientError::Config(_) | ClientError::InvalidUrl(_))
    }

    /// HTTP status when the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The line shown to the user.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
