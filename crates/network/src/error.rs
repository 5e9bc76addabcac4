// crates/network/src/error.rs
//! Error types for export service operations

use geoexport_core::ApiError;
use thiserror::Error;

/// Result type for network operations
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Errors that can occur while talking to the export service
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("API error (HTTP {status}): {api_error}")]
    Api { status: u16, api_error: ApiError },

    /// Response body could not be decoded
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Stream ended without ever delivering the response body
    #[error("Incomplete download: {url} ended without a response body")]
    IncompleteDownload { url: String },

    /// Download was cancelled by the caller
    #[error("Download cancelled")]
    Cancelled,

    /// Save action could not persist the payload
    #[error("Failed to save export: {0}")]
    Save(String),
}

impl NetworkError {
    /// HTTP status code attached to the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::Api { status, .. } => Some(*status),
            NetworkError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the error is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns true if the error is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Nested api error fields, empty unless the service sent a structured body
    pub fn api_error(&self) -> ApiError {
        match self {
            NetworkError::Api { api_error, .. } => api_error.clone(),
            _ => ApiError::default(),
        }
    }

    /// Stable name of the error kind, used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            NetworkError::Http(_) => "HttpError",
            NetworkError::Api { .. } => "ApiError",
            NetworkError::Decode(_) => "DecodeError",
            NetworkError::Io(_) => "IoError",
            NetworkError::InvalidUrl(_) => "InvalidUrl",
            NetworkError::IncompleteDownload { .. } => "IncompleteDownload",
            NetworkError::Cancelled => "Cancelled",
            NetworkError::Save(_) => "SaveError",
        }
    }
}

/// Structured view of an error, shared by the notifier and the diagnostic log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Nested `error`/`message` fields from the response body
    pub api_error: ApiError,
    /// Error kind name
    pub name: &'static str,
    /// Full error message
    pub message: String,
    /// HTTP status, when the failure came from a response
    pub status: Option<u16>,
}

impl ErrorReport {
    /// Builds the report for an error
    pub fn from_error(err: &NetworkError) -> Self {
        Self {
            api_error: err.api_error(),
            name: err.name(),
            message: err.to_string(),
            status: err.status(),
        }
    }

    /// Short title: the api error code, or the error name when absent
    pub fn title(&self) -> &str {
        self.api_error.error.as_deref().unwrap_or(self.name)
    }

    /// Body text: the api message, or the full error message when absent
    pub fn body(&self) -> &str {
        self.api_error.message.as_deref().unwrap_or(&self.message)
    }

    /// Writes the report to the diagnostic log
    pub fn log(&self, context: &str) {
        log::error!("{}: api error: {:?}", context, self.api_error);
        log::error!("{}: error.name: {}", context, self.name);
        log::error!("{}: error.message: {}", context, self.message);
        match self.status {
            Some(status) => log::error!("{}: error.status: {}", context, status),
            None => log::error!("{}: error.status: none", context),
        }
    }
}

impl From<&NetworkError> for ErrorReport {
    fn from(err: &NetworkError) -> Self {
        Self::from_error(err)
    }
}
