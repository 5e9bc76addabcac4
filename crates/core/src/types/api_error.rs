//! Structured error payload returned by the export service

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nested error details carried by a failed API response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Short machine-readable code, e.g. `no_result_found`
    #[serde(default)]
    pub error: Option<String>,

    /// Human readable explanation
    #[serde(default)]
    pub message: Option<String>,
}

/// Accepted shapes of an error body
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Nested { api_error: ApiError },
    Flat {
        api_error: String,
        #[serde(default)]
        message: Option<String>,
    },
    Plain(ApiError),
}

impl ApiError {
    /// Creates an api error from its two fields
    pub fn new(error: Option<String>, message: Option<String>) -> Self {
        Self { error, message }
    }

    /// Parses an error response body
    ///
    /// Accepts `{"api_error": {"error", "message"}}`, the flat
    /// `{"api_error": "code", "message": "..."}` form and a bare
    /// `{"error", "message"}` object. Anything else yields an empty value.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(ErrorBody::Nested { api_error }) => api_error,
            Ok(ErrorBody::Flat { api_error, message }) => Self {
                error: Some(api_error),
                message,
            },
            Ok(ErrorBody::Plain(api_error)) => api_error,
            Err(_) => Self::default(),
        }
    }

    /// Returns true if neither field is set
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.message.is_none()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, &self.message) {
            (Some(error), Some(message)) => write!(f, "{}: {}", error, message),
            (Some(error), None) => write!(f, "{}", error),
            (None, Some(message)) => write!(f, "{}", message),
            (None, None) => write!(f, "unknown api error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_body() {
        let body = br#"{"api_error": {"error": "no_result_found", "message": "Configure one or more export"}}"#;
        let err = ApiError::from_body(body);
        assert_eq!(err.error.as_deref(), Some("no_result_found"));
        assert_eq!(err.message.as_deref(), Some("Configure one or more export"));
    }

    #[test]
    fn test_flat_body() {
        let body = br#"{"api_error": "invalid_export", "message": "Invalid export or export not found"}"#;
        let err = ApiError::from_body(body);
        assert_eq!(err.error.as_deref(), Some("invalid_export"));
        assert_eq!(
            err.message.as_deref(),
            Some("Invalid export or export not found")
        );
    }

    #[test]
    fn test_flat_body_without_message() {
        let err = ApiError::from_body(br#"{"api_error": "logged_error"}"#);
        assert_eq!(err.error.as_deref(), Some("logged_error"));
        assert_eq!(err.message, None);
    }

    #[test]
    fn test_plain_body() {
        let err = ApiError::from_body(br#"{"message": "Not Allowed"}"#);
        assert_eq!(err.error, None);
        assert_eq!(err.message.as_deref(), Some("Not Allowed"));
    }

    #[test]
    fn test_garbage_body_is_empty() {
        assert!(ApiError::from_body(b"<html>502 Bad Gateway</html>").is_empty());
        assert!(ApiError::from_body(b"").is_empty());
    }

    #[test]
    fn test_display() {
        let err = ApiError::new(Some("no_email".into()), Some("User doesn't have email".into()));
        assert_eq!(err.to_string(), "no_email: User doesn't have email");
        assert_eq!(ApiError::default().to_string(), "unknown api error");
    }
}
