//! Error types for the geoexport domain model

use thiserror::Error;

/// Errors raised while building domain values from user input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Format key is not one of the supported formats
    #[error("Unknown export format: '{key}' (expected one of csv, json, rdf, shp)")]
    UnknownFormat { key: String },

    /// Export identifier could not be parsed
    #[error("Invalid export id: '{value}'")]
    InvalidExportId { value: String },
}

impl CoreError {
    /// Returns a short message suitable for end users
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownFormat { key } => format!("'{}' is not a supported export format.", key),
            Self::InvalidExportId { value } => {
                format!("'{}' is not a valid export identifier.", value)
            }
        }
    }
}

/// Convenience type alias for Results using CoreError
pub type CoreResult<T> = std::result::Result<T, CoreError>;
