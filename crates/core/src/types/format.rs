//! Export output formats and their MIME types

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Header value sent when a format key has no known MIME type
pub const UNKNOWN_MIME: &str = "undefined";

/// Output encodings offered by the export service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Rdf,
    Shp,
}

impl ExportFormat {
    /// Every supported format, in display order
    pub const ALL: [ExportFormat; 4] = [Self::Csv, Self::Json, Self::Rdf, Self::Shp];

    /// Short key used in request paths
    pub fn key(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Rdf => "rdf",
            Self::Shp => "shp",
        }
    }

    /// Canonical MIME type for this format
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Rdf => "application/rdf+xml",
            Self::Shp => "application/zip",
        }
    }

    /// Looks up a format by its key, case-sensitively
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.key() == key)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| CoreError::UnknownFormat {
            key: s.to_string(),
        })
    }
}

/// MIME type registered for a raw format key
pub fn mime_for_key(key: &str) -> Option<&'static str> {
    ExportFormat::from_key(key).map(|format| format.mime())
}

/// `Content-Type` request header value for a raw format key
///
/// Unknown keys are not rejected: the literal `undefined` is sent instead.
pub fn content_type_for_key(key: &str) -> &'static str {
    mime_for_key(key).unwrap_or(UNKNOWN_MIME)
}
