//! Domain types for geoexport
//!
//! - `descriptor`: export definitions listed by the service
//! - `format`: output formats and the MIME lookup table
//! - `api_error`: structured error bodies returned by the service

mod api_error;
mod descriptor;
mod format;

pub use api_error::ApiError;
pub use descriptor::{ExportDescriptor, ExportId};
pub use format::{content_type_for_key, mime_for_key, ExportFormat, UNKNOWN_MIME};
