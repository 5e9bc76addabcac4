pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, CoreResult};
pub use types::{
    content_type_for_key, mime_for_key, ApiError, ExportDescriptor, ExportFormat, ExportId,
    UNKNOWN_MIME,
};
