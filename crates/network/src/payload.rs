// crates/network/src/payload.rs
//! In-memory export artifact

use bytes::Bytes;

/// Complete response body tagged with its MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    bytes: Bytes,
    content_type: Option<String>,
}

impl Payload {
    /// Wraps a body with its content type
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
        }
    }

    /// Raw body bytes
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// MIME type reported by the server
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consumes the payload, returning the body
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}
