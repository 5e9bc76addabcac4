// crates/network/src/transport.rs
//! Transport seam between the export service and the HTTP stack

use crate::error::NetworkResult;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use reqwest::header::HeaderMap;

/// Lifecycle event of a streamed download
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// Bytes received so far, with the total when the server announced one
    Progress { loaded: u64, total: Option<u64> },
    /// Response headers, available before the body is complete
    Headers(HeaderMap),
    /// Complete body with the final response headers
    Response { body: Bytes, headers: HeaderMap },
}

/// Stream of download events; end-of-stream is the completion signal and an
/// `Err` item is the error signal
pub type EventStream = BoxStream<'static, NetworkResult<TransportEvent>>;

/// A GET request for a raw binary body
#[derive(Debug, Clone)]
pub struct StreamRequest {
    pub url: String,
    pub headers: HeaderMap,
}

impl StreamRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HeaderMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Issues requests against the export service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches a full response body; non-success statuses are errors
    async fn get(&self, url: &str) -> NetworkResult<Bytes>;

    /// Opens a streamed download
    ///
    /// Nothing is sent until the stream is first polled.
    fn open(&self, request: StreamRequest) -> EventStream;
}
