// crates/network/src/session.rs
//! Per-request download state machine
//!
//! A session starts in `Init`, moves to `Streaming` when its event stream is
//! opened and ends in `Done` or `Failed`. Events reaching a session in any
//! other state than `Streaming` are dropped.

use crate::disposition::file_name_from_headers;
use crate::error::{NetworkError, NetworkResult};
use crate::payload::Payload;
use crate::progress::DownloadProgress;
use crate::transport::TransportEvent;
use reqwest::header::CONTENT_TYPE;
use std::fmt;

/// Lifecycle state of a download session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    Streaming,
    Done,
    Failed,
}

impl SessionState {
    /// Returns true for `Done` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Streaming => write!(f, "streaming"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Result of a successfully completed session, ready for the save action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedDownload {
    pub payload: Payload,
    pub file_name: Option<String>,
}

/// Derived state of one download request
#[derive(Debug)]
pub struct DownloadSession {
    url: String,
    state: SessionState,
    progress: DownloadProgress,
    file_name: Option<String>,
    payload: Option<Payload>,
}

impl DownloadSession {
    /// Creates a session for the given request target
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: SessionState::Init,
            progress: DownloadProgress::default(),
            file_name: None,
            payload: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Last progress computed by this session
    pub fn progress(&self) -> DownloadProgress {
        self.progress
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// INIT -> STREAMING
    pub fn open(&mut self) {
        if self.state == SessionState::Init {
            self.state = SessionState::Streaming;
        }
    }

    /// Applies one event; returns the progress to publish, if any
    pub fn handle(&mut self, event: TransportEvent) -> Option<DownloadProgress> {
        if self.state != SessionState::Streaming {
            log::debug!("Ignoring event for {} session {}", self.state, self.url);
            return None;
        }

        match event {
            TransportEvent::Progress { loaded, total } => {
                self.progress = DownloadProgress::from_transfer(loaded, total);
                Some(self.progress)
            }
            TransportEvent::Headers(headers) => {
                // A later header without a usable disposition keeps the
                // name already inferred
                if let Some(name) = file_name_from_headers(&headers) {
                    log::debug!("Inferred filename '{}' for {}", name, self.url);
                    self.file_name = Some(name);
                }
                None
            }
            TransportEvent::Response { body, headers } => {
                if self.payload.is_some() {
                    log::warn!("Duplicate response event for {}, keeping the first", self.url);
                    return None;
                }

                // Transports that skip the header event still carry the
                // disposition on the final response
                if self.file_name.is_none() {
                    self.file_name = file_name_from_headers(&headers);
                }

                let content_type = headers
                    .get(CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string);
                self.payload = Some(Payload::new(body, content_type));
                None
            }
        }
    }

    /// STREAMING -> DONE, handing over the payload
    ///
    /// Fails with `IncompleteDownload` (and moves to FAILED) if no response
    /// body was ever received.
    pub fn complete(&mut self) -> NetworkResult<CompletedDownload> {
        if self.state != SessionState::Streaming {
            return Err(NetworkError::IncompleteDownload {
                url: self.url.clone(),
            });
        }

        match self.payload.take() {
            Some(payload) => {
                self.state = SessionState::Done;
                Ok(CompletedDownload {
                    payload,
                    file_name: self.file_name.take(),
                })
            }
            None => {
                self.state = SessionState::Failed;
                Err(NetworkError::IncompleteDownload {
                    url: self.url.clone(),
                })
            }
        }
    }

    /// STREAMING -> FAILED; any partial payload is discarded
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = SessionState::Failed;
            self.payload = None;
        }
    }
}
