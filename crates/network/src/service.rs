// crates/network/src/service.rs
//! Export catalog fetching and streamed export downloads

use crate::error::{NetworkError, NetworkResult};
use crate::notify::{report_error, LogNotifier, Notifier};
use crate::progress::DownloadProgress;
use crate::save::{FileSaver, SaveAction};
use crate::session::{CompletedDownload, DownloadSession};
use crate::state::{ExportState, Published};
use crate::transport::{EventStream, StreamRequest, Transport};
use futures::StreamExt;
use geoexport_core::{content_type_for_key, ExportDescriptor, ExportId};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const CATALOG_CONTEXT: &str = "export service";
const DOWNLOAD_CONTEXT: &str = "export download";

/// Where a download publishes its progress
#[derive(Debug, Clone, Default)]
pub enum ProgressScope {
    /// The service-wide progress value, shared by concurrent downloads
    #[default]
    Shared,
    /// A channel owned by the caller, isolated from other downloads
    Session(Published<DownloadProgress>),
}

/// Per-download options
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    pub progress: ProgressScope,
    /// Checked between events; cancelling fails the session without saving
    pub cancel: CancellationToken,
}

impl DownloadOptions {
    /// Options publishing to a caller-owned progress channel
    pub fn isolated(progress: Published<DownloadProgress>) -> Self {
        Self {
            progress: ProgressScope::Session(progress),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Client for one export service endpoint
pub struct ExportService {
    base_url: String,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    saver: Arc<dyn SaveAction>,
    state: ExportState,
}

impl ExportService {
    /// Creates a service for `base_url`, e.g. `https://host/api/exports`
    ///
    /// Errors are reported through the log and files are saved to the
    /// current directory until replaced with `with_notifier`/`with_saver`.
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> NetworkResult<Self> {
        reqwest::Url::parse(base_url)
            .map_err(|e| NetworkError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            notifier: Arc::new(LogNotifier),
            saver: Arc::new(FileSaver::new(".")),
            state: ExportState::new(),
        })
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_saver(mut self, saver: Arc<dyn SaveAction>) -> Self {
        self.saver = saver;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Published catalog and progress
    pub fn state(&self) -> &ExportState {
        &self.state
    }

    /// Snapshot of the current catalog
    pub fn exports(&self) -> Vec<ExportDescriptor> {
        self.state.catalog.get()
    }

    /// Looks up a descriptor in the current catalog
    pub fn find_export(&self, id: ExportId) -> Option<ExportDescriptor> {
        self.state.catalog.borrow().iter().find(|e| e.id == id).cloned()
    }

    /// `{base}/`
    pub fn catalog_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    /// `{base}/{id}/{format}`
    pub fn download_url(&self, id: ExportId, format: &str) -> String {
        format!("{}/{}/{}", self.base_url, id, format)
    }

    /// Fetches the catalog and replaces the published value
    ///
    /// On failure the published catalog is left untouched and the error is
    /// notified and logged. Returns the number of exports fetched.
    pub async fn fetch_catalog(&self) -> NetworkResult<usize> {
        let result = self.load_catalog().await;

        match &result {
            Ok(exports) => self.state.catalog.publish(exports.clone()),
            Err(e) => {
                report_error(self.notifier.as_ref(), CATALOG_CONTEXT, "API Error: ", e);
            }
        }

        let catalog = self.state.catalog.get();
        log::info!("{}: {} exports", CATALOG_CONTEXT, catalog.len());
        log::debug!("exports: {:?}", catalog);

        result.map(|exports| exports.len())
    }

    async fn load_catalog(&self) -> NetworkResult<Vec<ExportDescriptor>> {
        let body = self.transport.get(&self.catalog_url()).await?;
        let exports = serde_json::from_slice(&body)?;
        Ok(exports)
    }

    /// Downloads an export, publishing to the shared progress value
    pub async fn download(
        &self,
        descriptor: &ExportDescriptor,
        format: &str,
    ) -> NetworkResult<PathBuf> {
        self.download_with(descriptor, format, DownloadOptions::default())
            .await
    }

    /// Downloads an export and hands it to the save action
    ///
    /// `format` is sent as-is; keys without a known MIME type still go out
    /// with a `Content-Type: undefined` header. Returns where the save action
    /// put the file.
    pub async fn download_with(
        &self,
        descriptor: &ExportDescriptor,
        format: &str,
        options: DownloadOptions,
    ) -> NetworkResult<PathBuf> {
        let url = self.download_url(descriptor.id, format);

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static(content_type_for_key(format)),
        );

        let mut session = DownloadSession::new(url.clone());
        let mut events = self
            .transport
            .open(StreamRequest::new(url.clone()).with_headers(headers));
        session.open();
        log::info!("Downloading {} as {} from {}", descriptor.label, format, url);

        let result = match self.drive(&mut session, &mut events, &options).await {
            Ok(completed) => self.save(completed).await,
            Err(e) => {
                session.fail();
                Err(e)
            }
        };

        match &result {
            // Requested by the caller, already logged
            Err(NetworkError::Cancelled) => {}
            Err(e) => {
                report_error(self.notifier.as_ref(), DOWNLOAD_CONTEXT, "", e);
            }
            Ok(_) => {}
        }

        // Release the subscription only once the session is terminal
        drop(events);
        result
    }

    /// Feeds events into the session until the stream ends, errors or is
    /// cancelled
    async fn drive(
        &self,
        session: &mut DownloadSession,
        events: &mut EventStream,
        options: &DownloadOptions,
    ) -> NetworkResult<CompletedDownload> {
        loop {
            let next = tokio::select! {
                biased;
                _ = options.cancel.cancelled() => {
                    log::info!("Download of {} cancelled", session.url());
                    return Err(NetworkError::Cancelled);
                }
                next = events.next() => next,
            };

            match next {
                Some(Ok(event)) => {
                    if let Some(progress) = session.handle(event) {
                        self.publish_progress(&options.progress, progress);
                    }
                }
                Some(Err(e)) => return Err(e),
                None => return session.complete(),
            }
        }
    }

    fn publish_progress(&self, scope: &ProgressScope, progress: DownloadProgress) {
        match scope {
            ProgressScope::Shared => self.state.progress.publish(progress),
            ProgressScope::Session(channel) => channel.publish(progress),
        }
    }

    async fn save(&self, completed: CompletedDownload) -> NetworkResult<PathBuf> {
        log::debug!(
            "Saving {} bytes ({}) as {:?}",
            completed.payload.len(),
            completed.payload.content_type().unwrap_or("unknown type"),
            completed.file_name
        );
        self.saver
            .save(&completed.payload, completed.file_name.as_deref())
            .await
    }
}
