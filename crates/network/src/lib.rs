// crates/network/src/lib.rs
//! Client for a remote export service: catalog fetching and streamed export
//! downloads

mod client;
mod disposition;
mod error;
mod notify;
mod payload;
mod progress;
mod save;
mod service;
mod session;
mod state;
mod transport;

pub use client::{Client, ClientConfig};
pub use disposition::{file_name_from_headers, parse_file_name};
pub use error::{ErrorReport, NetworkError, NetworkResult};
pub use notify::{report_error, LogNotifier, Notifier, NotifyOptions};
pub use payload::Payload;
pub use progress::DownloadProgress;
pub use save::{sanitize_file_name, CollisionPolicy, FileSaver, SaveAction};
pub use service::{DownloadOptions, ExportService, ProgressScope};
pub use session::{CompletedDownload, DownloadSession, SessionState};
pub use state::{ExportState, Published};
pub use transport::{EventStream, StreamRequest, Transport, TransportEvent};
