//! Test doubles for the export service collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use geoexport_core::{ApiError, ExportDescriptor};
use geoexport_network::{
    DownloadProgress, EventStream, NetworkError, NetworkResult, Notifier, NotifyOptions, Payload,
    Published, SaveAction, StreamRequest, Transport, TransportEvent,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Catalog answer of the scripted transport
#[derive(Clone)]
pub enum CatalogReply {
    Body(Bytes),
    Status(u16, &'static str, &'static str),
}

/// Sets its flag when the owning stream is dropped
struct ReleaseGuard(Arc<AtomicBool>);

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Transport replaying a fixed list of events
pub struct ScriptedTransport {
    catalog: CatalogReply,
    events: Mutex<Vec<NetworkResult<TransportEvent>>>,
    hang_after_events: bool,
    pub requests: Mutex<Vec<StreamRequest>>,
    pub released: Arc<AtomicBool>,
}

impl ScriptedTransport {
    pub fn new(events: Vec<NetworkResult<TransportEvent>>) -> Self {
        Self {
            catalog: CatalogReply::Body(Bytes::from_static(b"[]")),
            events: Mutex::new(events),
            hang_after_events: false,
            requests: Mutex::new(Vec::new()),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_catalog(catalog: CatalogReply) -> Self {
        let mut transport = Self::new(Vec::new());
        transport.catalog = catalog;
        transport
    }

    /// Never signals completion after the scripted events
    pub fn hanging(mut self) -> Self {
        self.hang_after_events = true;
        self
    }

    pub fn was_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> StreamRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("a request was opened")
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, _url: &str) -> NetworkResult<Bytes> {
        match &self.catalog {
            CatalogReply::Body(body) => Ok(body.clone()),
            CatalogReply::Status(status, error, message) => Err(NetworkError::Api {
                status: *status,
                api_error: ApiError::new(Some(error.to_string()), Some(message.to_string())),
            }),
        }
    }

    fn open(&self, request: StreamRequest) -> EventStream {
        self.requests.lock().unwrap().push(request);

        let events = std::mem::take(&mut *self.events.lock().unwrap());
        let guard = ReleaseGuard(Arc::clone(&self.released));
        let scripted = stream::iter(events).map(move |event| {
            let _release = &guard;
            event
        });

        if self.hang_after_events {
            scripted.chain(stream::pending()).boxed()
        } else {
            scripted.boxed()
        }
    }
}

/// One scripted event and the global step that releases it
pub type Step = (usize, NetworkResult<TransportEvent>);

/// Transport running several downloads in lockstep
///
/// Each URL gets its own script. Step `n` is only handed out once step
/// `n - 1` was, whichever download it belonged to, so sessions interleave
/// in a fixed order.
pub struct InterleavedTransport {
    scripts: Mutex<HashMap<String, Vec<Step>>>,
    clock: Arc<watch::Sender<usize>>,
    watched: Mutex<Option<Published<DownloadProgress>>>,
    seen: Arc<Mutex<Vec<DownloadProgress>>>,
}

impl InterleavedTransport {
    pub fn new() -> Self {
        let (clock, _) = watch::channel(0);
        Self {
            scripts: Mutex::new(HashMap::new()),
            clock: Arc::new(clock),
            watched: Mutex::new(None),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn script(self, url: impl Into<String>, steps: Vec<Step>) -> Self {
        self.scripts.lock().unwrap().insert(url.into(), steps);
        self
    }

    /// Samples `progress` right before every step is released
    pub fn watch(&self, progress: Published<DownloadProgress>) {
        *self.watched.lock().unwrap() = Some(progress);
    }

    /// Value of the watched progress before each step, in step order
    pub fn seen(&self) -> Vec<DownloadProgress> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for InterleavedTransport {
    async fn get(&self, _url: &str) -> NetworkResult<Bytes> {
        Ok(Bytes::from_static(b"[]"))
    }

    fn open(&self, request: StreamRequest) -> EventStream {
        let steps = self
            .scripts
            .lock()
            .unwrap()
            .remove(&request.url)
            .unwrap_or_default();
        let clock = Arc::clone(&self.clock);
        let watched = self.watched.lock().unwrap().clone();
        let seen = Arc::clone(&self.seen);

        stream::unfold(steps.into_iter(), move |mut steps| {
            let clock = Arc::clone(&clock);
            let watched = watched.clone();
            let seen = Arc::clone(&seen);
            async move {
                let (step, event) = steps.next()?;

                let mut now = clock.subscribe();
                if now.wait_for(|t| *t >= step).await.is_err() {
                    return None;
                }

                if let Some(progress) = &watched {
                    seen.lock().unwrap().push(progress.get());
                }
                clock.send_replace(step + 1);
                Some((event, steps))
            }
        })
        .boxed()
    }
}

/// Notifier remembering every notification
#[derive(Default)]
pub struct RecordingNotifier {
    pub shown: Mutex<Vec<(String, String, NotifyOptions)>>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.shown.lock().unwrap().len()
    }

    pub fn titles(&self) -> Vec<String> {
        self.shown.lock().unwrap().iter().map(|(_, t, _)| t.clone()).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.shown.lock().unwrap().iter().map(|(m, _, _)| m.clone()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn display(&self, message: &str, title: &str, options: NotifyOptions) {
        self.shown
            .lock()
            .unwrap()
            .push((message.to_string(), title.to_string(), options));
    }
}

/// Save action remembering every payload
#[derive(Default)]
pub struct RecordingSaver {
    pub saved: Mutex<Vec<(Payload, Option<String>)>>,
}

impl RecordingSaver {
    pub fn count(&self) -> usize {
        self.saved.lock().unwrap().len()
    }
}

#[async_trait]
impl SaveAction for RecordingSaver {
    async fn save(&self, payload: &Payload, file_name: Option<&str>) -> NetworkResult<PathBuf> {
        self.saved
            .lock()
            .unwrap()
            .push((payload.clone(), file_name.map(str::to_string)));
        Ok(PathBuf::from(file_name.unwrap_or("export")))
    }
}

pub fn progress(loaded: u64, total: Option<u64>) -> NetworkResult<TransportEvent> {
    Ok(TransportEvent::Progress { loaded, total })
}

pub fn header_event(pairs: &[(&'static str, &'static str)]) -> NetworkResult<TransportEvent> {
    Ok(TransportEvent::Headers(header_map(pairs)))
}

pub fn response(body: &'static [u8], content_type: &'static str) -> NetworkResult<TransportEvent> {
    Ok(TransportEvent::Response {
        body: Bytes::from_static(body),
        headers: header_map(&[("content-type", content_type)]),
    })
}

pub fn header_map(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    map
}

pub fn sample_catalog() -> Vec<ExportDescriptor> {
    vec![
        ExportDescriptor::new(3, "Occurrences", "gn_exports", "v_synthese_sinp")
            .with_geometry("geom_4326", 4326),
        ExportDescriptor::new(1, "Taxa", "taxonomie", "v_taxref"),
        ExportDescriptor::new(7, "Sites", "gn_exports", "v_sites").with_desc("Monitoring sites"),
    ]
}
