// crates/network/src/state.rs
//! Published state shared with subscribers

use crate::progress::DownloadProgress;
use geoexport_core::ExportDescriptor;
use std::sync::Arc;
use tokio::sync::watch;

/// A value broadcast to any number of subscribers
///
/// New subscribers see the latest value immediately through
/// `Receiver::borrow`, and are woken by `Receiver::changed` on updates.
#[derive(Debug)]
pub struct Published<T> {
    sender: Arc<watch::Sender<T>>,
}

impl<T> Clone for Published<T> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<T: Clone> Published<T> {
    /// Creates a published value with its initial state
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Replaces the current value and notifies subscribers
    pub fn publish(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Returns a copy of the current value
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Borrows the current value without cloning
    ///
    /// Holding the guard blocks publishers, keep it short.
    pub fn borrow(&self) -> watch::Ref<'_, T> {
        self.sender.borrow()
    }

    /// Subscribes to future updates
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone + Default> Default for Published<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Process-wide state of one export service
///
/// Created with the service and never reset afterwards.
#[derive(Debug, Clone, Default)]
pub struct ExportState {
    /// Most recently fetched catalog, empty until the first success
    pub catalog: Published<Vec<ExportDescriptor>>,
    /// Progress of the most recent download event, across all sessions
    pub progress: Published<DownloadProgress>,
}

impl ExportState {
    pub fn new() -> Self {
        Self::default()
    }
}
