// crates/network/src/notify.rs
//! User-facing error notifications

use crate::error::{ErrorReport, NetworkError};

/// Display options for a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyOptions {
    /// Stay visible until the user dismisses it
    pub persistent: bool,
}

impl NotifyOptions {
    /// Options used for every error notification
    pub const PERSISTENT: Self = Self { persistent: true };
}

/// Surfaces messages to a human
pub trait Notifier: Send + Sync {
    fn display(&self, message: &str, title: &str, options: NotifyOptions);
}

/// Notifier that writes to the log at error level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn display(&self, message: &str, title: &str, _options: NotifyOptions) {
        log::error!("{} {}", title, message);
    }
}

/// Logs the structured form of `err` and shows one persistent notification
///
/// `title_prefix` is prepended to the api error code in the title.
pub fn report_error(
    notifier: &dyn Notifier,
    context: &str,
    title_prefix: &str,
    err: &NetworkError,
) -> ErrorReport {
    let report = ErrorReport::from_error(err);
    report.log(context);

    let title = format!("{}{}", title_prefix, report.title());
    notifier.display(report.body(), &title, NotifyOptions::PERSISTENT);
    report
}
