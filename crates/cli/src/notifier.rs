// FILE: crates/cli/src/notifier.rs

use console::style;
use geoexport_network::{Notifier, NotifyOptions};

/// Prints service errors to stderr
///
/// Every notification stays on screen, so `persistent` only changes the marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn display(&self, message: &str, title: &str, options: NotifyOptions) {
        eprintln!("{}", render(message, title, options));
    }
}

fn render(message: &str, title: &str, options: NotifyOptions) -> String {
    let marker = if options.persistent { "✗" } else { "!" };
    let title = title.trim();

    if title.is_empty() {
        format!("{} {}", style(marker).red().bold(), message)
    } else {
        format!(
            "{} {}: {}",
            style(marker).red().bold(),
            style(title).bold(),
            message
        )
    }
}
