// crates/network/src/progress.rs
//! Download progress values

use std::fmt;

/// Progress of a download as published to subscribers
///
/// The unit depends on whether the server announced a total size: with a
/// known total the value is a whole percentage, otherwise it is the number of
/// kilobytes received so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DownloadProgress {
    /// Whole percentage, 0-100
    Percent(u8),
    /// Kilobytes received, rounded to two decimals
    Kilobytes(f64),
}

impl DownloadProgress {
    /// Computes progress from a transfer event
    pub fn from_transfer(loaded: u64, total: Option<u64>) -> Self {
        match total {
            Some(total) => Self::Percent(percentage(loaded, total)),
            None => Self::Kilobytes(kilobytes(loaded)),
        }
    }

    /// Raw numeric value regardless of unit
    pub fn value(&self) -> f64 {
        match self {
            Self::Percent(p) => f64::from(*p),
            Self::Kilobytes(kb) => *kb,
        }
    }

    /// Returns true if the value is a percentage
    pub fn is_percentage(&self) -> bool {
        matches!(self, Self::Percent(_))
    }

    /// Returns true if a known-size transfer reached 100%
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Percent(100))
    }
}

impl Default for DownloadProgress {
    fn default() -> Self {
        Self::Percent(0)
    }
}

impl fmt::Display for DownloadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{}%", p),
            Self::Kilobytes(kb) => write!(f, "{:.2} KB", kb),
        }
    }
}

/// `round(100 * loaded / total)`, clamped to 0-100
///
/// A zero total means the body is empty, which counts as finished.
fn percentage(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (loaded as f64 * 100.0 / total as f64).round();
    pct.clamp(0.0, 100.0) as u8
}

/// `loaded / 1024` rounded to two decimals
fn kilobytes(loaded: u64) -> f64 {
    (loaded as f64 / 1024.0 * 100.0).round() / 100.0
}
