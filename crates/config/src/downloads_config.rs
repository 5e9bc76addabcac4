//! Download target configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do when a downloaded file already exists
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CollisionMode {
    /// Keep both, numbering the new file
    #[default]
    Rename,
    /// Replace the existing file
    Overwrite,
}

impl std::fmt::Display for CollisionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollisionMode::Rename => write!(f, "rename"),
            CollisionMode::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// Where downloaded exports are written
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DownloadsConfig {
    /// Target directory, created on first download
    pub directory: PathBuf,

    /// File name used when the server does not suggest one
    pub default_file_name: String,

    /// Behaviour when the target file exists
    pub on_collision: CollisionMode,
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            default_file_name: "export".to_string(),
            on_collision: CollisionMode::Rename,
        }
    }
}

impl ConfigSection for DownloadsConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![Validator::not_empty(
            &self.default_file_name,
            "downloads.default_file_name",
        )];

        if self.directory.as_os_str().is_empty() {
            results.push(Err(ValidationError::new(
                "downloads.directory",
                "must not be empty",
            )));
        }

        if self.default_file_name.contains(['/', '\\']) {
            results.push(Err(ValidationError::with_value(
                "downloads.default_file_name",
                "must be a file name, not a path",
                &self.default_file_name,
            )));
        }

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.directory = other.directory;
        self.default_file_name = other.default_file_name;
        self.on_collision = other.on_collision;
    }

    fn section_name(&self) -> &'static str {
        "downloads"
    }
}
