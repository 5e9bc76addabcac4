//! geoexport configuration
//!
//! Settings live in one TOML file with an `[app]`, `[service]` and
//! `[downloads]` table. Each table maps to a type implementing
//! `ConfigSection`. Missing keys take their defaults, so a file only needs the
//! values a user actually changed.
//!
//! Values are resolved as defaults, then the file, then `GEOEXPORT_*`
//! environment variables. Command-line flags are applied by the binary.
//!
//! ```no_run
//! use geoexport_config::ConfigManager;
//!
//! # fn main() -> Result<(), geoexport_config::ConfigError> {
//! let config = ConfigManager::new()?.load_with_env_overrides()?;
//! println!("exports from {}", config.service.base_url);
//! # Ok(())
//! # }
//! ```

mod error;
mod manager;
mod persistence;
mod validation;

mod app_config;
mod downloads_config;
mod service_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::{
    ConfigManager, ENV_BASE_URL, ENV_DOWNLOADS_DIRECTORY, ENV_LOG_LEVEL, ENV_TIMEOUT_SECS,
};
pub use validation::{ConfigSection, Validator};

pub use app_config::{AppConfig, LogLevel};
pub use downloads_config::{CollisionMode, DownloadsConfig};
pub use service_config::ServiceConfig;

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Everything stored in `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Format version; files from a newer release are refused
    pub version: u32,

    pub app: AppConfig,

    /// Remote export service
    pub service: ServiceConfig,

    /// Where and how downloads are written
    pub downloads: DownloadsConfig,
}

impl Config {
    /// Checks every section, keeping all failures rather than the first
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = [
            self.app.validate(),
            self.service.validate(),
            self.downloads.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .flatten()
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Takes every section from `other`
    pub fn merge(&mut self, other: Config) {
        self.app.merge(other.app);
        self.service.merge(other.service);
        self.downloads.merge(other.downloads);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            service: ServiceConfig::default(),
            downloads: DownloadsConfig::default(),
        }
    }
}
