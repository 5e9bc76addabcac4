//! Loading, saving and overriding the configuration

use crate::error::join_errors;
use crate::persistence::ConfigFile;
use crate::{Config, ConfigError, ConfigResult, LogLevel};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

// Environment variables read by `load_with_env_overrides`
pub const ENV_BASE_URL: &str = "GEOEXPORT_SERVICE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "GEOEXPORT_SERVICE_TIMEOUT_SECS";
pub const ENV_DOWNLOADS_DIRECTORY: &str = "GEOEXPORT_DOWNLOADS_DIRECTORY";
pub const ENV_LOG_LEVEL: &str = "GEOEXPORT_APP_LOG_LEVEL";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Entry point for reading and writing `config.toml`
pub struct ConfigManager {
    file: ConfigFile,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Manager for the per-user config directory
    ///
    /// `~/.config/geoexport` on Linux, `~/Library/Application Support/geoexport`
    /// on macOS and `%APPDATA%\geoexport` on Windows.
    pub fn new() -> ConfigResult<Self> {
        let dirs = ProjectDirs::from("", "", "geoexport").ok_or(ConfigError::NoConfigDir)?;
        Self::with_directory(dirs.config_dir().to_path_buf())
    }

    pub fn with_directory(config_dir: PathBuf) -> ConfigResult<Self> {
        Ok(Self {
            file: ConfigFile::new(config_dir.join(CONFIG_FILE_NAME)),
            config_dir,
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    /// Reads the file; a missing file yields defaults, a broken one an error
    pub fn load(&self) -> ConfigResult<Config> {
        self.file.read()
    }

    /// Like `load`, but logs the error and returns defaults instead
    pub fn load_or_default(&self) -> Config {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}; continuing with default settings", e);
                Config::default()
            }
        }
    }

    /// Writes `config`, refusing invalid values
    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        self.file.write(config)
    }

    /// Loads, applies `edit` and saves; nothing is written if the edited
    /// config fails validation
    pub fn update(&self, edit: impl FnOnce(&mut Config)) -> ConfigResult<()> {
        let mut config = self.load()?;
        edit(&mut config);
        self.save(&config)
    }

    /// Writes the commented default file; `Ok(false)` if a file already exists
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.file.path().exists() {
            log::info!("Keeping existing config at {}", self.file.path().display());
            return Ok(false);
        }

        self.file.write_template()?;
        Ok(true)
    }

    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    /// Problems in the current file, one message per field
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        let problems = match self.load()?.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => errors.iter().map(ToString::to_string).collect(),
        };
        Ok(problems)
    }

    /// `load` followed by `GEOEXPORT_<SECTION>_<FIELD>` overrides
    ///
    /// Unparsable values are ignored with a warning.
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;
        apply_env_overrides(&mut config, |name| std::env::var(name).ok());

        if let Err(errors) = config.validate() {
            log::warn!(
                "Invalid values after environment overrides: {}",
                join_errors(&errors)
            );
        }

        Ok(config)
    }
}

/// Applies overrides looked up through `var`
fn apply_env_overrides<F>(config: &mut Config, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = var(ENV_BASE_URL) {
        config.service.base_url = base_url;
    }

    if let Some(timeout) = var(ENV_TIMEOUT_SECS) {
        match timeout.trim().parse::<u64>() {
            Ok(secs) => config.service.timeout_secs = secs,
            Err(_) => log::warn!("Ignoring {}={}: not a number", ENV_TIMEOUT_SECS, timeout),
        }
    }

    if let Some(directory) = var(ENV_DOWNLOADS_DIRECTORY) {
        config.downloads.directory = PathBuf::from(directory);
    }

    if let Some(level) = var(ENV_LOG_LEVEL) {
        match level.parse::<LogLevel>() {
            Ok(level) => config.app.log_level = level,
            Err(e) => log::warn!("Ignoring {}: {}", ENV_LOG_LEVEL, e),
        }
    }
}
