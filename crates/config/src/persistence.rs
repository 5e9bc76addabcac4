//! On-disk storage of the config file
//!
//! Writes go to a temporary file in the same directory and are renamed over
//! the target, the previous file is kept as `config.toml.backup`.

use crate::{Config, ConfigError, ConfigResult, CONFIG_VERSION};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const TEMPLATE_HEADER: &str = "\
# geoexport configuration
#
# [service] base_url points at the exports API of the remote service.
# [downloads] directory is created on the first download.
# RUST_LOG takes precedence over [app] log_level.

";

/// The TOML file behind a `ConfigManager`
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file, or returns defaults when there is none
    ///
    /// Values that fail validation are kept and logged so a hand-edited file
    /// is never silently discarded.
    pub fn read(&self) -> ConfigResult<Config> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", self.path.display());
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Err(ConfigError::Empty {
                path: self.path.clone(),
            });
        }

        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_VERSION,
            });
        }

        if let Err(errors) = config.validate() {
            log::warn!(
                "{} has invalid values: {}",
                self.path.display(),
                crate::error::join_errors(&errors)
            );
        }

        Ok(config)
    }

    /// Validates `config` and replaces the file with it
    pub fn write(&self, config: &Config) -> ConfigResult<()> {
        let body = render(config)?;
        self.replace(&body)?;
        log::info!("Config saved to {}", self.path.display());
        Ok(())
    }

    /// Writes the defaults preceded by a short explanatory header
    pub fn write_template(&self) -> ConfigResult<()> {
        let body = render(&Config::default())?;
        self.replace(&format!("{}{}", TEMPLATE_HEADER, body))?;
        log::info!("Default config written to {}", self.path.display());
        Ok(())
    }

    fn replace(&self, contents: &str) -> ConfigResult<()> {
        let dir = self.directory();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
            log::info!("Created config directory {}", dir.display());
        }

        if self.path.exists() {
            let backup = self.path.with_extension("toml.backup");
            fs::copy(&self.path, &backup).map_err(|source| ConfigError::Backup {
                path: self.path.clone(),
                source,
            })?;
            log::debug!("Previous config kept as {}", backup.display());
        }

        let write_error = |source: std::io::Error| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        let mut staged = NamedTempFile::new_in(dir).map_err(write_error)?;
        staged.write_all(contents.as_bytes()).map_err(write_error)?;
        staged.flush().map_err(write_error)?;
        staged
            .persist(&self.path)
            .map_err(|e| write_error(e.error))?;

        Ok(())
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

/// Validates and renders a config as TOML
fn render(config: &Config) -> ConfigResult<String> {
    config.validate().map_err(ConfigError::Invalid)?;
    Ok(toml::to_string_pretty(config)?)
}
