// crates/network/src/save.rs
//! Save actions that persist a finished download

use crate::error::{NetworkError, NetworkResult};
use crate::payload::Payload;
use async_trait::async_trait;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::fs;

const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Hands a finished payload to the user
#[async_trait]
pub trait SaveAction: Send + Sync {
    /// Persists `payload`; `file_name` is `None` when the server suggested
    /// none, in which case the action applies its own default
    async fn save(&self, payload: &Payload, file_name: Option<&str>) -> NetworkResult<PathBuf>;
}

/// What to do when the target file already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Append ` (1)`, ` (2)`, ... to the file stem
    #[default]
    Rename,
    /// Replace the existing file
    Overwrite,
}

/// Writes payloads into a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSaver {
    directory: PathBuf,
    default_file_name: String,
    collision: CollisionPolicy,
}

impl FileSaver {
    /// Creates a saver writing into `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            default_file_name: "export".to_string(),
            collision: CollisionPolicy::default(),
        }
    }

    /// Name used when the server did not suggest one
    pub fn with_default_file_name(mut self, name: impl Into<String>) -> Self {
        self.default_file_name = name.into();
        self
    }

    pub fn with_collision_policy(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Final path for a suggested name, before collision handling
    fn target_path(&self, file_name: Option<&str>) -> PathBuf {
        let name = file_name
            .and_then(sanitize_file_name)
            .or_else(|| sanitize_file_name(&self.default_file_name))
            .unwrap_or_else(|| "export".to_string());
        self.directory.join(name)
    }
}

#[async_trait]
impl SaveAction for FileSaver {
    async fn save(&self, payload: &Payload, file_name: Option<&str>) -> NetworkResult<PathBuf> {
        fs::create_dir_all(&self.directory).await?;

        let target = self.target_path(file_name);
        let bytes = payload.bytes().clone();
        let collision = self.collision;

        let path = tokio::task::spawn_blocking(move || persist(&target, &bytes, collision))
            .await
            .map_err(|e| NetworkError::Save(format!("save task failed: {}", e)))??;

        log::info!("Saved {} bytes to {}", payload.len(), path.display());
        Ok(path)
    }
}

/// Keeps only the last path component of a server-supplied name
///
/// Returns `None` for names that reduce to nothing usable.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next()?.trim();
    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();

    match cleaned.as_str() {
        "" | "." | ".." => None,
        _ => Some(cleaned),
    }
}

/// Writes `bytes` to a private staging file next to `target`, then moves it
/// into place
///
/// Under `Rename` the final name is claimed with a no-clobber rename, so two
/// saves racing for the same name end up in different files.
fn persist(target: &Path, bytes: &[u8], collision: CollisionPolicy) -> NetworkResult<PathBuf> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = tempfile::Builder::new()
        .prefix(".geoexport-")
        .suffix(".part")
        .tempfile_in(dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;

    if collision == CollisionPolicy::Overwrite {
        staged.persist(target).map_err(|e| e.error)?;
        return Ok(target.to_path_buf());
    }

    for attempt in 0..=MAX_RENAME_ATTEMPTS {
        let candidate = numbered_path(target, attempt)?;
        match staged.persist_noclobber(&candidate) {
            Ok(_) => return Ok(candidate),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => staged = e.file,
            Err(e) => return Err(e.error.into()),
        }
    }

    Err(NetworkError::Save(format!(
        "no free file name for {} after {} attempts",
        target.display(),
        MAX_RENAME_ATTEMPTS
    )))
}

/// `name.ext` for 0, `name (n).ext` otherwise
fn numbered_path(path: &Path, n: u32) -> NetworkResult<PathBuf> {
    if n == 0 {
        return Ok(path.to_path_buf());
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| NetworkError::Save(format!("cannot derive a name from {}", path.display())))?;
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{} ({}).{}", stem, n, ext),
        None => format!("{} ({})", stem, n),
    };
    Ok(path.with_file_name(name))
}
