//! Persisted settings for brew-offload.
//!
//! The configuration is a flat JSON object. Only `offload_cellar` is
//! understood today; any other key is carried through untouched so that files
//! written by newer versions survive a round trip through older ones.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use bo_core::{Error, Paths};

use crate::fs_util::ensure_writable_dir;

/// Environment variable that relocates the configuration file.
pub const CONFIG_ENV: &str = "BREW_OFFLOAD_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offload_cellar: Option<PathBuf>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

pub struct ConfigStore {
    path: PathBuf,
    default_offload_cellar: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>, default_offload_cellar: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_offload_cellar: default_offload_cellar.into(),
        }
    }

    /// Store for a prefix, honouring `BREW_OFFLOAD_CONFIG`.
    pub fn for_paths(paths: &Paths) -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| paths.default_config_file());
        Self::new(path, paths.default_offload_cellar())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_offload_cellar(&self) -> &Path {
        &self.default_offload_cellar
    }

    /// Read the file. A missing, unreadable or malformed file yields `None`.
    pub fn load(&self) -> Option<ConfigFile> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no config file, using defaults");
                return None;
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "cannot read config file, using defaults"
                );
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "malformed config file, using defaults"
                );
                None
            }
        }
    }

    /// The explicitly configured offload cellar, if any.
    ///
    /// A relative value (only possible in a hand-edited file) is resolved
    /// against the directory holding the config file.
    pub fn configured_offload_cellar(&self) -> Option<PathBuf> {
        let configured = self.load()?.offload_cellar?;
        if configured.is_absolute() {
            return Some(configured);
        }

        let base = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let resolved = std::path::absolute(base.join(&configured)).ok()?;
        warn!(
            configured = %configured.display(),
            resolved = %resolved.display(),
            "relative offload_cellar in config file"
        );
        Some(resolved)
    }

    /// The effective offload cellar. Never fails.
    pub fn get_offload_cellar(&self) -> PathBuf {
        self.configured_offload_cellar()
            .unwrap_or_else(|| self.default_offload_cellar.clone())
    }

    /// Validate `path`, creating it if absent, then persist it.
    ///
    /// Returns the absolute path that was written.
    pub fn set_offload_cellar(&self, path: &Path) -> Result<PathBuf, Error> {
        let absolute = std::path::absolute(path).map_err(|e| Error::ConfigWriteError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        ensure_writable_dir(&absolute).map_err(|e| Error::ConfigWriteError {
            path: absolute.clone(),
            message: e.to_string(),
        })?;

        let mut config = self.load().unwrap_or_default();
        config.offload_cellar = Some(absolute.clone());
        self.write(&config)?;

        debug!(offload_cellar = %absolute.display(), "offload cellar configured");
        Ok(absolute)
    }

    fn write(&self, config: &ConfigFile) -> Result<(), Error> {
        let write_err = |message: String| Error::ConfigWriteError {
            path: self.path.clone(),
            message,
        };

        let json = serde_json::to_string_pretty(config).map_err(|e| write_err(e.to_string()))?;

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| write_err(e.to_string()))?;

        let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| write_err(e.to_string()))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.write_all(b"\n"))
            .map_err(|e| write_err(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| write_err(e.error.to_string()))?;

        Ok(())
    }
}
