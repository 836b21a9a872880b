//! Path resolution for the standard Cellar, the offload cellar and `opt`.
//!
//! Everything here is pure: no function touches the filesystem.

use std::path::{Path, PathBuf};

use crate::platform::{Arch, Os, default_prefix};

const CONFIG_FILE: &str = "etc/brew-offload/config.json";
const DEFAULT_OFFLOAD_DIR: &str = "offload";

/// Layout of one Homebrew prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub prefix: PathBuf,
    pub cellar: PathBuf,
}

impl Paths {
    /// Standard layout: the Cellar lives directly under the prefix.
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        let prefix = prefix.into();
        let cellar = prefix.join("Cellar");
        Self { prefix, cellar }
    }

    pub fn with_cellar(prefix: impl Into<PathBuf>, cellar: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            cellar: cellar.into(),
        }
    }

    /// Build from `HOMEBREW_PREFIX`/`HOMEBREW_CELLAR` values, falling back to the
    /// platform default prefix.
    pub fn from_env_values(prefix: Option<String>, cellar: Option<String>) -> Self {
        let prefix = prefix
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_prefix(Os::current(), Arch::current()));
        match cellar.filter(|c| !c.is_empty()) {
            Some(cellar) => Self::with_cellar(prefix, cellar),
            None => Self::new(prefix),
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_values(
            std::env::var("HOMEBREW_PREFIX").ok(),
            std::env::var("HOMEBREW_CELLAR").ok(),
        )
    }

    pub fn standard_cellar_entry(&self, name: &str) -> PathBuf {
        self.cellar.join(name)
    }

    pub fn opt_entry(&self, name: &str) -> PathBuf {
        self.prefix.join("opt").join(name)
    }

    pub fn default_offload_cellar(&self) -> PathBuf {
        self.prefix.join(DEFAULT_OFFLOAD_DIR)
    }

    pub fn default_config_file(&self) -> PathBuf {
        self.prefix.join(CONFIG_FILE)
    }

    pub fn default_brew(&self) -> PathBuf {
        self.prefix.join("bin").join("brew")
    }
}

pub fn offload_cellar_entry(name: &str, offload_root: &Path) -> PathBuf {
    offload_root.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_follow_homebrew_layout() {
        let paths = Paths::new("/home/linuxbrew/.linuxbrew");

        assert_eq!(
            paths.standard_cellar_entry("jq"),
            PathBuf::from("/home/linuxbrew/.linuxbrew/Cellar/jq")
        );
        assert_eq!(
            paths.opt_entry("python@3.12"),
            PathBuf::from("/home/linuxbrew/.linuxbrew/opt/python@3.12")
        );
        assert_eq!(
            offload_cellar_entry("jq", Path::new("/data/offload")),
            PathBuf::from("/data/offload/jq")
        );
    }

    #[test]
    fn defaults_live_under_prefix() {
        let paths = Paths::new("/opt/homebrew");

        assert_eq!(
            paths.default_offload_cellar(),
            PathBuf::from("/opt/homebrew/offload")
        );
        assert_eq!(
            paths.default_config_file(),
            PathBuf::from("/opt/homebrew/etc/brew-offload/config.json")
        );
        assert_eq!(paths.default_brew(), PathBuf::from("/opt/homebrew/bin/brew"));
    }

    #[test]
    fn env_cellar_overrides_layout() {
        let paths = Paths::from_env_values(
            Some("/tmp/brew".to_string()),
            Some("/mnt/cellar".to_string()),
        );

        assert_eq!(paths.prefix, PathBuf::from("/tmp/brew"));
        assert_eq!(paths.cellar, PathBuf::from("/mnt/cellar"));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let paths = Paths::from_env_values(Some("/tmp/brew".to_string()), Some(String::new()));
        assert_eq!(paths.cellar, PathBuf::from("/tmp/brew/Cellar"));

        let paths = Paths::from_env_values(Some(String::new()), None);
        assert_eq!(paths.prefix, default_prefix(Os::current(), Arch::current()));
    }
}
