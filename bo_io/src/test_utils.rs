//! Test utilities for brew-offload
//!
//! `TestContext` builds a throwaway Homebrew prefix inside a `TempDir`:
//!
//! - `homebrew/Cellar` and `homebrew/opt`, populated by `install_formula`
//!   the way Homebrew lays kegs out
//! - `offload/` as the default offload cellar (not created up front)
//! - `etc/brew-offload/config.json` as the config file (not created up front)
//!
//! # Example
//!
//! ```ignore
//! use bo_io::test_utils::TestContext;
//!
//! #[test]
//! fn offload_jq() {
//!     let ctx = TestContext::new();
//!     ctx.install_formula("jq", "1.7");
//!     ctx.engine().add("jq").unwrap();
//!     assert!(ctx.paths().standard_cellar_entry("jq").is_symlink());
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

use bo_core::Paths;

use crate::brew::Brew;
use crate::config::ConfigStore;
use crate::engine::OffloadEngine;

pub use crate::traits::MockBrewRunner;

pub struct TestContext {
    tmp: TempDir,
    paths: Paths,
}

impl TestContext {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let paths = Paths::new(tmp.path().join("homebrew"));
        fs::create_dir_all(&paths.cellar).expect("failed to create Cellar");
        fs::create_dir_all(paths.prefix.join("opt")).expect("failed to create opt");
        Self { tmp, paths }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn offload_root(&self) -> PathBuf {
        self.tmp.path().join("offload")
    }

    pub fn config_path(&self) -> PathBuf {
        self.tmp.path().join("etc/brew-offload/config.json")
    }

    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::new(self.config_path(), self.offload_root())
    }

    pub fn engine(&self) -> OffloadEngine {
        OffloadEngine::new(self.paths.clone(), self.config_store())
    }

    pub fn write_config(&self, json: &str) {
        let path = self.config_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, json).unwrap();
    }

    /// Create `Cellar/<name>/<version>` with an executable, a doc file and an
    /// internal relative symlink, then point `opt/<name>` at it.
    pub fn install_formula(&self, name: &str, version: &str) -> PathBuf {
        let keg = self.paths.standard_cellar_entry(name).join(version);
        fs::create_dir_all(keg.join("bin")).unwrap();
        fs::create_dir_all(keg.join("share/doc")).unwrap();

        let exe = keg.join("bin").join(name);
        fs::write(&exe, format!("#!/bin/sh\necho {name} {version}\n")).unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(keg.join("share/doc/README"), format!("{name} {version}\n")).unwrap();
        symlink(format!("../../bin/{name}"), keg.join("share/doc/exe")).unwrap();

        let opt = self.paths.opt_entry(name);
        let _ = fs::remove_file(&opt);
        symlink(format!("../Cellar/{name}/{version}"), &opt).unwrap();
        keg
    }

    /// Every entry below `root` keyed by relative path: file contents, symlink
    /// targets, or `<dir>`.
    pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
        let mut entries = BTreeMap::new();
        for entry in WalkDir::new(root).follow_links(false).min_depth(1) {
            let entry = entry.unwrap();
            let rel = entry.path().strip_prefix(root).unwrap().to_path_buf();
            let value = if entry.file_type().is_symlink() {
                format!("-> {}", fs::read_link(entry.path()).unwrap().display())
            } else if entry.file_type().is_dir() {
                "<dir>".to_string()
            } else {
                fs::read_to_string(entry.path()).unwrap_or_else(|_| "<binary>".to_string())
            };
            entries.insert(rel, value);
        }
        entries
    }

    pub fn snapshot_all(&self) -> BTreeMap<PathBuf, String> {
        Self::snapshot(self.tmp.path())
    }

    /// An executable `brew` stand-in running `body` under `/bin/sh`.
    pub fn fake_brew(&self, body: &str) -> Brew {
        let bin = self.tmp.path().join("fake-bin");
        fs::create_dir_all(&bin).unwrap();
        let count = fs::read_dir(&bin).unwrap().count();
        let script = bin.join(format!("brew-{count}"));
        fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        Brew::new(script)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
