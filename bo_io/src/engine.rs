//! The offload engine: relocates a formula's Cellar entry to the offload
//! cellar and back.
//!
//! A formula's location is derived from the standard Cellar entry on every
//! call. Nothing about a formula is cached or persisted by this module.

use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use bo_core::{Error, Formula, Location, Paths, offload_cellar_entry, validate_formula_name};

use crate::config::ConfigStore;
use crate::fs_util::{ensure_writable_dir, path_occupied};
use crate::relocate::{self, MoveMethod, MoveStrategy};

/// Inspect a standard Cellar entry.
///
/// A symlink is `Offloaded` (its target resolved literally, relative targets
/// against the entry's parent), a real directory is `Standard`, anything else
/// is `Absent`.
pub fn inspect_location(entry: &Path) -> io::Result<Location> {
    let meta = match fs::symlink_metadata(entry) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Location::Absent),
        Err(e) => return Err(e),
    };

    if meta.file_type().is_symlink() {
        let raw = fs::read_link(entry)?;
        let target = match entry.parent() {
            Some(parent) if raw.is_relative() => parent.join(raw),
            _ => raw,
        };
        Ok(Location::Offloaded { target })
    } else if meta.is_dir() {
        Ok(Location::Standard)
    } else {
        Ok(Location::Absent)
    }
}

/// Installed version directories under `dir`, sorted. Hidden entries are skipped.
fn installed_versions(dir: &Path) -> Vec<String> {
    let mut versions: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.path().is_dir())
                .filter_map(|e| e.file_name().to_str().map(str::to_string))
                .filter(|name| !name.starts_with('.'))
                .collect()
        })
        .unwrap_or_default();
    versions.sort();
    versions
}

/// Outcome of a successful `add` or `remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub name: String,
    pub from: PathBuf,
    pub to: PathBuf,
    pub versions: Vec<String>,
    pub method: MoveMethod,
}

/// A Cellar entry that is currently a symlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffloadedEntry {
    pub name: String,
    pub target: PathBuf,
    /// False when the symlink dangles.
    pub present: bool,
}

type LinkFn = fn(&Path, &Path) -> io::Result<()>;

fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    symlink(original, link)
}

pub struct OffloadEngine {
    paths: Paths,
    config: ConfigStore,
    strategy: MoveStrategy,
    link: LinkFn,
}

impl OffloadEngine {
    pub fn new(paths: Paths, config: ConfigStore) -> Self {
        Self {
            paths,
            config,
            strategy: MoveStrategy::default(),
            link: create_symlink,
        }
    }

    pub fn with_strategy(mut self, strategy: MoveStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    #[cfg(test)]
    fn with_link(mut self, link: LinkFn) -> Self {
        self.link = link;
        self
    }

    pub fn formula(&self, name: &str) -> Result<Formula, Error> {
        let name = validate_formula_name(name)?;
        let location = self.inspect(name)?;
        let versions = installed_versions(&self.paths.standard_cellar_entry(name));
        Ok(Formula {
            name: name.to_string(),
            versions,
            location,
        })
    }

    fn inspect(&self, name: &str) -> Result<Location, Error> {
        let entry = self.paths.standard_cellar_entry(name);
        inspect_location(&entry).map_err(|e| Error::RelocationFailed {
            name: name.to_string(),
            message: format!("cannot inspect '{}': {e}", entry.display()),
        })
    }

    /// Move a formula's Cellar entry into the offload cellar and leave a
    /// symlink behind. `opt/<name>` is not touched.
    pub fn add(&self, name: &str) -> Result<Transition, Error> {
        let name = validate_formula_name(name)?;
        let entry = self.paths.standard_cellar_entry(name);

        match self.inspect(name)? {
            Location::Absent => {
                return Err(Error::FormulaNotInstalled {
                    name: name.to_string(),
                });
            }
            Location::Offloaded { target } => {
                return Err(Error::AlreadyOffloaded {
                    name: name.to_string(),
                    target,
                });
            }
            Location::Standard => {}
        }

        let configured = self.config.get_offload_cellar();
        let offload_root =
            std::path::absolute(&configured).map_err(|e| Error::OffloadCellarUnavailable {
                path: configured.clone(),
                message: e.to_string(),
            })?;
        ensure_writable_dir(&offload_root).map_err(|e| Error::OffloadCellarUnavailable {
            path: offload_root.clone(),
            message: e.to_string(),
        })?;

        let dest = offload_cellar_entry(name, &offload_root);
        let fail = |message: String| Error::RelocationFailed {
            name: name.to_string(),
            message,
        };

        if path_occupied(&dest) {
            return Err(fail(format!("'{}' already exists", dest.display())));
        }

        debug!(formula = name, from = %entry.display(), to = %dest.display(), "relocating");
        let method =
            relocate::move_dir(&entry, &dest, self.strategy).map_err(|e| fail(e.to_string()))?;

        if let Err(e) = (self.link)(&dest, &entry) {
            warn!(formula = name, error = %e, "symlink failed, moving directory back");
            if let Err(back) = relocate::move_dir(&dest, &entry, self.strategy) {
                return Err(fail(format!(
                    "cannot create symlink ({e}) and cannot move '{}' back ({back})",
                    dest.display()
                )));
            }
            return Err(fail(format!("cannot create symlink: {e}")));
        }

        info!(formula = name, target = %dest.display(), ?method, "offloaded");
        Ok(Transition {
            name: name.to_string(),
            from: entry,
            versions: installed_versions(&dest),
            to: dest,
            method,
        })
    }

    /// Bring an offloaded formula back into the standard Cellar.
    ///
    /// An entry that is missing from the Cellar while its directory still sits
    /// under the current offload cellar is an interrupted `remove`; it is
    /// completed here.
    pub fn remove(&self, name: &str) -> Result<Transition, Error> {
        let name = validate_formula_name(name)?;
        let entry = self.paths.standard_cellar_entry(name);
        let fail = |message: String| Error::RelocationFailed {
            name: name.to_string(),
            message,
        };

        let (src, method) = match self.inspect(name)? {
            Location::Standard => {
                return Err(Error::NotOffloaded {
                    name: name.to_string(),
                });
            }
            Location::Absent => {
                let leftover = offload_cellar_entry(name, &self.config.get_offload_cellar());
                let resumable = !path_occupied(&entry)
                    && fs::symlink_metadata(&leftover).is_ok_and(|m| m.is_dir());
                if !resumable {
                    return Err(Error::NotOffloaded {
                        name: name.to_string(),
                    });
                }

                info!(formula = name, from = %leftover.display(), "completing interrupted restore");
                let method = relocate::move_dir(&leftover, &entry, self.strategy)
                    .map_err(|e| fail(e.to_string()))?;
                (leftover, method)
            }
            Location::Offloaded { target } => {
                // The target must be the keg itself, not another link to it.
                let problem = match fs::symlink_metadata(&target) {
                    Ok(meta) if meta.is_dir() => None,
                    Ok(_) => Some("is not a real directory"),
                    Err(_) => Some("is missing"),
                };
                if let Some(problem) = problem {
                    return Err(fail(format!(
                        "offloaded directory '{}' {problem}",
                        target.display()
                    )));
                }

                debug!(
                    formula = name,
                    from = %target.display(),
                    to = %entry.display(),
                    "restoring"
                );
                let method = relocate::restore_dir(&target, &entry, self.strategy)
                    .map_err(|e| fail(e.to_string()))?;
                (target, method)
            }
        };

        info!(formula = name, ?method, "restored");
        Ok(Transition {
            name: name.to_string(),
            from: src,
            versions: installed_versions(&entry),
            to: entry,
            method,
        })
    }

    /// Every Cellar entry that is a symlink, sorted by name.
    pub fn list_offloaded(&self) -> Result<Vec<OffloadedEntry>, Error> {
        let entries = match fs::read_dir(&self.paths.cellar) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::RelocationFailed {
                    name: "*".to_string(),
                    message: format!("cannot read '{}': {e}", self.paths.cellar.display()),
                });
            }
        };

        let mut offloaded = Vec::new();
        for entry in entries.flatten() {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if let Ok(Location::Offloaded { target }) = inspect_location(&entry.path()) {
                offloaded.push(OffloadedEntry {
                    present: target.is_dir(),
                    name,
                    target,
                });
            }
        }
        offloaded.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(offloaded)
    }
}
