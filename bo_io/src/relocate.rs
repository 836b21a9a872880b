//! Directory relocation between the standard Cellar and the offload cellar.
//!
//! A move is either a single `rename(2)` (same filesystem) or a verified copy
//! into a staging directory next to the destination followed by a rename into
//! place. In both cases the destination appears in one atomic step and the
//! source stays authoritative until then.

use std::fs::{self, File};
use std::io::{self, Read};
use std::os::unix::fs::{MetadataExt, symlink};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::TempDir;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

const STAGE_PREFIX: &str = ".brew-offload-stage.";
const TRASH_PREFIX: &str = ".brew-offload-trash.";

/// How directories are moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveStrategy {
    /// Rename when possible, copy across filesystems.
    #[default]
    Auto,
    /// Always copy, verify and delete the source.
    Copy,
}

/// How a completed move was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMethod {
    Renamed,
    Copied,
}

pub fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EXDEV) || err.kind() == io::ErrorKind::CrossesDevices
}

fn same_device(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(fs::metadata(a)?.dev() == fs::metadata(b)?.dev())
}

fn parent_of(path: &Path) -> io::Result<&Path> {
    path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' has no parent directory", path.display()),
        )
    })
}

/// A verified copy of a directory tree waiting in a hidden staging directory.
///
/// Dropping it without calling [`StagedCopy::commit`] deletes the copy.
pub struct StagedCopy {
    stage: TempDir,
    tree: PathBuf,
}

impl StagedCopy {
    /// Copy `src` into a staging area inside `dest_parent` and verify it.
    pub fn create(src: &Path, dest_parent: &Path) -> io::Result<Self> {
        let stage = tempfile::Builder::new()
            .prefix(STAGE_PREFIX)
            .tempdir_in(dest_parent)?;
        let tree = stage.path().join("tree");

        debug!(src = %src.display(), stage = %tree.display(), "copying tree");
        copy_tree(src, &tree)?;
        verify_tree(src, &tree)?;

        Ok(Self { stage, tree })
    }

    /// Rename the staged tree to `dest`, which must be free and on the same
    /// filesystem as the staging directory.
    pub fn commit(self, dest: &Path) -> io::Result<()> {
        fs::rename(&self.tree, dest)?;
        drop(self.stage);
        Ok(())
    }
}

/// Move the directory `src` to the free path `dest`.
///
/// On error `src` is left as it was and nothing is left at `dest`.
pub fn move_dir(src: &Path, dest: &Path, strategy: MoveStrategy) -> io::Result<MoveMethod> {
    if strategy == MoveStrategy::Auto {
        match fs::rename(src, dest) {
            Ok(()) => return Ok(MoveMethod::Renamed),
            Err(e) if is_cross_device(&e) => {
                debug!(src = %src.display(), dest = %dest.display(), "cross-device move, copying");
            }
            Err(e) => return Err(e),
        }
    }

    let staged = StagedCopy::create(src, parent_of(dest)?)?;
    staged.commit(dest)?;

    if let Err(e) = set_aside_and_delete(src) {
        if let Err(cleanup) = fs::remove_dir_all(dest) {
            warn!(
                path = %dest.display(),
                error = %cleanup,
                "source could not be released and the copy could not be removed"
            );
        }
        return Err(e);
    }
    Ok(MoveMethod::Copied)
}

/// Replace the symlink `link` with the directory `src` it points to.
///
/// Across filesystems the copy is staged before the symlink is removed, so the
/// path is empty only for the duration of one rename. Any failure puts the
/// symlink back.
pub fn restore_dir(src: &Path, link: &Path, strategy: MoveStrategy) -> io::Result<MoveMethod> {
    let link_target = fs::read_link(link)?;
    let link_parent = parent_of(link)?;

    if strategy == MoveStrategy::Auto && same_device(src, link_parent)? {
        fs::remove_file(link)?;
        match fs::rename(src, link) {
            Ok(()) => return Ok(MoveMethod::Renamed),
            Err(e) => {
                symlink(&link_target, link)?;
                if !is_cross_device(&e) {
                    return Err(e);
                }
                debug!(src = %src.display(), "rename crossed a mount point, copying");
            }
        }
    }

    let staged = StagedCopy::create(src, link_parent)?;
    fs::remove_file(link)?;
    if let Err(e) = staged.commit(link) {
        symlink(&link_target, link)?;
        return Err(e);
    }

    if let Err(e) = set_aside_and_delete(src) {
        warn!(
            path = %src.display(),
            error = %e,
            "restored copy is in place but the offloaded original could not be removed"
        );
    }
    Ok(MoveMethod::Copied)
}

/// Rename `dir` to a hidden sibling, then delete it.
///
/// The rename is what frees the path and is the only fallible step; failing to
/// delete the renamed tree is logged and otherwise ignored.
fn set_aside_and_delete(dir: &Path) -> io::Result<()> {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let trash = parent_of(dir)?.join(format!(
        "{TRASH_PREFIX}{name}.{}",
        std::process::id()
    ));

    fs::rename(dir, &trash)?;
    if let Err(e) = fs::remove_dir_all(&trash) {
        warn!(path = %trash.display(), error = %e, "failed to delete relocated source");
    }
    Ok(())
}

/// Recursively copy `src` to the new directory `dest`, preserving symlinks and
/// permission bits.
pub fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    let mut dirs = Vec::new();

    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dest.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir(&target)?;
            dirs.push((target, entry.metadata()?.permissions()));
        } else if file_type.is_symlink() {
            symlink(fs::read_link(entry.path())?, &target)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target)?;
        } else {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("cannot copy special file '{}'", entry.path().display()),
            ));
        }
    }

    // Children first, so read-only directories are populated before they lock.
    for (dir, permissions) in dirs.into_iter().rev() {
        fs::set_permissions(&dir, permissions)?;
    }

    Ok(())
}

/// Check that `copy` holds exactly the entries of `original`, with identical
/// file types, sizes, SHA-256 digests and symlink targets.
pub fn verify_tree(original: &Path, copy: &Path) -> io::Result<()> {
    let walk = |root: &Path| {
        WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
    };

    let mut left = walk(original);
    let mut right = walk(copy);

    loop {
        match (left.next().transpose()?, right.next().transpose()?) {
            (None, None) => return Ok(()),
            (Some(a), Some(b)) => compare_entries(original, &a, copy, &b)?,
            (Some(extra), None) | (None, Some(extra)) => {
                return Err(mismatch(extra.path(), "entry present on only one side"));
            }
        }
    }
}

fn compare_entries(
    original_root: &Path,
    a: &DirEntry,
    copy_root: &Path,
    b: &DirEntry,
) -> io::Result<()> {
    let rel_a = a.path().strip_prefix(original_root).map_err(io::Error::other)?;
    let rel_b = b.path().strip_prefix(copy_root).map_err(io::Error::other)?;
    if rel_a != rel_b {
        return Err(mismatch(a.path(), "entry missing from copy"));
    }

    let (ta, tb) = (a.file_type(), b.file_type());
    if ta.is_dir() != tb.is_dir() || ta.is_symlink() != tb.is_symlink() {
        return Err(mismatch(a.path(), "file type differs"));
    }

    if ta.is_symlink() {
        if fs::read_link(a.path())? != fs::read_link(b.path())? {
            return Err(mismatch(a.path(), "symlink target differs"));
        }
    } else if ta.is_file() {
        if a.metadata()?.len() != b.metadata()?.len() {
            return Err(mismatch(a.path(), "size differs"));
        }
        if sha256_file(a.path())? != sha256_file(b.path())? {
            return Err(mismatch(a.path(), "checksum differs"));
        }
    }

    Ok(())
}

fn mismatch(path: &Path, what: &str) -> io::Error {
    io::Error::other(format!(
        "copy verification failed at '{}': {what}",
        path.display()
    ))
}

fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
