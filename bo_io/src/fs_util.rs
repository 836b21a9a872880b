use std::fs;
use std::io;
use std::path::Path;

const WRITE_PROBE: &str = ".brew_offload_write_test";

/// Create `dir` if needed and prove it accepts new files.
pub fn ensure_writable_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    if !fs::metadata(dir)?.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            "not a directory",
        ));
    }

    let probe = dir.join(WRITE_PROBE);
    fs::write(&probe, b"test")?;
    fs::remove_file(&probe)
}

/// Whether anything, including a dangling symlink, occupies `path`.
pub fn path_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
