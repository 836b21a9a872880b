//! Pass-through execution of the real `brew`.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tracing::debug;

use bo_core::{Error, Paths};

use crate::traits::BrewRunner;

/// Environment variable naming the brew executable to wrap.
pub const BREW_ENV: &str = "BREW_OFFLOAD_BREW";

pub struct Brew {
    program: PathBuf,
}

impl Brew {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `BREW_OFFLOAD_BREW`, else `<prefix>/bin/brew` when present, else `brew`
    /// from `PATH`.
    pub fn locate(paths: &Paths) -> Self {
        Self::locate_with(std::env::var_os(BREW_ENV).map(PathBuf::from), paths)
    }

    pub fn locate_with(override_program: Option<PathBuf>, paths: &Paths) -> Self {
        if let Some(program) = override_program.filter(|p| !p.as_os_str().is_empty()) {
            return Self::new(program);
        }
        let in_prefix = paths.default_brew();
        if in_prefix.is_file() {
            return Self::new(in_prefix);
        }
        Self::new("brew")
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl BrewRunner for Brew {
    fn run(&self, args: &[String]) -> Result<i32, Error> {
        debug!(program = %self.program.display(), ?args, "passing through");
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|e| Error::BrewExecFailed {
                program: self.program.clone(),
                message: e.to_string(),
            })?;
        Ok(exit_code(status))
    }
}

/// The exit code a shell would report: the code itself, or `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestContext;
    use std::fs;

    #[test]
    fn propagates_exit_code() {
        let ctx = TestContext::new();

        assert_eq!(ctx.fake_brew("exit 0").run(&[]).unwrap(), 0);
        assert_eq!(ctx.fake_brew("exit 3").run(&[]).unwrap(), 3);
    }

    #[test]
    fn forwards_arguments_verbatim() {
        let ctx = TestContext::new();
        let log = ctx.root().join("args.log");
        let brew = ctx.fake_brew(&format!("printf '%s\\n' \"$@\" > '{}'", log.display()));

        let args: Vec<String> = ["list", "--help", "two words", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(brew.run(&args).unwrap(), 0);

        assert_eq!(fs::read_to_string(&log).unwrap(), "list\n--help\ntwo words\n\n");
    }

    #[test]
    fn signal_maps_to_shell_convention() {
        let ctx = TestContext::new();
        let brew = ctx.fake_brew("kill -TERM $$");

        assert_eq!(brew.run(&[]).unwrap(), 128 + libc::SIGTERM);
    }

    #[test]
    fn missing_program_is_exec_failure() {
        let ctx = TestContext::new();
        let brew = Brew::new(ctx.root().join("no-such-brew"));

        let err = brew.run(&[]).unwrap_err();
        assert!(matches!(err, Error::BrewExecFailed { .. }));
        assert_eq!(err.exit_code(), 127);
    }

    #[test]
    fn locate_prefers_override_then_prefix() {
        let ctx = TestContext::new();

        let brew = Brew::locate_with(Some(PathBuf::from("/custom/brew")), ctx.paths());
        assert_eq!(brew.program(), Path::new("/custom/brew"));

        let brew = Brew::locate_with(None, ctx.paths());
        assert_eq!(brew.program(), Path::new("brew"));

        let in_prefix = ctx.paths().default_brew();
        fs::create_dir_all(in_prefix.parent().unwrap()).unwrap();
        fs::write(&in_prefix, b"#!/bin/sh\n").unwrap();
        let brew = Brew::locate_with(Some(PathBuf::new()), ctx.paths());
        assert_eq!(brew.program(), in_prefix);
    }
}
