use std::path::Path;
use std::process::{Command, Output};

use bo_io::test_utils::TestContext;

/// Run the `brew-offload` binary against the sandbox in `ctx`.
///
/// `brew` is the program passed through to; by default a script that exits 0.
pub fn run(ctx: &TestContext, brew: Option<&Path>, args: &[&str]) -> Output {
    let default_brew;
    let brew = match brew {
        Some(path) => path,
        None => {
            default_brew = ctx.fake_brew("exit 0");
            default_brew.program()
        }
    };

    Command::new(env!("CARGO_BIN_EXE_brew-offload"))
        .args(args)
        .env("HOMEBREW_PREFIX", &ctx.paths().prefix)
        .env_remove("HOMEBREW_CELLAR")
        .env("BREW_OFFLOAD_CONFIG", ctx.config_path())
        .env("BREW_OFFLOAD_BREW", brew)
        .env_remove("BREW_OFFLOAD_LOG")
        .output()
        .expect("failed to run brew-offload")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
