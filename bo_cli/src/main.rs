//! brew-offload - keep Homebrew formulae in a secondary cellar.

use console::style;

use bo_core::Paths;
use bo_io::{Brew, ConfigStore, OffloadEngine};

mod commands;
mod display;
mod logging;
mod router;

fn main() {
    logging::init();

    let args = std::env::args_os().map(|a| a.to_string_lossy().into_owned());
    let result = router::arg_parse(args).and_then(|invocation| {
        let paths = Paths::from_env();
        let engine = OffloadEngine::new(paths.clone(), ConfigStore::for_paths(&paths));
        let brew = Brew::locate(&paths);
        commands::execute(invocation, &engine, &brew)
    });

    match result {
        Ok(code) => std::process::exit(code),
        Err(e @ bo_core::Error::UnknownCommand { .. }) => {
            // clap already rendered the usage error, prefix included.
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            std::process::exit(e.exit_code());
        }
    }
}
