//! Command implementations for the brew-offload CLI.
//!
//! Each submodule handles a specific command or group of related commands.

pub mod config;
pub mod list;
pub mod offload;
pub mod status;

use std::path::PathBuf;

use serde::Serialize;

use bo_core::Error;
use bo_io::{BrewRunner, OffloadEngine};

use crate::display::print_shellenv;
use crate::router::{Invocation, OffloadCommand};

/// Run one parsed invocation and return the process exit code.
pub fn execute(
    invocation: Invocation,
    engine: &OffloadEngine,
    brew: &dyn BrewRunner,
) -> Result<i32, Error> {
    match invocation {
        Invocation::Display(text) => {
            print!("{text}");
            Ok(0)
        }

        Invocation::PassThrough(args) => brew.run(&args),

        Invocation::Offload(command) => {
            match command {
                OffloadCommand::Add { formula } => offload::run_add(engine, &formula)?,
                OffloadCommand::Remove { formula } => offload::run_remove(engine, &formula)?,
                OffloadCommand::Status { formula, json } => status::run(engine, &formula, json)?,
                OffloadCommand::Config { key, value } => {
                    config::run(engine.config(), key, value.as_deref())?
                }
                OffloadCommand::List { json } => list::run(engine, json)?,
                OffloadCommand::Shellenv { shell } => {
                    let program = std::env::current_exe()
                        .unwrap_or_else(|_| PathBuf::from("brew-offload"));
                    print_shellenv(&program, shell.as_deref());
                }
            }
            Ok(0)
        }
    }
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(value).map_err(|e| Error::OutputFailed {
        message: format!("failed to serialize JSON: {e}"),
    })?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use bo_io::test_utils::{MockBrewRunner, TestContext};

    #[test]
    fn pass_through_returns_brew_exit_code() {
        let ctx = TestContext::new();
        let mut brew = MockBrewRunner::new();
        brew.expect_run()
            .withf(|args| args.len() == 2 && args[0] == "info" && args[1] == "nonexistent")
            .times(1)
            .returning(|_| Ok(1));

        let code = execute(
            Invocation::PassThrough(vec!["info".to_string(), "nonexistent".to_string()]),
            &ctx.engine(),
            &brew,
        )
        .unwrap();

        assert_eq!(code, 1);
    }

    #[test]
    fn offload_commands_never_call_brew() {
        let ctx = TestContext::new();
        ctx.install_formula("jq", "1.7");
        let mut brew = MockBrewRunner::new();
        brew.expect_run().never();

        let code = execute(
            Invocation::Offload(OffloadCommand::Add {
                formula: "jq".to_string(),
            }),
            &ctx.engine(),
            &brew,
        )
        .unwrap();

        assert_eq!(code, 0);
        assert!(ctx.paths().standard_cellar_entry("jq").is_symlink());
    }

    #[test]
    fn engine_errors_propagate() {
        let ctx = TestContext::new();
        let brew = MockBrewRunner::new();

        let err = execute(
            Invocation::Offload(OffloadCommand::Remove {
                formula: "jq".to_string(),
            }),
            &ctx.engine(),
            &brew,
        )
        .unwrap_err();

        assert!(matches!(err, Error::NotOffloaded { .. }));
    }

    #[test]
    fn print_json_reports_serialization_failure() {
        let mut not_an_object = BTreeMap::new();
        not_an_object.insert((1, 2), "tuple keys have no JSON form");

        let err = print_json(&not_an_object).unwrap_err();

        assert!(matches!(err, Error::OutputFailed { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
