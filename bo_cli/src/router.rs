//! Command Router.
//!
//! `brew-offload` is reached two ways: directly (`brew-offload add jq`) and
//! through the shell wrapper, which prefixes the user's whole `brew` command
//! line with `wrapped` (`brew-offload wrapped offload add jq`,
//! `brew-offload wrapped list --help`). Each shape has its own parse function;
//! [`arg_parse`] only looks at the first token to pick one.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};

use bo_core::Error;

pub const WRAPPED_MARKER: &str = "wrapped";
const OFFLOAD_SUBCOMMAND: &str = "offload";

/// What one process invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Forward these arguments to the real `brew` untouched.
    PassThrough(Vec<String>),
    Offload(OffloadCommand),
    /// `--help` / `--version` output rendered by clap.
    Display(String),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum OffloadCommand {
    /// Move a formula to the offload cellar, leaving a symlink in the Cellar
    Add {
        /// Formula name
        formula: String,
    },

    /// Move an offloaded formula back into the Cellar
    Remove {
        /// Formula name
        formula: String,
    },

    /// Show where a formula lives and which versions are installed
    Status {
        /// Formula name
        formula: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change a setting
    Config {
        /// Setting name
        key: ConfigKey,

        /// New value (omit to print the current one)
        value: Option<PathBuf>,
    },

    /// List offloaded formulas
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the shell function that routes `brew offload` to brew-offload
    Shellenv {
        /// Shell type (bash, zsh, fish). Auto-detected if not specified.
        #[arg(long, short)]
        shell: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    #[value(name = "offload_cellar")]
    OffloadCellar,
}

#[derive(Parser)]
#[command(name = "brew-offload")]
#[command(about = "Keep Homebrew formulae on another disk without breaking opt/ links")]
#[command(version, arg_required_else_help = true)]
struct DirectCli {
    #[command(subcommand)]
    command: OffloadCommand,
}

#[derive(Parser)]
#[command(name = "brew offload")]
#[command(about = "Keep Homebrew formulae on another disk without breaking opt/ links")]
#[command(version, arg_required_else_help = true)]
struct WrappedCli {
    #[command(subcommand)]
    command: OffloadCommand,
}

/// Parse a full argument vector, program name included.
pub fn arg_parse<I, S>(args: I) -> Result<Invocation, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let tail = args.get(1..).unwrap_or_default();

    match tail.split_first() {
        Some((first, rest)) if first == WRAPPED_MARKER => parse_wrapped(rest),
        _ => parse_direct(tail),
    }
}

/// `brew-offload <add|remove|config|list|shellenv> ...`
pub fn parse_direct(args: &[String]) -> Result<Invocation, Error> {
    let argv = std::iter::once("brew-offload".to_string()).chain(args.iter().cloned());
    finish(DirectCli::try_parse_from(argv).map(|cli| cli.command))
}

/// The tail after `wrapped`: the user's original `brew` arguments.
pub fn parse_wrapped(args: &[String]) -> Result<Invocation, Error> {
    match args.split_first() {
        Some((first, rest)) if first == OFFLOAD_SUBCOMMAND => {
            let argv = std::iter::once("brew offload".to_string()).chain(rest.iter().cloned());
            finish(WrappedCli::try_parse_from(argv).map(|cli| cli.command))
        }
        _ => Ok(Invocation::PassThrough(args.to_vec())),
    }
}

fn finish(parsed: Result<OffloadCommand, clap::Error>) -> Result<Invocation, Error> {
    match parsed {
        Ok(command) => Ok(Invocation::Offload(command)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Ok(Invocation::Display(e.render().to_string()))
        }
        Err(e) => Err(Error::UnknownCommand {
            message: e.render().to_string(),
        }),
    }
}
