use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    FormulaNotInstalled {
        name: String,
    },
    AlreadyOffloaded {
        name: String,
        target: PathBuf,
    },
    NotOffloaded {
        name: String,
    },
    OffloadCellarUnavailable {
        path: PathBuf,
        message: String,
    },
    RelocationFailed {
        name: String,
        message: String,
    },
    ConfigWriteError {
        path: PathBuf,
        message: String,
    },
    UnknownCommand {
        message: String,
    },
    InvalidFormulaName {
        name: String,
    },
    BrewExecFailed {
        program: PathBuf,
        message: String,
    },
    OutputFailed {
        message: String,
    },
}

impl Error {
    /// Process exit code for this error. Every kind maps to a fixed, non-zero code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::UnknownCommand { .. } | Error::InvalidFormulaName { .. } => 2,
            Error::FormulaNotInstalled { .. } => 3,
            Error::AlreadyOffloaded { .. } => 4,
            Error::NotOffloaded { .. } => 5,
            Error::OffloadCellarUnavailable { .. } => 6,
            Error::RelocationFailed { .. } => 7,
            Error::ConfigWriteError { .. } => 8,
            Error::OutputFailed { .. } => 1,
            Error::BrewExecFailed { .. } => 127,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FormulaNotInstalled { name } => {
                write!(
                    f,
                    "formula '{}' is not installed\n  hint: run 'brew install {}' first",
                    name, name
                )
            }
            Error::AlreadyOffloaded { name, target } => {
                write!(
                    f,
                    "formula '{}' is already offloaded to '{}'\n  hint: run 'brew-offload remove {}' to bring it back",
                    name,
                    target.display(),
                    name
                )
            }
            Error::NotOffloaded { name } => {
                write!(
                    f,
                    "formula '{}' is not offloaded\n  hint: run 'brew-offload list' to see offloaded formulas",
                    name
                )
            }
            Error::OffloadCellarUnavailable { path, message } => {
                write!(
                    f,
                    "offload cellar '{}' is not usable: {}\n  hint: check permissions or run 'brew-offload config offload_cellar <path>'",
                    path.display(),
                    message
                )
            }
            Error::RelocationFailed { name, message } => {
                write!(
                    f,
                    "failed to relocate '{}': {}\n  hint: the formula was left where it was; fix the cause and retry",
                    name, message
                )
            }
            Error::ConfigWriteError { path, message } => {
                write!(
                    f,
                    "cannot write configuration '{}': {}\n  hint: set BREW_OFFLOAD_CONFIG to a writable location",
                    path.display(),
                    message
                )
            }
            Error::UnknownCommand { message } => {
                write!(f, "{}", message.trim_end())
            }
            Error::InvalidFormulaName { name } => {
                write!(
                    f,
                    "'{}' is not a valid formula name\n  hint: use the name shown by 'brew list'",
                    name
                )
            }
            Error::BrewExecFailed { program, message } => {
                write!(
                    f,
                    "failed to run '{}': {}\n  hint: set BREW_OFFLOAD_BREW to the real brew executable",
                    program.display(),
                    message
                )
            }
            Error::OutputFailed { message } => {
                write!(f, "failed to write output: {}", message)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_offloaded_display_includes_target() {
        let err = Error::AlreadyOffloaded {
            name: "jq".to_string(),
            target: PathBuf::from("/data/offload/jq"),
        };

        let msg = err.to_string();
        assert!(msg.contains("jq"));
        assert!(msg.contains("/data/offload/jq"));
        assert!(msg.contains("brew-offload remove jq"));
    }

    #[test]
    fn relocation_failed_display_includes_hint() {
        let err = Error::RelocationFailed {
            name: "python@3.12".to_string(),
            message: "No space left on device".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("python@3.12"));
        assert!(msg.contains("No space left"));
        assert!(msg.contains("hint:"));
    }

    #[test]
    fn unknown_command_display_is_clap_text() {
        let err = Error::UnknownCommand {
            message: "error: unrecognized subcommand 'frobnicate'\n\n".to_string(),
        };

        assert_eq!(err.to_string(), "error: unrecognized subcommand 'frobnicate'");
    }

    #[test]
    fn every_kind_has_nonzero_exit_code() {
        let errors = [
            Error::FormulaNotInstalled { name: "a".into() },
            Error::AlreadyOffloaded {
                name: "a".into(),
                target: PathBuf::from("/x"),
            },
            Error::NotOffloaded { name: "a".into() },
            Error::OffloadCellarUnavailable {
                path: PathBuf::from("/x"),
                message: "denied".into(),
            },
            Error::RelocationFailed {
                name: "a".into(),
                message: "io".into(),
            },
            Error::ConfigWriteError {
                path: PathBuf::from("/x"),
                message: "denied".into(),
            },
            Error::UnknownCommand {
                message: "nope".into(),
            },
            Error::InvalidFormulaName { name: "..".into() },
            Error::BrewExecFailed {
                program: PathBuf::from("brew"),
                message: "not found".into(),
            },
            Error::OutputFailed {
                message: "key must be a string".into(),
            },
        ];

        for err in &errors {
            assert_ne!(err.exit_code(), 0, "{err:?}");
        }
        assert_eq!(errors[1].exit_code(), 4);
        assert_eq!(errors[2].exit_code(), 5);
    }
}
