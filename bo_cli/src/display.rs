//! Output helpers: spinner styling and the shell wrapper function.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub const WRAP_BANNER: &str = "Your brew is wrapped by brew-offload";

/// Spinner shown on stderr while a relocation runs. Hidden when stderr is not
/// a terminal.
pub fn relocation_spinner(prefix: &str, message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("    {prefix:<16} {spinner:.cyan} {msg}")
        .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"))
    {
        pb.set_style(style);
    }
    pb.set_prefix(prefix.to_string());
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Detect the current shell from environment.
pub fn detect_shell() -> &'static str {
    if let Ok(shell) = std::env::var("SHELL") {
        if shell.contains("fish") {
            return "fish";
        } else if shell.contains("zsh") {
            return "zsh";
        }
    }
    "bash"
}

/// Generate the `brew` wrapper function for `shell`.
///
/// `brew offload ...` becomes `<program> wrapped offload ...`; everything else
/// reaches the real brew through `command`.
pub fn generate_shellenv(program: &Path, shell: &str) -> String {
    match shell {
        "fish" => {
            format!(
                r#"function brew --wraps brew
    switch "$argv[1]"
        case offload
            command "{program}" wrapped $argv
        case --version -v
            echo "{banner}"
            command brew $argv
        case '*'
            command brew $argv
    end
end"#,
                program = program.display(),
                banner = WRAP_BANNER
            )
        }
        _ => {
            format!(
                r#"brew() {{
  case "$1" in
    offload)
      command "{program}" wrapped "$@" ;;
    --version|-v)
      echo "{banner}"
      command brew "$@" ;;
    *)
      command brew "$@" ;;
  esac
}}"#,
                program = program.display(),
                banner = WRAP_BANNER
            )
        }
    }
}

/// Print the shell wrapper.
pub fn print_shellenv(program: &Path, shell: Option<&str>) {
    let shell = match shell {
        Some(s) => s,
        None => detect_shell(),
    };
    println!("{}", generate_shellenv(program, shell));
}
