//! `add` and `remove`.

use console::style;

use bo_core::Error;
use bo_io::{MoveMethod, OffloadEngine, Transition};

use crate::display::relocation_spinner;

pub fn run_add(engine: &OffloadEngine, formula: &str) -> Result<(), Error> {
    println!(
        "{} Offloading {}...",
        style("==>").cyan().bold(),
        style(formula).bold()
    );

    let spinner = relocation_spinner(formula, "relocating".to_string());
    let result = engine.add(formula);
    spinner.finish_and_clear();
    let transition = result?;

    print_transition(&transition);
    println!(
        "{} Offloaded {} to {}",
        style("==>").cyan().bold(),
        style(&transition.name).green(),
        transition.to.display()
    );
    Ok(())
}

pub fn run_remove(engine: &OffloadEngine, formula: &str) -> Result<(), Error> {
    println!(
        "{} Restoring {}...",
        style("==>").cyan().bold(),
        style(formula).bold()
    );

    let spinner = relocation_spinner(formula, "restoring".to_string());
    let result = engine.remove(formula);
    spinner.finish_and_clear();
    let transition = result?;

    print_transition(&transition);
    println!(
        "{} Restored {} to {}",
        style("==>").cyan().bold(),
        style(&transition.name).green(),
        transition.to.display()
    );
    Ok(())
}

fn print_transition(transition: &Transition) {
    for version in &transition.versions {
        println!("    {} {} {}", style("✓").green(), transition.name, version);
    }
    if transition.method == MoveMethod::Copied {
        println!(
            "    {}",
            style("copied across filesystems and verified").dim()
        );
    }
}
