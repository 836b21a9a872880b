//! `status <formula>`.

use console::style;

use bo_core::{Error, Location};
use bo_io::OffloadEngine;

use super::print_json;

pub fn run(engine: &OffloadEngine, formula: &str, json: bool) -> Result<(), Error> {
    let formula = engine.formula(formula)?;

    if json {
        return print_json(&formula);
    }

    println!("{} {}", style("==>").cyan().bold(), style(&formula.name).bold());
    let location = match &formula.location {
        Location::Standard => style("standard Cellar".to_string()).green(),
        Location::Offloaded { target } if target.is_dir() => {
            style(format!("offloaded to {}", target.display())).cyan()
        }
        Location::Offloaded { target } => {
            style(format!("offloaded to {} (missing)", target.display())).red()
        }
        Location::Absent => style("not installed".to_string()).dim(),
    };
    println!("    {:<10} {}", "Location:", location);

    if !formula.versions.is_empty() {
        println!("    {:<10} {}", "Versions:", formula.versions.join(", "));
    }
    Ok(())
}
