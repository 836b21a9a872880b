use console::style;

use bo_core::Error;
use bo_io::OffloadEngine;

use super::print_json;

pub fn run(engine: &OffloadEngine, json: bool) -> Result<(), Error> {
    let offloaded = engine.list_offloaded()?;

    if json {
        return print_json(&offloaded);
    }

    if offloaded.is_empty() {
        println!("No formulae offloaded.");
        return Ok(());
    }

    for entry in &offloaded {
        if entry.present {
            println!(
                "{} {} {}",
                style(&entry.name).bold(),
                style("->").dim(),
                entry.target.display()
            );
        } else {
            println!(
                "{} {} {} {}",
                style(&entry.name).bold(),
                style("->").dim(),
                entry.target.display(),
                style("(missing)").red()
            );
        }
    }
    Ok(())
}
