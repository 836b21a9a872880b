//! `config <key> [value]`.

use std::path::Path;

use console::style;

use bo_core::Error;
use bo_io::ConfigStore;

use crate::router::ConfigKey;

pub fn run(store: &ConfigStore, key: ConfigKey, value: Option<&Path>) -> Result<(), Error> {
    match (key, value) {
        (ConfigKey::OffloadCellar, Some(path)) => {
            let written = store.set_offload_cellar(path)?;
            println!(
                "{} offload_cellar set to {}",
                style("==>").cyan().bold(),
                style(written.display()).green()
            );
            println!(
                "    {}",
                style("formulae already offloaded stay where they are").dim()
            );
        }
        (ConfigKey::OffloadCellar, None) => match store.configured_offload_cellar() {
            Some(path) => println!("{}", path.display()),
            None => println!(
                "{} {}",
                store.default_offload_cellar().display(),
                style("(default)").dim()
            ),
        },
    }
    Ok(())
}
