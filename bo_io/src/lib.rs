pub mod brew;
pub mod config;
pub mod engine;
pub mod fs_util;
pub mod relocate;
pub mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use brew::Brew;
pub use config::{ConfigFile, ConfigStore};
pub use engine::{OffloadEngine, OffloadedEntry, Transition, inspect_location};
pub use relocate::{MoveMethod, MoveStrategy};
pub use traits::BrewRunner;
