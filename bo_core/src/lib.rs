pub mod errors;
pub mod formula;
pub mod location;
pub mod paths;
pub mod platform;

pub use errors::Error;
pub use formula::{Formula, validate_formula_name};
pub use location::Location;
pub use paths::{Paths, offload_cellar_entry};
pub use platform::{Arch, Os, default_prefix};
