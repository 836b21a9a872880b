//! Trait abstractions over process execution so the CLI can be tested
//! without a real `brew` on the machine.

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use bo_core::Error;

/// Runs the real package manager with a verbatim argument list.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait BrewRunner {
    /// Run `brew <args...>` with inherited stdio and return its exit code.
    ///
    /// A child killed by a signal reports `128 + signal`.
    fn run(&self, args: &[String]) -> Result<i32, Error>;
}
