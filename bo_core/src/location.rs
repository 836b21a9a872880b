use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Where a formula currently lives.
///
/// Never stored: always derived from the standard Cellar entry at the moment
/// it is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Location {
    /// The standard Cellar entry is a real directory.
    Standard,
    /// The standard Cellar entry is a symlink to `target`.
    Offloaded { target: PathBuf },
    /// Nothing exists at the standard Cellar entry.
    Absent,
}

impl Location {
    pub fn is_offloaded(&self) -> bool {
        matches!(self, Location::Offloaded { .. })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Standard => write!(f, "standard"),
            Location::Offloaded { target } => write!(f, "offloaded -> {}", target.display()),
            Location::Absent => write!(f, "absent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offloaded_serializes_with_target() {
        let location = Location::Offloaded {
            target: PathBuf::from("/data/offload/jq"),
        };
        let json = serde_json::to_value(&location).unwrap();
        assert_eq!(json["state"], "offloaded");
        assert_eq!(json["target"], "/data/offload/jq");
    }

    #[test]
    fn display_is_short() {
        assert_eq!(Location::Standard.to_string(), "standard");
        assert_eq!(Location::Absent.to_string(), "absent");
        assert!(!Location::Absent.is_offloaded());
    }
}
