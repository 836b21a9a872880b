use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::errors::Error;
use crate::location::Location;

static FORMULA_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9@+._-]*$").expect("valid regex"));

/// An installed formula as seen on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Formula {
    pub name: String,
    /// Version directories under the Cellar entry, sorted.
    pub versions: Vec<String>,
    pub location: Location,
}

/// Validate a user-supplied formula name and return the Cellar key for it.
///
/// Fully qualified tap names (`user/repo/name`) resolve to their last
/// segment, since the Cellar is keyed by the short name only.
pub fn validate_formula_name(name: &str) -> Result<&str, Error> {
    let short = match name.split('/').collect::<Vec<_>>().as_slice() {
        [short] => *short,
        [user, repo, short] if !user.is_empty() && !repo.is_empty() => *short,
        _ => {
            return Err(Error::InvalidFormulaName {
                name: name.to_string(),
            });
        }
    };

    if FORMULA_NAME.is_match(short) {
        Ok(short)
    } else {
        Err(Error::InvalidFormulaName {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_versioned_names() {
        assert_eq!(validate_formula_name("python@3.12").unwrap(), "python@3.12");
        assert_eq!(validate_formula_name("gtk+3").unwrap(), "gtk+3");
        assert_eq!(validate_formula_name("jq").unwrap(), "jq");
    }

    #[test]
    fn tap_qualified_name_resolves_to_short_name() {
        assert_eq!(validate_formula_name("homebrew/core/jq").unwrap(), "jq");
    }

    #[test]
    fn rejects_path_like_names() {
        for bad in ["", ".", "..", "../etc", "a/b", "/jq", "jq/", "a//b", "j\0q", "-rf"] {
            assert!(
                matches!(
                    validate_formula_name(bad),
                    Err(Error::InvalidFormulaName { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    proptest! {
        #[test]
        fn valid_names_never_escape_the_cellar(name in "[a-z0-9][a-z0-9@+._-]{0,20}") {
            let short = validate_formula_name(&name).unwrap();
            prop_assert!(!short.contains('/'));
            prop_assert_ne!(short, "..");
        }
    }
}
