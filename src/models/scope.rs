//! Routing-domain scope (VRF or global).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Isolation boundary within which prefixes must be unique.
///
/// Serialized as the VRF name, or `null` for the global table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Scope {
    #[default]
    Global,
    Vrf(String),
}

impl Scope {
    /// Parse a scope from user input; empty, "global" and "null" mean the global table.
    pub fn parse(input: &str) -> Scope {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("global") || input.eq_ignore_ascii_case("null") {
            Scope::Global
        } else {
            Scope::Vrf(input.to_string())
        }
    }

    pub fn vrf_name(&self) -> Option<&str> {
        match self {
            Scope::Global => None,
            Scope::Vrf(name) => Some(name),
        }
    }
}

impl From<Option<String>> for Scope {
    fn from(vrf: Option<String>) -> Self {
        match vrf {
            Some(name) => Scope::Vrf(name),
            None => Scope::Global,
        }
    }
}

impl From<Scope> for Option<String> {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Global => None,
            Scope::Vrf(name) => Some(name),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "Global"),
            Scope::Vrf(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_parse() {
        assert_eq!(Scope::parse(""), Scope::Global);
        assert_eq!(Scope::parse("Global"), Scope::Global);
        assert_eq!(Scope::parse(" red "), Scope::Vrf("red".to_string()));
        assert_eq!(Scope::parse("red").vrf_name(), Some("red"));
    }

    #[test]
    fn test_scope_serde() {
        assert_eq!(serde_json::from_str::<Scope>("null").unwrap(), Scope::Global);
        assert_eq!(
            serde_json::from_str::<Scope>("\"blue\"").unwrap(),
            Scope::Vrf("blue".to_string())
        );
        assert_eq!(serde_json::to_string(&Scope::Global).unwrap(), "null");
    }
}
