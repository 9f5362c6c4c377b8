//! Stored IP prefix data model.

use super::{Block, Scope};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of a prefix.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrefixStatus {
    Container,
    #[default]
    Active,
    Reserved,
    Deprecated,
}

impl PrefixStatus {
    pub fn parse(input: &str) -> Option<PrefixStatus> {
        match input.trim().to_ascii_lowercase().as_str() {
            "container" => Some(PrefixStatus::Container),
            "active" => Some(PrefixStatus::Active),
            "reserved" => Some(PrefixStatus::Reserved),
            "deprecated" => Some(PrefixStatus::Deprecated),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PrefixStatus::Container => "Container",
            PrefixStatus::Active => "Active",
            PrefixStatus::Reserved => "Reserved",
            PrefixStatus::Deprecated => "Deprecated",
        }
    }
}

impl fmt::Display for PrefixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A persisted IP prefix.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Prefix {
    /// Storage identifier.
    pub id: u64,
    /// The address block.
    pub prefix: Block,
    /// VRF the prefix lives in (`null` for global).
    #[serde(default)]
    pub vrf: Scope,
    #[serde(default)]
    pub status: PrefixStatus,
    pub role: Option<String>,
    pub tenant: Option<String>,
    pub site: Option<String>,
    pub vlan: Option<String>,
    /// All addresses in the prefix are usable (no network/broadcast reservation).
    #[serde(default)]
    pub is_pool: bool,
    /// Report the prefix as 100% utilized regardless of its children.
    #[serde(default)]
    pub mark_utilized: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Prefix {
    /// Create an active prefix with no associations.
    pub fn new(id: u64, prefix: Block, vrf: Scope) -> Prefix {
        Prefix {
            id,
            prefix,
            vrf,
            status: PrefixStatus::default(),
            role: None,
            tenant: None,
            site: None,
            vlan: None,
            is_pool: false,
            mark_utilized: false,
            description: String::new(),
            tags: vec![],
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.prefix, self.vrf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_deserialize_defaults() {
        let prefix: Prefix = serde_json::from_str(
            r#"{"id": 7, "prefix": "10.1.0.0/16", "role": null, "tenant": "acme", "site": null, "vlan": null}"#,
        )
        .unwrap();
        assert_eq!(prefix.id, 7);
        assert_eq!(prefix.vrf, Scope::Global);
        assert_eq!(prefix.status, PrefixStatus::Active);
        assert_eq!(prefix.tenant.as_deref(), Some("acme"));
        assert!(!prefix.mark_utilized);
        assert!(prefix.tags.is_empty());
    }

    #[test]
    fn test_prefix_status_parse() {
        assert_eq!(PrefixStatus::parse("Container"), Some(PrefixStatus::Container));
        assert_eq!(PrefixStatus::parse(" reserved"), Some(PrefixStatus::Reserved));
        assert_eq!(PrefixStatus::parse("available"), None);
        assert_eq!(PrefixStatus::Deprecated.to_string(), "Deprecated");
    }
}
