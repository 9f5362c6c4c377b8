//! Stored IP address data model.

use super::Scope;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A persisted host address.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IpAddress {
    pub id: u64,
    pub address: IpAddr,
    /// Prefix length the address was assigned with (display only).
    pub mask: u8,
    #[serde(default)]
    pub vrf: Scope,
    #[serde(default = "default_status")]
    pub status: String,
    pub dns_name: Option<String>,
    pub tenant: Option<String>,
    #[serde(default)]
    pub description: String,
}

fn default_status() -> String {
    "active".to_string()
}

impl IpAddress {
    pub fn new(id: u64, address: IpAddr, mask: u8, vrf: Scope) -> IpAddress {
        IpAddress {
            id,
            address,
            mask,
            vrf,
            status: default_status(),
            dns_name: None,
            tenant: None,
            description: String::new(),
        }
    }
}
