//! Stored IP range (explicit start/end) data model.

use super::{to_bits, AddressFamily, Block, IpAddress, Scope};
use crate::error::TableError;
use crate::processing::Utilization;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A persisted range of addresses bounded by explicit start and end.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IpRange {
    pub id: u64,
    pub start_address: IpAddr,
    pub end_address: IpAddr,
    #[serde(default)]
    pub vrf: Scope,
    #[serde(default = "default_status")]
    pub status: String,
    pub role: Option<String>,
    pub tenant: Option<String>,
    #[serde(default)]
    pub mark_utilized: bool,
    #[serde(default)]
    pub description: String,
}

fn default_status() -> String {
    "active".to_string()
}

impl IpRange {
    /// Create a range, checking the bounds share a family and are in order.
    pub fn new(id: u64, start: IpAddr, end: IpAddr, vrf: Scope) -> Result<IpRange, TableError> {
        let range = IpRange {
            id,
            start_address: start,
            end_address: end,
            vrf,
            status: default_status(),
            role: None,
            tenant: None,
            mark_utilized: false,
            description: String::new(),
        };
        range.bounds()?;
        Ok(range)
    }

    pub fn family(&self) -> AddressFamily {
        AddressFamily::of(&self.start_address)
    }

    /// Integer bounds of the range.
    pub fn bounds(&self) -> Result<(u128, u128), TableError> {
        let (start_family, start) = to_bits(self.start_address);
        let (end_family, end) = to_bits(self.end_address);
        let invalid = |reason: &str| TableError::InvalidRange {
            start: self.start_address.to_string(),
            end: self.end_address.to_string(),
            reason: reason.to_string(),
        };
        if start_family != end_family {
            return Err(invalid("address families differ"));
        }
        if start > end {
            return Err(invalid("start address is above end address"));
        }
        Ok((start, end))
    }

    /// Number of addresses in the range.
    pub fn size(&self) -> Result<u128, TableError> {
        let (start, end) = self.bounds()?;
        // Only the whole IPv6 space overflows.
        (end - start)
            .checked_add(1)
            .ok_or(TableError::Overflow(Block::full(self.family())))
    }

    pub fn contains(&self, addr: IpAddr) -> bool {
        match self.bounds() {
            Ok((start, end)) => {
                let (family, bits) = to_bits(addr);
                family == self.family() && start <= bits && bits <= end
            }
            Err(_) => false,
        }
    }

    /// Share of the range taken by stored addresses of the same scope.
    pub fn utilization(&self, addresses: &[IpAddress]) -> Result<Utilization, TableError> {
        let size = self.size()?;
        let mut used: Vec<IpAddr> = addresses
            .iter()
            .filter(|a| a.vrf == self.vrf && self.contains(a.address))
            .map(|a| a.address)
            .collect();
        used.sort();
        used.dedup();
        Ok(Utilization::compute(used.len() as u128, size, self.mark_utilized))
    }
}
