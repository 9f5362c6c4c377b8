//! JSON file backed store.
//!
//! Reads an inventory export `{ "prefixes": [...], "ip_addresses": [...], "ip_ranges": [...] }`.

use super::PrefixStore;
use crate::models::{Block, IpAddress, IpRange, Prefix, Scope};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// Inventory records loaded from disk.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Data {
    #[serde(default)]
    pub prefixes: Vec<Prefix>,
    #[serde(default)]
    pub ip_addresses: Vec<IpAddress>,
    #[serde(default)]
    pub ip_ranges: Vec<IpRange>,
}

/// Read inventory data from a JSON file.
///
/// Parse errors report the JSON path of the offending value.
pub fn read_data_file(data_file: &str) -> Result<Data, Box<dyn Error>> {
    if !Path::new(data_file).exists() {
        return Err(format!("Data file does not exist: {data_file}").into());
    }
    log::info!("Reading from data file: {data_file}");
    let json = std::fs::read_to_string(data_file)
        .map_err(|e| format!("Error reading data file {data_file}: {e}"))?;

    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let data: Data = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        format!(
            "Error parsing data file {data_file}: path={} error={}",
            e.path(),
            e
        )
    })?;

    log::info!(
        "Loaded {} prefixes, {} ip addresses, {} ip ranges",
        data.prefixes.len(),
        data.ip_addresses.len(),
        data.ip_ranges.len()
    );
    Ok(data)
}

/// In-memory store over [`Data`].
#[derive(Debug, Default, Clone)]
pub struct JsonStore {
    data: Data,
}

impl JsonStore {
    pub fn open(data_file: &str) -> Result<JsonStore, Box<dyn Error>> {
        Ok(JsonStore {
            data: read_data_file(data_file)?,
        })
    }

    pub fn from_data(data: Data) -> JsonStore {
        JsonStore { data }
    }

    pub fn data(&self) -> &Data {
        &self.data
    }
}

impl PrefixStore for JsonStore {
    fn prefixes(&self, scope: &Scope, within: Option<Block>) -> Result<Vec<Prefix>, Box<dyn Error>> {
        Ok(self
            .data
            .prefixes
            .iter()
            .filter(|p| &p.vrf == scope)
            .filter(|p| within.map_or(true, |w| w.strictly_contains(&p.prefix)))
            .cloned()
            .collect())
    }

    fn ip_addresses(
        &self,
        scope: &Scope,
        within: Option<Block>,
    ) -> Result<Vec<IpAddress>, Box<dyn Error>> {
        Ok(self
            .data
            .ip_addresses
            .iter()
            .filter(|a| &a.vrf == scope)
            .filter(|a| within.map_or(true, |w| w.contains_addr(a.address)))
            .cloned()
            .collect())
    }

    fn ip_ranges(&self, scope: &Scope) -> Result<Vec<IpRange>, Box<dyn Error>> {
        Ok(self
            .data
            .ip_ranges
            .iter()
            .filter(|r| &r.vrf == scope)
            .cloned()
            .collect())
    }

    fn prefix_by_block(&self, scope: &Scope, block: Block) -> Result<Option<Prefix>, Box<dyn Error>> {
        Ok(self
            .data
            .prefixes
            .iter()
            .filter(|p| &p.vrf == scope && p.prefix == block)
            .min_by_key(|p| p.id)
            .cloned())
    }
}
