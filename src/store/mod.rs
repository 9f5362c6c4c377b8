//! Data access for stored inventory records.
//!
//! This module holds the collaborators upstream of the table builder:
//! - [`PrefixStore`] - query interface returning value records
//! - [`json`] - JSON file implementation
//! - [`permissions`] - permission filter applied before building tables

mod json;
mod permissions;

use crate::models::{Block, IpAddress, IpRange, Prefix, Scope};
use std::error::Error;

pub use json::{read_data_file, Data, JsonStore};
pub use permissions::{authorize, Permissions, Restricted};

/// Query interface over stored prefixes, addresses and ranges.
///
/// Results come back in no particular order and are not permission filtered.
pub trait PrefixStore {
    /// Prefixes in `scope`, limited to those strictly inside `within` when given.
    fn prefixes(&self, scope: &Scope, within: Option<Block>) -> Result<Vec<Prefix>, Box<dyn Error>>;

    /// Addresses in `scope`, limited to those inside `within` when given.
    fn ip_addresses(
        &self,
        scope: &Scope,
        within: Option<Block>,
    ) -> Result<Vec<IpAddress>, Box<dyn Error>>;

    fn ip_ranges(&self, scope: &Scope) -> Result<Vec<IpRange>, Box<dyn Error>>;

    /// The stored prefix with exactly this block, if any; the lowest id wins.
    ///
    /// The default fetches and clones every prefix in `scope`. Stores that can
    /// look up a single block should override it.
    fn prefix_by_block(&self, scope: &Scope, block: Block) -> Result<Option<Prefix>, Box<dyn Error>> {
        Ok(self
            .prefixes(scope, None)?
            .into_iter()
            .filter(|p| p.prefix == block)
            .min_by_key(|p| p.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_by_block() {
        let mut data = Data::default();
        for (id, cidr) in [(5, "10.0.0.0/24"), (2, "10.0.0.0/24"), (3, "10.0.0.0/16")] {
            data.prefixes
                .push(Prefix::new(id, Block::new(cidr).unwrap(), Scope::Global));
        }
        let store = JsonStore::from_data(data);
        let block = Block::new("10.0.0.0/24").unwrap();

        let found = store.prefix_by_block(&Scope::Global, block).unwrap();
        assert_eq!(found.map(|p| p.id), Some(2));
        let missing = store
            .prefix_by_block(&Scope::Vrf("red".to_string()), block)
            .unwrap();
        assert!(missing.is_none());
    }

    /// Store that only answers prefix queries, so lookups go through the trait default.
    struct PrefixList(Vec<Prefix>);

    impl PrefixStore for PrefixList {
        fn prefixes(&self, scope: &Scope, _within: Option<Block>) -> Result<Vec<Prefix>, Box<dyn Error>> {
            Ok(self.0.iter().filter(|p| &p.vrf == scope).cloned().collect())
        }

        fn ip_addresses(&self, _scope: &Scope, _within: Option<Block>) -> Result<Vec<IpAddress>, Box<dyn Error>> {
            Ok(vec![])
        }

        fn ip_ranges(&self, _scope: &Scope) -> Result<Vec<IpRange>, Box<dyn Error>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_default_prefix_by_block() {
        let store = PrefixList(vec![
            Prefix::new(7, Block::new("10.0.0.0/24").unwrap(), Scope::Global),
            Prefix::new(4, Block::new("10.0.0.0/24").unwrap(), Scope::Global),
        ]);
        let block = Block::new("10.0.0.0/24").unwrap();
        assert_eq!(store.prefix_by_block(&Scope::Global, block).unwrap().map(|p| p.id), Some(4));
        assert!(store
            .prefix_by_block(&Scope::Global, Block::new("10.0.0.0/25").unwrap())
            .unwrap()
            .is_none());
    }
}
