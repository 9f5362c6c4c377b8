//! Duplicate prefix detection.
//!
//! Storage is expected to keep blocks unique per scope. Duplicates that slip
//! through are still listed (as siblings), but are reported here.

use crate::models::{Block, Prefix, Scope};
use itertools::Itertools;

/// A block stored more than once in the same scope.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateBlock {
    pub scope: Scope,
    pub block: Block,
    /// Ids of the prefixes sharing the block, ascending.
    pub ids: Vec<u64>,
}

/// Find blocks stored more than once within a scope.
pub fn find_duplicate_prefixes(prefixes: &[Prefix]) -> Vec<DuplicateBlock> {
    prefixes
        .iter()
        .into_group_map_by(|p| (p.vrf.clone(), p.prefix))
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .map(|((scope, block), group)| DuplicateBlock {
            scope,
            block,
            ids: group.iter().map(|p| p.id).sorted().collect(),
        })
        .sorted_by(|a, b| (&a.scope, a.block).cmp(&(&b.scope, b.block)))
        .collect()
}

/// Log duplicate blocks as warnings.
pub fn log_duplicate_prefixes(duplicates: &[DuplicateBlock]) {
    if duplicates.is_empty() {
        log::info!("No duplicate prefixes found.");
        return;
    }

    log::warn!("Found {} prefix block(s) stored more than once:", duplicates.len());
    for duplicate in duplicates {
        log::warn!(
            "  {} in '{}' is stored {} times (ids {:?})",
            duplicate.block,
            duplicate.scope,
            duplicate.ids.len(),
            duplicate.ids
        );
    }
}
