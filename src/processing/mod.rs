//! Prefix data processing logic.
//!
//! This module contains the computations behind the prefix views:
//! - [`table`] - hierarchical prefix table with available rows
//! - [`hierarchy`] - nesting depth, descendant counts and coverage
//! - [`gap_finder`] - aligned decomposition of free space
//! - [`utilization`] - utilization percentages and coloring levels
//! - [`available_ips`] - free host addresses within a prefix
//! - [`duplicates`] - duplicate block detection

mod available_ips;
mod duplicates;
mod gap_finder;
mod hierarchy;
mod scope;
mod table;
mod utilization;

// Re-export public types and functions
pub use available_ips::{add_available_ips, usable_bounds, AddressRow, MANY_THRESHOLD};
pub use duplicates::{find_duplicate_prefixes, log_duplicate_prefixes, DuplicateBlock};
pub use gap_finder::{available_blocks, find_biggest_block, AvailableBlocks};
pub use hierarchy::{build_hierarchy, sort_prefixes, Node};
pub use scope::check_scope;
pub use table::{AvailableRow, PrefixTable, PrefixTableBuilder, Rows, TableRow};
pub use utilization::{Thresholds, Utilization, UtilizationLevel};
