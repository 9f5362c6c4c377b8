//! Domain models for the prefix table.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Block`] - aligned IP block with 128-bit address arithmetic
//! - [`Scope`] - VRF or global routing domain
//! - [`Prefix`] - stored IP prefix
//! - [`IpRange`] and [`IpAddress`] - stored ranges and host addresses

mod block;
mod ip_address;
mod ip_range;
mod prefix;
mod scope;

// Re-export public types
pub use block::{
    broadcast_addr, cut_addr, from_bits, get_cidr_mask, lo_mask, next_block, to_bits,
    AddressFamily, Block,
};
pub use ip_address::IpAddress;
pub use ip_range::IpRange;
pub use prefix::{Prefix, PrefixStatus};
pub use scope::Scope;
