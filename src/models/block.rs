//! IP block (CIDR) arithmetic for both address families.
//!
//! Provides [`Block`] for representing an aligned `address/length` block,
//! along with utility functions for block calculations. All address
//! arithmetic is done on `u128` so IPv4 and IPv6 share one code path.

use crate::error::TableError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// IP address family of a block or address.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Maximum prefix length (address width in bits).
    pub fn max_length(self) -> u8 {
        match self {
            AddressFamily::V4 => 32,
            AddressFamily::V6 => 128,
        }
    }

    /// Highest address of the family as `u128`.
    pub fn max_addr(self) -> u128 {
        match self {
            AddressFamily::V4 => u32::MAX as u128,
            AddressFamily::V6 => u128::MAX,
        }
    }

    /// Family of an address.
    pub fn of(addr: &IpAddr) -> AddressFamily {
        match addr {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "IPv4"),
            AddressFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// Convert an address to its family and integer value.
pub fn to_bits(addr: IpAddr) -> (AddressFamily, u128) {
    match addr {
        IpAddr::V4(v4) => (AddressFamily::V4, u32::from(v4) as u128),
        IpAddr::V6(v6) => (AddressFamily::V6, u128::from(v6)),
    }
}

/// Convert an integer value back to an address of the given family.
///
/// IPv4 values are truncated to 32 bits.
pub fn from_bits(family: AddressFamily, bits: u128) -> IpAddr {
    match family {
        AddressFamily::V4 => IpAddr::V4(Ipv4Addr::from(bits as u32)),
        AddressFamily::V6 => IpAddr::V6(Ipv6Addr::from(bits)),
    }
}

/// Mask of the host bits below a prefix of length `len`.
fn host_mask(family: AddressFamily, len: u8) -> u128 {
    let host_len = (family.max_length() - len) as u32;
    if host_len >= 128 {
        u128::MAX
    } else {
        (1u128 << host_len) - 1
    }
}

fn check_length(family: AddressFamily, len: u8) -> Result<(), TableError> {
    if len > family.max_length() {
        Err(TableError::invalid_block(
            format!("/{len}"),
            format!("length exceeds {} for {family}", family.max_length()),
        ))
    } else {
        Ok(())
    }
}

/// Convert a prefix length to a network mask for the family.
///
/// # Examples
/// ```
/// use prefix_table::models::{get_cidr_mask, AddressFamily};
/// assert_eq!(get_cidr_mask(AddressFamily::V4, 24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(family: AddressFamily, len: u8) -> Result<u128, TableError> {
    check_length(family, len)?;
    Ok(family.max_addr() & !host_mask(family, len))
}

/// Get the network address for a given address and prefix length.
pub fn cut_addr(family: AddressFamily, bits: u128, len: u8) -> Result<u128, TableError> {
    Ok(bits & get_cidr_mask(family, len)?)
}

/// Calculate the broadcast (highest) address for a given address and prefix length.
pub fn broadcast_addr(family: AddressFamily, bits: u128, len: u8) -> Result<u128, TableError> {
    check_length(family, len)?;
    Ok(cut_addr(family, bits, len)? | host_mask(family, len))
}

/// Shortest prefix length that `bits` is a valid network address for.
pub fn lo_mask(family: AddressFamily, bits: u128) -> u8 {
    let width = family.max_length() as u32;
    let trailing_zeros = bits.trailing_zeros().min(width);
    (width - trailing_zeros) as u8
}

/// Calculate the block following `block`.
///
/// If `len` is provided, the next block uses that length. Returns `None` when
/// the end of the address family is reached.
pub fn next_block(block: Block, len: Option<u8>) -> Option<Block> {
    let new_len = len.unwrap_or(block.len);
    if new_len > block.family.max_length() {
        return None;
    }
    // Step past whichever of the two blocks ends later.
    let end = if new_len <= block.len {
        block.bits | host_mask(block.family, new_len)
    } else {
        block.hi()
    };
    let next = end.checked_add(1)?;
    if next > block.family.max_addr() {
        return None;
    }
    Some(Block {
        family: block.family,
        bits: next & !host_mask(block.family, new_len),
        len: new_len,
    })
}

/// An aligned IP block: network address plus prefix length.
///
/// Host bits are always zero, so two blocks are equal exactly when they cover
/// the same addresses. Ordering is by family, then network address, then
/// prefix length (larger blocks first).
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Block {
    family: AddressFamily,
    bits: u128,
    len: u8,
}

impl Block {
    /// Create a new [`Block`] from a CIDR string (e.g. "10.0.0.0/24").
    ///
    /// Host bits are cleared, so "10.0.0.7/24" gives 10.0.0.0/24.
    pub fn new(addr_cidr: &str) -> Result<Block, TableError> {
        let addr_cidr = addr_cidr.trim();
        let (addr, len) = addr_cidr
            .split_once('/')
            .ok_or_else(|| TableError::invalid_block(addr_cidr, "missing prefix length"))?;
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| TableError::invalid_block(addr_cidr, format!("invalid address {addr}")))?;
        let len: u8 = len
            .parse()
            .map_err(|_| TableError::invalid_block(addr_cidr, format!("invalid length {len}")))?;
        Block::from_addr(addr, len)
    }

    /// Create a block from an address and prefix length.
    pub fn from_addr(addr: IpAddr, len: u8) -> Result<Block, TableError> {
        let (family, bits) = to_bits(addr);
        Block::from_bits(family, bits, len)
    }

    /// Create a block from an integer address and prefix length.
    pub fn from_bits(family: AddressFamily, bits: u128, len: u8) -> Result<Block, TableError> {
        if bits > family.max_addr() {
            return Err(TableError::invalid_block(
                bits,
                format!("address out of range for {family}"),
            ));
        }
        Ok(Block {
            family,
            bits: cut_addr(family, bits, len)?,
            len,
        })
    }

    /// The whole address space of a family (`0.0.0.0/0` or `::/0`).
    pub fn full(family: AddressFamily) -> Block {
        Block {
            family,
            bits: 0,
            len: 0,
        }
    }

    /// A single-address block (/32 or /128).
    pub fn host(addr: IpAddr) -> Block {
        let (family, bits) = to_bits(addr);
        Block {
            family,
            bits,
            len: family.max_length(),
        }
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    /// Prefix length.
    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    /// Get the lowest (network) address of the block.
    pub fn lo(&self) -> u128 {
        self.bits
    }

    /// Get the highest (broadcast) address of the block.
    pub fn hi(&self) -> u128 {
        self.bits | host_mask(self.family, self.len)
    }

    pub fn network(&self) -> IpAddr {
        from_bits(self.family, self.lo())
    }

    pub fn broadcast(&self) -> IpAddr {
        from_bits(self.family, self.hi())
    }

    /// Number of addresses in the block.
    ///
    /// Fails with [`TableError::Overflow`] for `::/0`, whose 2^128 addresses
    /// do not fit in a `u128`.
    pub fn size(&self) -> Result<u128, TableError> {
        host_mask(self.family, self.len)
            .checked_add(1)
            .ok_or(TableError::Overflow(*self))
    }

    /// True if `other` lies within this block (equal blocks included).
    pub fn contains(&self, other: &Block) -> bool {
        self.family == other.family && self.len <= other.len && self.lo() <= other.lo() && other.hi() <= self.hi()
    }

    /// True if `other` lies within this block and is smaller.
    pub fn strictly_contains(&self, other: &Block) -> bool {
        self.len < other.len && self.contains(other)
    }

    /// True if the address lies within this block.
    pub fn contains_addr(&self, addr: IpAddr) -> bool {
        let (family, bits) = to_bits(addr);
        family == self.family && self.lo() <= bits && bits <= self.hi()
    }
}

impl FromStr for Block {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Block::new(s)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.len)
    }
}

impl Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Block, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Block::new(&s).map_err(de::Error::custom)
    }
}
