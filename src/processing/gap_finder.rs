//! Gap finding between prefixes.
//!
//! Splits unallocated address spans into the fewest aligned blocks, taking the
//! biggest block that fits at each step.

use crate::models::{lo_mask, AddressFamily, Block};

/// Find the biggest block that starts at `start_ip` and ends at or before `end_ip`.
///
/// The returned block is constrained by:
/// 1. The alignment of `start_ip` - it must be a valid network address for the block
/// 2. The span - the block must not reach past `end_ip`
///
/// `start_ip <= end_ip` and both must be valid addresses for `family`.
pub fn find_biggest_block(family: AddressFamily, start_ip: u128, end_ip: u128) -> Block {
    debug_assert!(
        start_ip <= end_ip,
        "start_ip[{start_ip}] > end_ip[{end_ip}] should never happen."
    );
    let width = family.max_length();

    // Alignment: the block cannot be larger than the trailing zeros of start_ip allow.
    let min_len_for_alignment = lo_mask(family, start_ip);

    // Span: largest power of two not exceeding end_ip - start_ip + 1.
    let span_minus_one = end_ip - start_ip;
    let span_host_bits = match span_minus_one.checked_add(1) {
        Some(span) => 127 - span.leading_zeros(),
        None => 128,
    };
    let min_len_for_span = width.saturating_sub(span_host_bits.min(width as u32) as u8);

    let len = min_len_for_alignment.max(min_len_for_span);
    // Aligned by construction, so from_bits cannot clear any bits here.
    Block::from_bits(family, start_ip, len).unwrap_or_else(|_| Block::full(family))
}

/// Iterator over the aligned blocks exactly covering an address span.
#[derive(Debug, Clone)]
pub struct AvailableBlocks {
    family: AddressFamily,
    next_ip: Option<u128>,
    end_ip: u128,
}

impl Iterator for AvailableBlocks {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        let start_ip = self.next_ip.filter(|ip| *ip <= self.end_ip)?;
        let block = find_biggest_block(self.family, start_ip, self.end_ip);
        self.next_ip = block.hi().checked_add(1);
        Some(block)
    }
}

/// Decompose the inclusive span `start_ip..=end_ip` into aligned blocks.
///
/// An empty iterator is returned when `start_ip > end_ip`.
pub fn available_blocks(family: AddressFamily, start_ip: u128, end_ip: u128) -> AvailableBlocks {
    AvailableBlocks {
        family,
        next_ip: Some(start_ip),
        end_ip,
    }
}
