//! Hierarchical prefix table.
//!
//! Turns the stored prefixes of one scope into display rows: stored prefixes
//! in depth-first order with depth and utilization, interleaved with
//! synthetic "available" rows for the unallocated space.

use super::gap_finder::{available_blocks, AvailableBlocks};
use super::hierarchy::{build_hierarchy, sort_prefixes, Node};
use super::scope::check_scope;
use super::Utilization;
use crate::error::TableError;
use crate::models::{Block, Prefix, Scope};

/// Synthetic row for unallocated space. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailableRow<'t> {
    pub block: Block,
    pub scope: &'t Scope,
    pub depth: usize,
}

/// One row of a prefix table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRow<'t> {
    Prefix(Node<'t>),
    Available(AvailableRow<'t>),
}

impl<'t> TableRow<'t> {
    pub fn block(&self) -> Block {
        match self {
            TableRow::Prefix(node) => node.prefix.prefix,
            TableRow::Available(row) => row.block,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            TableRow::Prefix(node) => node.depth,
            TableRow::Available(row) => row.depth,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, TableRow::Available(_))
    }

    /// The stored prefix, `None` for available rows.
    pub fn prefix(&self) -> Option<&'t Prefix> {
        match self {
            TableRow::Prefix(node) => Some(node.prefix),
            TableRow::Available(_) => None,
        }
    }

    /// Utilization of a stored prefix; available rows have none.
    pub fn utilization(&self) -> Option<Utilization> {
        match self {
            TableRow::Prefix(node) => Some(node.utilization),
            TableRow::Available(_) => None,
        }
    }
}

/// Builds a [`PrefixTable`] for one scope over a universe block.
///
/// The universe is the parent prefix when listing the descendants of a single
/// prefix, or the whole (or a requested part of the) address space for a
/// top-level listing.
#[derive(Debug, Clone)]
pub struct PrefixTableBuilder {
    scope: Scope,
    universe: Block,
    nested_gaps: bool,
}

impl PrefixTableBuilder {
    pub fn new(scope: Scope, universe: Block) -> PrefixTableBuilder {
        PrefixTableBuilder {
            scope,
            universe,
            nested_gaps: true,
        }
    }

    /// Also show free space inside stored prefixes that have children (default on).
    ///
    /// When off, only the free space of the universe itself is listed.
    pub fn nested_gaps(mut self, enabled: bool) -> PrefixTableBuilder {
        self.nested_gaps = enabled;
        self
    }

    /// Build the table from stored prefixes in any order.
    ///
    /// Fails with [`TableError::InvalidScope`] if a prefix is not in the
    /// builder's scope, and with [`TableError::Overflow`] if a prefix's
    /// capacity does not fit in 128 bits. Prefixes outside the universe are
    /// left out.
    pub fn build<'a, I>(&self, prefixes: I) -> Result<PrefixTable<'a>, TableError>
    where
        I: IntoIterator<Item = &'a Prefix>,
    {
        let prefixes: Vec<&Prefix> = prefixes.into_iter().collect();
        check_scope(&self.scope, prefixes.iter().copied())?;

        let total = prefixes.len();
        let inside = prefixes.into_iter().filter(|p| {
            let inside = self.universe.contains(&p.prefix);
            if !inside {
                log::debug!("Leaving out prefix {} outside universe {}", p.prefix, self.universe);
            }
            inside
        });
        let sorted = sort_prefixes(inside);
        if sorted.len() < total {
            log::debug!(
                "{} of {} prefixes in scope '{}' are outside {}",
                total - sorted.len(),
                total,
                self.scope,
                self.universe
            );
        }

        let nodes = build_hierarchy(&sorted)?;
        log::debug!(
            "Built prefix table for '{}' over {} with {} prefixes",
            self.scope,
            self.universe,
            nodes.len()
        );

        Ok(PrefixTable {
            scope: self.scope.clone(),
            universe: self.universe,
            nested_gaps: self.nested_gaps,
            nodes,
        })
    }
}

/// Stored prefixes of one scope, ready to be listed.
///
/// Rows are produced lazily by [`PrefixTable::rows`]; every call starts a
/// fresh walk, so the table can be listed any number of times.
#[derive(Debug, Clone)]
pub struct PrefixTable<'a> {
    scope: Scope,
    universe: Block,
    nested_gaps: bool,
    nodes: Vec<Node<'a>>,
}

impl<'a> PrefixTable<'a> {
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn universe(&self) -> Block {
        self.universe
    }

    /// Stored prefixes in display order.
    pub fn nodes(&self) -> &[Node<'a>] {
        &self.nodes
    }

    /// Number of stored prefixes in the table.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn rows(&self) -> Rows<'_, 'a> {
        Rows {
            table: self,
            index: 0,
            frames: vec![Frame::new(self.universe, 0, true)],
            pending: None,
        }
    }
}

impl<'t, 'a> IntoIterator for &'t PrefixTable<'a> {
    type Item = TableRow<'t>;
    type IntoIter = Rows<'t, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}

/// A block whose free space is still being walked.
#[derive(Debug, Clone)]
struct Frame {
    block: Block,
    /// First address not yet listed; `None` once the end of the address space is passed.
    cursor: Option<u128>,
    gap_depth: usize,
    emit_gaps: bool,
}

impl Frame {
    fn new(block: Block, gap_depth: usize, emit_gaps: bool) -> Frame {
        Frame {
            block,
            cursor: Some(block.lo()),
            gap_depth,
            emit_gaps,
        }
    }

    /// Free space between the cursor and `next`, moving the cursor up to `next`.
    fn gap_before(&mut self, next: Block) -> Option<(AvailableBlocks, usize)> {
        let cursor = self.cursor.filter(|_| self.emit_gaps)?;
        if cursor >= next.lo() {
            return None;
        }
        self.cursor = Some(next.lo());
        Some((
            available_blocks(self.block.family(), cursor, next.lo() - 1),
            self.gap_depth,
        ))
    }

    fn advance_past(&mut self, listed: Block) {
        if let Some(cursor) = self.cursor {
            if cursor <= listed.hi() {
                self.cursor = listed.hi().checked_add(1);
            }
        }
    }

    /// Free space between the cursor and the end of the block.
    fn trailing_gap(&self) -> Option<(AvailableBlocks, usize)> {
        let cursor = self.cursor.filter(|_| self.emit_gaps)?;
        if cursor > self.block.hi() {
            return None;
        }
        Some((
            available_blocks(self.block.family(), cursor, self.block.hi()),
            self.gap_depth,
        ))
    }
}

/// Lazy depth-first walk over a [`PrefixTable`].
#[derive(Debug, Clone)]
pub struct Rows<'t, 'a> {
    table: &'t PrefixTable<'a>,
    index: usize,
    frames: Vec<Frame>,
    pending: Option<(AvailableBlocks, usize)>,
}

impl<'t, 'a> Iterator for Rows<'t, 'a> {
    type Item = TableRow<'t>;

    fn next(&mut self) -> Option<TableRow<'t>> {
        loop {
            if let Some((blocks, depth)) = self.pending.as_mut() {
                if let Some(block) = blocks.next() {
                    return Some(TableRow::Available(AvailableRow {
                        block,
                        scope: &self.table.scope,
                        depth: *depth,
                    }));
                }
                self.pending = None;
            }

            let table = self.table;
            let frame_block = self.frames.last()?.block;
            let node = match table.nodes.get(self.index) {
                Some(node) if frame_block.contains(&node.prefix.prefix) => node,
                _ => {
                    // Nothing more inside this block: list what is left of it and close it.
                    if let Some(frame) = self.frames.pop() {
                        self.pending = frame.trailing_gap();
                    }
                    continue;
                }
            };

            let block = node.prefix.prefix;
            if let Some(frame) = self.frames.last_mut() {
                if let Some(gap) = frame.gap_before(block) {
                    self.pending = Some(gap);
                    continue;
                }
                frame.advance_past(block);
            }

            self.index += 1;
            if let Some(next) = table.nodes.get(self.index) {
                if block.strictly_contains(&next.prefix.prefix) {
                    self.frames.push(Frame::new(block, next.depth, table.nested_gaps));
                }
            }
            return Some(TableRow::Prefix(node.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AddressFamily;
    use std::collections::BTreeSet;

    fn prefix(id: u64, cidr: &str) -> Prefix {
        Prefix::new(id, Block::new(cidr).unwrap(), Scope::Global)
    }

    fn listing(table: &PrefixTable) -> Vec<(String, usize, bool)> {
        table
            .rows()
            .map(|row| (row.block().to_string(), row.depth(), row.is_available()))
            .collect()
    }

    #[test]
    fn test_single_prefix_in_slash_8() {
        let prefixes = vec![prefix(1, "10.0.0.0/24")];
        let table = PrefixTableBuilder::new(Scope::Global, Block::new("10.0.0.0/8").unwrap())
            .build(&prefixes)
            .unwrap();
        let rows: Vec<TableRow> = table.rows().collect();

        assert_eq!(rows.len(), 17);
        assert_eq!(rows[0].block().to_string(), "10.0.0.0/24");
        assert_eq!(rows[0].depth(), 0);
        assert_eq!(rows[0].utilization().unwrap().percent, 0.0);
        assert!(rows[1..].iter().all(|r| r.is_available() && r.depth() == 0));
        assert!(rows[1..].iter().all(|r| r.utilization().is_none()));
        assert_eq!(rows[1].block().to_string(), "10.0.1.0/24");
        assert_eq!(rows[2].block().to_string(), "10.0.2.0/23");
        assert_eq!(rows[3].block().to_string(), "10.0.4.0/22");
        assert_eq!(rows[16].block().to_string(), "10.128.0.0/9");
    }

    #[test]
    fn test_child_and_nested_gap() {
        let prefixes = vec![prefix(2, "192.168.0.0/25"), prefix(1, "192.168.0.0/24")];
        let table = PrefixTableBuilder::new(Scope::Global, Block::new("192.168.0.0/24").unwrap())
            .build(&prefixes)
            .unwrap();
        let rows: Vec<TableRow> = table.rows().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].prefix().unwrap().id, 1);
        assert_eq!(rows[0].utilization().unwrap().percent, 50.0);
        assert_eq!(rows[1].prefix().unwrap().id, 2);
        assert_eq!(rows[1].depth(), 1);
        assert!(rows[2].is_available());
        assert_eq!(rows[2].block().to_string(), "192.168.0.128/25");
        assert_eq!(rows[2].depth(), 1);
    }

    #[test]
    fn test_without_nested_gaps() {
        let prefixes = vec![prefix(1, "192.168.0.0/24"), prefix(2, "192.168.0.0/25")];
        let table = PrefixTableBuilder::new(Scope::Global, Block::new("192.168.0.0/23").unwrap())
            .nested_gaps(false)
            .build(&prefixes)
            .unwrap();
        assert_eq!(
            listing(&table),
            vec![
                ("192.168.0.0/24".to_string(), 0, false),
                ("192.168.0.0/25".to_string(), 1, false),
                ("192.168.1.0/24".to_string(), 0, true),
            ]
        );
    }

    #[test]
    fn test_preorder_with_gaps_between_siblings() {
        let prefixes = vec![
            prefix(4, "10.0.3.0/24"),
            prefix(1, "10.0.0.0/22"),
            prefix(3, "10.0.1.0/24"),
            prefix(2, "10.0.0.0/24"),
            prefix(5, "10.0.1.0/26"),
        ];
        let table = PrefixTableBuilder::new(Scope::Global, Block::new("10.0.0.0/21").unwrap())
            .build(&prefixes)
            .unwrap();
        assert_eq!(
            listing(&table),
            vec![
                ("10.0.0.0/22".to_string(), 0, false),
                ("10.0.0.0/24".to_string(), 1, false),
                ("10.0.1.0/24".to_string(), 1, false),
                ("10.0.1.0/26".to_string(), 2, false),
                ("10.0.1.64/26".to_string(), 2, true),
                ("10.0.1.128/25".to_string(), 2, true),
                ("10.0.2.0/24".to_string(), 1, true),
                ("10.0.3.0/24".to_string(), 1, false),
                ("10.0.4.0/22".to_string(), 0, true),
            ]
        );
    }

    #[test]
    fn test_rows_restartable() {
        let prefixes = vec![prefix(1, "10.0.0.0/25")];
        let table = PrefixTableBuilder::new(Scope::Global, Block::new("10.0.0.0/24").unwrap())
            .build(&prefixes)
            .unwrap();
        let first: Vec<TableRow> = table.rows().collect();
        let second: Vec<TableRow> = (&table).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_equal_blocks_are_siblings() {
        let prefixes = vec![prefix(1, "10.0.0.0/24"), prefix(2, "10.0.0.0/24")];
        let table = PrefixTableBuilder::new(Scope::Global, Block::new("10.0.0.0/24").unwrap())
            .build(&prefixes)
            .unwrap();
        let rows: Vec<TableRow> = table.rows().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| !r.is_available() && r.depth() == 0));
    }

    #[test]
    fn test_empty_universe_is_one_gap() {
        let prefixes: Vec<Prefix> = vec![];
        let table = PrefixTableBuilder::new(Scope::Global, Block::full(AddressFamily::V6))
            .build(&prefixes)
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(listing(&table), vec![("::/0".to_string(), 0, true)]);
    }

    #[test]
    fn test_outside_universe_left_out() {
        let prefixes = vec![
            prefix(1, "10.0.0.0/24"),
            prefix(2, "172.16.0.0/12"),
            prefix(3, "2001:db8::/32"),
            prefix(4, "10.0.0.0/8"),
        ];
        let table = PrefixTableBuilder::new(Scope::Global, Block::new("10.0.0.0/23").unwrap())
            .build(&prefixes)
            .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            listing(&table),
            vec![
                ("10.0.0.0/24".to_string(), 0, false),
                ("10.0.1.0/24".to_string(), 0, true),
            ]
        );
    }

    #[test]
    fn test_invalid_scope() {
        let mut other = prefix(2, "10.0.1.0/24");
        other.vrf = Scope::Vrf("red".to_string());
        let prefixes = vec![prefix(1, "10.0.0.0/24"), other];
        let result = PrefixTableBuilder::new(Scope::Global, Block::new("10.0.0.0/8").unwrap())
            .build(&prefixes);
        assert!(matches!(result, Err(TableError::InvalidScope { .. })));
    }

    #[test]
    fn test_overflow_for_full_v6_prefix() {
        let prefixes = vec![prefix(1, "::/0")];
        let result = PrefixTableBuilder::new(Scope::Global, Block::new("::/0").unwrap())
            .build(&prefixes);
        assert!(matches!(result, Err(TableError::Overflow(_))));
    }

    #[test]
    fn test_top_of_address_space() {
        let prefixes = vec![prefix(1, "255.255.255.0/24")];
        let table = PrefixTableBuilder::new(Scope::Global, Block::new("255.255.254.0/23").unwrap())
            .build(&prefixes)
            .unwrap();
        assert_eq!(
            listing(&table),
            vec![
                ("255.255.254.0/24".to_string(), 0, true),
                ("255.255.255.0/24".to_string(), 0, false),
            ]
        );
    }

    /// Small xorshift generator so generated tables are the same on every run.
    struct XorShift(u64);

    impl XorShift {
        fn next_u64(&mut self) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0
        }

        fn below(&mut self, n: u64) -> u64 {
            self.next_u64() % n
        }
    }

    /// Distinct blocks strictly inside `universe`, at most `depth` bits longer.
    fn generate_prefixes(rng: &mut XorShift, universe: Block, depth: u8, count: usize) -> Vec<Prefix> {
        let mut blocks = BTreeSet::new();
        while blocks.len() < count {
            let len = universe.prefix_len() + 1 + rng.below(depth as u64) as u8;
            let host = (((rng.next_u64() as u128) << 64) | rng.next_u64() as u128) & (universe.hi() - universe.lo());
            blocks.insert(Block::from_bits(universe.family(), universe.lo() | host, len).unwrap());
        }
        blocks
            .into_iter()
            .enumerate()
            .map(|(i, block)| Prefix::new(i as u64 + 1, block, Scope::Global))
            .collect()
    }

    /// Assert that `blocks` cover `parent` in address order with no overlap and no hole.
    fn assert_tiles(parent: Block, blocks: &[Block]) {
        let mut next = parent.lo();
        for block in blocks {
            assert_eq!(block.lo(), next, "{block} does not start where the previous block ended in {parent}");
            next = block.hi() + 1;
        }
        assert_eq!(next, parent.hi() + 1, "{parent} is not fully covered");
    }

    fn check_generated_table(universe: Block, depth: u8, seed: u64) {
        let mut rng = XorShift(seed);
        for _ in 0..50 {
            let count = 1 + rng.below(40) as usize;
            let mut prefixes = generate_prefixes(&mut rng, universe, depth, count);
            // Input order must not matter.
            prefixes.reverse();
            let table = PrefixTableBuilder::new(Scope::Global, universe)
                .build(&prefixes)
                .unwrap();
            let rows: Vec<TableRow> = table.rows().collect();

            let listed: BTreeSet<u64> = rows.iter().filter_map(|r| r.prefix()).map(|p| p.id).collect();
            let input: BTreeSet<u64> = prefixes.iter().map(|p| p.id).collect();
            assert_eq!(listed, input);
            assert_eq!(rows.iter().filter(|r| !r.is_available()).count(), prefixes.len());

            let top: Vec<Block> = rows.iter().filter(|r| r.depth() == 0).map(|r| r.block()).collect();
            assert_tiles(universe, &top);

            for (i, row) in rows.iter().enumerate() {
                let Some(stored) = row.prefix() else { continue };
                let ancestors = prefixes
                    .iter()
                    .filter(|p| p.prefix.strictly_contains(&stored.prefix))
                    .count();
                assert_eq!(row.depth(), ancestors, "depth of {}", stored.prefix);

                let children: Vec<Block> = rows[i + 1..]
                    .iter()
                    .take_while(|r| r.depth() > row.depth())
                    .filter(|r| r.depth() == row.depth() + 1)
                    .map(|r| r.block())
                    .collect();
                if !children.is_empty() {
                    assert_tiles(stored.prefix, &children);
                }
            }
        }
    }

    #[test]
    fn test_generated_v4_tables() {
        check_generated_table(Block::new("10.0.0.0/16").unwrap(), 12, 0x9e37_79b9_7f4a_7c15);
    }

    #[test]
    fn test_generated_v6_tables() {
        check_generated_table(Block::new("2001:db8::/32").unwrap(), 24, 0x2545_f491_4f6c_dd1d);
    }
}
