//! Nesting of prefixes within one scope.
//!
//! Computes, for every stored prefix, how deep it is nested, how many stored
//! prefixes sit below it, and how much of it is covered by its direct children.

use super::Utilization;
use crate::error::TableError;
use crate::models::{Block, Prefix};

/// A stored prefix annotated with its place in the hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<'a> {
    pub prefix: &'a Prefix,
    /// Number of other stored prefixes that strictly contain this one.
    pub depth: usize,
    /// Number of stored prefixes strictly contained in this one.
    pub children: usize,
    pub utilization: Utilization,
}

/// Annotate prefixes already sorted by block (see [`sort_prefixes`]).
///
/// Blocks that are equal are siblings: neither counts as the other's ancestor,
/// and a shared child counts toward the utilization of each copy.
pub fn build_hierarchy<'a>(sorted: &[&'a Prefix]) -> Result<Vec<Node<'a>>, TableError> {
    let count = sorted.len();
    let mut depths = vec![0usize; count];
    let mut descendants = vec![0usize; count];
    let mut covered = vec![0u128; count];
    let mut last_child: Vec<Option<Block>> = vec![None; count];

    // Chain of prefixes containing the current one, outermost first.
    let mut stack: Vec<usize> = Vec::new();

    for (i, prefix) in sorted.iter().enumerate() {
        let block = prefix.prefix;
        while let Some(&top) = stack.last() {
            if sorted[top].prefix.contains(&block) {
                break;
            }
            stack.pop();
        }

        let ancestors: Vec<usize> = stack
            .iter()
            .copied()
            .filter(|&a| sorted[a].prefix.prefix_len() < block.prefix_len())
            .collect();
        depths[i] = ancestors.len();
        for &a in &ancestors {
            descendants[a] += 1;
        }

        // The direct parent is the innermost ancestor; equal copies of it all count.
        if let Some(parent_len) = ancestors.iter().map(|&a| sorted[a].prefix.prefix_len()).max() {
            let size = block.size()?;
            for &a in ancestors.iter().filter(|&&a| sorted[a].prefix.prefix_len() == parent_len) {
                if last_child[a] != Some(block) {
                    covered[a] = covered[a].saturating_add(size);
                    last_child[a] = Some(block);
                }
            }
        }

        stack.push(i);
    }

    sorted
        .iter()
        .enumerate()
        .map(|(i, &prefix)| {
            let capacity = prefix.prefix.size()?;
            Ok(Node {
                prefix,
                depth: depths[i],
                children: descendants[i],
                utilization: Utilization::compute(covered[i], capacity, prefix.mark_utilized),
            })
        })
        .collect()
}

/// Sort prefixes by block (address, then larger blocks first), then by id.
///
/// The result is a depth-first pre-order walk of the hierarchy.
pub fn sort_prefixes<'a>(prefixes: impl IntoIterator<Item = &'a Prefix>) -> Vec<&'a Prefix> {
    let mut sorted: Vec<&Prefix> = prefixes.into_iter().collect();
    sorted.sort_by_key(|p| (p.prefix, p.id));
    sorted
}
