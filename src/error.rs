//! Errors raised by the prefix table core.

use crate::models::{Block, Scope};
use thiserror::Error;

/// Failure while parsing blocks or building a prefix table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A prefix handed to the builder belongs to a different scope than the table.
    #[error("prefix {prefix} is in scope '{found}', table scope is '{expected}'")]
    InvalidScope {
        expected: Scope,
        found: Scope,
        prefix: Block,
    },
    /// The address capacity of a block does not fit in 128 bits.
    #[error("capacity of {0} cannot be represented in 128 bits")]
    Overflow(Block),
    /// Text that is not a valid `address/length` block.
    #[error("invalid block '{input}': {reason}")]
    InvalidBlock { input: String, reason: String },
    /// An IP range whose bounds are reversed or mix address families.
    #[error("invalid range {start} - {end}: {reason}")]
    InvalidRange {
        start: String,
        end: String,
        reason: String,
    },
}

impl TableError {
    pub(crate) fn invalid_block(input: impl ToString, reason: impl ToString) -> Self {
        TableError::InvalidBlock {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let block = Block::new("10.0.0.0/24").unwrap();
        let err = TableError::InvalidScope {
            expected: Scope::Global,
            found: Scope::Vrf("red".to_string()),
            prefix: block,
        };
        assert_eq!(
            err.to_string(),
            "prefix 10.0.0.0/24 is in scope 'red', table scope is 'Global'"
        );

        let err = TableError::Overflow(Block::new("::/0").unwrap());
        assert_eq!(err.to_string(), "capacity of ::/0 cannot be represented in 128 bits");

        let err = TableError::invalid_block("10.0.0.0", "missing prefix length");
        assert_eq!(
            err.to_string(),
            "invalid block '10.0.0.0': missing prefix length"
        );
    }
}
