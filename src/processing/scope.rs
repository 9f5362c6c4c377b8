//! Single-scope precondition for table building.

use crate::error::TableError;
use crate::models::{Prefix, Scope};

/// Return an error for the first prefix that is not in `scope`.
pub fn check_scope<'a>(
    scope: &Scope,
    prefixes: impl IntoIterator<Item = &'a Prefix>,
) -> Result<(), TableError> {
    match prefixes.into_iter().find(|p| &p.vrf != scope) {
        Some(p) => Err(TableError::InvalidScope {
            expected: scope.clone(),
            found: p.vrf.clone(),
            prefix: p.prefix,
        }),
        None => Ok(()),
    }
}
