// cargo watch -x 'fmt' -x 'test'

pub mod config;
pub mod error;
pub mod filter;
pub mod menu;
pub mod models;
pub mod output;
pub mod processing;
pub mod store;

pub use error::TableError;

use config::{Config, OutputFormat};
use filter::PrefixFilter;
use itertools::Itertools;
use models::{Block, IpAddress, IpRange, Prefix};
use output::{format_address_row, format_range, render_table, CsvRenderer, RowRenderer, TerminalRenderer};
use processing::{add_available_ips, find_duplicate_prefixes, log_duplicate_prefixes, PrefixTable, PrefixTableBuilder};
use std::error::Error;
use std::io::Write;
use store::{authorize, Permissions, PrefixStore, Restricted};

/// Prefixes matching the filter that the user may view.
pub fn load_prefixes<S: PrefixStore + ?Sized>(
    store: &S,
    filter: &PrefixFilter,
    permissions: &Permissions,
) -> Result<Vec<Prefix>, Box<dyn Error>> {
    let prefixes = store.prefixes(&filter.scope, filter.within)?;
    log::info!("Store returned {} prefixes in '{}'", prefixes.len(), filter.scope);
    let prefixes = authorize(prefixes, permissions);
    filter.apply(prefixes)
}

/// Blocks to list: the `within` block, otherwise the whole address space of each family present.
pub fn table_universes(filter: &PrefixFilter, prefixes: &[Prefix]) -> Vec<Block> {
    match filter.within {
        Some(within) => vec![within],
        None => prefixes
            .iter()
            .map(|p| p.prefix.family())
            .unique()
            .sorted()
            .map(Block::full)
            .collect(),
    }
}

/// One table per universe, in universe order.
pub fn build_tables<'a>(
    filter: &PrefixFilter,
    nested_gaps: bool,
    prefixes: &'a [Prefix],
) -> Result<Vec<PrefixTable<'a>>, TableError> {
    table_universes(filter, prefixes)
        .into_iter()
        .map(|universe| {
            PrefixTableBuilder::new(filter.scope.clone(), universe)
                .nested_gaps(nested_gaps)
                .build(prefixes)
        })
        .collect()
}

/// Run the configured listing against `store` and write it to `out`.
///
/// Returns the number of table rows written. In terminal output, a `within`
/// filter naming a stored prefix also lists its addresses and ranges.
pub fn write_report<S, W>(store: &S, config: &Config, out: &mut W) -> Result<usize, Box<dyn Error>>
where
    S: PrefixStore + ?Sized,
    W: Write,
{
    log::info!("#Start write_report()");
    let filter = PrefixFilter::from_query(&config.query)?;
    let prefixes = load_prefixes(store, &filter, &config.permissions)?;
    log_duplicate_prefixes(&find_duplicate_prefixes(&prefixes));

    let renderer: Box<dyn RowRenderer> = match config.output {
        OutputFormat::Terminal => Box::new(TerminalRenderer::new(config.thresholds)),
        OutputFormat::Csv => Box::new(CsvRenderer),
    };

    let mut rows = 0;
    for table in build_tables(&filter, config.nested_gaps, &prefixes)? {
        log::info!("Listing {} prefixes in {}", table.len(), table.universe());
        rows += render_table(renderer.as_ref(), table.rows(), out)?;
    }

    if config.output == OutputFormat::Terminal {
        if let Some(within) = filter.within {
            write_addresses(store, config, &filter, within, out)?;
        }
    }

    log::info!("#End write_report() rows={rows}");
    Ok(rows)
}

fn write_addresses<S, W>(
    store: &S,
    config: &Config,
    filter: &PrefixFilter,
    within: Block,
    out: &mut W,
) -> Result<(), Box<dyn Error>>
where
    S: PrefixStore + ?Sized,
    W: Write,
{
    let Some(parent) = store.prefix_by_block(&filter.scope, within)? else {
        log::debug!("No stored prefix {within}, skipping address listing");
        return Ok(());
    };
    if authorize(vec![parent.clone()], &config.permissions).is_empty() {
        return Ok(());
    }
    if !config.permissions.has(IpAddress::VIEW_PERMISSION) {
        log::debug!("Permission {} not granted, skipping address listing", IpAddress::VIEW_PERMISSION);
        return Ok(());
    }

    let addresses = authorize(store.ip_addresses(&filter.scope, Some(within))?, &config.permissions);
    writeln!(out)?;
    writeln!(out, "IP addresses in {within}")?;
    for row in add_available_ips(within, parent.is_pool, &addresses) {
        writeln!(out, "{}", format_address_row(&row))?;
    }

    let ranges: Vec<IpRange> = authorize(store.ip_ranges(&filter.scope)?, &config.permissions)
        .into_iter()
        .filter(|r| within.contains_addr(r.start_address) && within.contains_addr(r.end_address))
        .collect();
    if !ranges.is_empty() {
        writeln!(out)?;
        writeln!(out, "IP ranges in {within}")?;
        for range in &ranges {
            writeln!(out, "{}", format_range(range, &addresses)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddressFamily, Scope};

    fn prefix(id: u64, cidr: &str) -> Prefix {
        Prefix::new(id, Block::new(cidr).unwrap(), Scope::Global)
    }

    #[test]
    fn test_table_universes() {
        let prefixes = vec![prefix(1, "2001:db8::/32"), prefix(2, "10.0.0.0/8"), prefix(3, "10.1.0.0/16")];
        let universes = table_universes(&PrefixFilter::default(), &prefixes);
        assert_eq!(
            universes,
            vec![Block::full(AddressFamily::V4), Block::full(AddressFamily::V6)]
        );

        let filter = PrefixFilter::from_query("within=10.0.0.0/8").unwrap();
        assert_eq!(table_universes(&filter, &prefixes), vec![Block::new("10.0.0.0/8").unwrap()]);
        assert!(table_universes(&PrefixFilter::default(), &[]).is_empty());
    }

    #[test]
    fn test_build_tables_keeps_families_apart() {
        let prefixes = vec![prefix(1, "2001:db8::/32"), prefix(2, "10.0.0.0/8")];
        let tables = build_tables(&PrefixFilter::default(), true, &prefixes).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].nodes()[0].prefix.id, 2);
        assert_eq!(tables[1].nodes()[0].prefix.id, 1);
    }
}
