//! Terminal output with colors.

use super::RowRenderer;
use crate::error::TableError;
use crate::models::{IpAddress, IpRange};
use crate::processing::{AddressRow, TableRow, Thresholds, Utilization, UtilizationLevel};
use colored::Colorize;

/// Aligned columns, nested prefixes indented with one dot per level.
#[derive(Debug, Clone, Copy)]
pub struct TerminalRenderer {
    pub thresholds: Thresholds,
    /// Color utilization by level.
    pub color: bool,
}

impl TerminalRenderer {
    pub fn new(thresholds: Thresholds) -> TerminalRenderer {
        TerminalRenderer {
            thresholds,
            color: true,
        }
    }

    pub fn without_color(mut self) -> TerminalRenderer {
        self.color = false;
        self
    }

    fn utilization(&self, utilization: Utilization) -> String {
        let text = format!("{:>5}", utilization.to_string());
        if !self.color {
            return text;
        }
        match utilization.level(&self.thresholds) {
            UtilizationLevel::Normal => text.green().to_string(),
            UtilizationLevel::Warning => text.yellow().to_string(),
            UtilizationLevel::Danger => text.red().to_string(),
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        TerminalRenderer::new(Thresholds::default())
    }
}

fn indent(depth: usize, block: impl ToString) -> String {
    let mut text = "• ".repeat(depth);
    text.push_str(&block.to_string());
    text
}

impl RowRenderer for TerminalRenderer {
    fn header(&self) -> String {
        let header = format!(
            "{:<48} {:<11} {:<12} {:>5}  {:<16} {:<16} {:<12} {}",
            "Prefix", "Status", "VRF", "Util", "Tenant", "Site", "Role", "Description"
        );
        if self.color {
            header.bold().to_string()
        } else {
            header
        }
    }

    fn render(&self, row: &TableRow<'_>) -> String {
        let prefix_column = indent(row.depth(), row.block());
        match row {
            TableRow::Prefix(node) => {
                let prefix = node.prefix;
                format!(
                    "{:<48} {:<11} {:<12} {}  {:<16} {:<16} {:<12} {}",
                    prefix_column,
                    prefix.status.label(),
                    prefix.vrf.to_string(),
                    self.utilization(node.utilization),
                    prefix.tenant.as_deref().unwrap_or("-"),
                    prefix.site.as_deref().unwrap_or("-"),
                    prefix.role.as_deref().unwrap_or("-"),
                    prefix.description,
                )
            }
            TableRow::Available(available) => {
                let status = if self.color {
                    format!("{:<11}", "Available").cyan().to_string()
                } else {
                    format!("{:<11}", "Available")
                };
                format!(
                    "{:<48} {} {:<12}",
                    prefix_column,
                    status,
                    available.scope.to_string()
                )
                .trim_end()
                .to_string()
            }
        }
    }
}

/// One line of an address listing.
pub fn format_address_row(row: &AddressRow<'_>) -> String {
    match row {
        AddressRow::Address(address) => format_address(address),
        AddressRow::Available { first, count } => {
            format!("{:<44} {}", first.to_string(), AddressRow::available_label(*count))
        }
    }
}

fn format_address(address: &IpAddress) -> String {
    format!(
        "{:<44} {:<11} {:<24} {}",
        format!("{}/{}", address.address, address.mask),
        address.status,
        address.dns_name.as_deref().unwrap_or("-"),
        address.description,
    )
    .trim_end()
    .to_string()
}

/// One line describing an IP range with its size and utilization.
pub fn format_range(range: &IpRange, addresses: &[IpAddress]) -> Result<String, TableError> {
    let size = range.size()?;
    let utilization = range.utilization(addresses)?;
    Ok(format!(
        "{:<44} {:<11} size={:<10} {:>5}  {}",
        format!("{}-{}", range.start_address, range.end_address),
        range.status,
        size,
        utilization.to_string(),
        range.role.as_deref().unwrap_or("-"),
    ))
}
