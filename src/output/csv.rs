//! CSV output formatting for prefix tables.

use super::RowRenderer;
use crate::processing::TableRow;

/// Quoted, right-aligned CSV columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl RowRenderer for CsvRenderer {
    fn header(&self) -> String {
        [
            format_field("depth", 7),
            format_field("prefix", 45),
            format_field("status", 12),
            format_field("vrf", 12),
            format_field("utilization", 13),
            format_field("tenant", 16),
            format_field("site", 16),
            format_field("role", 12),
            format_field("description", 24),
        ]
        .join(",")
    }

    fn render(&self, row: &TableRow<'_>) -> String {
        let block = row.block();
        match row {
            TableRow::Prefix(node) => {
                let prefix = node.prefix;
                [
                    format_field(node.depth, 7),
                    format_field(block, 45),
                    format_field(prefix.status, 12),
                    format_field(&prefix.vrf, 12),
                    format_field(node.utilization, 13),
                    format_field(prefix.tenant.as_deref().unwrap_or_default(), 16),
                    format_field(prefix.site.as_deref().unwrap_or_default(), 16),
                    format_field(prefix.role.as_deref().unwrap_or_default(), 12),
                    format_field(&prefix.description, 24),
                ]
                .join(",")
            }
            TableRow::Available(available) => [
                format_field(available.depth, 7),
                format_field(block, 45),
                format_field("Available", 12),
                format_field(available.scope, 12),
                format_field("", 13),
                format_field("", 16),
                format_field("", 16),
                format_field("", 12),
                format_field("", 24),
            ]
            .join(","),
        }
    }
}

/// Format a value as a quoted, right-aligned field.
///
/// Embedded double quotes are doubled.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string().replace('"', "\"\"");
    let quoted = format!("\"{value_str}\"");

    if quoted.len() >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Block, Prefix, Scope};
    use crate::processing::PrefixTableBuilder;

    #[test]
    fn test_format_field_short() {
        assert_eq!(format_field("test", 10), "    \"test\"");
    }

    #[test]
    fn test_format_field_long() {
        assert_eq!(format_field("long_value", 5), "\"long_value\"");
    }

    #[test]
    fn test_format_field_escapes_quotes() {
        assert_eq!(format_field("say \"hi\"", 0), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_render_rows() {
        let mut parent = Prefix::new(1, Block::new("192.168.0.0/24").unwrap(), Scope::Global);
        parent.tenant = Some("acme".to_string());
        let prefixes = vec![
            parent,
            Prefix::new(2, Block::new("192.168.0.0/25").unwrap(), Scope::Global),
        ];
        let table = PrefixTableBuilder::new(Scope::Global, Block::new("192.168.0.0/24").unwrap())
            .build(&prefixes)
            .unwrap();
        let rows: Vec<String> = table.rows().map(|row| CsvRenderer.render(&row)).collect();

        assert_eq!(rows.len(), 3);
        let fields: Vec<&str> = rows[0].split(',').map(str::trim).collect();
        assert_eq!(fields[0], "\"0\"");
        assert_eq!(fields[1], "\"192.168.0.0/24\"");
        assert_eq!(fields[2], "\"Active\"");
        assert_eq!(fields[3], "\"Global\"");
        assert_eq!(fields[4], "\"50%\"");
        assert_eq!(fields[5], "\"acme\"");

        let fields: Vec<&str> = rows[2].split(',').map(str::trim).collect();
        assert_eq!(fields[0], "\"1\"");
        assert_eq!(fields[1], "\"192.168.0.128/25\"");
        assert_eq!(fields[2], "\"Available\"");
    }
}
