//! Output formatting for prefix tables.
//!
//! Renderers only ever see [`TableRow`]s; they never query storage.
//! - [`csv`] - CSV output formatting
//! - [`terminal`] - Terminal output with colors

mod csv;
mod terminal;

use crate::processing::TableRow;
use std::io::{self, Write};

pub use csv::{format_field, CsvRenderer};
pub use terminal::{format_address_row, format_range, TerminalRenderer};

/// Formats table rows as text lines.
pub trait RowRenderer {
    fn header(&self) -> String;

    fn render(&self, row: &TableRow<'_>) -> String;
}

/// Write the header and one line per row, returning the number of rows written.
pub fn render_table<'t, R, I, W>(renderer: &R, rows: I, out: &mut W) -> io::Result<usize>
where
    R: RowRenderer + ?Sized,
    I: IntoIterator<Item = TableRow<'t>>,
    W: Write,
{
    writeln!(out, "{}", renderer.header())?;
    let mut count = 0;
    for row in rows {
        writeln!(out, "{}", renderer.render(&row))?;
        count += 1;
    }
    log::debug!("Rendered {count} rows");
    Ok(count)
}
