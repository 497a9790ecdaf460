use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use super::prompt::Console;
use crate::data::model::TripTable;

/// Rows shown per page.
pub const PAGE_SIZE: usize = 5;

/// Render trips `start..end` (clamped to the table) as a bordered text
/// table with every source column plus the derived ones.
pub fn render_page(table: &TripTable, start: usize, end: usize) -> Result<String> {
    let end = end.min(table.len());
    let start = start.min(end);
    let page = &table.trips[start..end];

    let columns = table.display_columns();
    let source_width = table.schema.columns.len();

    let fields: Vec<Field> = columns
        .iter()
        .map(|name| Field::new(name, DataType::Utf8, false))
        .collect();
    let arrays: Vec<ArrayRef> = (0..columns.len())
        .map(|col| {
            let values: Vec<String> = page
                .iter()
                .map(|trip| {
                    if col < source_width {
                        trip.cells[col].clone()
                    } else {
                        trip.derived_cells()[col - source_width].clone()
                    }
                })
                .collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .context("building row page")?;
    let rendered = pretty_format_batches(&[batch]).context("formatting row page")?;
    Ok(rendered.to_string())
}

/// Offer to page through the table five trips at a time.
///
/// Paging ends when the user answers anything but "yes", or once every
/// trip has been shown.
pub fn display_data<R: BufRead, W: Write>(
    table: &TripTable,
    console: &mut Console<R, W>,
) -> Result<()> {
    if table.is_empty() {
        writeln!(console.output(), "\nNo trip data to display.")?;
        return Ok(());
    }

    let mut show =
        console.confirm("\nWould you like to view 5 rows of individual trip data? Enter yes or no: ")?;
    let mut cursor = 0;

    while show {
        let end = (cursor + PAGE_SIZE).min(table.len());
        log::debug!("Showing rows {cursor}..{end} of {}", table.len());
        writeln!(console.output(), "{}", render_page(table, cursor, end)?)?;
        cursor = end;

        if cursor >= table.len() {
            writeln!(console.output(), "\nNo more trip data to display.")?;
            break;
        }
        show = console.confirm("\nView next 5 rows? Enter yes or no: ")?;
    }
    Ok(())
}
