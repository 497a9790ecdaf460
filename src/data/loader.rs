use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::filter::{apply_filter, Selection, TripFilter};
use super::model::TripTable;
use crate::config::ExplorerConfig;
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the selected city's trips and narrow them to the selected month
/// and day.  Row order from the source is preserved.
pub fn load_data(config: &ExplorerConfig, selection: &Selection) -> Result<TripTable> {
    let filter = TripFilter::from_selection(config, selection)?;
    let path = config.city_file(&selection.city)?;

    let table = load_file(&path)
        .with_context(|| format!("loading {} data from {}", selection.city, path.display()))?;
    log::info!(
        "Loaded {} trips from {} (gender: {}, birth year: {})",
        table.len(),
        path.display(),
        table.schema.has_gender,
        table.schema.has_birth_year
    );

    let filtered = apply_filter(table, &filter);
    log::info!(
        "{} trips match month={} day={}",
        filtered.len(),
        selection.month,
        selection.day
    );
    if filtered.is_empty() {
        log::warn!("Selection {selection:?} matched no trips");
    }
    Ok(filtered)
}

/// Load a trip table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by one trip per line
/// * `.parquet` – any column types; every column is read as text
pub fn load_file(path: &Path) -> Result<TripTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (columns, rows) = match ext.as_str() {
        "csv" => read_csv(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(DataError::UnsupportedFormat(other.to_string()).into()),
    };

    Ok(TripTable::from_rows(columns, rows)?)
}

type RawTable = (Vec<String>, Vec<Vec<String>>);

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok((columns, rows))
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Read every column of a Parquet file as text.  Nulls become blank cells,
/// timestamps are rendered in ISO-8601 form.
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let text_columns = batch
            .columns()
            .iter()
            .zip(&columns)
            .map(|(col, name)| {
                cast(col, &DataType::Utf8).with_context(|| format!("converting '{name}' to text"))
            })
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let cells = text_columns
                .iter()
                .map(|col| {
                    if col.is_null(row) {
                        String::new()
                    } else {
                        col.as_string::<i32>().value(row).to_string()
                    }
                })
                .collect();
            rows.push(cells);
        }
    }

    Ok((columns, rows))
}
