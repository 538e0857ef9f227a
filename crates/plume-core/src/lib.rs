pub mod config;
pub mod error;
pub mod extraction;
pub mod gwps;
pub mod model;
pub mod parsing;
pub mod summary;

use config::{Config, SummaryOptions};
use error::PlumeError;
use extraction::{Table, TableReader};
use gwps::GwpsLookup;
use parsing::columns::ColumnMap;
use summary::{MatrixReport, SummaryReport};
use tracing::info;

/// Main API entry point: summarize a lab-results table, one row per analyte.
///
/// Column names are taken from `columns` as given; nothing is guessed.
/// Missing columns abort before any row is read.
pub fn summarize_table(
    table: &Table,
    columns: &ColumnMap,
    gwps: &GwpsLookup,
    options: &SummaryOptions,
) -> Result<SummaryReport, PlumeError> {
    let parsed = parsing::parse_rows(table, columns, options)?;
    Ok(summary::summarize(&parsed, gwps, options))
}

/// Summarize a lab-results table as an analyte-by-well matrix.
pub fn summarize_table_matrix(
    table: &Table,
    columns: &ColumnMap,
    gwps: &GwpsLookup,
    options: &SummaryOptions,
) -> Result<MatrixReport, PlumeError> {
    let parsed = parsing::parse_rows(table, columns, options)?;
    Ok(summary::summarize_matrix(&parsed, gwps, options))
}

/// Read raw file bytes with `reader` and summarize them under `config`.
pub fn summarize_source(
    bytes: &[u8],
    reader: &dyn TableReader,
    config: &Config,
    gwps: &GwpsLookup,
) -> Result<SummaryReport, PlumeError> {
    let table = reader.read_table(bytes)?;
    info!(
        backend = reader.backend_name(),
        rows = table.len(),
        columns = table.headers.len(),
        "read lab table"
    );
    summarize_table(&table, &config.columns, gwps, &config.options)
}
