pub mod columns;
pub mod melt;
pub mod summary;

use plume_core::error::PlumeError;
use plume_core::extraction::json::JsonReader;
use plume_core::extraction::xlsx::XlsxReader;
use plume_core::extraction::{Table, TableReader};
use std::path::Path;
use tracing::info;

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Pick a reader by file extension: `.json` reads records, anything else is
/// opened as a spreadsheet.
pub fn reader_for(path: &Path, sheet: Option<String>) -> Box<dyn TableReader> {
    if is_json(path) {
        Box::new(JsonReader)
    } else {
        Box::new(XlsxReader { sheet })
    }
}

/// Read an input file into a table.
pub fn read_input(path: &Path, sheet: Option<String>) -> Result<Table, PlumeError> {
    let bytes = std::fs::read(path)?;
    let reader = reader_for(path, sheet);
    let table = reader.read_table(&bytes)?;
    info!(
        file = %path.display(),
        backend = reader.backend_name(),
        rows = table.len(),
        "read input"
    );
    Ok(table)
}
