use std::io::Cursor;

use calamine::{Data, Range, Reader};
use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::error::PlumeError;
use crate::extraction::{Table, TableReader};

/// Spreadsheet reader for .xlsx / .xls / .ods lab exports.
///
/// Reads the named sheet, or the first sheet when none is given. When the
/// first sheet carries no usable header row (one column at most, or only
/// blank headers) and the workbook has a second sheet, the second sheet is
/// read instead; lab exports often put a cover page first.
#[derive(Debug, Clone, Default)]
pub struct XlsxReader {
    pub sheet: Option<String>,
}

impl XlsxReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(sheet: impl Into<String>) -> Self {
        Self {
            sheet: Some(sheet.into()),
        }
    }
}

impl TableReader for XlsxReader {
    fn read_table(&self, bytes: &[u8]) -> Result<Table, PlumeError> {
        let cursor = Cursor::new(bytes.to_vec());
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
            .map_err(|e| PlumeError::Workbook(format!("failed to open workbook: {e}")))?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(PlumeError::Workbook("workbook has no sheets".into()));
        }

        if let Some(ref sheet) = self.sheet {
            if !sheet_names.iter().any(|s| s == sheet) {
                return Err(PlumeError::SheetNotFound {
                    sheet: sheet.clone(),
                    available: sheet_names,
                });
            }
            let range = workbook
                .worksheet_range(sheet)
                .map_err(|e| PlumeError::Workbook(format!("failed to read sheet '{sheet}': {e}")))?;
            return range_to_table(&range);
        }

        let first = &sheet_names[0];
        let range = workbook
            .worksheet_range(first)
            .map_err(|e| PlumeError::Workbook(format!("failed to read sheet '{first}': {e}")))?;
        let table = range_to_table(&range)?;

        if lacks_header(&table) && sheet_names.len() > 1 {
            let second = &sheet_names[1];
            debug!(
                from = first.as_str(),
                to = second.as_str(),
                "first sheet has no usable header row, reading second sheet"
            );
            let range = workbook
                .worksheet_range(second)
                .map_err(|e| PlumeError::Workbook(format!("failed to read sheet '{second}': {e}")))?;
            return range_to_table(&range);
        }

        Ok(table)
    }

    fn backend_name(&self) -> &str {
        "calamine"
    }
}

/// True when a sheet's header row cannot carry a lab dataset.
fn lacks_header(table: &Table) -> bool {
    table.headers.len() <= 1 || table.headers.iter().all(|h| h.starts_with("Unnamed"))
}

fn range_to_table(range: &Range<Data>) -> Result<Table, PlumeError> {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let text = cell_text(cell);
                if text.is_empty() {
                    format!("Unnamed: {i}")
                } else {
                    text
                }
            })
            .collect(),
        None => Vec::new(),
    };

    let data: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect();

    Table::new(headers, data)
}

/// Render a cell as the text a lab would have typed.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => float_text(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

/// Whole floats print without a trailing ".0"; others use the shortest
/// representation that round-trips.
fn float_text(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{f}")
    }
}

/// Convert an Excel 1900-system serial day number to a calendar date.
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}
