use crate::error::PlumeError;
use crate::extraction::Table;
use crate::summary::outcome::{MatrixReport, SummaryReport};
use std::collections::HashSet;

/// Column headers of the long-form summary table.
pub const SUMMARY_COLUMNS: [&str; 8] = [
    "Constituent",
    "Max Value",
    "Well ID of Max",
    "Date of Max",
    "Min Value",
    "Well ID of Min",
    "Date of Min",
    "100% NDs",
];

const MATRIX_LEAD_COLUMN: &str = "Constituent";
const MATRIX_TRAILING_COLUMNS: [&str; 3] = ["Min", "Max", "GWPS Exceedance"];

/// Sentence listing analytes that were never detected.
pub fn nd_statement(nd_only: &[String]) -> String {
    if nd_only.is_empty() {
        "No constituents resulted in 100% non-detect values.".to_string()
    } else {
        format!(
            "The following constituents resulted in 100% non-detect values: {}.",
            nd_only.join(", ")
        )
    }
}

/// Render a summary as a table, one row per analyte.
pub fn summary_table(report: &SummaryReport) -> Result<Table, PlumeError> {
    let rows = report
        .analytes
        .iter()
        .map(|s| {
            vec![
                s.analyte.clone(),
                s.max_value_display(),
                s.max_well(),
                s.max_date(),
                s.min_value_display(),
                s.min_well(),
                s.min_date(),
                if s.all_non_detect { "Yes" } else { "" }.to_string(),
            ]
        })
        .collect();

    Table::new(SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect(), rows)
}

/// Render a well matrix as a table: analyte, one column per well, then
/// min, max and GWPS exceedance. Wells without rows get an empty cell.
/// A well whose id collides with another column is rejected.
pub fn matrix_table(report: &MatrixReport) -> Result<Table, PlumeError> {
    let mut headers = vec![MATRIX_LEAD_COLUMN.to_string()];
    headers.extend(report.wells.iter().cloned());
    headers.extend(MATRIX_TRAILING_COLUMNS.map(String::from));

    let mut seen = HashSet::new();
    if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
        return Err(PlumeError::InvalidTable(format!(
            "well '{dup}' collides with another matrix column"
        )));
    }

    let rows = report
        .rows
        .iter()
        .map(|r| {
            let mut row = Vec::with_capacity(headers.len());
            row.push(r.analyte.clone());
            row.extend(r.cells.iter().map(|c| c.clone().unwrap_or_default()));
            row.push(r.min.clone());
            row.push(r.max.clone());
            row.push(r.gwps_exceedance.to_string());
            row
        })
        .collect();

    Table::new(headers, rows)
}
