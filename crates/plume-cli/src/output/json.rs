use plume_core::error::PlumeError;
use plume_core::extraction::json::table_to_records;
use plume_core::summary::report::{matrix_table, summary_table};
use plume_core::summary::{MatrixReport, SummaryReport};
use serde_json::{json, Value};

/// Summary rows as flat records, plus the ND list and statement.
pub fn summary_value(report: &SummaryReport) -> Result<Value, PlumeError> {
    Ok(json!({
        "summary": table_to_records(&summary_table(report)?),
        "nd_only": report.nd_only,
        "nd_statement": report.nd_statement,
        "warnings": report.warnings,
    }))
}

pub fn matrix_value(report: &MatrixReport) -> Result<Value, PlumeError> {
    Ok(json!({
        "wells": report.wells,
        "matrix": table_to_records(&matrix_table(report)?),
        "nd_only": report.nd_only,
        "nd_statement": report.nd_statement,
        "warnings": report.warnings,
    }))
}

pub fn print(value: &Value) -> Result<(), PlumeError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
