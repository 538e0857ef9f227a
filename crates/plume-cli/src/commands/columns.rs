use plume_core::error::PlumeError;
use plume_core::parsing::columns::ColumnMap;
use std::path::Path;

use crate::commands::read_input;

pub fn run(input_file: &Path, sheet: Option<String>) -> Result<(), PlumeError> {
    let table = read_input(input_file, sheet)?;

    println!("Columns ({} data rows):", table.len());
    for header in &table.headers {
        println!("  {header}");
    }

    let detected = ColumnMap::detect(&table.headers);
    println!("\nDetected mapping:");
    for (role, header) in detected.roles() {
        let status = if table.column_index(header).is_some() {
            ""
        } else {
            "  (not found)"
        };
        println!("  {role:<16} {header}{status}");
    }
    if detected.detection_limit.is_none() {
        println!("  {:<16} -", "detection_limit");
    }

    Ok(())
}
