use plume_core::error::PlumeError;
use plume_core::extraction::json::table_to_records;
use std::path::{Path, PathBuf};

use crate::commands::read_input;

pub fn run(
    input_file: &Path,
    well_col: &str,
    date_col: &str,
    analytes: &[String],
    sheet: Option<String>,
    output_file: Option<PathBuf>,
) -> Result<(), PlumeError> {
    let table = read_input(input_file, sheet)?;
    let value_columns: Vec<&str> = analytes.iter().map(String::as_str).collect();
    let long = table.melt(&[well_col, date_col], &value_columns, "Constituent", "Result")?;
    let json = serde_json::to_string_pretty(&table_to_records(&long))?;

    match output_file {
        Some(path) => {
            std::fs::write(&path, json)?;
            eprintln!(
                "Reshaped {} constituent(s) into {} row(s), written to {}",
                value_columns.len(),
                long.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
