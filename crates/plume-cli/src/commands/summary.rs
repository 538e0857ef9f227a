use plume_core::config::Config;
use plume_core::error::PlumeError;
use plume_core::gwps::{load_gwps, GwpsLookup};
use plume_core::parsing::columns::ColumnMap;
use plume_core::parsing::wells_from_table;
use std::path::PathBuf;
use tracing::info;

use crate::commands::read_input;
use crate::output;
use crate::ColumnArgs;

pub struct SummaryArgs {
    pub input_file: PathBuf,
    pub gwps: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub wells: Vec<String>,
    pub wells_file: Option<PathBuf>,
    pub sheet: Option<String>,
    pub columns: ColumnArgs,
    pub matrix: bool,
    pub output_format: String,
    pub out: Option<PathBuf>,
}

pub fn run(args: SummaryArgs) -> Result<(), PlumeError> {
    let table = read_input(&args.input_file, args.sheet)?;

    // Config file mapping wins over detection; flags win over both.
    let mut config = match args.config {
        Some(ref path) => Config::load(path)?,
        None => Config {
            columns: ColumnMap::detect(&table.headers),
            ..Default::default()
        },
    };
    apply_column_flags(&mut config.columns, args.columns);

    if !args.wells.is_empty() {
        config.options.wells = Some(args.wells);
    } else if let Some(ref path) = args.wells_file {
        let wells = wells_from_table(&read_input(path, None)?)?;
        info!(wells = wells.len(), "loaded well filter");
        config.options.wells = Some(wells);
    }
    config.validate()?;

    let gwps = match args.gwps {
        Some(ref path) => load_gwps(path)?,
        None => GwpsLookup::new(),
    };

    let json = if args.matrix {
        let report =
            plume_core::summarize_table_matrix(&table, &config.columns, &gwps, &config.options)?;
        let json = output::json::matrix_value(&report)?;
        if args.out.is_none() {
            match args.output_format.as_str() {
                "json" => output::json::print(&json)?,
                _ => output::table::print_matrix(&report)?,
            }
        }
        output::table::print_warnings(&report.warnings);
        json
    } else {
        let report = plume_core::summarize_table(&table, &config.columns, &gwps, &config.options)?;
        let json = output::json::summary_value(&report)?;
        if args.out.is_none() {
            match args.output_format.as_str() {
                "json" => output::json::print(&json)?,
                _ => output::table::print_summary(&report)?,
            }
        }
        output::table::print_warnings(&report.warnings);
        json
    };

    if let Some(path) = args.out {
        // Always write JSON when saving to file
        std::fs::write(&path, serde_json::to_string_pretty(&json)?)?;
        eprintln!("Summary written to {}", path.display());
    }

    Ok(())
}

fn apply_column_flags(columns: &mut ColumnMap, flags: ColumnArgs) {
    if let Some(well) = flags.well_col {
        columns.well = well;
    }
    if let Some(analyte) = flags.analyte_col {
        columns.analyte = analyte;
    }
    if let Some(result) = flags.result_col {
        columns.result = result;
    }
    if let Some(date) = flags.date_col {
        columns.date = date;
    }
    if flags.limit_col.is_some() {
        columns.detection_limit = flags.limit_col;
    }
}
