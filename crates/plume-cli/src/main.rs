mod commands;
mod output;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "plume",
    version,
    about = "Summarize groundwater lab results: max/min per constituent, 100% NDs and GWPS exceedances"
)]
struct Cli {
    /// Increase log detail (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a lab-results table (XLSX/XLS/ODS or JSON records)
    Summary {
        /// Path to the lab-results file
        input_file: PathBuf,

        /// GWPS table: two-column spreadsheet, JSON records or {"analyte": "threshold"}
        #[arg(short, long, value_name = "FILE")]
        gwps: Option<PathBuf>,

        /// TOML config with column mapping and options
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Only include these wells (repeatable)
        #[arg(short, long = "well", value_name = "WELL")]
        wells: Vec<String>,

        /// Read the well filter from the first column of a file
        #[arg(long, value_name = "FILE", conflicts_with = "wells")]
        wells_file: Option<PathBuf>,

        /// Sheet to read (default: first sheet with a usable header)
        #[arg(long, value_name = "NAME")]
        sheet: Option<String>,

        #[command(flatten)]
        columns: ColumnArgs,

        /// Print an analyte-by-well matrix instead of the long summary
        #[arg(long)]
        matrix: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the summary as JSON to a file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// List the headers of a table and the detected column mapping
    Columns {
        /// Path to the lab-results file
        input_file: PathBuf,

        /// Sheet to read
        #[arg(long, value_name = "NAME")]
        sheet: Option<String>,
    },
    /// Reshape a wide table (one column per constituent) into long records
    Melt {
        /// Path to the wide-format file
        input_file: PathBuf,

        /// Well id column
        #[arg(long, value_name = "NAME")]
        well_col: String,

        /// Sample date column
        #[arg(long, value_name = "NAME")]
        date_col: String,

        /// Constituent column to unpivot (repeatable)
        #[arg(short, long = "analyte", value_name = "NAME", required = true)]
        analytes: Vec<String>,

        /// Sheet to read
        #[arg(long, value_name = "NAME")]
        sheet: Option<String>,

        /// Write long records to a JSON file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

/// Column overrides. Any flag given here replaces the config or detected name.
#[derive(clap::Args, Default)]
pub struct ColumnArgs {
    /// Well id column
    #[arg(long, value_name = "NAME")]
    pub well_col: Option<String>,

    /// Constituent column
    #[arg(long, value_name = "NAME")]
    pub analyte_col: Option<String>,

    /// Result column
    #[arg(long, value_name = "NAME")]
    pub result_col: Option<String>,

    /// Sample date column
    #[arg(long, value_name = "NAME")]
    pub date_col: Option<String>,

    /// Detection limit column
    #[arg(long, value_name = "NAME")]
    pub limit_col: Option<String>,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Summary {
            input_file,
            gwps,
            config,
            wells,
            wells_file,
            sheet,
            columns,
            matrix,
            output,
            out,
        } => commands::summary::run(commands::summary::SummaryArgs {
            input_file,
            gwps,
            config,
            wells,
            wells_file,
            sheet,
            columns,
            matrix,
            output_format: output,
            out,
        }),
        Commands::Columns { input_file, sheet } => commands::columns::run(&input_file, sheet),
        Commands::Melt {
            input_file,
            well_col,
            date_col,
            analytes,
            sheet,
            out,
        } => commands::melt::run(&input_file, &well_col, &date_col, &analytes, sheet, out),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
