use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PlumeError {
    #[error(
        "required column(s) not found: {}. Available columns: {}",
        missing.join(", "),
        available.join(", ")
    )]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("no lab records found for {criteria}")]
    EmptySelection { criteria: String },

    #[error("input table has no data rows")]
    EmptyTable,

    #[error("failed to read workbook: {0}")]
    Workbook(String),

    #[error("sheet '{sheet}' not found. Available sheets: {}", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("invalid table: {0}")]
    InvalidTable(String),

    #[error("invalid GWPS table: {0}")]
    GwpsInvalid(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
