pub mod lookup;

use crate::error::PlumeError;
use crate::extraction::json::JsonReader;
use crate::extraction::xlsx::XlsxReader;
use crate::extraction::{Table, TableReader};
use crate::parsing::normalize::normalize_label;
use crate::parsing::values::parse_decimal;
pub use lookup::GwpsLookup;
use rust_decimal::Decimal;
use std::path::Path;
use tracing::{debug, warn};

/// Load a GWPS table from a file.
///
/// `.json` files hold either a `{"analyte": "threshold"}` object or records;
/// anything else is read as a spreadsheet.
pub fn load_gwps(path: &Path) -> Result<GwpsLookup, PlumeError> {
    let bytes = std::fs::read(path)?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        let text = String::from_utf8_lossy(&bytes);
        if text.trim_start().starts_with('{') {
            return parse_gwps_str(&text);
        }
        return gwps_from_table(&JsonReader.read_table(&bytes)?);
    }

    gwps_from_table(&XlsxReader::new().read_table(&bytes)?)
}

/// Parse a GWPS object of quoted decimals.
pub fn parse_gwps_str(json: &str) -> Result<GwpsLookup, PlumeError> {
    let raw: GwpsLookup = serde_json::from_str(json)?;
    let mut gwps = GwpsLookup::new();
    for (name, threshold) in raw.iter() {
        if name.trim().is_empty() {
            return Err(PlumeError::GwpsInvalid("analyte name must not be empty".into()));
        }
        check_threshold(name, threshold)?;
        if !gwps.insert(name, threshold) {
            warn!(analyte = name, "duplicate GWPS analyte, keeping first threshold");
        }
    }
    Ok(gwps)
}

/// Build a lookup from a two-column table: analyte name, then threshold.
///
/// Header names are ignored. Rows with a blank name or blank threshold are
/// skipped; a threshold that is present but not a non-negative number
/// rejects the whole table.
pub fn gwps_from_table(table: &Table) -> Result<GwpsLookup, PlumeError> {
    if table.headers.len() < 2 {
        return Err(PlumeError::GwpsInvalid(format!(
            "expected two columns (analyte, threshold), found {}",
            table.headers.len()
        )));
    }

    let mut gwps = GwpsLookup::new();
    for i in 0..table.len() {
        let name = normalize_label(table.cell(i, 0));
        let text = table.cell(i, 1).trim();
        if name.is_empty() || text.is_empty() {
            continue;
        }

        let threshold = parse_decimal(text).ok_or_else(|| {
            PlumeError::GwpsInvalid(format!("threshold '{text}' for '{name}' is not a number"))
        })?;
        check_threshold(&name, threshold)?;

        if !gwps.insert(&name, threshold) {
            warn!(analyte = name.as_str(), "duplicate GWPS analyte, keeping first threshold");
        }
    }

    debug!(analytes = gwps.len(), "loaded GWPS table");
    Ok(gwps)
}

fn check_threshold(name: &str, threshold: Decimal) -> Result<(), PlumeError> {
    if threshold < Decimal::ZERO {
        return Err(PlumeError::GwpsInvalid(format!(
            "threshold {threshold} for '{name}' is negative"
        )));
    }
    Ok(())
}
