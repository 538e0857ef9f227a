//! Run configuration: column roles and summary policies.
//!
//! Both halves can be loaded from a TOML file; every field has a default so a
//! file only needs to name what differs.

use crate::error::PlumeError;
use crate::parsing::columns::ColumnMap;
use crate::parsing::normalize::normalize_label;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// How analyte names are compared when grouping and looking up GWPS values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyteMatching {
    /// Trimmed, case-sensitive equality.
    #[default]
    Exact,
    /// Trimmed, case-folded equality. The first spelling seen is displayed.
    CaseInsensitive,
}

/// Treatment of a bare "ND" result when the row carries a detection limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NdWithLimit {
    /// Report it as "<limit".
    #[default]
    Censor,
    /// Keep it unqualified regardless of the limit column.
    Ignore,
}

/// Treatment of empty, "NR" and "NS" results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotReported {
    /// Drop the row before aggregation.
    #[default]
    Skip,
    /// Keep the row as an unqualified non-detect.
    NonDetect,
}

/// Which effective values take part in the GWPS comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceedanceBasis {
    /// Detected values and censored limits.
    #[default]
    AllRows,
    /// Detected values only.
    DetectedOnly,
}

/// Order of analytes in the summary and the non-detect statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyteOrder {
    #[default]
    FirstSeen,
    Alphabetical,
}

/// Policies applied during a summary run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    pub analyte_matching: AnalyteMatching,
    pub nd_with_limit: NdWithLimit,
    pub not_reported: NotReported,
    pub exceedance_basis: ExceedanceBasis,
    pub analyte_order: AnalyteOrder,
    /// Restrict the run to these wells. Also fixes matrix column order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wells: Option<Vec<String>>,
}

/// Full configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub columns: ColumnMap,
    pub options: SummaryOptions,
}

impl Config {
    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, PlumeError> {
        let content = std::fs::read_to_string(path).map_err(|e| PlumeError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| PlumeError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, PlumeError> {
        let config: Config =
            toml::from_str(s).map_err(|e| PlumeError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlumeError> {
        self.columns.validate()?;
        self.options.validate()
    }
}

impl SummaryOptions {
    /// Well filter entries must be non-blank and distinct once normalized.
    pub fn validate(&self) -> Result<(), PlumeError> {
        let Some(ref wells) = self.wells else {
            return Ok(());
        };
        let mut seen = HashSet::new();
        for well in wells.iter().map(|w| normalize_label(w)) {
            if well.is_empty() {
                return Err(PlumeError::ConfigInvalid(
                    "well filter entries must not be empty".into(),
                ));
            }
            if !seen.insert(well.clone()) {
                return Err(PlumeError::ConfigInvalid(format!(
                    "well '{well}' listed more than once"
                )));
            }
        }
        Ok(())
    }
}
