use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display placeholder for a non-detect with no known limit.
pub const BDL: &str = "BDL";

/// Provenance placeholder when no row exists to report.
pub const NOT_APPLICABLE: &str = "Not Applicable";

/// A lab result after classification.
///
/// Every raw result string maps to exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifiedResult {
    /// A positive measured concentration.
    Detected(Decimal),
    /// Known only to be below this limit ("<0.5", or "ND" with a detection limit).
    CensoredNonDetect(Decimal),
    /// Non-detect with no usable limit ("ND", garbage, zero).
    UnqualifiedNonDetect,
}

impl ClassifiedResult {
    pub fn is_detected(&self) -> bool {
        matches!(self, ClassifiedResult::Detected(_))
    }

    pub fn is_non_detect(&self) -> bool {
        !self.is_detected()
    }

    /// The detection limit, if this is a censored non-detect.
    pub fn limit(&self) -> Option<Decimal> {
        match self {
            ClassifiedResult::CensoredNonDetect(limit) => Some(*limit),
            _ => None,
        }
    }
}

impl fmt::Display for ClassifiedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifiedResult::Detected(v) => write!(f, "{v}"),
            ClassifiedResult::CensoredNonDetect(limit) => write!(f, "<{limit}"),
            ClassifiedResult::UnqualifiedNonDetect => write!(f, "{BDL}"),
        }
    }
}

/// One normalized lab result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Zero-based data row in the source table.
    pub row_index: usize,
    pub well_id: String,
    pub analyte: String,
    /// The trimmed result text as it appeared in the source.
    pub raw_result: String,
    pub sample_date: Option<NaiveDate>,
    pub detection_limit: Option<Decimal>,
    pub result: ClassifiedResult,
}

/// A recovered problem with a single source row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowWarning {
    /// Zero-based data row in the source table.
    pub row: usize,
    pub message: String,
}

/// Rows that survived cleaning, plus what was dropped or repaired on the way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedRows {
    pub rows: Vec<ResultRow>,
    pub warnings: Vec<RowWarning>,
    /// Source rows dropped during cleaning.
    pub skipped: usize,
    /// Source rows outside the requested wells.
    pub filtered: usize,
}
