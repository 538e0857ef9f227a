use crate::model::{ClassifiedResult, ResultRow, RowWarning, NOT_APPLICABLE};
use crate::summary::resolve::resolve;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether any reading of an analyte rose above its GWPS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exceedance {
    Yes,
    No,
    /// No GWPS is defined for the analyte.
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl fmt::Display for Exceedance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exceedance::Yes => write!(f, "Yes"),
            Exceedance::No => write!(f, "No"),
            Exceedance::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// The row that won a max or min selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub result: ClassifiedResult,
    pub well_id: String,
    pub sample_date: Option<NaiveDate>,
    /// Zero-based data row in the source table.
    pub row_index: usize,
}

impl From<&ResultRow> for Pick {
    fn from(row: &ResultRow) -> Self {
        Pick {
            result: row.result.clone(),
            well_id: row.well_id.clone(),
            sample_date: row.sample_date,
            row_index: row.row_index,
        }
    }
}

/// Summary of one analyte across all selected wells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyteSummary {
    /// Analyte name as first seen in the source.
    pub analyte: String,
    /// Greatest detection, absent when every row is a non-detect.
    pub max: Option<Pick>,
    /// Smallest detection or detection limit.
    pub min: Option<Pick>,
    pub all_non_detect: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gwps: Option<Decimal>,
    pub gwps_exceedance: Exceedance,
    /// Rows that fed this summary.
    pub samples: usize,
    pub detections: usize,
}

impl AnalyteSummary {
    pub fn max_value_display(&self) -> String {
        value_display(self.max.as_ref())
    }

    pub fn max_well(&self) -> String {
        well_display(self.max.as_ref())
    }

    pub fn max_date(&self) -> String {
        date_display(self.max.as_ref())
    }

    pub fn min_value_display(&self) -> String {
        value_display(self.min.as_ref())
    }

    pub fn min_well(&self) -> String {
        well_display(self.min.as_ref())
    }

    pub fn min_date(&self) -> String {
        date_display(self.min.as_ref())
    }
}

/// An absent pick shows as "BDL": nothing detected and no limit to report.
fn value_display(pick: Option<&Pick>) -> String {
    let result = pick.map_or(&ClassifiedResult::UnqualifiedNonDetect, |p| &p.result);
    resolve(result).display
}

fn well_display(pick: Option<&Pick>) -> String {
    match pick {
        Some(p) => p.well_id.clone(),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// A winning row without a sample date shows an empty date.
fn date_display(pick: Option<&Pick>) -> String {
    match pick {
        Some(p) => p
            .sample_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// Long-form summary: one entry per analyte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub analytes: Vec<AnalyteSummary>,
    /// Analytes with no detection anywhere, in report order.
    pub nd_only: Vec<String>,
    pub nd_statement: String,
    pub warnings: Vec<RowWarning>,
    /// Source rows dropped during cleaning.
    pub skipped_rows: usize,
}

/// One analyte row of the well matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub analyte: String,
    /// One cell per well, aligned with `MatrixReport::wells`.
    /// `None` when the well has no rows for this analyte.
    pub cells: Vec<Option<String>>,
    pub min: String,
    pub max: String,
    pub gwps_exceedance: Exceedance,
}

/// Wide-form summary: analytes down, wells across.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixReport {
    pub wells: Vec<String>,
    pub rows: Vec<MatrixRow>,
    pub nd_only: Vec<String>,
    pub nd_statement: String,
    pub warnings: Vec<RowWarning>,
}
