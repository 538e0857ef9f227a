use crate::config::{AnalyteMatching, AnalyteOrder};
use crate::model::{ClassifiedResult, ResultRow};
use crate::parsing::normalize::analyte_key;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// All rows of one analyte, in source order.
#[derive(Debug, Clone)]
pub struct AnalyteGroup<'a> {
    /// First spelling seen for this analyte.
    pub analyte: String,
    pub rows: Vec<&'a ResultRow>,
}

impl<'a> AnalyteGroup<'a> {
    /// Rows of this analyte sampled at one well.
    pub fn rows_for_well(&self, well_id: &str) -> Vec<&'a ResultRow> {
        self.rows
            .iter()
            .copied()
            .filter(|r| r.well_id == well_id)
            .collect()
    }
}

/// Group rows by analyte.
///
/// Groups appear in first-seen order, or alphabetically (case-folded, ties
/// broken by exact spelling). Only analytes with at least one row exist.
pub fn group_by_analyte(
    rows: &[ResultRow],
    matching: AnalyteMatching,
    order: AnalyteOrder,
) -> Vec<AnalyteGroup<'_>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<AnalyteGroup<'_>> = Vec::new();

    for row in rows {
        let key = analyte_key(&row.analyte, matching);
        match index.get(&key) {
            Some(&i) => groups[i].rows.push(row),
            None => {
                index.insert(key, groups.len());
                groups.push(AnalyteGroup {
                    analyte: row.analyte.clone(),
                    rows: vec![row],
                });
            }
        }
    }

    if order == AnalyteOrder::Alphabetical {
        groups.sort_by(|a, b| {
            a.analyte
                .to_lowercase()
                .cmp(&b.analyte.to_lowercase())
                .then_with(|| a.analyte.cmp(&b.analyte))
        });
    }

    groups
}

/// The winning rows of one aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremes<'a> {
    /// Greatest detection. `None` when nothing was detected.
    pub max: Option<&'a ResultRow>,
    /// Smallest effective value over detections and censored limits.
    /// With no detections this is the tightest detection limit, if any.
    pub min: Option<&'a ResultRow>,
    pub all_non_detect: bool,
}

/// Find max and min rows. Ties go to the earliest row.
pub fn find_extremes<'a>(rows: &[&'a ResultRow]) -> Extremes<'a> {
    let mut max: Option<(&ResultRow, Decimal)> = None;
    let mut min: Option<(&ResultRow, Decimal)> = None;

    for &row in rows {
        let value = match row.result {
            ClassifiedResult::Detected(v) => {
                if max.map_or(true, |(_, m)| v > m) {
                    max = Some((row, v));
                }
                v
            }
            ClassifiedResult::CensoredNonDetect(limit) => limit,
            ClassifiedResult::UnqualifiedNonDetect => continue,
        };
        if min.map_or(true, |(_, m)| value < m) {
            min = Some((row, value));
        }
    }

    Extremes {
        max: max.map(|(r, _)| r),
        min: min.map(|(r, _)| r),
        all_non_detect: max.is_none(),
    }
}
