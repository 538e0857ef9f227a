use crate::config::SummaryOptions;
use crate::gwps::GwpsLookup;
use crate::model::{ParsedRows, ResultRow, BDL};
use crate::parsing::normalize::normalize_label;
use crate::summary::aggregate::{find_extremes, group_by_analyte, AnalyteGroup};
use crate::summary::compare::compare;
use crate::summary::outcome::{AnalyteSummary, MatrixReport, MatrixRow, Pick, SummaryReport};
use crate::summary::report::nd_statement;
use std::collections::HashSet;
use tracing::{debug, info};

/// Summarize parsed rows, one entry per analyte.
pub fn summarize(parsed: &ParsedRows, gwps: &GwpsLookup, options: &SummaryOptions) -> SummaryReport {
    let groups = group_by_analyte(&parsed.rows, options.analyte_matching, options.analyte_order);

    let analytes: Vec<AnalyteSummary> = groups
        .iter()
        .map(|group| summarize_group(group, gwps, options))
        .collect();

    let nd_only: Vec<String> = analytes
        .iter()
        .filter(|s| s.all_non_detect)
        .map(|s| s.analyte.clone())
        .collect();

    info!(
        analytes = analytes.len(),
        nd_only = nd_only.len(),
        warnings = parsed.warnings.len(),
        "built summary"
    );

    SummaryReport {
        nd_statement: nd_statement(&nd_only),
        nd_only,
        analytes,
        warnings: parsed.warnings.clone(),
        skipped_rows: parsed.skipped,
    }
}

fn summarize_group(
    group: &AnalyteGroup<'_>,
    gwps: &GwpsLookup,
    options: &SummaryOptions,
) -> AnalyteSummary {
    let extremes = find_extremes(&group.rows);
    let threshold = gwps.get(&group.analyte, options.analyte_matching);
    let gwps_exceedance = compare(&group.rows, threshold, options.exceedance_basis);
    let detections = group.rows.iter().filter(|r| r.result.is_detected()).count();

    debug!(
        analyte = group.analyte.as_str(),
        samples = group.rows.len(),
        detections,
        exceedance = %gwps_exceedance,
        "summarized analyte"
    );

    AnalyteSummary {
        analyte: group.analyte.clone(),
        max: extremes.max.map(Pick::from),
        min: extremes.min.map(Pick::from),
        all_non_detect: extremes.all_non_detect,
        gwps: threshold,
        gwps_exceedance,
        samples: group.rows.len(),
        detections,
    }
}

/// Summarize parsed rows as an analyte-by-well matrix.
///
/// Columns follow the well filter when one is set, listing filtered wells
/// even if they have no rows; otherwise wells appear in first-seen order.
/// Each cell shows the well's greatest detection, else its tightest limit,
/// else "BDL".
pub fn summarize_matrix(
    parsed: &ParsedRows,
    gwps: &GwpsLookup,
    options: &SummaryOptions,
) -> MatrixReport {
    let summary = summarize(parsed, gwps, options);
    let groups = group_by_analyte(&parsed.rows, options.analyte_matching, options.analyte_order);
    let wells = matrix_wells(&parsed.rows, options);

    let rows: Vec<MatrixRow> = groups
        .iter()
        .zip(&summary.analytes)
        .map(|(group, s)| MatrixRow {
            analyte: s.analyte.clone(),
            cells: wells
                .iter()
                .map(|well| well_cell(&group.rows_for_well(well)))
                .collect(),
            min: s.min_value_display(),
            max: s.max_value_display(),
            gwps_exceedance: s.gwps_exceedance,
        })
        .collect();

    MatrixReport {
        wells,
        rows,
        nd_only: summary.nd_only,
        nd_statement: summary.nd_statement,
        warnings: summary.warnings,
    }
}

/// Matrix columns: the well filter in its order, else wells as first seen.
/// Each well appears once.
fn matrix_wells(rows: &[ResultRow], options: &SummaryOptions) -> Vec<String> {
    let mut seen = HashSet::new();
    match options.wells {
        Some(ref wells) => wells
            .iter()
            .map(|w| normalize_label(w))
            .filter(|w| !w.is_empty() && seen.insert(w.clone()))
            .collect(),
        None => rows
            .iter()
            .filter(|r| seen.insert(r.well_id.clone()))
            .map(|r| r.well_id.clone())
            .collect(),
    }
}

fn well_cell(rows: &[&ResultRow]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }
    let extremes = find_extremes(rows);
    let cell = extremes
        .max
        .or(extremes.min)
        .map(|r| r.result.to_string())
        .unwrap_or_else(|| BDL.to_string());
    Some(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalyteMatching, ExceedanceBasis};
    use crate::model::ClassifiedResult;
    use crate::parsing::values::classify;
    use crate::summary::outcome::Exceedance;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn parsed(data: &[(&str, &str, &str, &str)]) -> ParsedRows {
        ParsedRows {
            rows: data
                .iter()
                .enumerate()
                .map(|(i, (well, analyte, raw, date))| ResultRow {
                    row_index: i,
                    well_id: well.to_string(),
                    analyte: analyte.to_string(),
                    raw_result: raw.to_string(),
                    sample_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
                    detection_limit: None,
                    result: classify(raw),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn scenario() -> ParsedRows {
        parsed(&[
            ("MW-1", "Lead", "ND", "2023-01-10"),
            ("MW-2", "Lead", "<2", "2023-01-11"),
            ("MW-1", "Lead", "5.0", "2023-04-10"),
            ("MW-1", "Arsenic", "ND", "2023-01-10"),
            ("MW-2", "Arsenic", "<1", "2023-01-11"),
            ("MW-3", "Chromium", "0.8", "2023-02-01"),
        ])
    }

    #[test]
    fn test_summarize_mixed_analyte() {
        let mut gwps = GwpsLookup::new();
        gwps.insert("Lead", dec!(4.0));
        let report = summarize(&scenario(), &gwps, &SummaryOptions::default());

        let lead = &report.analytes[0];
        assert_eq!(lead.analyte, "Lead");
        assert_eq!(lead.max_value_display(), "5.0");
        assert_eq!(lead.max_well(), "MW-1");
        assert_eq!(lead.max_date(), "2023-04-10");
        assert_eq!(lead.min_value_display(), "<2");
        assert_eq!(lead.min_well(), "MW-2");
        assert_eq!(lead.gwps_exceedance, Exceedance::Yes);
        assert_eq!(lead.samples, 3);
        assert_eq!(lead.detections, 1);
        assert!(!lead.all_non_detect);
    }

    #[test]
    fn test_summarize_all_non_detect() {
        let report = summarize(&scenario(), &GwpsLookup::new(), &SummaryOptions::default());
        let arsenic = &report.analytes[1];
        assert!(arsenic.all_non_detect);
        assert_eq!(arsenic.max_value_display(), "BDL");
        assert_eq!(arsenic.max_well(), "Not Applicable");
        assert_eq!(arsenic.min_value_display(), "<1");
        assert_eq!(arsenic.min_well(), "MW-2");
        assert_eq!(report.nd_only, vec!["Arsenic".to_string()]);
        assert_eq!(
            report.nd_statement,
            "The following constituents resulted in 100% non-detect values: Arsenic."
        );
    }

    #[test]
    fn test_summarize_without_gwps() {
        let report = summarize(&scenario(), &GwpsLookup::new(), &SummaryOptions::default());
        assert_eq!(report.analytes[2].analyte, "Chromium");
        assert_eq!(report.analytes[2].gwps_exceedance, Exceedance::NotApplicable);
    }

    #[test]
    fn test_summarize_below_gwps() {
        let data = parsed(&[("MW-1", "Lead", "3.0", "2023-01-10")]);
        let mut gwps = GwpsLookup::new();
        gwps.insert("Lead", dec!(4.0));
        let report = summarize(&data, &gwps, &SummaryOptions::default());
        assert_eq!(report.analytes[0].gwps_exceedance, Exceedance::No);
    }

    #[test]
    fn test_exceedance_counts_non_max_well() {
        // MW-2 holds the max; MW-1 also exceeds.
        let data = parsed(&[
            ("MW-1", "Lead", "4.5", "2023-01-10"),
            ("MW-2", "Lead", "9", "2023-01-10"),
        ]);
        let mut gwps = GwpsLookup::new();
        gwps.insert("Lead", dec!(4.0));
        let report = summarize(&data, &gwps, &SummaryOptions::default());
        assert_eq!(report.analytes[0].gwps_exceedance, Exceedance::Yes);
    }

    #[test]
    fn test_censored_limit_exceedance_follows_basis() {
        let data = parsed(&[("MW-1", "Lead", "<10", "2023-01-10")]);
        let mut gwps = GwpsLookup::new();
        gwps.insert("Lead", dec!(4.0));
        let all = summarize(&data, &gwps, &SummaryOptions::default());
        assert_eq!(all.analytes[0].gwps_exceedance, Exceedance::Yes);

        let options = SummaryOptions {
            exceedance_basis: ExceedanceBasis::DetectedOnly,
            ..Default::default()
        };
        let detected = summarize(&data, &gwps, &options);
        assert_eq!(detected.analytes[0].gwps_exceedance, Exceedance::No);
    }

    #[test]
    fn test_case_insensitive_merges_and_matches_gwps() {
        let data = parsed(&[
            ("MW-1", "Lead", "1", "2023-01-10"),
            ("MW-2", "LEAD", "6", "2023-01-10"),
        ]);
        let mut gwps = GwpsLookup::new();
        gwps.insert("lead", dec!(4.0));
        let options = SummaryOptions {
            analyte_matching: AnalyteMatching::CaseInsensitive,
            ..Default::default()
        };
        let report = summarize(&data, &gwps, &options);
        assert_eq!(report.analytes.len(), 1);
        assert_eq!(report.analytes[0].analyte, "Lead");
        assert_eq!(report.analytes[0].max_well(), "MW-2");
        assert_eq!(report.analytes[0].gwps_exceedance, Exceedance::Yes);
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let data = scenario();
        let gwps = GwpsLookup::new();
        let options = SummaryOptions::default();
        assert_eq!(
            summarize(&data, &gwps, &options),
            summarize(&data, &gwps, &options)
        );
    }

    #[test]
    fn test_empty_rows_give_empty_report() {
        let report = summarize(&ParsedRows::default(), &GwpsLookup::new(), &SummaryOptions::default());
        assert!(report.analytes.is_empty());
        assert_eq!(
            report.nd_statement,
            "No constituents resulted in 100% non-detect values."
        );
    }

    #[test]
    fn test_matrix_cells() {
        let report = summarize_matrix(&scenario(), &GwpsLookup::new(), &SummaryOptions::default());
        assert_eq!(report.wells, vec!["MW-1", "MW-2", "MW-3"]);

        let lead = &report.rows[0];
        assert_eq!(
            lead.cells,
            vec![Some("5.0".to_string()), Some("<2".to_string()), None]
        );
        assert_eq!(lead.max, "5.0");
        assert_eq!(lead.min, "<2");

        let arsenic = &report.rows[1];
        assert_eq!(
            arsenic.cells,
            vec![Some("BDL".to_string()), Some("<1".to_string()), None]
        );
    }

    #[test]
    fn test_matrix_follows_well_filter_order() {
        let options = SummaryOptions {
            wells: Some(vec!["MW-3".into(), "MW-9".into(), "MW-1".into()]),
            ..Default::default()
        };
        let report = summarize_matrix(&scenario(), &GwpsLookup::new(), &options);
        assert_eq!(report.wells, vec!["MW-3", "MW-9", "MW-1"]);
        assert_eq!(report.rows[0].cells[1], None);
    }

    #[test]
    fn test_matrix_wells_deduplicated() {
        let options = SummaryOptions {
            wells: Some(vec!["MW-2".into(), "MW-1".into(), " MW-2 ".into()]),
            ..Default::default()
        };
        let report = summarize_matrix(&scenario(), &GwpsLookup::new(), &options);
        assert_eq!(report.wells, vec!["MW-2", "MW-1"]);
        assert!(report.rows.iter().all(|r| r.cells.len() == 2));
    }

    #[test]
    fn test_well_cell_prefers_detection() {
        let data = parsed(&[
            ("MW-1", "Lead", "<0.5", "2023-01-10"),
            ("MW-1", "Lead", "0.9", "2023-02-10"),
        ]);
        let rows: Vec<&ResultRow> = data.rows.iter().collect();
        assert_eq!(well_cell(&rows), Some("0.9".to_string()));
        assert_eq!(
            data.rows[0].result,
            ClassifiedResult::CensoredNonDetect(dec!(0.5))
        );
    }
}
