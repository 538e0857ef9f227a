pub mod columns;
pub mod normalize;
pub mod values;

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::{NotReported, SummaryOptions};
use crate::error::PlumeError;
use crate::extraction::Table;
use crate::model::{ParsedRows, ResultRow, RowWarning};
use columns::ColumnMap;
use normalize::{clean_result, is_not_reported, normalize_label};
use values::{classify_detailed, parse_date, parse_limit};

/// Turn a raw lab table into classified result rows.
///
/// Every mapped column must exist before any row is read. Rows without a
/// well or analyte are dropped, as are not-reported results under
/// `NotReported::Skip`. Malformed cells never fail the batch; they are
/// recorded as warnings. A well filter that matches no rows, or that names a
/// well twice, is an error.
pub fn parse_rows(
    table: &Table,
    columns: &ColumnMap,
    options: &SummaryOptions,
) -> Result<ParsedRows, PlumeError> {
    options.validate()?;
    let required: Vec<&str> = columns.roles().into_iter().map(|(_, h)| h).collect();
    let idx = table.require_columns(&required)?;
    let (well_col, analyte_col, result_col, date_col) = (idx[0], idx[1], idx[2], idx[3]);
    let limit_col = idx.get(4).copied();

    if table.is_empty() {
        return Err(PlumeError::EmptyTable);
    }

    let well_filter: Option<HashSet<String>> = options
        .wells
        .as_ref()
        .map(|wells| wells.iter().map(|w| normalize_label(w)).collect());

    let mut parsed = ParsedRows::default();
    let mut matched = 0usize;

    for i in 0..table.len() {
        let well_id = normalize_label(table.cell(i, well_col));

        if let Some(ref filter) = well_filter {
            if !filter.contains(&well_id) {
                parsed.filtered += 1;
                continue;
            }
        }
        matched += 1;

        let analyte = normalize_label(table.cell(i, analyte_col));
        if well_id.is_empty() || analyte.is_empty() {
            parsed.skipped += 1;
            push_warning(&mut parsed, i, "missing well id or analyte, row skipped".into());
            continue;
        }

        let raw_result = clean_result(table.cell(i, result_col));
        if options.not_reported == NotReported::Skip && is_not_reported(&raw_result) {
            parsed.skipped += 1;
            continue;
        }

        let date_text = table.cell(i, date_col).trim();
        let sample_date = parse_date(date_text);
        if sample_date.is_none() && !date_text.is_empty() {
            push_warning(
                &mut parsed,
                i,
                format!("unparseable sample date '{date_text}'"),
            );
        }

        let detection_limit = match limit_col {
            Some(col) => {
                let text = table.cell(i, col).trim();
                let limit = parse_limit(text);
                if limit.is_none() && !text.is_empty() {
                    push_warning(
                        &mut parsed,
                        i,
                        format!("unparseable detection limit '{text}'"),
                    );
                }
                limit
            }
            None => None,
        };

        let (result, issue) = classify_detailed(&raw_result, detection_limit, options.nd_with_limit);
        if let Some(issue) = issue {
            push_warning(&mut parsed, i, issue.to_string());
        }

        parsed.rows.push(ResultRow {
            row_index: i,
            well_id,
            analyte,
            raw_result,
            sample_date,
            detection_limit,
            result,
        });
    }

    if let Some(ref wells) = options.wells {
        if matched == 0 {
            return Err(PlumeError::EmptySelection {
                criteria: format!("wells: {}", wells.join(", ")),
            });
        }
    }

    debug!(
        rows = parsed.rows.len(),
        skipped = parsed.skipped,
        filtered = parsed.filtered,
        warnings = parsed.warnings.len(),
        "parsed lab table"
    );

    Ok(parsed)
}

/// Read a wells list: the first column of a table, blanks dropped,
/// duplicates removed, order kept.
pub fn wells_from_table(table: &Table) -> Result<Vec<String>, PlumeError> {
    if table.headers.is_empty() {
        return Err(PlumeError::InvalidTable("wells list has no columns".into()));
    }
    let mut seen = HashSet::new();
    let wells: Vec<String> = (0..table.len())
        .map(|i| normalize_label(table.cell(i, 0)))
        .filter(|w| !w.is_empty())
        .filter(|w| seen.insert(w.clone()))
        .collect();
    if wells.is_empty() {
        return Err(PlumeError::InvalidTable("wells list is empty".into()));
    }
    Ok(wells)
}

fn push_warning(parsed: &mut ParsedRows, row: usize, message: String) {
    warn!(row, "{}", message);
    parsed.warnings.push(RowWarning { row, message });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NdWithLimit;
    use crate::model::ClassifiedResult;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    fn lab(rows: &[&[&str]]) -> Table {
        table(&["Client Sample ID", "Analyte", "Result", "Date"], rows)
    }

    #[test]
    fn test_parse_basic_rows() {
        let t = lab(&[
            &[" MW-1 ", "Lead ", "5.0", "2023-03-01"],
            &["MW-2", "Lead", "<<2", "2023-02-01"],
            &["MW-1", "Lead", "ND", "2023-01-01"],
        ]);
        let parsed = parse_rows(&t, &ColumnMap::default(), &SummaryOptions::default()).unwrap();
        assert_eq!(parsed.rows.len(), 3);
        assert_eq!(parsed.rows[0].well_id, "MW-1");
        assert_eq!(parsed.rows[0].analyte, "Lead");
        assert_eq!(parsed.rows[0].result, ClassifiedResult::Detected(dec!(5.0)));
        assert_eq!(parsed.rows[1].raw_result, "<2");
        assert_eq!(parsed.rows[1].result, ClassifiedResult::CensoredNonDetect(dec!(2)));
        assert_eq!(parsed.rows[2].result, ClassifiedResult::UnqualifiedNonDetect);
        assert_eq!(
            parsed.rows[0].sample_date,
            NaiveDate::from_ymd_opt(2023, 3, 1)
        );
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_missing_columns_listed_before_rows() {
        let t = table(&["Well", "Analyte", "Value"], &[]);
        let err = parse_rows(&t, &ColumnMap::default(), &SummaryOptions::default()).unwrap_err();
        match err {
            PlumeError::MissingColumns { missing, available } => {
                assert_eq!(missing, vec!["Client Sample ID", "Result", "Date"]);
                assert_eq!(available, vec!["Well", "Analyte", "Value"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_limit_column_is_schema_error() {
        let t = lab(&[&["MW-1", "Lead", "1", "2023-01-01"]]);
        let columns = ColumnMap {
            detection_limit: Some("RL".into()),
            ..ColumnMap::default()
        };
        let err = parse_rows(&t, &columns, &SummaryOptions::default()).unwrap_err();
        assert!(err.to_string().contains("RL"));
    }

    #[test]
    fn test_empty_table() {
        let t = lab(&[]);
        assert!(matches!(
            parse_rows(&t, &ColumnMap::default(), &SummaryOptions::default()),
            Err(PlumeError::EmptyTable)
        ));
    }

    #[test]
    fn test_well_filter() {
        let t = lab(&[
            &["MW-1", "Lead", "1", "2023-01-01"],
            &["MW-2", "Lead", "2", "2023-01-01"],
        ]);
        let options = SummaryOptions {
            wells: Some(vec!["MW-2".into()]),
            ..SummaryOptions::default()
        };
        let parsed = parse_rows(&t, &ColumnMap::default(), &options).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].well_id, "MW-2");
        assert_eq!(parsed.filtered, 1);
    }

    #[test]
    fn test_well_filter_matching_nothing_is_error() {
        let t = lab(&[&["MW-1", "Lead", "1", "2023-01-01"]]);
        let options = SummaryOptions {
            wells: Some(vec!["MW-9".into(), "MW-10".into()]),
            ..SummaryOptions::default()
        };
        let err = parse_rows(&t, &ColumnMap::default(), &options).unwrap_err();
        match err {
            PlumeError::EmptySelection { criteria } => {
                assert!(criteria.contains("MW-9"));
                assert!(criteria.contains("MW-10"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_not_reported_skipped_by_default() {
        let t = lab(&[
            &["MW-1", "Lead", "NR", "2023-01-01"],
            &["MW-1", "Lead", "", "2023-01-02"],
            &["MW-1", "Lead", "ND", "2023-01-03"],
        ]);
        let parsed = parse_rows(&t, &ColumnMap::default(), &SummaryOptions::default()).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn test_not_reported_kept_as_non_detect() {
        let t = lab(&[&["MW-1", "Lead", "NS", "2023-01-01"]]);
        let options = SummaryOptions {
            not_reported: NotReported::NonDetect,
            ..SummaryOptions::default()
        };
        let parsed = parse_rows(&t, &ColumnMap::default(), &options).unwrap();
        assert_eq!(parsed.rows[0].result, ClassifiedResult::UnqualifiedNonDetect);
    }

    #[test]
    fn test_blank_well_or_analyte_skipped_with_warning() {
        let t = lab(&[
            &["", "Lead", "1", "2023-01-01"],
            &["MW-1", " ", "1", "2023-01-01"],
        ]);
        let parsed = parse_rows(&t, &ColumnMap::default(), &SummaryOptions::default()).unwrap();
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.skipped, 2);
        assert_eq!(parsed.warnings.len(), 2);
    }

    #[test]
    fn test_detection_limit_column() {
        let t = table(
            &["Client Sample ID", "Analyte", "Result", "Date", "High Limit"],
            &[
                &["MW-1", "Lead", "ND", "2023-01-01", "2"],
                &["MW-1", "Lead", "ND", "2023-01-02", "n/a"],
            ],
        );
        let columns = ColumnMap {
            detection_limit: Some("High Limit".into()),
            ..ColumnMap::default()
        };
        let parsed = parse_rows(&t, &columns, &SummaryOptions::default()).unwrap();
        assert_eq!(parsed.rows[0].result, ClassifiedResult::CensoredNonDetect(dec!(2)));
        assert_eq!(parsed.rows[1].result, ClassifiedResult::UnqualifiedNonDetect);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].row, 1);

        let options = SummaryOptions {
            nd_with_limit: NdWithLimit::Ignore,
            ..SummaryOptions::default()
        };
        let parsed = parse_rows(&t, &columns, &options).unwrap();
        assert_eq!(parsed.rows[0].result, ClassifiedResult::UnqualifiedNonDetect);
    }

    #[test]
    fn test_malformed_cells_warn_but_parse() {
        let t = lab(&[
            &["MW-1", "Lead", "<abc", "yesterday"],
            &["MW-1", "Lead", "7", "2023-01-01"],
        ]);
        let parsed = parse_rows(&t, &ColumnMap::default(), &SummaryOptions::default()).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].result, ClassifiedResult::UnqualifiedNonDetect);
        assert_eq!(parsed.rows[0].sample_date, None);
        assert_eq!(parsed.warnings.len(), 2);
        assert!(parsed.warnings.iter().all(|w| w.row == 0));
    }

    #[test]
    fn test_duplicate_well_filter_rejected() {
        let t = lab(&[&["MW-1", "Lead", "5", "2023-01-01"]]);
        let options = SummaryOptions {
            wells: Some(vec!["MW-1".into(), " MW-1".into()]),
            ..SummaryOptions::default()
        };
        assert!(matches!(
            parse_rows(&t, &ColumnMap::default(), &options),
            Err(PlumeError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_short_rows_from_serde_are_padded() {
        let t: Table = serde_json::from_str(
            r#"{"headers":["Client Sample ID","Analyte","Result","Date"],"rows":[["MW-1","Lead"],["MW-2","Lead","3"]]}"#,
        )
        .unwrap();

        let parsed = parse_rows(&t, &ColumnMap::default(), &SummaryOptions::default()).unwrap();
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].well_id, "MW-2");
        assert_eq!(parsed.rows[0].sample_date, None);

        let options = SummaryOptions {
            not_reported: NotReported::NonDetect,
            ..SummaryOptions::default()
        };
        let parsed = parse_rows(&t, &ColumnMap::default(), &options).unwrap();
        assert_eq!(parsed.rows[0].result, ClassifiedResult::UnqualifiedNonDetect);
    }

    #[test]
    fn test_not_reported_uses_row_limit() {
        let t = table(
            &["Client Sample ID", "Analyte", "Result", "Date", "RL"],
            &[
                &["MW-1", "Lead", "", "2023-01-01", "0.5"],
                &["MW-2", "Lead", "NR", "2023-01-02", "0.2"],
            ],
        );
        let columns = ColumnMap {
            detection_limit: Some("RL".into()),
            ..ColumnMap::default()
        };
        let options = SummaryOptions {
            not_reported: NotReported::NonDetect,
            ..SummaryOptions::default()
        };
        let parsed = parse_rows(&t, &columns, &options).unwrap();
        assert_eq!(parsed.rows[0].result, ClassifiedResult::CensoredNonDetect(dec!(0.5)));
        assert_eq!(parsed.rows[1].result, ClassifiedResult::CensoredNonDetect(dec!(0.2)));
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_wells_from_table() {
        let t = table(&["Well"], &[&["MW-2"], &[" MW-1 "], &[""], &["MW-2"]]);
        assert_eq!(wells_from_table(&t).unwrap(), vec!["MW-2", "MW-1"]);
    }

    #[test]
    fn test_wells_from_empty_table() {
        let t = table(&["Well"], &[]);
        assert!(wells_from_table(&t).is_err());
    }
}
