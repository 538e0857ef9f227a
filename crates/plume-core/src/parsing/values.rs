use crate::config::NdWithLimit;
use crate::model::ClassifiedResult;
use crate::parsing::normalize::{clean_result, is_nd_marker, is_not_reported};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// A recoverable problem found while classifying a result string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueIssue {
    /// "<" followed by something that is not a non-negative number.
    BadLimit(String),
    /// Text that is neither a number nor a known marker.
    NotANumber(String),
    /// A number too large, or with too many decimal places, for a 96-bit
    /// decimal (magnitude up to about 7.9e28, 28 decimal places).
    OutOfRange(String),
}

impl fmt::Display for ValueIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueIssue::BadLimit(raw) => {
                write!(f, "unparseable detection limit in result '{raw}'")
            }
            ValueIssue::NotANumber(raw) => {
                write!(f, "unrecognized result '{raw}' treated as non-detect")
            }
            ValueIssue::OutOfRange(raw) => {
                write!(f, "result '{raw}' is outside the supported numeric range, treated as non-detect")
            }
        }
    }
}

/// Classify a raw lab result with no paired detection limit.
///
/// Handles formats like:
/// - "3.2" -> Detected(3.2)
/// - "<0.5", "< 0.5", "<<0.5" -> CensoredNonDetect(0.5)
/// - "ND", "nd", "NR", "NS", "" -> UnqualifiedNonDetect
/// - "0", "-1", "abc" -> UnqualifiedNonDetect
pub fn classify(raw: &str) -> ClassifiedResult {
    classify_detailed(raw, None, NdWithLimit::Censor).0
}

/// Classify a raw lab result, using the row's detection limit where the
/// result itself carries none.
///
/// Total: every input maps to a variant. Inputs that looked like data but
/// could not be read also return the issue, so callers can report it.
pub fn classify_detailed(
    raw: &str,
    detection_limit: Option<Decimal>,
    nd_policy: NdWithLimit,
) -> (ClassifiedResult, Option<ValueIssue>) {
    let s = clean_result(raw);

    // Not-reported markers only reach here when kept as non-detects, so they
    // follow the same limit policy as "ND".
    if is_nd_marker(&s) || is_not_reported(&s) {
        return match (detection_limit, nd_policy) {
            (Some(limit), NdWithLimit::Censor) => (ClassifiedResult::CensoredNonDetect(limit), None),
            _ => (ClassifiedResult::UnqualifiedNonDetect, None),
        };
    }

    if let Some(rest) = s.strip_prefix('<') {
        let rest = rest.trim();
        if rest.is_empty() {
            return match detection_limit {
                Some(limit) => (ClassifiedResult::CensoredNonDetect(limit), None),
                None => (
                    ClassifiedResult::UnqualifiedNonDetect,
                    Some(ValueIssue::BadLimit(s)),
                ),
            };
        }
        return match parse_decimal(rest) {
            Some(limit) if limit >= Decimal::ZERO => (ClassifiedResult::CensoredNonDetect(limit), None),
            _ => {
                let fallback = match detection_limit {
                    Some(limit) => ClassifiedResult::CensoredNonDetect(limit),
                    None => ClassifiedResult::UnqualifiedNonDetect,
                };
                let issue = if is_out_of_range(rest) {
                    ValueIssue::OutOfRange(s)
                } else {
                    ValueIssue::BadLimit(s)
                };
                (fallback, Some(issue))
            }
        };
    }

    match parse_decimal(&s) {
        Some(v) if v > Decimal::ZERO => (ClassifiedResult::Detected(v), None),
        Some(_) => (ClassifiedResult::UnqualifiedNonDetect, None),
        None if is_out_of_range(&s) => (
            ClassifiedResult::UnqualifiedNonDetect,
            Some(ValueIssue::OutOfRange(s)),
        ),
        None => (
            ClassifiedResult::UnqualifiedNonDetect,
            Some(ValueIssue::NotANumber(s)),
        ),
    }
}

/// Numeric text that `parse_decimal` rejected only for its magnitude or
/// precision ("9e28", "1E-40").
fn is_out_of_range(s: &str) -> bool {
    let s = s.trim();
    let numeric = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    numeric && s.parse::<f64>().is_ok_and(|v| v.is_finite())
}

/// Parse a decimal in plain ("0.030") or scientific ("3E-2") notation.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    match Decimal::from_str(s) {
        Ok(v) => Some(v),
        Err(_) if s.contains(['e', 'E']) => Decimal::from_scientific(s).ok(),
        Err(_) => None,
    }
}

/// Parse a detection-limit cell. A leading "<" is tolerated.
pub fn parse_limit(s: &str) -> Option<Decimal> {
    let s = s.trim();
    let s = s.strip_prefix('<').unwrap_or(s);
    parse_decimal(s).filter(|v| *v >= Decimal::ZERO)
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a sample date. Unparseable text yields `None`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // "1/5/23": a two-digit year would otherwise parse as year 23 under %Y.
    let parts: Vec<&str> = s.split('/').collect();
    if parts.len() == 3 && parts[2].len() == 2 {
        return NaiveDate::parse_from_str(s, "%m/%d/%y").ok();
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}
