use crate::model::ClassifiedResult;
use rust_decimal::Decimal;

/// A classified result split into its ordering value and its display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Surrogate used for min/max ordering and threshold comparison.
    /// `None` for unqualified non-detects, which never rank.
    pub effective: Option<Decimal>,
    /// What the report shows: "5.0", "<0.5" or "BDL".
    pub display: String,
}

pub fn resolve(result: &ClassifiedResult) -> Resolved {
    Resolved {
        effective: effective_value(result),
        display: result.to_string(),
    }
}

pub fn effective_value(result: &ClassifiedResult) -> Option<Decimal> {
    match result {
        ClassifiedResult::Detected(v) => Some(*v),
        ClassifiedResult::CensoredNonDetect(limit) => Some(*limit),
        ClassifiedResult::UnqualifiedNonDetect => None,
    }
}
