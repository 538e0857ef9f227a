use crate::config::ExceedanceBasis;
use crate::model::ResultRow;
use crate::summary::outcome::Exceedance;
use crate::summary::resolve::effective_value;
use rust_decimal::Decimal;

/// Compare every row of an analyte against its GWPS.
///
/// No threshold gives `NotApplicable`. Otherwise any effective value
/// strictly above the threshold is an exceedance, so one well's reading
/// counts even when another well holds the reported maximum.
pub fn compare(
    rows: &[&ResultRow],
    threshold: Option<Decimal>,
    basis: ExceedanceBasis,
) -> Exceedance {
    let Some(threshold) = threshold else {
        return Exceedance::NotApplicable;
    };

    let exceeds = rows
        .iter()
        .filter(|r| basis == ExceedanceBasis::AllRows || r.result.is_detected())
        .filter_map(|r| effective_value(&r.result))
        .any(|v| v > threshold);

    if exceeds {
        Exceedance::Yes
    } else {
        Exceedance::No
    }
}
