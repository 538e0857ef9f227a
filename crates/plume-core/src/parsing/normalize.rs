use crate::config::AnalyteMatching;

/// Clean a raw result cell.
///
/// Steps:
/// 1. Trim whitespace
/// 2. Collapse any run of "<" markers to one ("<<0.5" -> "<0.5")
pub fn clean_result(raw: &str) -> String {
    let s = raw.trim();
    let rest = s.trim_start_matches('<');
    if rest.len() < s.len() {
        format!("<{}", rest)
    } else {
        s.to_string()
    }
}

/// "ND" in any case.
pub fn is_nd_marker(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("nd")
}

/// Empty, "NR" (not reported) or "NS" (not sampled) in any case.
pub fn is_not_reported(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.eq_ignore_ascii_case("nr") || s.eq_ignore_ascii_case("ns")
}

/// Normalize a well identifier or analyte name for display.
///
/// Trims the ends and collapses inner whitespace runs, which spreadsheet
/// exports sometimes double up ("Lead,  Total").
pub fn normalize_label(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Key used to group analytes and look up thresholds.
pub fn analyte_key(name: &str, matching: AnalyteMatching) -> String {
    let label = normalize_label(name);
    match matching {
        AnalyteMatching::Exact => label,
        AnalyteMatching::CaseInsensitive => label.to_lowercase(),
    }
}
