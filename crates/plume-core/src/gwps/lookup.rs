use crate::config::AnalyteMatching;
use crate::parsing::normalize::normalize_label;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Groundwater protection standards, keyed by analyte name.
///
/// Serializes as a JSON object of quoted decimals:
/// `{"Lead": "0.015", "Arsenic": "0.01"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GwpsLookup {
    thresholds: BTreeMap<String, Decimal>,
}

impl GwpsLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a threshold. The first value for a name wins; returns false when
    /// the name was already present.
    pub fn insert(&mut self, analyte: &str, threshold: Decimal) -> bool {
        let key = normalize_label(analyte);
        if self.thresholds.contains_key(&key) {
            return false;
        }
        self.thresholds.insert(key, threshold);
        true
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Threshold for an analyte. Exact trimmed match, or case-folded when
    /// analytes are matched case-insensitively.
    pub fn get(&self, analyte: &str, matching: AnalyteMatching) -> Option<Decimal> {
        let key = normalize_label(analyte);
        if let Some(&t) = self.thresholds.get(&key) {
            return Some(t);
        }
        match matching {
            AnalyteMatching::Exact => None,
            AnalyteMatching::CaseInsensitive => {
                let folded = key.to_lowercase();
                self.thresholds
                    .iter()
                    .find(|(name, _)| name.to_lowercase() == folded)
                    .map(|(_, &t)| t)
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.thresholds.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exact_lookup() {
        let mut gwps = GwpsLookup::new();
        gwps.insert(" Lead ", dec!(4.0));
        assert_eq!(gwps.get("Lead", AnalyteMatching::Exact), Some(dec!(4.0)));
        assert_eq!(gwps.get("LEAD", AnalyteMatching::Exact), None);
        assert_eq!(gwps.get("Chromium", AnalyteMatching::Exact), None);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut gwps = GwpsLookup::new();
        gwps.insert("Lead", dec!(4.0));
        assert_eq!(gwps.get("LEAD", AnalyteMatching::CaseInsensitive), Some(dec!(4.0)));
    }

    #[test]
    fn test_first_insert_wins() {
        let mut gwps = GwpsLookup::new();
        assert!(gwps.insert("Lead", dec!(4.0)));
        assert!(!gwps.insert("Lead", dec!(9.0)));
        assert_eq!(gwps.get("Lead", AnalyteMatching::Exact), Some(dec!(4.0)));
        assert_eq!(gwps.len(), 1);
    }
}
