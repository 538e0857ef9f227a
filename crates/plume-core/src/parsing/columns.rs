use crate::error::PlumeError;
use serde::{Deserialize, Serialize};

/// Maps each logical role to a header in the input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub well: String,
    pub analyte: String,
    pub result: String,
    pub date: String,
    /// Optional per-row detection limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_limit: Option<String>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            well: "Client Sample ID".into(),
            analyte: "Analyte".into(),
            result: "Result".into(),
            date: "Date".into(),
            detection_limit: None,
        }
    }
}

impl ColumnMap {
    /// Role names paired with the mapped header, required roles first.
    pub fn roles(&self) -> Vec<(&'static str, &str)> {
        let mut roles = vec![
            ("well", self.well.as_str()),
            ("analyte", self.analyte.as_str()),
            ("result", self.result.as_str()),
            ("date", self.date.as_str()),
        ];
        if let Some(ref limit) = self.detection_limit {
            roles.push(("detection_limit", limit.as_str()));
        }
        roles
    }

    pub fn validate(&self) -> Result<(), PlumeError> {
        let roles = self.roles();
        for (role, header) in &roles {
            if header.trim().is_empty() {
                return Err(PlumeError::ConfigInvalid(format!(
                    "column for '{role}' must not be empty"
                )));
            }
        }
        for (i, (role, header)) in roles.iter().enumerate() {
            if let Some((other, _)) = roles[..i]
                .iter()
                .find(|(_, h)| h.trim() == header.trim())
            {
                return Err(PlumeError::ConfigInvalid(format!(
                    "column '{}' is mapped to both '{}' and '{}'",
                    header.trim(),
                    other,
                    role
                )));
            }
        }
        Ok(())
    }

    /// Guess a mapping from common lab export headers.
    ///
    /// Roles with no plausible header keep their default name, so a later
    /// column check still names them. Each header is used for one role at most.
    pub fn detect(headers: &[String]) -> ColumnMap {
        let defaults = ColumnMap::default();
        let mut taken: Vec<usize> = Vec::new();

        let mut pick = |rank: fn(&str) -> Option<u8>| -> Option<String> {
            let best = headers
                .iter()
                .enumerate()
                .filter(|(i, _)| !taken.contains(i))
                .filter_map(|(i, h)| rank(&h.trim().to_lowercase()).map(|r| (r, i)))
                .min()?;
            taken.push(best.1);
            Some(headers[best.1].trim().to_string())
        };

        // Date and limit go first so "Sample Date" is never read as a well.
        let date = pick(rank_date);
        let detection_limit = pick(rank_limit);
        let well = pick(rank_well);
        let analyte = pick(rank_analyte);
        let result = pick(rank_result);

        ColumnMap {
            well: well.unwrap_or(defaults.well),
            analyte: analyte.unwrap_or(defaults.analyte),
            result: result.unwrap_or(defaults.result),
            date: date.unwrap_or(defaults.date),
            detection_limit,
        }
    }
}

fn rank_well(h: &str) -> Option<u8> {
    if h.contains("client") && h.contains("sample") {
        Some(0)
    } else if h == "well" || h.starts_with("well ") || h.contains("well id") {
        Some(1)
    } else if h.contains("location") {
        Some(2)
    } else if h == "sample id" {
        Some(3)
    } else {
        None
    }
}

fn rank_analyte(h: &str) -> Option<u8> {
    if h.contains("analyte") {
        Some(0)
    } else if h.contains("constituent") {
        Some(1)
    } else if h.contains("parameter") || h.contains("chemical") {
        Some(2)
    } else {
        None
    }
}

fn rank_result(h: &str) -> Option<u8> {
    if h == "result" {
        Some(0)
    } else if h.contains("result") && !h.contains("unit") && !h.contains("qual") {
        Some(1)
    } else if h.contains("concentration") {
        Some(2)
    } else if h == "value" {
        Some(3)
    } else {
        None
    }
}

fn rank_date(h: &str) -> Option<u8> {
    if h == "date" || h == "sample date" {
        Some(0)
    } else if h.contains("date") && !h.contains("analy") && !h.contains("prep") {
        Some(1)
    } else {
        None
    }
}

fn rank_limit(h: &str) -> Option<u8> {
    match h {
        "high limit" | "detection limit" => Some(0),
        "reporting limit" | "rl" | "mdl" | "dl" | "pql" => Some(1),
        _ if h.contains("detection limit") || h.contains("reporting limit") => Some(2),
        _ => None,
    }
}
