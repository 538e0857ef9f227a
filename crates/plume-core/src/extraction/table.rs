use crate::error::PlumeError;
use serde::{Deserialize, Serialize};

/// A rectangular table of text cells with one header row.
///
/// Cells are kept as text, exactly as the lab delivered them; typing happens
/// later, during row parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, trimming headers and padding short rows with empty cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, PlumeError> {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let width = headers.len();

        let mut padded = Vec::with_capacity(rows.len());
        for (i, mut row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(PlumeError::InvalidTable(format!(
                    "row {} has {} cells but the header has {}",
                    i,
                    row.len(),
                    width
                )));
            }
            row.resize(width, String::new());
            padded.push(row);
        }

        Ok(Table {
            headers,
            rows: padded,
        })
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column whose trimmed header equals `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|h| h == name)
    }

    /// Cell text, or "" when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// Resolve column names to indices, failing with every missing name at once.
    pub fn require_columns(&self, names: &[&str]) -> Result<Vec<usize>, PlumeError> {
        let mut indices = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column_index(name) {
                Some(idx) => indices.push(idx),
                None => missing.push(name.trim().to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(PlumeError::MissingColumns {
                missing,
                available: self.headers.clone(),
            });
        }
        Ok(indices)
    }

    /// Reshape a wide table (one column per analyte) into long format.
    ///
    /// Output columns are the id columns, then `var_name` (holding the source
    /// column header) and `value_name` (holding the cell). Rows are emitted
    /// column by column, in source row order within each column.
    pub fn melt(
        &self,
        id_columns: &[&str],
        value_columns: &[&str],
        var_name: &str,
        value_name: &str,
    ) -> Result<Table, PlumeError> {
        if value_columns.is_empty() {
            return Err(PlumeError::InvalidTable(
                "at least one analyte column must be selected".into(),
            ));
        }
        for value_col in value_columns {
            let value_col = value_col.trim();
            if id_columns.iter().any(|id| id.trim() == value_col) {
                return Err(PlumeError::InvalidTable(format!(
                    "column '{value_col}' cannot be both an id column and an analyte column"
                )));
            }
        }

        let id_idx = self.require_columns(id_columns)?;
        let value_idx = self.require_columns(value_columns)?;

        let mut headers: Vec<String> = id_idx.iter().map(|&i| self.headers[i].clone()).collect();
        headers.push(var_name.to_string());
        headers.push(value_name.to_string());

        let mut rows = Vec::with_capacity(self.rows.len() * value_idx.len());
        for &v in &value_idx {
            for r in 0..self.len() {
                let mut out: Vec<String> =
                    id_idx.iter().map(|&i| self.cell(r, i).to_string()).collect();
                out.push(self.headers[v].clone());
                out.push(self.cell(r, v).to_string());
                rows.push(out);
            }
        }

        Table::new(headers, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn wide() -> Table {
        Table::new(
            strings(&[" Well ", "Date", "Lead", "Arsenic"]),
            vec![
                strings(&["MW-1", "2023-01-01", "5.0", "ND"]),
                strings(&["MW-2", "2023-01-02", "<2", "0.4"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_headers_trimmed() {
        let t = wide();
        assert_eq!(t.headers[0], "Well");
        assert_eq!(t.column_index("Well"), Some(0));
        assert_eq!(t.column_index(" Lead "), Some(2));
    }

    #[test]
    fn test_short_rows_padded() {
        let t = Table::new(strings(&["A", "B", "C"]), vec![strings(&["1"])]).unwrap();
        assert_eq!(t.rows[0], strings(&["1", "", ""]));
    }

    #[test]
    fn test_long_rows_rejected() {
        let result = Table::new(strings(&["A"]), vec![strings(&["1", "2"])]);
        assert!(matches!(result, Err(PlumeError::InvalidTable(_))));
    }

    #[test]
    fn test_require_columns_lists_all_missing() {
        let err = wide().require_columns(&["Well", "Result", "Analyte"]).unwrap_err();
        match err {
            PlumeError::MissingColumns { missing, available } => {
                assert_eq!(missing, vec!["Result", "Analyte"]);
                assert_eq!(available, vec!["Well", "Date", "Lead", "Arsenic"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_melt() {
        let long = wide()
            .melt(&["Well", "Date"], &["Lead", "Arsenic"], "Constituent", "Result")
            .unwrap();
        assert_eq!(long.headers, strings(&["Well", "Date", "Constituent", "Result"]));
        assert_eq!(long.len(), 4);
        assert_eq!(long.rows[0], strings(&["MW-1", "2023-01-01", "Lead", "5.0"]));
        assert_eq!(long.rows[1], strings(&["MW-2", "2023-01-02", "Lead", "<2"]));
        assert_eq!(long.rows[3], strings(&["MW-2", "2023-01-02", "Arsenic", "0.4"]));
    }

    #[test]
    fn test_melt_rejects_id_as_value() {
        let result = wide().melt(&["Well", "Date"], &["Well"], "Constituent", "Result");
        assert!(matches!(result, Err(PlumeError::InvalidTable(_))));
    }

    #[test]
    fn test_melt_requires_value_columns() {
        assert!(wide().melt(&["Well"], &[], "Constituent", "Result").is_err());
    }
}
