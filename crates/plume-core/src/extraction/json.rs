use serde_json::Value;

use crate::error::PlumeError;
use crate::extraction::{Table, TableReader};

/// Reader for JSON tables.
///
/// Accepts either an array of flat records (`[{"Analyte": "Lead", ...}]`),
/// where the header is the union of record keys, or the serialized `Table`
/// form (`{"headers": [...], "rows": [[...]]}`).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReader;

impl TableReader for JsonReader {
    fn read_table(&self, bytes: &[u8]) -> Result<Table, PlumeError> {
        let value: Value = serde_json::from_slice(bytes)?;
        match value {
            Value::Array(records) => records_to_table(&records),
            Value::Object(_) => {
                let table: Table = serde_json::from_value(value)?;
                Table::new(table.headers, table.rows)
            }
            _ => Err(PlumeError::InvalidTable(
                "expected an array of records or a table object".into(),
            )),
        }
    }

    fn backend_name(&self) -> &str {
        "json"
    }
}

/// Render a table as an array of flat records, the inverse of the reader.
pub fn table_to_records(table: &Table) -> Value {
    let records = table
        .rows
        .iter()
        .map(|row| {
            let map = table
                .headers
                .iter()
                .zip(row)
                .map(|(h, c)| (h.clone(), Value::String(c.clone())))
                .collect::<serde_json::Map<_, _>>();
            Value::Object(map)
        })
        .collect();
    Value::Array(records)
}

fn records_to_table(records: &[Value]) -> Result<Table, PlumeError> {
    let mut headers: Vec<String> = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let obj = record.as_object().ok_or_else(|| {
            PlumeError::InvalidTable(format!("record {i} is not an object"))
        })?;
        for key in obj.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }

    let mut rows = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        // Checked above.
        let Some(obj) = record.as_object() else {
            continue;
        };
        let mut row = Vec::with_capacity(headers.len());
        for header in &headers {
            let cell = match obj.get(header) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.trim().to_string(),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                Some(_) => {
                    return Err(PlumeError::InvalidTable(format!(
                        "record {i} field '{header}' is not a scalar"
                    )))
                }
            };
            row.push(cell);
        }
        rows.push(row);
    }

    Table::new(headers, rows)
}
