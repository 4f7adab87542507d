use google_sheets4::api::ValueRange;
use serde_json::Value;

pub trait ValueRangeFactory {
    fn from_row<T: AsRef<str>>(cells: &[T]) -> Self;
}

impl ValueRangeFactory for ValueRange {
    fn from_row<T: AsRef<str>>(cells: &[T]) -> Self {
        ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: None,
            values: Some(vec![cells
                .iter()
                .map(|cell| Value::String(cell.as_ref().to_owned()))
                .collect()]),
        }
    }
}

/// Flattens the JSON cells of a fetched range into display strings, keeping the row shape.
pub fn value_range_rows(value_range: ValueRange) -> Vec<Vec<String>> {
    value_range
        .values
        .unwrap_or_default()
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect()
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
