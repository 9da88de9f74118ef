//! Loosely-typed tabular rows as delivered by a data source.
//!
//! A [`RawRecord`] keeps the column order of the source header row. Cells are
//! never trusted: every accessor that produces a typed value falls back to a
//! default instead of failing, and reports whether it had to.

use serde::{Deserialize, Serialize};

/// One cell of a source row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Blank,
}

impl CellValue {
    /// Build a cell from text, mapping empty strings to [`CellValue::Blank`].
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            CellValue::Blank
        } else {
            CellValue::Text(value)
        }
    }

    /// Build a cell from a JSON value returned by a REST source.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Blank,
            serde_json::Value::String(s) => CellValue::text(s.clone()),
            serde_json::Value::Number(n) => n.as_f64().map_or(CellValue::Blank, CellValue::Number),
            serde_json::Value::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.into()),
            other => CellValue::Text(other.to_string()),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Blank => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Textual rendering of the cell. Integral numbers render without a
    /// fractional part so that `45.0` reads back as `"45"`.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Blank => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
        }
    }

    /// Parse as a non-negative integer. Fractions, negatives, and anything
    /// non-numeric yield `None`.
    pub fn as_count(&self) -> Option<u32> {
        match self {
            CellValue::Blank => None,
            CellValue::Text(s) => s.trim().parse::<u32>().ok(),
            CellValue::Number(n) => {
                if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64 {
                    Some(*n as u32)
                } else {
                    None
                }
            }
        }
    }

    /// Parse as a finite float.
    pub fn as_float(&self) -> Option<f64> {
        let value = match self {
            CellValue::Blank => return None,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Number(n) => *n,
        };
        value.is_finite().then_some(value)
    }
}

/// A single source row: column name to cell, in header order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    cells: Vec<(String, CellValue)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell, builder style.
    pub fn with(mut self, column: impl Into<String>, value: CellValue) -> Self {
        self.push(column, value);
        self
    }

    /// Append a text cell, builder style.
    pub fn with_text(self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(column, CellValue::text(value))
    }

    pub fn push(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.push((column.into(), value));
    }

    /// First cell whose column name matches exactly.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// First cell present under any of the given column aliases.
    pub fn get_any<'a, I>(&self, columns: I) -> Option<&CellValue>
    where
        I: IntoIterator<Item = &'a str>,
    {
        columns.into_iter().find_map(|column| self.get(column))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when every cell is blank. Such rows are padding in the sheet.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_blank())
    }
}

impl FromIterator<(String, CellValue)> for RawRecord {
    fn from_iter<T: IntoIterator<Item = (String, CellValue)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
