//! Tabular output types.
//!
//! A [`Table`] is a fixed column-name header plus rows of [`Cell`] values,
//! ready to be handed to a dataframe library or rendered directly.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell in a flattened result table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Cell {
    /// Floating point number (timestamps, float-cast values).
    Float(f64),

    /// Signed integer.
    Int(i64),

    /// Boolean value.
    Bool(bool),

    /// Text value (label values, uncast sample values).
    String(String),

    /// Timezone-aware datetime.
    DateTime(DateTime<FixedOffset>),
}

impl Cell {
    /// Converts the cell to a display string.
    pub fn to_display_string(&self) -> String {
        match self {
            Cell::Float(f) => f.to_string(),
            Cell::Int(i) => i.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::String(s) => s.clone(),
            Cell::DateTime(dt) => dt.to_rfc3339(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Cell::Bool(v)
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::String(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::String(v.to_string())
    }
}

impl From<DateTime<FixedOffset>> for Cell {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Cell::DateTime(v)
    }
}

/// A row of cells; its shape always matches the table header.
pub type Row = Vec<Cell>;

/// Flattened query results: a header computed once, plus data rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    /// Column names, in row order.
    pub columns: Vec<String>,

    /// Data rows, in sample order.
    pub rows: Vec<Row>,
}

impl Table {
    /// Creates a table with the given header and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Number of columns in the header.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the index of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}
