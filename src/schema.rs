//! Table schema configuration.
//!
//! A [`TableSchema`] controls how query results flatten into a table:
//! which labels become columns, how wire values are cast, and whether a
//! timezone-annotated datetime column is added next to the raw timestamp.

use chrono::FixedOffset;

use crate::error::{PromtableError, Result};
use crate::table::Cell;

/// Conversion strategy applied to every sample value.
///
/// The wire representation is always a string; the default keeps it that
/// way. A closed set of strategies keeps casting behavior testable instead
/// of accepting arbitrary callables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DType {
    /// Keep the wire string unmodified.
    #[default]
    String,

    /// Parse as a signed 64-bit integer.
    Int,

    /// Parse as a 64-bit float. Accepts "NaN", "+Inf" and "-Inf" as sent
    /// by Prometheus.
    Float,

    /// Parse "true"/"false" (also "1"/"0").
    Bool,
}

impl DType {
    /// Returns the dtype name for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
        }
    }

    /// Casts a raw wire value into a table cell.
    pub fn cast(&self, raw: &str) -> Result<Cell> {
        match self {
            Self::String => Ok(Cell::String(raw.to_string())),
            Self::Int => raw
                .parse::<i64>()
                .map(Cell::Int)
                .map_err(|_| self.cast_error(raw)),
            Self::Float => raw
                .parse::<f64>()
                .map(Cell::Float)
                .map_err(|_| self.cast_error(raw)),
            Self::Bool => match raw {
                "true" | "1" => Ok(Cell::Bool(true)),
                "false" | "0" => Ok(Cell::Bool(false)),
                _ => Err(self.cast_error(raw)),
            },
        }
    }

    fn cast_error(&self, raw: &str) -> PromtableError {
        PromtableError::cast(format!("cannot cast {raw:?} to {}", self.as_str()))
    }
}

/// Caller-supplied configuration for result flattening.
///
/// All fields are optional in spirit: an absent schema (passing `None` to
/// [`crate::flatten::flatten`]) means all labels become columns, values stay
/// strings, and no datetime column is emitted.
#[derive(Debug, Clone, Default)]
pub struct TableSchema {
    /// Labels to select as columns, in order. Empty means infer from the
    /// first sample's metric keys.
    pub columns: Vec<String>,

    /// Value conversion strategy.
    pub dtype: DType,

    /// Timezone for the datetime column. Setting this, even to UTC,
    /// is what turns the datetime column on; leaving it unset turns it off.
    pub timezone: Option<FixedOffset>,
}

impl TableSchema {
    /// Creates a schema with default behavior (all labels, string values,
    /// no datetime column).
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects an explicit ordered column list. Every named label must be
    /// present in every sample's metric mapping.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the value conversion strategy.
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = dtype;
        self
    }

    /// Sets the timezone offset and enables the datetime column.
    pub fn with_timezone(mut self, timezone: FixedOffset) -> Self {
        self.timezone = Some(timezone);
        self
    }

    /// Enables the datetime column with the UTC offset.
    pub fn with_utc(self) -> Self {
        self.with_timezone(FixedOffset::east_opt(0).expect("zero offset is valid"))
    }
}
