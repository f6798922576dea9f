//! Range query endpoint (`/api/v1/query_range`).

use chrono::{DateTime, Utc};

use crate::api::Endpoint;
use crate::error::{PromtableError, Result};

/// A time-ranged query returning a series of samples per series
/// (matrix result).
///
/// Start, end, and step are all mandatory; the step uses Prometheus
/// duration syntax (e.g. `"15s"`, `"1m"`).
#[derive(Debug, Clone)]
pub struct RangeQuery {
    query: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: String,
}

impl RangeQuery {
    /// Creates a range query over `[start, end]` with the given resolution.
    pub fn new(
        query: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            start,
            end,
            step: step.into(),
        }
    }

    /// The PromQL expression being queried.
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl Endpoint for RangeQuery {
    fn path_and_query(&self) -> Result<String> {
        if self.query.is_empty() {
            return Err(PromtableError::MissingParameter("query"));
        }
        if self.step.is_empty() {
            return Err(PromtableError::MissingParameter("step"));
        }
        Ok(format!(
            "/api/v1/query_range?query={}&start={}&end={}&step={}",
            self.query,
            self.start.timestamp(),
            self.end.timestamp(),
            self.step
        ))
    }
}
