//! Instant query endpoint (`/api/v1/query`).

use chrono::{DateTime, Utc};

use crate::api::Endpoint;
use crate::error::{PromtableError, Result};

/// A point-in-time query returning one sample per series (vector result).
#[derive(Debug, Clone)]
pub struct InstantQuery {
    query: String,
    time: Option<DateTime<Utc>>,
}

impl InstantQuery {
    /// Creates an instant query for the given PromQL expression.
    ///
    /// Without a pinned time the backend evaluates at "now".
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            time: None,
        }
    }

    /// Pins the query to a specific evaluation time.
    pub fn at(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// The PromQL expression being queried.
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl Endpoint for InstantQuery {
    fn path_and_query(&self) -> Result<String> {
        if self.query.is_empty() {
            return Err(PromtableError::MissingParameter("query"));
        }
        let mut url = format!("/api/v1/query?query={}", self.query);
        if let Some(time) = self.time {
            url.push_str(&format!("&time={}", time.timestamp()));
        }
        Ok(url)
    }
}
