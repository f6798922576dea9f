//! Wire-level types for Prometheus HTTP API query responses.
//!
//! Models the envelope returned by `/api/v1/query` and `/api/v1/query_range`:
//! a status, an optional data section with a result type and a list of
//! samples, and optional error fields. Sample values arrive as
//! `[timestamp, "value"]` pairs where the timestamp is float seconds and the
//! value stays a string on the wire.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{PromtableError, Result};

/// One `[timestamp, value]` pair as sent by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SamplePair(pub f64, pub String);

impl SamplePair {
    /// Timestamp in float seconds since the Unix epoch.
    pub fn timestamp(&self) -> f64 {
        self.0
    }

    /// The raw sample value in its wire representation.
    pub fn value(&self) -> &str {
        &self.1
    }
}

/// One result entry: a metric label mapping plus its sample(s).
///
/// Vector results carry a single `value`; matrix results carry a `values`
/// list. Labels deserialize into a `BTreeMap`, so key order is sorted and
/// deterministic regardless of JSON object order.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricSample {
    /// Label name to label value.
    #[serde(default)]
    pub metric: BTreeMap<String, String>,

    /// Single sample (vector results).
    pub value: Option<SamplePair>,

    /// Time-ordered samples (matrix results).
    pub values: Option<Vec<SamplePair>>,
}

impl MetricSample {
    /// Returns the single vector sample, or a malformed-response error.
    pub fn vector_value(&self) -> Result<&SamplePair> {
        self.value
            .as_ref()
            .ok_or_else(|| PromtableError::malformed("vector sample has no \"value\" field"))
    }

    /// Returns the matrix sample list, or a malformed-response error.
    pub fn matrix_values(&self) -> Result<&[SamplePair]> {
        self.values
            .as_deref()
            .ok_or_else(|| PromtableError::malformed("matrix sample has no \"values\" field"))
    }
}

/// The data section of a query response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryData {
    /// Result shape: "vector" for instant queries, "matrix" for range queries.
    pub result_type: String,

    /// The result entries, in backend order.
    pub result: Vec<MetricSample>,
}

/// Full response envelope from the query endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// "success" or "error".
    pub status: String,

    /// Present on success (and sometimes alongside errors, per the API spec).
    pub data: Option<QueryData>,

    /// Error message when status is "error".
    pub error: Option<String>,

    /// Error class when status is "error".
    pub error_type: Option<String>,

    /// Non-fatal warnings attached to a successful response.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl QueryResponse {
    /// Returns the data section if the response carried one.
    pub fn data(&self) -> Option<&QueryData> {
        self.data.as_ref()
    }

    /// Returns true if the server reported success.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Returns the data section, surfacing server errors and absent data.
    pub fn success_data(&self) -> Result<&QueryData> {
        if !self.is_success() {
            let msg = match (&self.error_type, &self.error) {
                (Some(kind), Some(err)) => format!("{kind}: {err}"),
                (None, Some(err)) => err.clone(),
                _ => format!("server returned status {:?}", self.status),
            };
            return Err(PromtableError::api(msg));
        }
        self.data().ok_or(PromtableError::NoData)
    }
}
