//! Error types for promtable.
//!
//! Defines the main error enum used throughout the crate.

use thiserror::Error;

/// Main error type for promtable operations.
#[derive(Error, Debug)]
pub enum PromtableError {
    /// The query response carried no data section at all.
    #[error("No data in query response")]
    NoData,

    /// The query response carried a data section with zero results.
    #[error("Query response has no results")]
    EmptyResult,

    /// The response result type is not one of "vector" or "matrix".
    #[error("Unsupported result type: {0}")]
    UnsupportedResultType(String),

    /// A column names a label absent from some sample's metric mapping.
    #[error("Label {0:?} missing from sample metric")]
    MissingLabel(String),

    /// A required query parameter is absent or empty.
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// The response structure does not match the Prometheus API shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A wire value could not be cast to the schema's dtype.
    #[error("Cast error: {0}")]
    Cast(String),

    /// Transport-level errors (connect failures, timeouts, bad base URL).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with an error status.
    #[error("API error: {0}")]
    Api(String),
}

impl PromtableError {
    /// Creates a malformed-response error with the given message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Creates a cast error with the given message.
    pub fn cast(msg: impl Into<String>) -> Self {
        Self::Cast(msg.into())
    }

    /// Creates a transport error with the given message.
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Creates a server-side API error with the given message.
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::NoData => "No Data",
            Self::EmptyResult => "Empty Result",
            Self::UnsupportedResultType(_) => "Unsupported Result Type",
            Self::MissingLabel(_) => "Missing Label",
            Self::MissingParameter(_) => "Missing Parameter",
            Self::MalformedResponse(_) => "Malformed Response",
            Self::Cast(_) => "Cast Error",
            Self::Http(_) => "HTTP Error",
            Self::Api(_) => "API Error",
        }
    }
}

/// Result type alias using PromtableError.
pub type Result<T> = std::result::Result<T, PromtableError>;
