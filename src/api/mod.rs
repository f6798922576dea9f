//! Request descriptors for the Prometheus HTTP API.
//!
//! Each endpoint type knows how to render itself into a path plus query
//! string; the transport in [`crate::client`] joins that onto a base URL
//! and performs the GET. Query strings are concatenated as-is: callers are
//! responsible for pre-encoding PromQL expressions containing reserved
//! characters.

mod query;
mod query_range;

pub use query::InstantQuery;
pub use query_range::RangeQuery;

use crate::error::Result;

/// Trait defining the interface for API endpoint descriptors.
pub trait Endpoint {
    /// Renders the endpoint as a path plus query string, e.g.
    /// `/api/v1/query?query=up`.
    ///
    /// Fails with [`crate::PromtableError::MissingParameter`] when a
    /// required parameter is absent or empty.
    fn path_and_query(&self) -> Result<String>;
}
