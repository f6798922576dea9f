//! promtable - A lightweight PromQL HTTP API client that flattens query
//! results into tables.
//!
//! The crate splits query handling into two explicit phases: build and
//! execute a request with [`client::PromClient`], then flatten the decoded
//! response into a [`table::Table`] with [`flatten::flatten`].

pub mod api;
pub mod client;
pub mod error;
pub mod flatten;
pub mod logging;
pub mod response;
pub mod schema;
pub mod table;

pub use api::{Endpoint, InstantQuery, RangeQuery};
pub use client::PromClient;
pub use error::{PromtableError, Result};
pub use flatten::{flatten, flatten_response};
pub use response::{MetricSample, QueryData, QueryResponse, SamplePair};
pub use schema::{DType, TableSchema};
pub use table::{Cell, Row, Table};
