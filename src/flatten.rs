//! Result flattening: the core transformation from query results to tables.
//!
//! Takes the decoded data section of a query response plus an optional
//! [`TableSchema`] and produces a [`Table`]. Column layout is always
//! `[timestamp, (datetime), label columns.., value]`; the datetime column
//! appears exactly when the schema sets a timezone, even the UTC default.
//!
//! Column selection follows a first-sample-wins policy: with no explicit
//! schema columns, the column list comes from the first sample's metric
//! keys and is applied to every later sample. Later samples with extra
//! labels have them dropped; later samples missing a column's label fail
//! the whole flatten with [`PromtableError::MissingLabel`].

use chrono::{DateTime, FixedOffset};
use tracing::{debug, trace};

use crate::error::{PromtableError, Result};
use crate::response::{MetricSample, QueryData, QueryResponse, SamplePair};
use crate::schema::TableSchema;
use crate::table::{Cell, Row, Table};

/// Flattens a full response envelope into a table.
///
/// Surfaces server-side errors first, then fails with
/// [`PromtableError::NoData`] if the response has no data section, then
/// delegates to [`flatten`].
pub fn flatten_response(response: &QueryResponse, schema: Option<&TableSchema>) -> Result<Table> {
    flatten(response.success_data()?, schema)
}

/// Flattens a query data section into a table.
///
/// Fails with [`PromtableError::EmptyResult`] on a present-but-empty result
/// list, and [`PromtableError::UnsupportedResultType`] for result types
/// other than "vector" and "matrix".
pub fn flatten(data: &QueryData, schema: Option<&TableSchema>) -> Result<Table> {
    if data.result.is_empty() {
        return Err(PromtableError::EmptyResult);
    }

    let timezone = schema
        .and_then(|s| s.timezone)
        .unwrap_or_else(utc_offset);
    // Key presence turns the column on, not the offset's value.
    let include_datetime = schema.is_some_and(|s| s.timezone.is_some());
    let columns = resolve_columns(schema, &data.result[0]);

    let mut rows = Vec::new();
    match data.result_type.as_str() {
        "vector" => {
            for sample in &data.result {
                let labels = label_cells(sample, &columns)?;
                let row = make_row(
                    sample.vector_value()?,
                    labels,
                    schema,
                    timezone,
                    include_datetime,
                )?;
                rows.push(row);
            }
        }
        "matrix" => {
            for sample in &data.result {
                let labels = label_cells(sample, &columns)?;
                for pair in sample.matrix_values()? {
                    let row =
                        make_row(pair, labels.clone(), schema, timezone, include_datetime)?;
                    rows.push(row);
                }
            }
        }
        other => {
            return Err(PromtableError::UnsupportedResultType(other.to_string()));
        }
    }

    let header = make_header(&columns, include_datetime);
    debug!(
        rows = rows.len(),
        columns = header.len(),
        result_type = %data.result_type,
        "flattened query result"
    );
    Ok(Table::new(header, rows))
}

/// Resolves the label column list once per flatten call.
///
/// Explicit non-empty schema columns win; otherwise the first sample's
/// metric keys (sorted) are used for every sample.
fn resolve_columns(schema: Option<&TableSchema>, first: &MetricSample) -> Vec<String> {
    match schema {
        Some(s) if !s.columns.is_empty() => s.columns.clone(),
        _ => first.metric.keys().cloned().collect(),
    }
}

/// Looks up each column's label value in the sample's metric mapping.
fn label_cells(sample: &MetricSample, columns: &[String]) -> Result<Vec<Cell>> {
    columns
        .iter()
        .map(|column| {
            sample
                .metric
                .get(column)
                .map(|v| Cell::String(v.clone()))
                .ok_or_else(|| PromtableError::MissingLabel(column.clone()))
        })
        .collect()
}

/// Assembles one row: timestamp, optional datetime, labels, cast value.
fn make_row(
    pair: &SamplePair,
    labels: Vec<Cell>,
    schema: Option<&TableSchema>,
    timezone: FixedOffset,
    include_datetime: bool,
) -> Result<Row> {
    let cast_value = match schema {
        Some(s) => s.dtype.cast(pair.value())?,
        None => Cell::String(pair.value().to_string()),
    };

    let mut row = Vec::with_capacity(labels.len() + 3);
    row.push(Cell::Float(pair.timestamp()));
    if include_datetime {
        row.push(Cell::DateTime(zoned_datetime(pair.timestamp(), timezone)?));
    }
    row.extend(labels);
    row.push(cast_value);
    trace!(?row, "assembled record");
    Ok(row)
}

/// Builds the column-name header matching the row shape exactly.
fn make_header(columns: &[String], include_datetime: bool) -> Vec<String> {
    let mut header = Vec::with_capacity(columns.len() + 3);
    header.push("timestamp".to_string());
    if include_datetime {
        header.push("datetime".to_string());
    }
    header.extend(columns.iter().cloned());
    header.push("value".to_string());
    header
}

/// Materializes float seconds as a zoned datetime.
fn zoned_datetime(seconds: f64, timezone: FixedOffset) -> Result<DateTime<FixedOffset>> {
    // NaN and infinities would cast to garbage epochs instead of failing.
    if !seconds.is_finite() {
        return Err(PromtableError::malformed(format!(
            "timestamp {seconds} is not a finite number"
        )));
    }
    let millis = (seconds * 1000.0).round();
    DateTime::from_timestamp_millis(millis as i64)
        .map(|dt| dt.with_timezone(&timezone))
        .ok_or_else(|| PromtableError::malformed(format!("timestamp {seconds} out of range")))
}

fn utc_offset() -> FixedOffset {
    FixedOffset::east_opt(0).expect("zero offset is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DType;
    use pretty_assertions::assert_eq;

    fn vector_data(json: &str) -> QueryData {
        serde_json::from_str(json).unwrap()
    }

    fn single_sample() -> QueryData {
        vector_data(
            r#"{"resultType": "vector",
                "result": [{"metric": {"pod": "a"}, "value": [1000, "5"]}]}"#,
        )
    }

    #[test]
    fn test_vector_without_schema() {
        let table = flatten(&single_sample(), None).unwrap();
        assert_eq!(table.columns, ["timestamp", "pod", "value"]);
        assert_eq!(
            table.rows,
            vec![vec![
                Cell::Float(1000.0),
                Cell::String("a".to_string()),
                Cell::String("5".to_string()),
            ]]
        );
    }

    #[test]
    fn test_vector_with_float_dtype() {
        let schema = TableSchema::new().with_dtype(DType::Float);
        let table = flatten(&single_sample(), Some(&schema)).unwrap();
        assert_eq!(
            table.rows[0],
            vec![
                Cell::Float(1000.0),
                Cell::String("a".to_string()),
                Cell::Float(5.0),
            ]
        );
    }

    #[test]
    fn test_timezone_presence_adds_datetime_column() {
        // Even the UTC default triggers the extra column when set.
        let schema = TableSchema::new().with_utc();
        let table = flatten(&single_sample(), Some(&schema)).unwrap();
        assert_eq!(table.columns, ["timestamp", "datetime", "pod", "value"]);
        match &table.rows[0][1] {
            Cell::DateTime(dt) => {
                assert_eq!(dt.to_rfc3339(), "1970-01-01T00:16:40+00:00");
            }
            other => panic!("expected datetime cell, got {other:?}"),
        }
    }

    #[test]
    fn test_schema_without_timezone_never_adds_datetime() {
        let schema = TableSchema::new().with_dtype(DType::Float);
        let table = flatten(&single_sample(), Some(&schema)).unwrap();
        assert_eq!(table.columns, ["timestamp", "pod", "value"]);
    }

    #[test]
    fn test_nonzero_offset_shifts_datetime() {
        let schema =
            TableSchema::new().with_timezone(FixedOffset::east_opt(2 * 3600).unwrap());
        let table = flatten(&single_sample(), Some(&schema)).unwrap();
        match &table.rows[0][1] {
            Cell::DateTime(dt) => {
                assert_eq!(dt.to_rfc3339(), "1970-01-01T02:16:40+02:00");
            }
            other => panic!("expected datetime cell, got {other:?}"),
        }
    }

    #[test]
    fn test_vector_one_row_per_sample() {
        let data = vector_data(
            r#"{"resultType": "vector",
                "result": [
                    {"metric": {"pod": "a"}, "value": [1000, "1"]},
                    {"metric": {"pod": "b"}, "value": [1000, "2"]},
                    {"metric": {"pod": "c"}, "value": [1000, "3"]}
                ]}"#,
        );
        let table = flatten(&data, None).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn test_matrix_row_count_is_sum_of_values() {
        let data = vector_data(
            r#"{"resultType": "matrix",
                "result": [
                    {"metric": {"pod": "a"}, "values": [[1000, "1"], [1015, "2"]]},
                    {"metric": {"pod": "b"}, "values": [[1000, "3"], [1015, "4"], [1030, "5"]]}
                ]}"#,
        );
        let table = flatten(&data, None).unwrap();
        assert_eq!(table.row_count(), 5);
        // Each sample's block shares its label cells.
        for row in &table.rows[0..2] {
            assert_eq!(row[1], Cell::String("a".to_string()));
        }
        for row in &table.rows[2..5] {
            assert_eq!(row[1], Cell::String("b".to_string()));
        }
        // Chronological order within a block is preserved as given.
        assert_eq!(table.rows[2][0], Cell::Float(1000.0));
        assert_eq!(table.rows[4][0], Cell::Float(1030.0));
    }

    #[test]
    fn test_empty_result_is_an_error() {
        let data = vector_data(r#"{"resultType": "vector", "result": []}"#);
        assert!(matches!(
            flatten(&data, None),
            Err(PromtableError::EmptyResult)
        ));
    }

    #[test]
    fn test_scalar_result_type_is_unsupported() {
        let data = vector_data(r#"{"resultType": "scalar", "result": [{"value": [0, "1"]}]}"#);
        match flatten(&data, None) {
            Err(PromtableError::UnsupportedResultType(t)) => assert_eq!(t, "scalar"),
            other => panic!("expected unsupported result type, got {other:?}"),
        }
    }

    #[test]
    fn test_schema_column_missing_from_a_sample() {
        let data = vector_data(
            r#"{"resultType": "vector",
                "result": [
                    {"metric": {"instance": "a"}, "value": [1000, "1"]},
                    {"metric": {"instance": "b", "pod": "x"}, "value": [1000, "2"]}
                ]}"#,
        );
        let schema = TableSchema::new().with_columns(["pod"]);
        match flatten(&data, Some(&schema)) {
            Err(PromtableError::MissingLabel(label)) => assert_eq!(label, "pod"),
            other => panic!("expected missing label, got {other:?}"),
        }

        // Without the schema the column list falls back to the first
        // sample's labels, which both samples carry.
        let table = flatten(&data, None).unwrap();
        assert_eq!(table.columns, ["timestamp", "instance", "value"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_first_sample_wins_drops_extra_labels() {
        let data = vector_data(
            r#"{"resultType": "vector",
                "result": [
                    {"metric": {"pod": "a"}, "value": [1000, "1"]},
                    {"metric": {"job": "node", "pod": "b"}, "value": [1000, "2"]}
                ]}"#,
        );
        let table = flatten(&data, None).unwrap();
        assert_eq!(table.columns, ["timestamp", "pod", "value"]);
        assert_eq!(table.rows[1][1], Cell::String("b".to_string()));
    }

    #[test]
    fn test_explicit_columns_override_label_order() {
        let data = vector_data(
            r#"{"resultType": "vector",
                "result": [{"metric": {"a": "1", "b": "2"}, "value": [0, "0"]}]}"#,
        );
        let schema = TableSchema::new().with_columns(["b", "a"]);
        let table = flatten(&data, Some(&schema)).unwrap();
        assert_eq!(table.columns, ["timestamp", "b", "a", "value"]);
        assert_eq!(table.rows[0][1], Cell::String("2".to_string()));
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let data = vector_data(
            r#"{"resultType": "matrix",
                "result": [{"metric": {"pod": "a"}, "values": [[1000, "1"], [1015, "2"]]}]}"#,
        );
        let schema = TableSchema::new().with_dtype(DType::Float).with_utc();
        let first = flatten(&data, Some(&schema)).unwrap();
        let second = flatten(&data, Some(&schema)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_vector_sample_without_value_field() {
        let data = vector_data(
            r#"{"resultType": "vector",
                "result": [{"metric": {"pod": "a"}, "values": [[1000, "1"]]}]}"#,
        );
        assert!(matches!(
            flatten(&data, None),
            Err(PromtableError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_non_finite_timestamp_is_malformed() {
        use crate::response::{MetricSample, SamplePair};
        use std::collections::BTreeMap;

        // NaN cannot arrive via JSON, but the type allows it; it must fail
        // instead of materializing as the epoch.
        let data = QueryData {
            result_type: "vector".to_string(),
            result: vec![MetricSample {
                metric: BTreeMap::from([("pod".to_string(), "a".to_string())]),
                value: Some(SamplePair(f64::NAN, "1".to_string())),
                values: None,
            }],
        };
        let schema = TableSchema::new().with_utc();
        assert!(matches!(
            flatten(&data, Some(&schema)),
            Err(PromtableError::MalformedResponse(_))
        ));

        // Without the datetime column the raw timestamp passes through.
        assert!(flatten(&data, None).is_ok());
    }

    #[test]
    fn test_flatten_response_no_data() {
        let response: QueryResponse =
            serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(matches!(
            flatten_response(&response, None),
            Err(PromtableError::NoData)
        ));
    }
}
