//! Conversion of raw records into the typed order table.

use crate::{OrderRow, OrderTable};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use orderflow_types::{ORDERS_TABLE, RawDataset, RawRecord, Scalar};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

/// Issues that make a single record unusable.
///
/// A record with one of these issues is dropped and counted; data quality
/// never aborts a run. Malformed totals are not listed here: they are
/// tolerated via the invalid-amount sentinel instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// A required field is absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// The order identifier could not be coerced to an integer.
    #[error("invalid order_id: {0}")]
    InvalidOrderId(String),

    /// The order date could not be parsed.
    #[error("invalid order_date: {0}")]
    InvalidOrderDate(String),
}

/// Transforms a raw dataset into the typed order table.
///
/// Extracts the orders table (missing table means an empty result, not an
/// error), coerces the typed columns, derives the calendar and value
/// columns, and counts data-quality issues. The transform is a pure
/// function of its input: identical payloads produce identical tables.
#[must_use]
pub fn transform(raw: &RawDataset) -> OrderTable {
    let records = raw.table(ORDERS_TABLE);
    if records.is_empty() {
        warn!("no order records to process");
        return OrderTable::default();
    }

    let mut rows = Vec::with_capacity(records.len());
    let mut invalid_totals = 0usize;
    let mut dropped_rows = 0usize;

    for record in records {
        match build_row(record) {
            Ok(row) => {
                if row.total_amount.is_none() {
                    invalid_totals += 1;
                }
                rows.push(row);
            }
            Err(err) => {
                dropped_rows += 1;
                warn!("dropping order record: {err}");
            }
        }
    }

    if invalid_totals > 0 {
        warn!("{invalid_totals} orders with invalid total");
    }
    info!("transformed {} orders", rows.len());

    OrderTable {
        rows,
        invalid_totals,
        dropped_rows,
    }
}

/// Builds one typed row from a raw record.
fn build_row(record: &RawRecord) -> Result<OrderRow, RowError> {
    let order_id = record
        .get("order_id")
        .ok_or(RowError::MissingField("order_id"))
        .and_then(|v| coerce_order_id(v).ok_or_else(|| RowError::InvalidOrderId(v.to_string())))?;

    let order_date = record
        .get("order_date")
        .ok_or(RowError::MissingField("order_date"))
        .and_then(|v| {
            parse_order_date(v).ok_or_else(|| RowError::InvalidOrderDate(v.to_string()))
        })?;

    // Missing and malformed totals both map to the invalid sentinel.
    let total_amount = record.get("total_amount").and_then(coerce_amount);

    let extra = record
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "order_id" | "order_date" | "total_amount"))
        .map(|(key, value)| (key.clone(), Scalar::from_json(value)))
        .collect();

    Ok(OrderRow::new(order_id, order_date, total_amount, extra))
}

/// Coerces an order identifier from a JSON integer or integer string.
fn coerce_order_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses an order date from a date or datetime string.
fn parse_order_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive())
}

/// Coerces an order total from a JSON number or numeric string.
fn coerce_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
