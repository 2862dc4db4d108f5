//! Typed order rows and the in-memory order table.

use chrono::{Datelike, NaiveDate};
use orderflow_types::Scalar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Orders with a total above this amount are flagged as high value.
pub const HIGH_VALUE_THRESHOLD: f64 = 100.0;

/// One normalized order with derived columns.
///
/// The derived columns (`order_month`, `order_year`, `is_high_value`,
/// `day_of_week`) are computed in [`OrderRow::new`] from `order_date` and
/// `total_amount` alone, so rebuilding a row from the same inputs always
/// yields the same values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    /// Order identifier.
    pub order_id: i64,
    /// Date the order was placed.
    pub order_date: NaiveDate,
    /// Order total; `None` marks a value that could not be coerced.
    pub total_amount: Option<f64>,
    /// Partition column: "YYYY-MM" of the order date.
    pub order_month: String,
    /// Partition column: year of the order date.
    pub order_year: i32,
    /// Whether the total exceeds [`HIGH_VALUE_THRESHOLD`].
    pub is_high_value: bool,
    /// English weekday name of the order date.
    pub day_of_week: String,
    /// Passthrough fields not interpreted by the pipeline.
    pub extra: BTreeMap<String, Scalar>,
}

impl OrderRow {
    /// Creates a row, computing the derived columns.
    #[must_use]
    pub fn new(
        order_id: i64,
        order_date: NaiveDate,
        total_amount: Option<f64>,
        extra: BTreeMap<String, Scalar>,
    ) -> Self {
        Self {
            order_id,
            order_date,
            total_amount,
            order_month: order_date.format("%Y-%m").to_string(),
            order_year: order_date.year(),
            // Comparison against the invalid sentinel is false.
            is_high_value: total_amount.is_some_and(|t| t > HIGH_VALUE_THRESHOLD),
            day_of_week: order_date.format("%A").to_string(),
            extra,
        }
    }
}

/// The in-memory tabular collection of orders.
///
/// Created by [`transform`](crate::transform), consumed by the writer, and
/// discarded; only the written files persist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderTable {
    /// Normalized order rows.
    pub rows: Vec<OrderRow>,
    /// Rows whose total could not be coerced to a number.
    pub invalid_totals: usize,
    /// Malformed rows dropped during transformation.
    pub dropped_rows: usize,
}

impl OrderTable {
    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
