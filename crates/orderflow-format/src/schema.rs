//! Arrow schema planning for order tables.

use arrow::array::{
    ArrayRef, BooleanArray, Date32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::{DataType, Date32Type, Field, Schema};
use arrow::record_batch::RecordBatch;
use orderflow_transform::OrderRow;
use orderflow_types::Scalar;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::FormatError;

/// Arrow type assigned to an inferred passthrough column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// 64-bit integer column.
    Int,
    /// 64-bit float column.
    Float,
    /// Boolean column.
    Bool,
    /// UTF-8 text column.
    Text,
}

impl ColumnKind {
    /// Returns the kind of a single scalar, or `None` for null.
    const fn of(scalar: &Scalar) -> Option<Self> {
        match scalar {
            Scalar::Null => None,
            Scalar::Bool(_) => Some(Self::Bool),
            Scalar::Int(_) => Some(Self::Int),
            Scalar::Float(_) => Some(Self::Float),
            Scalar::Text(_) => Some(Self::Text),
        }
    }

    /// Combines the kinds of two cells in the same column.
    ///
    /// Integers widen to floats; any other mix falls back to text.
    const fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Int, Self::Int) => Self::Int,
            (Self::Float, Self::Float)
            | (Self::Int, Self::Float)
            | (Self::Float, Self::Int) => Self::Float,
            (Self::Bool, Self::Bool) => Self::Bool,
            _ => Self::Text,
        }
    }

    /// Returns the Arrow data type for this kind.
    const fn data_type(self) -> DataType {
        match self {
            Self::Int => DataType::Int64,
            Self::Float => DataType::Float64,
            Self::Bool => DataType::Boolean,
            Self::Text => DataType::Utf8,
        }
    }
}

/// Column plan for a set of order rows.
///
/// The fixed columns are always present; passthrough columns are inferred
/// from the rows' extra fields, in sorted name order, and are nullable. The
/// partition columns (`order_year`, `order_month`) are included only when a
/// flat schema is requested: in the partitioned layout they live in the
/// directory names instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableLayout {
    extra: Vec<(String, ColumnKind)>,
}

impl TableLayout {
    /// Infers the layout from the given rows.
    #[must_use]
    pub fn infer(rows: &[OrderRow]) -> Self {
        let mut kinds: BTreeMap<&str, Option<ColumnKind>> = BTreeMap::new();
        for row in rows {
            for (key, scalar) in &row.extra {
                let entry = kinds.entry(key.as_str()).or_insert(None);
                if let Some(kind) = ColumnKind::of(scalar) {
                    *entry = Some(entry.map_or(kind, |existing| existing.merge(kind)));
                }
            }
        }

        Self {
            extra: kinds
                .into_iter()
                // An all-null column still needs a type; text is the widest.
                .map(|(key, kind)| (key.to_string(), kind.unwrap_or(ColumnKind::Text)))
                .collect(),
        }
    }

    /// Returns the inferred passthrough columns.
    #[must_use]
    pub fn extra_columns(&self) -> &[(String, ColumnKind)] {
        &self.extra
    }

    /// Builds the Arrow schema, with or without the partition columns.
    #[must_use]
    pub fn schema(&self, include_partitions: bool) -> Schema {
        let mut fields = vec![
            Field::new("order_id", DataType::Int64, false),
            Field::new("order_date", DataType::Date32, false),
            Field::new("total_amount", DataType::Float64, true),
            Field::new("is_high_value", DataType::Boolean, false),
            Field::new("day_of_week", DataType::Utf8, false),
        ];
        if include_partitions {
            fields.push(Field::new("order_year", DataType::Int32, false));
            fields.push(Field::new("order_month", DataType::Utf8, false));
        }
        for (name, kind) in &self.extra {
            fields.push(Field::new(name, kind.data_type(), true));
        }
        Schema::new(fields)
    }

    /// Converts rows to an Arrow record batch matching this layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch cannot be assembled.
    pub fn batch(
        &self,
        rows: &[&OrderRow],
        include_partitions: bool,
    ) -> Result<RecordBatch, FormatError> {
        let order_ids: Vec<i64> = rows.iter().map(|r| r.order_id).collect();
        let dates: Vec<i32> = rows
            .iter()
            .map(|r| Date32Type::from_naive_date(r.order_date))
            .collect();
        let totals: Vec<Option<f64>> = rows.iter().map(|r| r.total_amount).collect();
        let high_value: Vec<bool> = rows.iter().map(|r| r.is_high_value).collect();
        let weekdays: Vec<&str> = rows.iter().map(|r| r.day_of_week.as_str()).collect();

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(order_ids)),
            Arc::new(Date32Array::from(dates)),
            Arc::new(Float64Array::from(totals)),
            Arc::new(BooleanArray::from(high_value)),
            Arc::new(StringArray::from(weekdays)),
        ];

        if include_partitions {
            let years: Vec<i32> = rows.iter().map(|r| r.order_year).collect();
            let months: Vec<&str> = rows.iter().map(|r| r.order_month.as_str()).collect();
            columns.push(Arc::new(Int32Array::from(years)));
            columns.push(Arc::new(StringArray::from(months)));
        }

        for (name, kind) in &self.extra {
            columns.push(extra_column(rows, name, *kind));
        }

        RecordBatch::try_new(Arc::new(self.schema(include_partitions)), columns)
            .map_err(|e| FormatError::Parquet(e.to_string()))
    }
}

/// Builds the array for one passthrough column.
fn extra_column(rows: &[&OrderRow], name: &str, kind: ColumnKind) -> ArrayRef {
    match kind {
        ColumnKind::Int => Arc::new(Int64Array::from(
            rows.iter()
                .map(|r| r.extra.get(name).and_then(Scalar::as_i64))
                .collect::<Vec<_>>(),
        )),
        ColumnKind::Float => Arc::new(Float64Array::from(
            rows.iter()
                .map(|r| r.extra.get(name).and_then(Scalar::as_f64))
                .collect::<Vec<_>>(),
        )),
        ColumnKind::Bool => Arc::new(BooleanArray::from(
            rows.iter()
                .map(|r| r.extra.get(name).and_then(Scalar::as_bool))
                .collect::<Vec<_>>(),
        )),
        ColumnKind::Text => Arc::new(StringArray::from(
            rows.iter()
                .map(|r| r.extra.get(name).and_then(Scalar::render))
                .collect::<Vec<_>>(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn row(order_id: i64, extra: &[(&str, Scalar)]) -> OrderRow {
        OrderRow::new(
            order_id,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            Some(150.0),
            extra
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn test_schema_fixed_columns() {
        let layout = TableLayout::default();
        let schema = layout.schema(false);

        assert_eq!(schema.fields().len(), 5);
        assert!(schema.field_with_name("order_id").is_ok());
        assert!(schema.field_with_name("order_year").is_err());
    }

    #[test]
    fn test_schema_with_partitions() {
        let layout = TableLayout::default();
        let schema = layout.schema(true);

        assert_eq!(schema.fields().len(), 7);
        assert!(schema.field_with_name("order_year").is_ok());
        assert!(schema.field_with_name("order_month").is_ok());
    }

    #[test]
    fn test_infer_widens_int_to_float() {
        let rows = vec![
            row(1, &[("qty", Scalar::Int(2))]),
            row(2, &[("qty", Scalar::Float(2.5))]),
        ];
        let layout = TableLayout::infer(&rows);

        assert_eq!(layout.extra_columns(), &[("qty".to_string(), ColumnKind::Float)]);
    }

    #[test]
    fn test_infer_mixed_falls_back_to_text() {
        let rows = vec![
            row(1, &[("note", Scalar::Int(2))]),
            row(2, &[("note", Scalar::Text("two".into()))]),
        ];
        let layout = TableLayout::infer(&rows);

        assert_eq!(layout.extra_columns(), &[("note".to_string(), ColumnKind::Text)]);
    }

    #[test]
    fn test_infer_all_null_column() {
        let rows = vec![row(1, &[("memo", Scalar::Null)])];
        let layout = TableLayout::infer(&rows);

        assert_eq!(layout.extra_columns(), &[("memo".to_string(), ColumnKind::Text)]);
    }

    #[test]
    fn test_batch_shapes() {
        let rows = vec![
            row(1, &[("customer", Scalar::Text("ada".into()))]),
            row(2, &[]),
        ];
        let layout = TableLayout::infer(&rows);
        let refs: Vec<&OrderRow> = rows.iter().collect();

        let batch = layout.batch(&refs, true).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 8);

        // Missing extras become nulls.
        let customer = batch.column_by_name("customer").unwrap();
        assert_eq!(customer.null_count(), 1);
    }
}
