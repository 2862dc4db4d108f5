//! Persisting an order table to disk.

use orderflow_transform::{OrderRow, OrderTable};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::{ParquetFormatter, TableLayout};

/// Errors that can occur while writing output files.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow/Parquet error.
    #[error("Parquet error: {0}")]
    Parquet(String),
}

/// Counts reported by a completed save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveSummary {
    /// Rows written to the consolidated file.
    pub rows: usize,
    /// Distinct (year, month) partitions written.
    pub partitions: usize,
}

/// Writes an order table as partitioned and consolidated Parquet files.
///
/// The partitioned layout lives under `{output_dir}/orders` with one
/// hive-style `order_year=Y/order_month=M` directory per distinct month;
/// the consolidated file `{output_dir}/orders_all.parquet` holds every row
/// with the partition columns as ordinary columns. The two outputs are not
/// written transactionally; a failed run is simply re-run.
#[derive(Debug, Clone, Default)]
pub struct OrderWriter {
    formatter: ParquetFormatter,
}

impl OrderWriter {
    /// Creates a writer with the default Parquet settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with a custom formatter.
    #[must_use]
    pub const fn with_formatter(formatter: ParquetFormatter) -> Self {
        Self { formatter }
    }

    /// Saves the table under `output_dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created or a file cannot
    /// be written.
    pub fn save(&self, table: &OrderTable, output_dir: &Path) -> Result<SaveSummary, FormatError> {
        info!("saving data to {}/", output_dir.display());

        fs::create_dir_all(output_dir)?;
        let layout = TableLayout::infer(&table.rows);

        let partitions =
            self.write_partitioned(&layout, &table.rows, &output_dir.join("orders"))?;
        self.write_flat(
            &layout,
            &table.rows,
            &output_dir.join(format!("orders_all.{}", self.formatter.extension())),
        )?;

        info!("saved {} orders", table.len());
        info!("partitions: {partitions} months");

        Ok(SaveSummary {
            rows: table.len(),
            partitions,
        })
    }

    /// Writes one file per distinct (year, month) partition.
    ///
    /// Partition key columns are excluded from the files; their values are
    /// carried by the directory names.
    fn write_partitioned(
        &self,
        layout: &TableLayout,
        rows: &[OrderRow],
        root: &Path,
    ) -> Result<usize, FormatError> {
        let mut groups: BTreeMap<(i32, &str), Vec<&OrderRow>> = BTreeMap::new();
        for row in rows {
            groups
                .entry((row.order_year, row.order_month.as_str()))
                .or_default()
                .push(row);
        }

        for ((year, month), group) in &groups {
            let dir = root
                .join(format!("order_year={year}"))
                .join(format!("order_month={month}"));
            fs::create_dir_all(&dir)?;

            let path = dir.join(format!("part-0.{}", self.formatter.extension()));
            let file = File::create(path)?;
            self.formatter
                .write_rows(layout, group, false, BufWriter::new(file))?;
        }

        Ok(groups.len())
    }

    /// Writes the consolidated file with the full schema.
    fn write_flat(
        &self,
        layout: &TableLayout,
        rows: &[OrderRow],
        path: &Path,
    ) -> Result<(), FormatError> {
        let refs: Vec<&OrderRow> = rows.iter().collect();
        let file = File::create(path)?;
        self.formatter
            .write_rows(layout, &refs, true, BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Int64Array};
    use chrono::NaiveDate;
    use orderflow_types::Scalar;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use std::collections::BTreeMap;

    fn row(order_id: i64, date: (i32, u32, u32), total: Option<f64>) -> OrderRow {
        let mut extra = BTreeMap::new();
        extra.insert("customer".to_string(), Scalar::Text(format!("c{order_id}")));
        OrderRow::new(
            order_id,
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            total,
            extra,
        )
    }

    fn sample_table() -> OrderTable {
        OrderTable {
            rows: vec![
                row(1, (2024, 3, 15), Some(150.0)),
                row(2, (2024, 3, 20), Some(20.0)),
                row(3, (2024, 4, 1), None),
                row(4, (2023, 12, 31), Some(101.5)),
            ],
            invalid_totals: 1,
            dropped_rows: 0,
        }
    }

    fn read_order_ids(path: &Path) -> Vec<i64> {
        let file = File::open(path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();

        let mut ids = Vec::new();
        for batch in reader {
            let batch = batch.unwrap();
            let column = batch
                .column_by_name("order_id")
                .unwrap()
                .as_any()
                .downcast_ref::<Int64Array>()
                .unwrap();
            ids.extend(column.values().iter().copied());
        }
        ids
    }

    #[test]
    fn test_save_layout_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let summary = OrderWriter::new()
            .save(&sample_table(), dir.path())
            .unwrap();

        assert_eq!(summary, SaveSummary { rows: 4, partitions: 3 });
        assert!(dir.path().join("orders_all.parquet").is_file());
        assert!(
            dir.path()
                .join("orders/order_year=2024/order_month=2024-03/part-0.parquet")
                .is_file()
        );
        assert!(
            dir.path()
                .join("orders/order_year=2023/order_month=2023-12/part-0.parquet")
                .is_file()
        );
    }

    #[test]
    fn test_partition_union_equals_consolidated() {
        let dir = tempfile::tempdir().unwrap();
        OrderWriter::new().save(&sample_table(), dir.path()).unwrap();

        let mut partitioned = Vec::new();
        for (year, month) in [(2023, "2023-12"), (2024, "2024-03"), (2024, "2024-04")] {
            let path = dir.path().join(format!(
                "orders/order_year={year}/order_month={month}/part-0.parquet"
            ));
            partitioned.extend(read_order_ids(&path));
        }
        partitioned.sort_unstable();

        let mut consolidated = read_order_ids(&dir.path().join("orders_all.parquet"));
        consolidated.sort_unstable();

        assert_eq!(partitioned, consolidated);
    }

    #[test]
    fn test_partition_files_exclude_key_columns() {
        let dir = tempfile::tempdir().unwrap();
        OrderWriter::new().save(&sample_table(), dir.path()).unwrap();

        let partition = File::open(dir.path().join(
            "orders/order_year=2024/order_month=2024-03/part-0.parquet",
        ))
        .unwrap();
        let schema = ParquetRecordBatchReaderBuilder::try_new(partition)
            .unwrap()
            .schema()
            .clone();
        assert!(schema.field_with_name("order_year").is_err());
        assert!(schema.field_with_name("order_month").is_err());
        assert!(schema.field_with_name("customer").is_ok());

        let flat = File::open(dir.path().join("orders_all.parquet")).unwrap();
        let schema = ParquetRecordBatchReaderBuilder::try_new(flat)
            .unwrap()
            .schema()
            .clone();
        assert!(schema.field_with_name("order_year").is_ok());
        assert!(schema.field_with_name("order_month").is_ok());
    }

    #[test]
    fn test_save_is_rerunnable() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OrderWriter::new();
        let table = sample_table();

        writer.save(&table, dir.path()).unwrap();
        let summary = writer.save(&table, dir.path()).unwrap();

        assert_eq!(summary.rows, 4);
        let ids = read_order_ids(&dir.path().join("orders_all.parquet"));
        assert_eq!(ids.len(), 4);
    }
}
