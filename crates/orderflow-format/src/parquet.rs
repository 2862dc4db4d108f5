//! Apache Parquet encoding.

use orderflow_transform::OrderRow;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

use crate::{FormatError, TableLayout};

/// Parquet encoder for order rows.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Writes rows as a Parquet file.
    ///
    /// The layout decides the columns; `include_partitions` selects between
    /// the flat schema (partition columns present) and the partition-file
    /// schema (partition values live in the directory names).
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn write_rows<W: Write + Send>(
        &self,
        layout: &TableLayout,
        rows: &[&OrderRow],
        include_partitions: bool,
        writer: W,
    ) -> Result<(), FormatError> {
        let schema = Arc::new(layout.schema(include_partitions));
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, schema, Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in rows.chunks(self.row_group_size.max(1)) {
            let batch = layout.batch(chunk, include_partitions)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }

    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        "parquet"
    }
}
