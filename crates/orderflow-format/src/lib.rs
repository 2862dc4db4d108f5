//! Columnar Parquet output for the orderflow order ingestion pipeline.
//!
//! This crate persists an [`OrderTable`](orderflow_transform::OrderTable)
//! as the pipeline's only durable artifact:
//!
//! - [`TableLayout`] - Arrow schema planning, including inferred
//!   passthrough columns
//! - [`ParquetFormatter`] - Row-group-chunked Parquet encoding
//! - [`OrderWriter`] - The partitioned layout plus the consolidated file

#![doc(issue_tracker_base_url = "https://github.com/orderflow-io/orderflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod parquet;
mod schema;
mod writer;

pub use crate::parquet::ParquetFormatter;
pub use schema::{ColumnKind, TableLayout};
pub use writer::{FormatError, OrderWriter, SaveSummary};
