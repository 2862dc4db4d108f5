//! Raw-to-tabular transformation for the orderflow order ingestion pipeline.
//!
//! This crate turns a [`RawDataset`](orderflow_types::RawDataset) into an
//! [`OrderTable`] of typed rows with derived calendar and value columns:
//!
//! - [`transform`] - The transformation itself, with data-quality counters
//! - [`OrderRow`] / [`OrderTable`] - The typed tabular model
//! - [`RowError`] - Per-row issues that cause a row to be dropped

#![doc(issue_tracker_base_url = "https://github.com/orderflow-io/orderflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod table;
mod transformer;

pub use table::{HIGH_VALUE_THRESHOLD, OrderRow, OrderTable};
pub use transformer::{RowError, transform};
