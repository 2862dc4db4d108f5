//! Core types for the orderflow order ingestion pipeline.
//!
//! This crate provides the fundamental data structures used throughout
//! orderflow:
//!
//! - [`RawDataset`] - The raw JSON payload returned by the dataset API
//! - [`Scalar`] - A typed scalar cell for passthrough columns
//! - [`ApiConfig`] - Connection settings for the dataset API

#![doc(issue_tracker_base_url = "https://github.com/orderflow-io/orderflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod raw;
mod scalar;

pub use config::{ApiConfig, ConfigError, DEFAULT_TIMEOUT, ENV_BASE_URL, ENV_TOKEN};
pub use raw::{ORDERS_TABLE, RawDataset, RawRecord};
pub use scalar::Scalar;
