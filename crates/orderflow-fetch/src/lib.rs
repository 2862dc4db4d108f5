//! HTTP client and retry policy for the orderflow order ingestion pipeline.
//!
//! This crate provides the fetch half of the pipeline:
//!
//! - [`ApiClient`] - Issues a single dataset request and parses the payload
//! - [`RetryPolicy`] - Wraps fetches with bounded, deterministic
//!   exponential backoff
//! - [`AttemptOutcome`] - Tagged classification of an attempt as success,
//!   retryable failure, or fatal failure

#![doc(issue_tracker_base_url = "https://github.com/orderflow-io/orderflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod retry;

pub use client::{ApiClient, FetchError};
pub use retry::{AttemptOutcome, RetryPolicy};
