//! Library for ingesting e-commerce order datasets into Parquet.
//!
//! This is a facade crate that re-exports functionality from the orderflow
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use orderflow_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::from_env()?;
//!     let client = ApiClient::new(config)?;
//!
//!     let raw = RetryPolicy::default()
//!         .fetch_with_retry(&client, "ecommerce", 5000)
//!         .await?;
//!     let table = transform(&raw);
//!
//!     if !table.is_empty() {
//!         OrderWriter::new().save(&table, "output".as_ref())?;
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc(issue_tracker_base_url = "https://github.com/orderflow-io/orderflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use orderflow_types::*;

// Re-export fetch functionality
pub use orderflow_fetch::{ApiClient, AttemptOutcome, FetchError, RetryPolicy};

// Re-export transformation
pub use orderflow_transform::{HIGH_VALUE_THRESHOLD, OrderRow, OrderTable, RowError, transform};

// Re-export output writing
pub use orderflow_format::{
    ColumnKind, FormatError, OrderWriter, ParquetFormatter, SaveSummary, TableLayout,
};

/// Prelude module for convenient imports.
///
/// ```
/// use orderflow_lib::prelude::*;
/// ```
pub mod prelude {
    pub use orderflow_types::{ApiConfig, ConfigError, RawDataset, Scalar};

    pub use orderflow_fetch::{ApiClient, AttemptOutcome, FetchError, RetryPolicy};

    pub use orderflow_transform::{OrderRow, OrderTable, transform};

    pub use orderflow_format::{FormatError, OrderWriter, ParquetFormatter, SaveSummary};
}
