//! Run command implementation.
//!
//! This module drives the full pipeline sequentially: fetch with retries,
//! transform, then save. Each stage consumes its predecessor's output; the
//! only persistent artifact is the written Parquet layout.

use anyhow::{Context, Result};
use orderflow_lib::prelude::*;
use std::path::Path;
use tracing::{info, warn};

/// Fetch the order dataset, transform it, and persist it as Parquet.
pub(crate) async fn run(
    dataset_type: &str,
    rows: u32,
    output: &Path,
    max_attempts: u32,
) -> Result<()> {
    info!("order pipeline starting");

    let config = ApiConfig::from_env()?;
    let client = ApiClient::new(config).context("failed to build HTTP client")?;
    let policy = RetryPolicy {
        max_attempts,
        ..Default::default()
    };

    // Extract
    let raw = policy.fetch_with_retry(&client, dataset_type, rows).await?;

    // Transform
    let table = transform(&raw);

    if table.is_empty() {
        // Nothing to save is a normal, if disappointing, outcome.
        warn!("no data to save");
        return Ok(());
    }

    // Load
    let summary = OrderWriter::new()
        .save(&table, output)
        .with_context(|| format!("failed to save output to {}", output.display()))?;

    info!(
        "pipeline completed: {} rows in {} partitions",
        summary.rows, summary.partitions
    );

    Ok(())
}
