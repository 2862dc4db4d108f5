//! Raw dataset payload as returned by the API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the orders table inside the raw payload.
pub const ORDERS_TABLE: &str = "orders";

/// A single raw record: a JSON object mapping field names to scalar values.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// The raw JSON payload returned by the dataset API.
///
/// The payload is a named collection of tables, each an ordered sequence of
/// records. It is ephemeral: created per fetch, consumed by the transformer,
/// and discarded.
///
/// Expected shape:
///
/// ```json
/// { "tables": { "orders": [ { "order_id": 1, ... }, ... ] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDataset {
    /// Named record tables.
    #[serde(default)]
    pub tables: HashMap<String, Vec<RawRecord>>,
}

impl RawDataset {
    /// Returns the records of the named table, or an empty slice when the
    /// table is absent.
    #[must_use]
    pub fn table(&self, name: &str) -> &[RawRecord] {
        self.tables.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns the number of records in the orders table.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.table(ORDERS_TABLE).len()
    }
}
