//! Pretty JSON export.
//!
//! All maps in the exported types are ordered, so exporting the same data
//! twice yields the same text.

use crate::error::{DocError, Result};
use crate::history::{HistoryEntry, VersionOrder};
use crate::snapshot::DocumentSnapshot;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

fn to_pretty<T: Serialize + ?Sized>(what: &str, value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| DocError::serialization(format!("failed to serialize {what}"), Some(e)))
}

/// Export one version's snapshot
pub fn snapshot_to_json(snapshot: &DocumentSnapshot) -> Result<String> {
    to_pretty("snapshot", snapshot)
}

/// Export the signature history, keyed by function name
pub fn history_to_json(history: &BTreeMap<String, HistoryEntry>) -> Result<String> {
    to_pretty("signature history", history)
}

/// Export the version list, oldest first, with the current version named
pub fn versions_to_json(order: &VersionOrder) -> Result<String> {
    let value = json!({
        "versions": order,
        "latest": order.latest(),
    });
    to_pretty("version list", &value)
}
