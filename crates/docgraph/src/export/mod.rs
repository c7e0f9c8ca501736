//! Export of snapshots and history for a rendering layer.
//!
//! - **JSON**: one document per snapshot, one for the signature history and
//!   one listing the versions

pub mod json;

pub use json::{history_to_json, snapshot_to_json, versions_to_json};
