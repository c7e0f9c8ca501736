//! # docgraph
//!
//! API documentation snapshots for C header trees, and the history of every
//! function's signature across the released versions of a project.
//!
//! ## Core Principles
//!
//! - **Parser Agnostic**: snapshots are built from [`HeaderIR`], whatever front end produced it
//! - **Failure Isolation**: a bad declaration, file or version never stops the run
//! - **Deterministic Output**: ordered maps everywhere, identical input gives identical JSON
//! - **Ordered History**: parallel extraction, strictly chronological history
//!
//! ## Architecture
//!
//! ```text
//! TreeProvider (headers per version)
//!     ↓
//! HeaderParser (docgraph-c: segment, tag, classify)
//!     ↓
//! SnapshotBuilder (merge files, group, type usage)
//!     ↓
//! ReorderBuffer (completion order → chronological order)
//!     ↓
//! SignatureHistory (exists_in / changed_at per function)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use docgraph::{process_project, MemoryTreeProvider, ProjectConfig, VersionOrder};
//! use docgraph_c::CHeaderParser;
//!
//! let provider = MemoryTreeProvider::new()
//!     .with_file("v1", "include/add.h", "/** Add. */\nint add(int a);\n")
//!     .with_file("HEAD", "include/add.h", "/** Add. */\nint add(int a, int b);\n");
//! let order = VersionOrder::from_unsorted(["v1"], "HEAD");
//!
//! let output = process_project(
//!     &provider,
//!     &order,
//!     &CHeaderParser::new(),
//!     &ProjectConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(output.history["add"].changed_at, vec!["HEAD"]);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod history;
pub mod index;
pub mod pipeline;
pub mod provider;
pub mod reorder;
pub mod snapshot;

// Re-export main types
pub use config::{LegacyConfig, ProjectConfig};
pub use diagnostics::{check_snapshot, Diagnostic, DiagnosticKind, Diagnostics};
pub use docgraph_parser_api::{Declaration, FunctionRecord, HeaderIR, HeaderParser, ParserConfig};
pub use error::{DocError, Result};
pub use history::{compare_versions, HistoryEntry, SignatureHistory, VersionOrder};
pub use pipeline::{extract_version, process_project, ProjectOutput};
pub use provider::{MemoryTreeProvider, TreeProvider};
pub use reorder::ReorderBuffer;
pub use snapshot::{
    build_snapshot, DocumentSnapshot, FileMeta, GlobalEntry, SnapshotBuilder, TypeEntry, TypeUsage,
};
