//! DocGraph Parser API
//!
//! Shared trait and types for building DocGraph header front ends.
//!
//! This crate defines:
//!
//! - **HeaderParser trait**: The interface every header front end implements
//! - **Declaration records**: A closed sum type over function, struct, enum,
//!   typedef, function pointer, macro, define and file-level documentation
//! - **Configuration**: Prefix stripping, enum naming and grouping policy
//! - **Metrics**: Per-parser success tracking
//! - **Error handling**: File-level error types
//!
//! # Example
//!
//! ```rust,ignore
//! use docgraph_parser_api::{HeaderIR, HeaderParser, ParserConfig, ParserError, ParserMetrics};
//! use std::path::Path;
//!
//! struct MyParser {
//!     config: ParserConfig,
//! }
//!
//! impl HeaderParser for MyParser {
//!     fn language(&self) -> &str {
//!         "c"
//!     }
//!
//!     fn file_extensions(&self) -> &[&str] {
//!         &[".h"]
//!     }
//!
//!     fn parse_source(&self, source: &str, file_path: &Path) -> Result<HeaderIR, ParserError> {
//!         // Implementation here
//!         todo!()
//!     }
//!
//!     // ... parse_header, config, metrics, reset_metrics
//! }
//! ```

pub mod config;
pub mod errors;
pub mod ir;
pub mod metrics;
pub mod records;
pub mod traits;

// Re-export commonly used types
pub use config::{ParserConfig, SingletonGroupPolicy};
pub use errors::{ParserError, ParserResult};
pub use ir::HeaderIR;
pub use metrics::ParserMetrics;
pub use records::{
    AggregateRecord, Argument, Constant, Declaration, DeclarationKind, DefineRecord, Field,
    FileDocRecord, FileTags, FunctionRecord, Location, MacroRecord, ReturnValue, TypedefRecord,
    signature_of, SIGNATURE_SEPARATOR,
};
pub use traits::{HeaderParser, TreeInfo};
