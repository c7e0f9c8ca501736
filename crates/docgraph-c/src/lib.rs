//! # docgraph-c
//!
//! C header front end for DocGraph - extracts documented declarations from
//! C header files.
//!
//! ## Features
//!
//! - Pair every `/** ... */` comment with the declaration that follows it
//! - Parse `@param`, `@return`, `@brief`, `@defgroup`, `@ingroup` and `@file` tags
//! - Classify functions, structs, enums, typedefs, function pointer
//!   typedefs, macros and `#define` constants
//! - Canonical `::`-joined argument-type signatures
//! - Tolerant scanning: unterminated comments and declarations close at EOF
//! - Full integration with docgraph-parser-api
//!
//! ## Quick Start
//!
//! ```rust
//! use docgraph_c::CHeaderParser;
//! use docgraph_parser_api::{Declaration, HeaderParser};
//! use std::path::Path;
//!
//! let source = "/** Add two numbers.\n * @param a first\n * @param b second\n */\nint add(int a, int b);\n";
//!
//! let parser = CHeaderParser::new();
//! let ir = parser.parse_header(Path::new("include/math.h"), source).unwrap();
//!
//! if let Declaration::Function(f) = &ir.records[0] {
//!     assert_eq!(f.signature, "int::int");
//! }
//! ```

pub mod classifier;
pub mod extractor;
mod parser_impl;
pub mod segmenter;
pub mod signature;
pub mod tags;

// Re-export parser-api types for convenience
pub use docgraph_parser_api::{
    Declaration, HeaderIR, HeaderParser, ParserConfig, ParserError, ParserMetrics,
};

// Export the C header parser implementation
pub use parser_impl::CHeaderParser;

// Export key types from submodules
pub use extractor::{extract, extract_with_stats, ExtractionResult};
pub use segmenter::{segment, DeclarationChunk, InlineComment};
pub use tags::{cleanup_comment, parse_tags, DocTags};
