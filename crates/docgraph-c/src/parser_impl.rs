//! Implementation of the HeaderParser trait for C headers
//!
//! This module provides the CHeaderParser struct that implements the
//! docgraph-parser-api::HeaderParser trait on top of the hand-rolled
//! segmenter and classifier.

use docgraph_parser_api::{HeaderIR, HeaderParser, ParserConfig, ParserError, ParserMetrics};
use log::warn;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// C header parser implementing the HeaderParser trait
pub struct CHeaderParser {
    config: ParserConfig,
    metrics: Mutex<ParserMetrics>,
}

impl CHeaderParser {
    /// Create a new C header parser with default configuration
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
            metrics: Mutex::new(ParserMetrics::default()),
        }
    }

    /// Create a new C header parser with custom configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            metrics: Mutex::new(ParserMetrics::default()),
        }
    }

    /// Update metrics after parsing a file
    fn update_metrics(&self, success: bool, duration: Duration, records: usize) {
        let mut metrics = self.metrics.lock().unwrap_or_else(PoisonError::into_inner);
        metrics.files_attempted += 1;
        if success {
            metrics.files_succeeded += 1;
        } else {
            metrics.files_failed += 1;
        }
        metrics.total_parse_time += duration;
        metrics.total_records += records;
    }
}

impl Default for CHeaderParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderParser for CHeaderParser {
    fn language(&self) -> &str {
        "c"
    }

    fn file_extensions(&self) -> &[&str] {
        &[".h"]
    }

    fn parse_source(&self, source: &str, file_path: &Path) -> Result<HeaderIR, ParserError> {
        crate::extractor::extract(source, file_path, &self.config)
    }

    fn parse_header(&self, file_path: &Path, source: &str) -> Result<HeaderIR, ParserError> {
        let start = Instant::now();

        // Check size limit
        if source.len() > self.config.max_file_size {
            self.update_metrics(false, start.elapsed(), 0);
            return Err(ParserError::FileTooLarge(
                file_path.to_path_buf(),
                source.len(),
            ));
        }

        match self.parse_source(source, file_path) {
            Ok(ir) => {
                self.update_metrics(true, start.elapsed(), ir.records.len());
                Ok(ir)
            }
            Err(e) => {
                warn!("skipping {}: {e}", file_path.display());
                self.update_metrics(false, start.elapsed(), 0);
                Err(e)
            }
        }
    }

    fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn metrics(&self) -> ParserMetrics {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn reset_metrics(&mut self) {
        *self.metrics.lock().unwrap_or_else(PoisonError::into_inner) = ParserMetrics::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_c_header_parser_new() {
        let parser = CHeaderParser::new();
        assert_eq!(parser.language(), "c");
    }

    #[test]
    fn test_c_header_parser_can_parse() {
        let parser = CHeaderParser::new();
        assert!(parser.can_parse(Path::new("include/git2/blob.h")));
        assert!(!parser.can_parse(Path::new("src/blob.c")));
        assert!(!parser.can_parse(Path::new("README")));
    }

    #[test]
    fn test_metrics_initial_state() {
        let parser = CHeaderParser::new();
        let metrics = parser.metrics();
        assert_eq!(metrics.files_attempted, 0);
        assert_eq!(metrics.files_succeeded, 0);
        assert_eq!(metrics.files_failed, 0);
    }

    #[test]
    fn test_parse_header_updates_metrics() {
        let parser = CHeaderParser::new();
        let ir = parser
            .parse_header(Path::new("a.h"), "/** doc */\nint f(void);\n")
            .unwrap();
        assert_eq!(ir.records.len(), 1);

        let metrics = parser.metrics();
        assert_eq!(metrics.files_attempted, 1);
        assert_eq!(metrics.files_succeeded, 1);
        assert_eq!(metrics.total_records, 1);
    }

    #[test]
    fn test_parse_source_does_not_touch_metrics() {
        let parser = CHeaderParser::new();
        parser
            .parse_source("/** doc */\nint f(void);\n", Path::new("a.h"))
            .unwrap();
        assert_eq!(parser.metrics().files_attempted, 0);
    }

    #[test]
    fn test_file_too_large() {
        let parser = CHeaderParser::with_config(ParserConfig::default().with_max_file_size(8));
        let result = parser.parse_header(Path::new("big.h"), "/** doc */\nint f(void);\n");

        assert!(matches!(result, Err(ParserError::FileTooLarge(_, _))));
        assert_eq!(parser.metrics().files_failed, 1);
    }

    #[test]
    fn test_parse_tree_isolates_failing_file() {
        let parser = CHeaderParser::new();
        let mut files = BTreeMap::new();
        files.insert("a.h".to_string(), "/** a */\nint a(void);\n".to_string());
        files.insert("b.h".to_string(), "/** b */\nint b\0(void);\n".to_string());
        files.insert("c.c".to_string(), "/** c */\nint c(void);\n".to_string());

        let info = parser.parse_tree(&files);

        assert_eq!(info.headers.len(), 1);
        assert_eq!(info.failed_files.len(), 1);
        assert_eq!(info.total_files(), 2);
    }

    #[test]
    fn test_reset_metrics() {
        let mut parser = CHeaderParser::new();
        parser
            .parse_header(Path::new("a.h"), "/** doc */\nint f(void);\n")
            .unwrap();
        parser.reset_metrics();
        assert_eq!(parser.metrics().files_attempted, 0);
    }
}
