//! Header extraction
//!
//! Runs the segmenter over a header, parses the tags of every documented
//! chunk and classifies it. Unrecognized declarations become file-level
//! documentation; only text that cannot be scanned at all fails the file.

use crate::classifier::classify;
use crate::segmenter::segment;
use crate::tags::{cleanup_comment, parse_tags};
use docgraph_parser_api::{Declaration, DeclarationKind, HeaderIR, ParserConfig, ParserError};
use log::{debug, trace};
use std::path::Path;

/// Result of extraction with additional metadata
#[derive(Debug)]
pub struct ExtractionResult {
    pub ir: HeaderIR,
    /// Documented chunks found by the segmenter
    pub chunk_count: usize,
    /// Chunks whose comment was empty after cleanup
    pub skipped_chunks: usize,
    /// Chunks that matched no declaration shape
    pub unclassified: usize,
}

/// Extract documented declarations from C header text
pub fn extract(
    source: &str,
    file_path: &Path,
    config: &ParserConfig,
) -> Result<HeaderIR, ParserError> {
    extract_with_stats(source, file_path, config).map(|result| result.ir)
}

/// Extract, also reporting how many chunks were kept or skipped
pub fn extract_with_stats(
    source: &str,
    file_path: &Path,
    config: &ParserConfig,
) -> Result<ExtractionResult, ParserError> {
    if let Some(offset) = source.find('\0') {
        let line = source[..offset].matches('\n').count() + 1;
        return Err(ParserError::Lexical(
            file_path.to_path_buf(),
            line,
            "NUL byte in header text".to_string(),
        ));
    }

    let mut ir = HeaderIR::new(file_path.to_path_buf());
    ir.line_count = source.lines().count();
    let file = ir.file_name();

    let chunks = segment(source);
    let chunk_count = chunks.len();
    let mut skipped_chunks = 0;
    let mut unclassified = 0;

    for chunk in &chunks {
        let comment = cleanup_comment(&chunk.raw_comment);
        if comment.is_empty() {
            trace!("{file}:{} empty comment, skipped", chunk.start_line);
            skipped_chunks += 1;
            continue;
        }

        let tags = parse_tags(&comment);
        ir.tags.merge_missing(&tags.file_tags);

        let record = classify(chunk, &tags, &file, config);
        if record.kind() == DeclarationKind::File && !chunk.code.trim().is_empty() {
            unclassified += 1;
        }
        ir.add_record(record);
    }

    debug!(
        "{file}: {} records from {chunk_count} chunks ({} functions)",
        ir.records.len(),
        ir.records
            .iter()
            .filter(|r| matches!(r, Declaration::Function(_)))
            .count()
    );

    Ok(ExtractionResult {
        ir,
        chunk_count,
        skipped_chunks,
        unclassified,
    })
}
