use crate::{config::ParserConfig, errors::ParserError, ir::HeaderIR, metrics::ParserMetrics};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Result of parsing every header of one tree
#[derive(Debug, Default)]
pub struct TreeInfo {
    /// Successfully parsed headers, in path order
    pub headers: Vec<HeaderIR>,

    /// Files that failed to parse (path, error message)
    pub failed_files: Vec<(PathBuf, String)>,

    /// Total parse time for all files
    pub total_parse_time: Duration,
}

impl TreeInfo {
    /// Total number of files processed (success + failure)
    pub fn total_files(&self) -> usize {
        self.headers.len() + self.failed_files.len()
    }

    /// Success rate (0.0 to 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.total_files() == 0 {
            0.0
        } else {
            self.headers.len() as f64 / self.total_files() as f64
        }
    }
}

/// Core trait implemented by header front ends
///
/// The snapshot builder depends only on the [`HeaderIR`] a parser produces,
/// never on how it tokenizes. A hand-rolled scanner and a compiler-backed
/// front end are interchangeable behind this trait.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; one parser instance is shared by
/// all per-version extraction tasks.
pub trait HeaderParser: Send + Sync {
    /// Returns the language identifier (lowercase, e.g. "c")
    fn language(&self) -> &str;

    /// Returns supported file extensions (e.g. [".h"])
    fn file_extensions(&self) -> &[&str];

    /// Extract declarations from source text
    ///
    /// **Note on Metrics**: This method does NOT update parser metrics.
    /// Only `parse_header()` does, to avoid double counting.
    fn parse_source(&self, source: &str, file_path: &Path) -> Result<HeaderIR, ParserError>;

    /// Extract one header of a tree, applying size limits and updating metrics
    fn parse_header(&self, file_path: &Path, source: &str) -> Result<HeaderIR, ParserError>;

    /// Parse every header of a tree (path → content)
    ///
    /// Files this parser cannot handle are ignored. A file that fails is
    /// recorded in `failed_files` and does not stop the others.
    fn parse_tree(&self, files: &BTreeMap<String, String>) -> TreeInfo {
        let mut info = TreeInfo::default();

        for (path, source) in files {
            let path = Path::new(path);
            if !self.can_parse(path) {
                continue;
            }
            let start = std::time::Instant::now();
            match self.parse_header(path, source) {
                Ok(ir) => info.headers.push(ir),
                Err(e) => info.failed_files.push((path.to_path_buf(), e.to_string())),
            }
            info.total_parse_time += start.elapsed();
        }

        info
    }

    /// Check if this parser can handle the given file
    ///
    /// Default implementation checks file extension.
    fn can_parse(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_str = format!(".{}", ext.to_string_lossy());
            self.file_extensions().contains(&ext_str.as_str())
        } else {
            false
        }
    }

    /// Get parser configuration
    fn config(&self) -> &ParserConfig;

    /// Get accumulated metrics
    fn metrics(&self) -> ParserMetrics;

    /// Reset metrics
    fn reset_metrics(&mut self);
}
