use crate::records::{Declaration, FileTags};
use std::path::PathBuf;

/// Everything extracted from a single header file
///
/// This is the bridge between a header front end and the snapshot builder.
/// Parsers produce one `HeaderIR` per file; the builder folds them into a
/// version-wide document.
#[derive(Debug, Default, Clone)]
pub struct HeaderIR {
    /// Source file path, relative to the tree root
    pub file_path: PathBuf,

    /// Documented declarations in source order
    pub records: Vec<Declaration>,

    /// File-scope tags gathered from every comment in the file
    pub tags: FileTags,

    /// Number of lines in the file
    pub line_count: usize,
}

impl HeaderIR {
    /// Create a new empty IR
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            ..Default::default()
        }
    }

    pub fn add_record(&mut self, record: Declaration) {
        self.records.push(record);
    }

    /// Path as a forward-slash string, used as the `file` of every record
    pub fn file_name(&self) -> String {
        self.file_path.to_string_lossy().replace('\\', "/")
    }

    /// Names of the functions declared in this file, in source order
    pub fn function_names(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Declaration::Function(f) => Some(f.name.clone()),
                _ => None,
            })
            .collect()
    }
}
