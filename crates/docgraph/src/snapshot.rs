//! Per-version documentation snapshots.
//!
//! A [`DocumentSnapshot`] is the complete documentation model of one version
//! of a header tree. It is assembled by a [`SnapshotBuilder`], which folds
//! the per-file [`HeaderIR`]s of that version together and then runs the
//! indexing pass (groups and type usage) exactly once in [`SnapshotBuilder::build`].
//!
//! Every map is a `BTreeMap` and every list is sorted, so serializing the
//! same input twice yields identical bytes.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::index;
use docgraph_parser_api::{
    Declaration, DeclarationKind, FileTags, FunctionRecord, HeaderIR, Location, ParserConfig,
    SingletonGroupPolicy, TreeInfo,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Per-file summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    /// Header path relative to the tree root
    pub file: String,
    /// Number of lines in the header
    pub lines: usize,
    /// `@file`, `@brief`, `@defgroup` and `@ingroup` of the header
    pub meta: FileTags,
    /// Functions this header contributed, in source order
    pub functions: Vec<String>,
}

/// Functions that return or take a type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeUsage {
    /// Functions whose return type mentions the type, sorted
    pub returns: Vec<String>,
    /// Functions whose argument list mentions the type, sorted
    pub needs: Vec<String>,
}

/// A named type declaration with its usage cross-reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeEntry {
    /// The struct, enum or typedef record
    pub decl: Declaration,
    /// Functions that use the type
    pub used: TypeUsage,
}

impl TypeEntry {
    /// Wrap a declaration with empty usage
    pub fn new(decl: Declaration) -> Self {
        Self {
            decl,
            used: TypeUsage::default(),
        }
    }

    fn is_opaque(&self) -> bool {
        matches!(&self.decl, Declaration::Struct(s) if s.is_opaque())
    }
}

/// A free-standing symbol: a `#define`, a macro, or a member of an unnamed enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalEntry {
    /// Kind of the declaration the symbol came from
    pub kind: DeclarationKind,
    /// Position of the declaring block
    #[serde(flatten)]
    pub location: Location,
    /// Replacement text or assigned value, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Description of the declaring block
    pub description: String,
    /// Further comments of the declaring block or the symbol itself
    pub comments: String,
}

/// The documentation model of one version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Per-file summaries, sorted by path
    pub files: Vec<FileMeta>,
    /// Functions by name
    pub functions: BTreeMap<String, FunctionRecord>,
    /// Function pointer typedefs by name
    pub callbacks: BTreeMap<String, FunctionRecord>,
    /// Named types, sorted by name
    pub types: Vec<(String, TypeEntry)>,
    /// Defines, macros and unnamed enum members by name
    pub globals: BTreeMap<String, GlobalEntry>,
    /// `(group, sorted function names)`, sorted by group name
    pub groups: Vec<(String, Vec<String>)>,
    /// Function-name prefix stripped before grouping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl DocumentSnapshot {
    /// Look up a function by name
    pub fn function(&self, name: &str) -> Option<&FunctionRecord> {
        self.functions.get(name)
    }

    /// Look up a named type
    pub fn type_entry(&self, name: &str) -> Option<&TypeEntry> {
        self.types
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
            .map(|i| &self.types[i].1)
    }

    /// Members of a group
    pub fn group(&self, name: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(g, _)| g == name)
            .map(|(_, members)| members.as_slice())
    }
}

/// Folds the headers of one version into a [`DocumentSnapshot`]
///
/// Headers should be added in path order; on a duplicate function name the
/// first header wins.
pub struct SnapshotBuilder {
    singleton_groups: SingletonGroupPolicy,
    snapshot: DocumentSnapshot,
    types: BTreeMap<String, TypeEntry>,
    diagnostics: Diagnostics,
}

impl SnapshotBuilder {
    /// Create a builder using the prefix and grouping policy of `config`
    pub fn new(config: &ParserConfig) -> Self {
        let snapshot = DocumentSnapshot {
            prefix: config.prefix.clone().filter(|p| !p.is_empty()),
            ..Default::default()
        };
        Self {
            singleton_groups: config.singleton_groups,
            snapshot,
            types: BTreeMap::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Add every parsed header of a tree and report the files that failed
    pub fn add_tree(&mut self, tree: TreeInfo) {
        for (path, reason) in &tree.failed_files {
            self.skip_file(&path.to_string_lossy(), reason);
        }
        for ir in tree.headers {
            self.add_header(ir);
        }
    }

    /// Record a header that could not be parsed
    pub fn skip_file(&mut self, path: &str, reason: &str) {
        warn!("skipping {path}: {reason}");
        self.diagnostics
            .push(DiagnosticKind::SkippedFile, path, reason);
    }

    /// Fold one header's records into the snapshot
    pub fn add_header(&mut self, ir: HeaderIR) {
        let file = ir.file_name();
        let mut meta = FileMeta {
            file: file.clone(),
            lines: ir.line_count,
            meta: ir.tags,
            functions: Vec::new(),
        };

        for record in ir.records {
            match record {
                Declaration::Function(f) => {
                    let name = f.name.clone();
                    if self.insert_function(f) {
                        meta.functions.push(name);
                    }
                }
                Declaration::Fnptr(f) => match self.snapshot.callbacks.entry(f.name.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert(f);
                    }
                    Entry::Occupied(existing) => {
                        warn!(
                            "duplicate callback {} in {file}, keeping {}",
                            f.name,
                            existing.get().location.file
                        );
                    }
                },
                Declaration::Struct(_) | Declaration::Enum(_) | Declaration::Typedef(_) => {
                    self.insert_type(record)
                }
                Declaration::Macro(_) | Declaration::Define(_) => self.insert_globals(&record),
                Declaration::File(_) => {}
            }
        }

        debug!("{file}: {} functions", meta.functions.len());
        self.snapshot.files.push(meta);
    }

    fn insert_function(&mut self, f: FunctionRecord) -> bool {
        match self.snapshot.functions.entry(f.name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(f);
                true
            }
            Entry::Occupied(existing) => {
                warn!(
                    "duplicate function {} in {}, keeping {}",
                    f.name,
                    f.location.file,
                    existing.get().location.file
                );
                false
            }
        }
    }

    fn insert_type(&mut self, record: Declaration) {
        let Some(name) = record.name().map(str::to_string) else {
            // unnamed enums publish their members instead
            self.insert_globals(&record);
            return;
        };

        let entry = TypeEntry::new(record);
        match self.types.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
            Entry::Occupied(mut existing) => {
                if existing.get().is_opaque() && !entry.is_opaque() {
                    debug!("{} gains a body from {}", existing.key(), entry.decl.location().file);
                    existing.insert(entry);
                } else if !entry.is_opaque() {
                    warn!(
                        "duplicate type {} in {}, keeping {}",
                        existing.key(),
                        entry.decl.location().file,
                        existing.get().decl.location().file
                    );
                }
            }
        }
    }

    fn insert_globals(&mut self, record: &Declaration) {
        for (name, global) in index::explode_globals(record) {
            match self.snapshot.globals.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(global);
                }
                Entry::Occupied(existing) => {
                    debug!("duplicate global {} in {}", existing.key(), global.location.file);
                }
            }
        }
    }

    /// Finish the snapshot: order files and types, then group functions and
    /// cross-reference type usage
    pub fn build(self) -> (DocumentSnapshot, Diagnostics) {
        let SnapshotBuilder {
            singleton_groups,
            mut snapshot,
            types,
            mut diagnostics,
        } = self;

        snapshot.files.sort_by(|a, b| a.file.cmp(&b.file));
        snapshot.types = types.into_iter().collect();

        snapshot.groups = index::group_functions(
            &mut snapshot.functions,
            snapshot.prefix.as_deref(),
            singleton_groups,
            &mut diagnostics,
        );
        index::record_type_usage(&mut snapshot);

        (snapshot, diagnostics)
    }
}

/// Build the snapshot of one parsed tree
pub fn build_snapshot(tree: TreeInfo, config: &ParserConfig) -> (DocumentSnapshot, Diagnostics) {
    let mut builder = SnapshotBuilder::new(config);
    builder.add_tree(tree);
    builder.build()
}
