//! Group and type-usage indexing over a whole snapshot.
//!
//! These passes only see complete per-version record sets, which is why they
//! run in [`SnapshotBuilder::build`](crate::snapshot::SnapshotBuilder::build)
//! and not per file.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::snapshot::{DocumentSnapshot, GlobalEntry};
use docgraph_parser_api::{Declaration, DeclarationKind, FunctionRecord, SingletonGroupPolicy};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::Path;

/// Group that collects one-member groups under [`SingletonGroupPolicy::Misc`]
pub const MISC_GROUP: &str = "misc";

/// Group name of a function
///
/// The prefix is stripped first and the text before the first `_` is the
/// group. Names without `_` fall back to the stem of the declaring file.
pub fn group_name(function: &str, file: &str, prefix: Option<&str>) -> String {
    let stripped = prefix
        .and_then(|p| function.strip_prefix(p))
        .unwrap_or(function);

    match stripped.split_once('_') {
        Some((group, _)) => group.to_string(),
        None => Path::new(file)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

/// Bucket functions by group name and stamp each record with its group
///
/// Returns `(group, sorted members)` sorted by group. Functions whose group
/// name comes out empty stay ungrouped and are reported.
pub fn group_functions(
    functions: &mut BTreeMap<String, FunctionRecord>,
    prefix: Option<&str>,
    policy: SingletonGroupPolicy,
    diagnostics: &mut Diagnostics,
) -> Vec<(String, Vec<String>)> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (name, function) in functions.iter() {
        let group = group_name(name, &function.location.file, prefix);
        if group.is_empty() {
            warn!("{name} has an empty group name, leaving it ungrouped");
            diagnostics.push(
                DiagnosticKind::EmptyGroup,
                name,
                format!("no group name could be derived (declared in {})", function.location.file),
            );
            continue;
        }
        groups.entry(group).or_default().push(name.clone());
    }

    if policy == SingletonGroupPolicy::Misc {
        let singletons: Vec<String> = groups
            .iter()
            .filter(|(group, members)| members.len() == 1 && group.as_str() != MISC_GROUP)
            .map(|(group, _)| group.clone())
            .collect();
        for group in singletons {
            if let Some(members) = groups.remove(&group) {
                debug!("folding group {group} into {MISC_GROUP}");
                groups.entry(MISC_GROUP.to_string()).or_default().extend(members);
            }
        }
    }

    let mut grouped = Vec::with_capacity(groups.len());
    for (group, mut members) in groups {
        members.sort();
        for member in &members {
            if let Some(function) = functions.get_mut(member) {
                function.group = Some(group.clone());
            }
        }
        grouped.push((group, members));
    }
    grouped
}

/// True when `type_name` occurs in `text` followed by a non-identifier
/// character (whitespace, `;`, `)`, `*`) or the end of the text
///
/// Only the right edge is checked, so `my_git_oid` also mentions `git_oid`.
pub fn mentions_type(text: &str, type_name: &str) -> bool {
    if type_name.is_empty() {
        return false;
    }
    text.match_indices(type_name).any(|(at, _)| {
        match text[at + type_name.len()..].chars().next() {
            None => true,
            Some(c) => c.is_whitespace() || matches!(c, ';' | ')' | '*'),
        }
    })
}

/// Fill every type's `used.returns` and `used.needs` from the return types
/// and argument lists of functions and callbacks
pub fn record_type_usage(snapshot: &mut DocumentSnapshot) {
    let DocumentSnapshot {
        functions,
        callbacks,
        types,
        ..
    } = snapshot;

    for (type_name, entry) in types.iter_mut() {
        let mut returns = Vec::new();
        let mut needs = Vec::new();

        for (name, function) in functions.iter().chain(callbacks.iter()) {
            if mentions_type(&function.return_value.type_name, type_name) {
                returns.push(name.clone());
            }
            if mentions_type(&function.argline, type_name) {
                needs.push(name.clone());
            }
        }

        returns.sort();
        returns.dedup();
        needs.sort();
        needs.dedup();
        entry.used.returns = returns;
        entry.used.needs = needs;
    }
}

/// Individual global symbols published by a declaration
///
/// Defines contribute one entry per constant, function-like macros one entry,
/// and unnamed enums one entry per enumerator. Every entry inherits the
/// parent's location and documentation; an enumerator's own comment replaces
/// the parent's `comments`. Other declarations publish nothing.
pub fn explode_globals(decl: &Declaration) -> Vec<(String, GlobalEntry)> {
    match decl {
        Declaration::Define(define) => define
            .members
            .iter()
            .map(|constant| {
                let entry = GlobalEntry {
                    kind: DeclarationKind::Define,
                    location: define.location.clone(),
                    value: constant.value.clone(),
                    description: define.description.clone(),
                    comments: define.comments.clone(),
                };
                (constant.name.clone(), entry)
            })
            .collect(),
        Declaration::Macro(m) => vec![(
            m.name.clone(),
            GlobalEntry {
                kind: DeclarationKind::Macro,
                location: m.location.clone(),
                value: Some(m.value.clone()),
                description: m.description.clone(),
                comments: m.comments.clone(),
            },
        )],
        Declaration::Enum(e) if e.name.is_none() => e
            .fields
            .iter()
            .map(|field| {
                let entry = GlobalEntry {
                    kind: DeclarationKind::Enum,
                    location: e.location.clone(),
                    value: field.value.clone(),
                    description: e.description.clone(),
                    comments: field.comment.clone().unwrap_or_else(|| e.comments.clone()),
                };
                (field.name.clone(), entry)
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::TypeEntry;
    use docgraph_parser_api::{AggregateRecord, Argument, Field, Location, MacroRecord};

    fn record(name: &str, file: &str) -> FunctionRecord {
        FunctionRecord::new(name, Location::new(file, 1, 1)).with_return("int")
    }

    fn functions(names: &[(&str, &str)]) -> BTreeMap<String, FunctionRecord> {
        names
            .iter()
            .map(|(name, file)| (name.to_string(), record(name, file)))
            .collect()
    }

    #[test]
    fn test_group_name() {
        assert_eq!(group_name("git_foo_bar", "git2/foo.h", Some("git_")), "foo");
        assert_eq!(group_name("git_foo_bar", "git2/foo.h", None), "git");
        assert_eq!(group_name("git_libgit2", "git2/common.h", Some("git_")), "common");
        assert_eq!(group_name("git__hidden", "git2/x.h", Some("git_")), "");
    }

    #[test]
    fn test_group_functions_keep_policy() {
        let mut fns = functions(&[
            ("git_blob_lookup", "git2/blob.h"),
            ("git_blob_free", "git2/blob.h"),
            ("git_oid_fmt", "git2/oid.h"),
            ("git_strerror", "git2/errors.h"),
        ]);
        let mut diagnostics = Diagnostics::new();
        let groups = group_functions(
            &mut fns,
            Some("git_"),
            SingletonGroupPolicy::Keep,
            &mut diagnostics,
        );

        assert_eq!(
            groups,
            vec![
                (
                    "blob".to_string(),
                    vec!["git_blob_free".to_string(), "git_blob_lookup".to_string()]
                ),
                ("errors".to_string(), vec!["git_strerror".to_string()]),
                ("oid".to_string(), vec!["git_oid_fmt".to_string()]),
            ]
        );
        assert_eq!(fns["git_oid_fmt"].group.as_deref(), Some("oid"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_group_functions_misc_policy() {
        let mut fns = functions(&[
            ("git_blob_lookup", "git2/blob.h"),
            ("git_blob_free", "git2/blob.h"),
            ("git_oid_fmt", "git2/oid.h"),
            ("git_strerror", "git2/errors.h"),
        ]);
        let mut diagnostics = Diagnostics::new();
        let groups = group_functions(
            &mut fns,
            Some("git_"),
            SingletonGroupPolicy::Misc,
            &mut diagnostics,
        );

        let names: Vec<&str> = groups.iter().map(|(g, _)| g.as_str()).collect();
        assert_eq!(names, vec!["blob", "misc"]);
        assert_eq!(
            groups[1].1,
            vec!["git_oid_fmt".to_string(), "git_strerror".to_string()]
        );
        assert_eq!(fns["git_strerror"].group.as_deref(), Some("misc"));
    }

    #[test]
    fn test_empty_group_is_reported() {
        let mut fns = functions(&[("git__internal", "git2/x.h"), ("git_tag_free", "git2/tag.h")]);
        let mut diagnostics = Diagnostics::new();
        let groups = group_functions(
            &mut fns,
            Some("git_"),
            SingletonGroupPolicy::Keep,
            &mut diagnostics,
        );

        assert_eq!(groups.len(), 1);
        assert_eq!(fns["git__internal"].group, None);
        let empty: Vec<&str> = diagnostics
            .of_kind(DiagnosticKind::EmptyGroup)
            .map(|d| d.symbol.as_str())
            .collect();
        assert_eq!(empty, vec!["git__internal"]);
    }

    #[test]
    fn test_mentions_type() {
        assert!(mentions_type("const git_oid *id", "git_oid"));
        assert!(mentions_type("git_oid", "git_oid"));
        assert!(mentions_type("git_oid*", "git_oid"));
        assert!(!mentions_type("git_oid_shorten *os", "git_oid"));
        assert!(mentions_type("git_oid_shorten *os, git_oid *out", "git_oid"));
        assert!(!mentions_type("int x", ""));
    }

    #[test]
    fn test_record_type_usage() {
        let mut snapshot = DocumentSnapshot::default();
        let lookup = record("git_blob_lookup", "git2/blob.h")
            .with_args(vec![
                Argument::new("out", "git_blob **"),
                Argument::new("id", "const git_oid *"),
            ])
            .with_argline("git_blob **out, const git_oid *id");
        let tostr = FunctionRecord::new("git_oid_allocfmt", Location::new("git2/oid.h", 1, 1))
            .with_return("char *")
            .with_argline("const git_oid *oid");
        let id = FunctionRecord::new("git_blob_id", Location::new("git2/blob.h", 1, 1))
            .with_return("const git_oid *")
            .with_argline("const git_blob *blob");
        let mut cb = FunctionRecord::new("git_oid_cb", Location::new("git2/oid.h", 1, 1))
            .with_return("int");
        cb.argline = "const git_oid *oid, void *payload".to_string();

        for f in [lookup, tostr, id] {
            snapshot.functions.insert(f.name.clone(), f);
        }
        snapshot.callbacks.insert(cb.name.clone(), cb);
        snapshot.types.push((
            "git_oid".to_string(),
            TypeEntry::new(Declaration::Struct(AggregateRecord::new(
                Some("git_oid".to_string()),
                Location::new("git2/oid.h", 1, 1),
            ))),
        ));

        record_type_usage(&mut snapshot);

        let used = &snapshot.types[0].1.used;
        assert_eq!(used.returns, vec!["git_blob_id".to_string()]);
        assert_eq!(
            used.needs,
            vec![
                "git_blob_lookup".to_string(),
                "git_oid_allocfmt".to_string(),
                "git_oid_cb".to_string()
            ]
        );
    }

    #[test]
    fn test_explode_unnamed_enum() {
        let mut e = AggregateRecord::new(None, Location::new("git2/common.h", 10, 14));
        e.description = "Capabilities".to_string();
        e.comments = "shared".to_string();
        e.fields = vec![
            Field::new("GIT_CAP_THREADS", "int").with_value("(1 << 0)"),
            Field {
                comment: Some("HTTPS support".to_string()),
                ..Field::new("GIT_CAP_HTTPS", "int").with_value("(1 << 1)")
            },
        ];

        let globals = explode_globals(&Declaration::Enum(e));

        assert_eq!(globals.len(), 2);
        assert_eq!(globals[0].0, "GIT_CAP_THREADS");
        assert_eq!(globals[0].1.value.as_deref(), Some("(1 << 0)"));
        assert_eq!(globals[0].1.comments, "shared");
        assert_eq!(globals[1].1.comments, "HTTPS support");
        assert_eq!(globals[1].1.description, "Capabilities");
        assert_eq!(globals[1].1.location.line, 10);
    }

    #[test]
    fn test_explode_macro_and_named_enum() {
        let m = MacroRecord {
            name: "GIT_OID_CMP".to_string(),
            location: Location::new("git2/oid.h", 3, 3),
            decl: "GIT_OID_CMP(a, b)".to_string(),
            value: "git_oid_cmp(a, b)".to_string(),
            description: "Compare".to_string(),
            comments: String::new(),
        };
        let globals = explode_globals(&Declaration::Macro(m));
        assert_eq!(globals[0].1.kind, DeclarationKind::Macro);
        assert_eq!(globals[0].1.value.as_deref(), Some("git_oid_cmp(a, b)"));

        let named = AggregateRecord::new(Some("git_otype".to_string()), Location::default());
        assert!(explode_globals(&Declaration::Enum(named)).is_empty());
    }
}
