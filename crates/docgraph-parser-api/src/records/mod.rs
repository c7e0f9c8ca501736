//! Declaration records produced by header front ends.
//!
//! [`Declaration`] is a closed sum over every kind of documented declaration
//! a header can contain. Each variant owns a kind-specific record; the
//! [`Location`] shared by all of them is flattened into the serialized form.

pub mod aggregate;
pub mod file;
pub mod function;
pub mod macro_;
pub mod typedef;

pub use aggregate::{AggregateRecord, Field};
pub use file::{FileDocRecord, FileTags};
pub use function::{signature_of, Argument, FunctionRecord, ReturnValue, SIGNATURE_SEPARATOR};
pub use macro_::{Constant, DefineRecord, MacroRecord};
pub use typedef::TypedefRecord;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source position of a declaration (1-indexed, inclusive)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Header path relative to the tree root
    pub file: String,

    /// First source line of the declaration
    pub line: usize,

    /// Last source line of the declaration
    pub lineto: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize, lineto: usize) -> Self {
        Self {
            file: file.into(),
            line,
            lineto,
        }
    }
}

/// Kind discriminant of a [`Declaration`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Function,
    Struct,
    Enum,
    Typedef,
    Fnptr,
    Macro,
    Define,
    File,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeclarationKind::Function => "function",
            DeclarationKind::Struct => "struct",
            DeclarationKind::Enum => "enum",
            DeclarationKind::Typedef => "typedef",
            DeclarationKind::Fnptr => "fnptr",
            DeclarationKind::Macro => "macro",
            DeclarationKind::Define => "define",
            DeclarationKind::File => "file",
        };
        f.write_str(s)
    }
}

/// One documented declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Declaration {
    Function(FunctionRecord),
    Struct(AggregateRecord),
    Enum(AggregateRecord),
    Typedef(TypedefRecord),
    /// Function pointer typedef (`typedef int (*cb)(void *);`)
    Fnptr(FunctionRecord),
    /// Function-like macro (`#define NAME(args) ...`)
    Macro(MacroRecord),
    /// Object-like `#define`, or a run of them sharing one comment
    Define(DefineRecord),
    /// Comment that documents the file rather than a declaration
    File(FileDocRecord),
}

impl Declaration {
    pub fn kind(&self) -> DeclarationKind {
        match self {
            Declaration::Function(_) => DeclarationKind::Function,
            Declaration::Struct(_) => DeclarationKind::Struct,
            Declaration::Enum(_) => DeclarationKind::Enum,
            Declaration::Typedef(_) => DeclarationKind::Typedef,
            Declaration::Fnptr(_) => DeclarationKind::Fnptr,
            Declaration::Macro(_) => DeclarationKind::Macro,
            Declaration::Define(_) => DeclarationKind::Define,
            Declaration::File(_) => DeclarationKind::File,
        }
    }

    /// Declared name, if the declaration has one
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Function(f) | Declaration::Fnptr(f) => Some(&f.name),
            Declaration::Struct(a) | Declaration::Enum(a) => a.name.as_deref(),
            Declaration::Typedef(t) => Some(&t.name),
            Declaration::Macro(m) => Some(&m.name),
            Declaration::Define(d) => d.name.as_deref(),
            Declaration::File(_) => None,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            Declaration::Function(f) | Declaration::Fnptr(f) => &f.location,
            Declaration::Struct(a) | Declaration::Enum(a) => &a.location,
            Declaration::Typedef(t) => &t.location,
            Declaration::Macro(m) => &m.location,
            Declaration::Define(d) => &d.location,
            Declaration::File(f) => &f.location,
        }
    }

    /// First paragraph of the documentation comment
    pub fn description(&self) -> &str {
        match self {
            Declaration::Function(f) | Declaration::Fnptr(f) => &f.description,
            Declaration::Struct(a) | Declaration::Enum(a) => &a.description,
            Declaration::Typedef(t) => &t.description,
            Declaration::Macro(m) => &m.description,
            Declaration::Define(d) => &d.description,
            Declaration::File(f) => &f.description,
        }
    }

    /// Whether this declaration names a type usable in other declarations
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Declaration::Struct(_) | Declaration::Enum(_) | Declaration::Typedef(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_tag() {
        let decl = Declaration::Typedef(TypedefRecord::new(
            "git_off_t",
            "int64_t",
            Location::new("types.h", 3, 3),
        ));
        let json = serde_json::to_value(&decl).unwrap();
        assert_eq!(json["kind"], "typedef");
        assert_eq!(json["name"], "git_off_t");
        assert_eq!(json["file"], "types.h");
        assert_eq!(json["line"], 3);
    }

    #[test]
    fn test_unnamed_enum_has_no_name() {
        let decl = Declaration::Enum(AggregateRecord::new(None, Location::new("a.h", 1, 4)));
        assert_eq!(decl.kind(), DeclarationKind::Enum);
        assert_eq!(decl.name(), None);
        assert!(decl.is_type());
    }

    #[test]
    fn test_fnptr_kind_display() {
        assert_eq!(DeclarationKind::Fnptr.to_string(), "fnptr");
        assert_eq!(DeclarationKind::Define.to_string(), "define");
    }
}
