use super::Location;
use serde::{Deserialize, Serialize};

/// Function-like macro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroRecord {
    pub name: String,

    #[serde(flatten)]
    pub location: Location,

    /// Declarator as written, e.g. `GIT_OID_CMP(a, b)`
    pub decl: String,

    /// Replacement text with line continuations joined
    pub value: String,

    pub description: String,

    pub comments: String,
}

/// One name declared by an object-like `#define`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constant {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Constant {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Object-like `#define`, or a run of adjacent ones sharing a comment
///
/// A single define is named after its constant. A run is unnamed and its
/// members are published individually as globals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefineRecord {
    pub name: Option<String>,

    #[serde(flatten)]
    pub location: Location,

    pub members: Vec<Constant>,

    pub description: String,

    pub comments: String,
}

impl DefineRecord {
    pub fn is_run(&self) -> bool {
        self.members.len() > 1
    }
}
