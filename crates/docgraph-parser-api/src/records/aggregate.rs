use super::Location;
use serde::{Deserialize, Serialize};

/// A struct member or enum constant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    /// Member type; empty for enum constants
    #[serde(rename = "type")]
    pub type_name: String,

    /// Explicitly assigned value of an enum constant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            value: None,
            comment: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A struct or enum declaration
///
/// Opaque structs (`typedef struct foo foo;`) have an empty `fields` list.
/// Enums whose name cannot be determined have `name == None`; their
/// constants are published as globals instead of a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub name: Option<String>,

    #[serde(flatten)]
    pub location: Location,

    pub fields: Vec<Field>,

    /// Member declarations, one per line
    pub block: String,

    /// Declared through `typedef`
    pub is_typedef: bool,

    pub description: String,

    pub comments: String,
}

impl AggregateRecord {
    pub fn new(name: Option<String>, location: Location) -> Self {
        Self {
            name,
            location,
            fields: Vec::new(),
            block: String::new(),
            is_typedef: false,
            description: String::new(),
            comments: String::new(),
        }
    }

    /// True for a struct known only by name
    pub fn is_opaque(&self) -> bool {
        self.fields.is_empty()
    }
}
