use super::Location;
use serde::{Deserialize, Serialize};

/// `typedef X NAME;` that is neither a struct, enum nor function pointer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedefRecord {
    pub name: String,

    #[serde(flatten)]
    pub location: Location,

    /// The aliased type text
    pub underlying: String,

    pub description: String,

    pub comments: String,
}

impl TypedefRecord {
    pub fn new(name: impl Into<String>, underlying: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            underlying: underlying.into(),
            description: String::new(),
            comments: String::new(),
        }
    }
}
