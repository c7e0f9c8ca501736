use super::Location;
use serde::{Deserialize, Serialize};

/// Separator between argument types in a signature string
pub const SIGNATURE_SEPARATOR: &str = "::";

/// A function or callback argument
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument {
    /// Argument name (empty for unnamed prototype arguments)
    pub name: String,

    /// Normalized type, pointer stars attached (`char *`)
    #[serde(rename = "type")]
    pub type_name: String,

    /// Text bound from `@param` and inline comments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Argument {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Return type and its `@return` documentation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnValue {
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A documented function prototype or function pointer typedef
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,

    #[serde(flatten)]
    pub location: Location,

    #[serde(rename = "return")]
    pub return_value: ReturnValue,

    pub args: Vec<Argument>,

    /// Argument list exactly as written between the parentheses
    pub argline: String,

    /// Argument types joined with [`SIGNATURE_SEPARATOR`]
    pub signature: String,

    pub description: String,

    pub comments: String,

    /// Navigation group, assigned when the snapshot is indexed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// `@param` names that matched no argument
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched_params: Vec<String>,
}

impl FunctionRecord {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            return_value: ReturnValue::default(),
            args: Vec::new(),
            argline: String::new(),
            signature: String::new(),
            description: String::new(),
            comments: String::new(),
            group: None,
            unmatched_params: Vec::new(),
        }
    }

    pub fn with_return(mut self, type_name: impl Into<String>) -> Self {
        self.return_value.type_name = type_name.into();
        self
    }

    /// Replace the argument list and recompute the signature
    pub fn with_args(mut self, args: Vec<Argument>) -> Self {
        self.signature = signature_of(&args);
        self.args = args;
        self
    }

    pub fn with_argline(mut self, argline: impl Into<String>) -> Self {
        self.argline = argline.into();
        self
    }
}

/// Canonical signature of an argument list: types only, names and docs ignored
pub fn signature_of(args: &[Argument]) -> String {
    args.iter()
        .map(|a| a.type_name.as_str())
        .collect::<Vec<_>>()
        .join(SIGNATURE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_ignores_names_and_comments() {
        let a = FunctionRecord::new("f", Location::default()).with_args(vec![
            Argument::new("a", "int"),
            Argument::new("name", "char *").with_comment("the name"),
        ]);
        let b = FunctionRecord::new("f", Location::default()).with_args(vec![
            Argument::new("x", "int"),
            Argument::new("y", "char *"),
        ]);
        assert_eq!(a.signature, "int::char *");
        assert_eq!(a.signature, b.signature);
    }

    #[test]
    fn test_empty_signature() {
        let f = FunctionRecord::new("f", Location::default()).with_args(Vec::new());
        assert_eq!(f.signature, "");
    }
}
