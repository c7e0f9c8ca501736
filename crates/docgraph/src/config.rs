//! Project descriptor.
//!
//! A project is described by a small JSON file:
//!
//! ```json
//! {
//!  "name":   "project",
//!  "github": "user/project",
//!  "input":  "include/lib",
//!  "prefix": "lib_",
//!  "branch": "gh-pages"
//! }
//! ```
//!
//! Only `input` has a default (`include`). `legacy.input` maps an older
//! header directory to the versions that still used it.

use crate::error::{DocError, Result};
use docgraph_parser_api::ParserConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

fn default_input() -> String {
    "include".to_string()
}

/// Settings for versions that predate the current layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyConfig {
    /// Header directory → versions that keep their headers there
    pub input: BTreeMap<String, Vec<String>>,
}

impl LegacyConfig {
    fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
}

/// Contents of a project descriptor file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Display name of the project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `owner/repository` on GitHub
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    /// Header directory, relative to the tree root
    pub input: String,
    /// Function-name prefix stripped before grouping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Branch a publishing layer writes to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Older header layouts
    #[serde(skip_serializing_if = "LegacyConfig::is_empty")]
    pub legacy: LegacyConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: None,
            github: None,
            input: default_input(),
            prefix: None,
            branch: None,
            legacy: LegacyConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Parse a descriptor
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DocError::config(format!("invalid project descriptor: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a descriptor file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| DocError::io(path, e))?;
        Self::from_json_str(&json)
    }

    /// The starter descriptor for a new project
    pub fn template() -> Self {
        Self {
            name: Some("project".to_string()),
            github: Some("user/project".to_string()),
            input: "include/lib".to_string(),
            prefix: Some("lib_".to_string()),
            branch: Some("gh-pages".to_string()),
            legacy: LegacyConfig::default(),
        }
    }

    /// Pretty JSON for this descriptor
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DocError::serialization("failed to serialize project descriptor", Some(e)))
    }

    fn validate(&self) -> Result<()> {
        if self.input.trim().is_empty() {
            return Err(DocError::config("input must not be empty"));
        }
        for (dir, versions) in &self.legacy.input {
            if dir.trim().is_empty() {
                return Err(DocError::config(format!(
                    "legacy input for {versions:?} must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Parser settings for this project: defaults plus the prefix
    pub fn parser_config(&self) -> ParserConfig {
        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => ParserConfig::default().with_prefix(prefix),
            _ => ParserConfig::default(),
        }
    }

    /// Header directory used by `version`
    pub fn input_for(&self, version: &str) -> &str {
        self.legacy
            .input
            .iter()
            .find(|(_, versions)| versions.iter().any(|v| v == version))
            .map(|(dir, _)| dir.as_str())
            .unwrap_or(self.input.as_str())
    }

    /// Headers of `version` that live under its input directory, keyed by
    /// their path relative to that directory
    pub fn select_headers(
        &self,
        version: &str,
        files: BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let input = self.input_for(version).trim_matches('/');
        if input.is_empty() || input == "." {
            return files;
        }
        let dir = format!("{input}/");
        files
            .into_iter()
            .filter_map(|(path, content)| {
                path.strip_prefix(&dir)
                    .map(|relative| (relative.to_string(), content))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ProjectConfig::from_json_str("{}").unwrap();
        assert_eq!(config.input, "include");
        assert_eq!(config.prefix, None);
        assert_eq!(config.parser_config(), ParserConfig::default());
    }

    #[test]
    fn test_full_descriptor() {
        let config = ProjectConfig::from_json_str(
            r#"{
                "name": "libgit2",
                "github": "libgit2/libgit2",
                "input": "include/git2",
                "prefix": "git_",
                "branch": "gh-pages",
                "legacy": { "input": { "src/git": ["v0.1.0", "v0.2.0"] } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.name.as_deref(), Some("libgit2"));
        assert_eq!(config.parser_config().prefix.as_deref(), Some("git_"));
        assert_eq!(config.input_for("v0.2.0"), "src/git");
        assert_eq!(config.input_for("v0.3.0"), "include/git2");
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = ProjectConfig::from_json_str("{ \"input\": 3 }").unwrap_err();
        assert!(matches!(err, DocError::Config { .. }));

        let err = ProjectConfig::from_json_str(r#"{ "input": "" }"#).unwrap_err();
        assert!(err.to_string().contains("input must not be empty"));
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "input": "include", "prefix": "git_" }}"#).unwrap();

        let config = ProjectConfig::from_path(file.path()).unwrap();
        assert_eq!(config.prefix.as_deref(), Some("git_"));
    }

    #[test]
    fn test_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectConfig::from_path(dir.path().join("docgraph.json")).unwrap_err();
        assert!(matches!(err, DocError::Io { .. }));
    }

    #[test]
    fn test_template_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docgraph.json");
        std::fs::write(&path, ProjectConfig::template().to_json_string().unwrap()).unwrap();

        let config = ProjectConfig::from_path(&path).unwrap();
        assert_eq!(config, ProjectConfig::template());
        assert_eq!(config.input, "include/lib");
    }

    #[test]
    fn test_select_headers() {
        let config = ProjectConfig::from_json_str(
            r#"{ "input": "include", "legacy": { "input": { "src": ["v0.1.0"] } } }"#,
        )
        .unwrap();
        let mut files = BTreeMap::new();
        files.insert("include/git2/blob.h".to_string(), "a".to_string());
        files.insert("src/git/blob.h".to_string(), "b".to_string());
        files.insert("README.md".to_string(), "c".to_string());

        let head: Vec<String> = config.select_headers("HEAD", files.clone()).into_keys().collect();
        assert_eq!(head, vec!["git2/blob.h".to_string()]);

        let old: Vec<String> = config.select_headers("v0.1.0", files).into_keys().collect();
        assert_eq!(old, vec!["git/blob.h".to_string()]);
    }
}
