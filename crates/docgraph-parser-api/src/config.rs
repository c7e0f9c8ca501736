use serde::{Deserialize, Serialize};

/// What to do with groups that end up with a single function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SingletonGroupPolicy {
    /// Keep one-member groups as they are
    #[default]
    Keep,
    /// Fold one-member groups into a shared `misc` group
    Misc,
}

/// Configuration for extraction and snapshot building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Function-name prefix stripped before computing group names (e.g. `git_`)
    pub prefix: Option<String>,

    /// Minimum number of `_`-separated segments a synthesized enum name
    /// needs before it is accepted. Shorter prefixes leave the enum unnamed.
    pub min_enum_prefix_segments: usize,

    /// Policy for groups with exactly one member
    pub singleton_groups: SingletonGroupPolicy,

    /// Maximum file size to parse (in bytes)
    /// Files larger than this are skipped
    pub max_file_size: usize,

    /// Extract independent versions in parallel
    pub parallel: bool,

    /// Number of parallel workers (None = rayon default)
    pub parallel_workers: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            min_enum_prefix_segments: 2,
            singleton_groups: SingletonGroupPolicy::Keep,
            max_file_size: 10 * 1024 * 1024, // 10 MB
            parallel: true,
            parallel_workers: None,
        }
    }
}

impl ParserConfig {
    /// Set the function prefix stripped before grouping
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Enable parallel extraction
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set maximum file size
    pub fn with_max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set the singleton group policy
    pub fn with_singleton_groups(mut self, policy: SingletonGroupPolicy) -> Self {
        self.singleton_groups = policy;
        self
    }

    /// Set the minimum segment count for synthesized enum names
    pub fn with_min_enum_prefix_segments(mut self, segments: usize) -> Self {
        self.min_enum_prefix_segments = segments;
        self
    }
}
