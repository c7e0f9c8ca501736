use super::Location;
use serde::{Deserialize, Serialize};

/// File-scope documentation tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brief: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defgroup: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingroup: Option<String>,
}

impl FileTags {
    /// Fill tags that are still unset from `other`; earlier values win
    pub fn merge_missing(&mut self, other: &FileTags) {
        fn keep_first(slot: &mut Option<String>, other: &Option<String>) {
            if slot.is_none() {
                slot.clone_from(other);
            }
        }
        keep_first(&mut self.file, &other.file);
        keep_first(&mut self.brief, &other.brief);
        keep_first(&mut self.defgroup, &other.defgroup);
        keep_first(&mut self.ingroup, &other.ingroup);
    }

    pub fn is_empty(&self) -> bool {
        self.file.is_none()
            && self.brief.is_none()
            && self.defgroup.is_none()
            && self.ingroup.is_none()
    }
}

/// A documentation comment that matched no declaration form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDocRecord {
    #[serde(flatten)]
    pub location: Location,

    pub tags: FileTags,

    pub description: String,

    pub comments: String,
}
