use serde::{Deserialize, Serialize};
use sprig_core::FileUri;

/// A named source root. Files belong to the project with the longest matching root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRoot {
    pub name: String,
    /// URI (or URI prefix) of the project directory.
    pub root: String,
}

impl ProjectRoot {
    pub fn new(name: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }
}

pub(crate) fn project_for<'p>(projects: &'p [ProjectRoot], uri: &FileUri) -> Option<&'p str> {
    projects
        .iter()
        .filter(|project| uri.starts_with(&project.root))
        .max_by_key(|project| project.root.trim_end_matches('/').len())
        .map(|project| project.name.as_str())
}
