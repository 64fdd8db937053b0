use serde::{Deserialize, Serialize};

/// A repository discovered on a hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Platform-specific identifier (numeric id, GUID, or slug).
    pub id: String,
    /// Repository name without its owner prefix.
    pub name: String,
    /// Organization, group, or user owning the repository.
    pub organization: String,
    /// Optional project for platforms that nest repositories under projects.
    #[serde(default)]
    pub project: Option<String>,
    /// Default branch reference (e.g., "main" or "refs/heads/main").
    pub default_branch: String,
    /// HTTPS remote URL.
    pub clone_url: String,
    /// SSH remote URL.
    #[serde(default)]
    pub ssh_url: String,
    /// Identifier of the provider that discovered the repository.
    pub provider: String,
}

impl Repository {
    /// Owner-qualified name used for logging, e.g. `org/name` or `org/project/name`.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.project {
            Some(project) if !project.is_empty() => {
                format!("{}/{}/{}", self.organization, project, self.name)
            }
            _ => format!("{}/{}", self.organization, self.name),
        }
    }
}

/// Entry produced when listing a repository tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Path relative to the repository root.
    pub path: String,
    /// Opaque content identifier (blob SHA or object id).
    #[serde(default)]
    pub sha: String,
    /// Whether the entry is a directory.
    #[serde(default)]
    pub is_dir: bool,
}
