use serde::{Deserialize, Serialize};

/// Kind of modification a [`FileChange`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// File is created.
    Add,
    /// Existing file content is replaced.
    #[default]
    Edit,
    /// File is removed.
    Delete,
}

/// A single file modification carried by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Path relative to the repository root.
    pub path: String,
    /// Full new content. Ignored for deletions.
    #[serde(default)]
    pub content: String,
    /// Change kind.
    #[serde(default)]
    pub kind: ChangeKind,
}

impl FileChange {
    /// Replace the content of an existing file.
    #[must_use]
    pub fn edit(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            kind: ChangeKind::Edit,
        }
    }

    /// Create a new file.
    #[must_use]
    pub fn add(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            kind: ChangeKind::Add,
        }
    }

    /// Remove a file.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: String::new(),
            kind: ChangeKind::Delete,
        }
    }
}

/// Input for creating a branch with a single commit on top of a base branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInput {
    /// Name of the branch to create.
    pub name: String,
    /// Branch the new branch starts from.
    pub base_branch: String,
    /// Ordered file changes committed onto the branch.
    #[serde(default)]
    pub changes: Vec<FileChange>,
    /// Commit message.
    pub commit_message: String,
}
