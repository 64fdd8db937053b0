use serde::{Deserialize, Serialize};

/// Request fields for opening a pull or merge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestInput {
    /// Branch carrying the changes.
    pub source_branch: String,
    /// Branch the changes merge into.
    pub target_branch: String,
    /// Title shown by the platform.
    pub title: String,
    /// Body / description.
    #[serde(default)]
    pub description: String,
    /// Whether the platform should merge automatically once checks pass.
    #[serde(default)]
    pub auto_complete: bool,
}

/// State reported by the platform for a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestStatus {
    /// Open and awaiting review.
    #[default]
    Open,
    /// Merged into the target branch.
    Merged,
    /// Closed or abandoned without merging.
    Closed,
}

/// Pull request returned by a provider after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Platform-assigned number.
    pub id: u64,
    /// Title as stored by the platform.
    pub title: String,
    /// Web URL of the pull request.
    pub url: String,
    /// Current status.
    #[serde(default)]
    pub status: PullRequestStatus,
}
