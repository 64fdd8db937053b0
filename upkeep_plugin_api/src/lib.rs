//! Capability contracts for hosting-platform providers and ecosystem updaters.

mod context;
mod registry;
mod types;

pub use context::Context;
pub use registry::{ProviderFactory, ProviderRegistry, UpdaterRegistry};
pub use types::{
    ProviderError, ProviderResult, RegistryError, RegistryResult, UpdaterError, UpdaterResult,
};

use upkeep_api::{BranchInput, File, PullRequest, PullRequestInput, Repository, UpdateOptions};

/// Adapter for a single Git-hosting platform (GitHub, GitLab, Azure DevOps, ...).
///
/// Every call that touches the network receives the run's [`Context`] and must
/// return [`ProviderError::Cancelled`] promptly once it is cancelled. Failures
/// are always surfaced to the caller.
pub trait Provider: Send + Sync {
    /// Stable identifier matching the registry key (e.g., "github").
    fn name(&self) -> &str;

    /// Whether `url` points at a repository hosted by this platform.
    fn matches_url(&self, url: &str) -> bool;

    /// List every repository in an organization or group.
    ///
    /// # Errors
    ///
    /// Transport, authentication, or pagination failures.
    fn discover_repositories(
        &self,
        ctx: &Context,
        organization: &str,
    ) -> ProviderResult<Vec<Repository>>;

    /// Read a file from the repository's default branch.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] when the path does not exist.
    fn file_content(&self, ctx: &Context, repo: &Repository, path: &str) -> ProviderResult<String>;

    /// List files on the default branch, optionally filtered by a path pattern.
    ///
    /// # Errors
    ///
    /// Transport failures.
    fn list_files(
        &self,
        ctx: &Context,
        repo: &Repository,
        pattern: Option<&str>,
    ) -> ProviderResult<Vec<File>>;

    /// List tags of `owner/repo`, highest semantic version first.
    ///
    /// # Errors
    ///
    /// Transport failures.
    fn list_tags(&self, ctx: &Context, owner: &str, repo: &str) -> ProviderResult<Vec<String>>;

    /// Whether `path` exists on the default branch.
    ///
    /// # Errors
    ///
    /// Transport failures other than "not found".
    fn file_exists(&self, ctx: &Context, repo: &Repository, path: &str) -> ProviderResult<bool>;

    /// Create a branch carrying the input's file changes atop its base branch.
    ///
    /// # Errors
    ///
    /// Transport failures or a rejected commit.
    fn create_branch(
        &self,
        ctx: &Context,
        repo: &Repository,
        input: &BranchInput,
    ) -> ProviderResult<()>;

    /// Open a pull or merge request.
    ///
    /// # Errors
    ///
    /// Transport failures or a rejected request.
    fn create_pull_request(
        &self,
        ctx: &Context,
        repo: &Repository,
        input: &PullRequestInput,
    ) -> ProviderResult<PullRequest>;

    /// Whether an open pull request already exists for `source_branch`.
    ///
    /// # Errors
    ///
    /// Transport failures.
    fn pull_request_exists(
        &self,
        ctx: &Context,
        repo: &Repository,
        source_branch: &str,
    ) -> ProviderResult<bool>;

    /// HTTPS clone URL with credentials embedded.
    fn authenticated_clone_url(&self, repo: &Repository) -> String;

    /// Authentication token the provider was constructed with.
    fn token(&self) -> &str;
}

/// Plugin for a single dependency ecosystem (Go modules, npm, Docker, ...).
pub trait Updater: Send + Sync {
    /// Stable identifier used for lookup, configuration, and logging.
    fn name(&self) -> &'static str;

    /// Read-only probe: does `repo` use this ecosystem?
    ///
    /// # Errors
    ///
    /// Provider failures while probing.
    fn detect(
        &self,
        ctx: &Context,
        provider: &dyn Provider,
        repo: &Repository,
    ) -> UpdaterResult<bool>;

    /// Scan for outdated dependencies, apply upgrades, and open pull requests.
    ///
    /// Returns an empty list when nothing needed upgrading.
    ///
    /// # Errors
    ///
    /// Any failure while scanning, upgrading, or talking to the provider.
    fn create_update_prs(
        &self,
        ctx: &Context,
        provider: &dyn Provider,
        repo: &Repository,
        options: &UpdateOptions,
    ) -> UpdaterResult<Vec<PullRequest>>;
}
