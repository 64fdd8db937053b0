use upkeep_api::PullRequest;

use super::{ProviderError, RegistryError, UpdaterError};

/// Non-fatal failure recorded during a run.
///
/// Each variant skips exactly one unit of work: a provider, an organization, or
/// one updater for one repository.
#[derive(Debug, thiserror::Error)]
pub enum RunFailure {
    /// Provider type is unknown or its factory failed.
    #[error("failed to initialize provider '{provider}': {source}")]
    ProviderInitialization {
        /// Provider type identifier from configuration.
        provider: String,
        /// Registry failure.
        #[source]
        source: RegistryError,
    },
    /// Repository discovery failed for an organization.
    #[error("failed to discover repositories in {provider}/{organization}: {source}")]
    Discovery {
        /// Provider type identifier.
        provider: String,
        /// Organization being discovered.
        organization: String,
        /// Provider failure.
        #[source]
        source: ProviderError,
    },
    /// `Updater::detect` failed for a repository.
    #[error("updater '{updater}' failed to probe {repository}: {source}")]
    Detection {
        /// Updater identifier.
        updater: String,
        /// Organization owning the repository.
        organization: String,
        /// Repository full name.
        repository: String,
        /// Updater failure.
        #[source]
        source: UpdaterError,
    },
    /// `Updater::create_update_prs` failed for a repository.
    #[error("updater '{updater}' failed to update {repository}: {source}")]
    Update {
        /// Updater identifier.
        updater: String,
        /// Organization owning the repository.
        organization: String,
        /// Repository full name.
        repository: String,
        /// Updater failure.
        #[source]
        source: UpdaterError,
    },
}

/// Pull request created during a run, with the context that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPullRequest {
    /// Updater that opened the pull request.
    pub updater: String,
    /// Full name of the repository it targets.
    pub repository: String,
    /// Pull request returned by the provider.
    pub pull_request: PullRequest,
}

/// Outcome of [`super::UpdateService::run`].
#[derive(Debug, Default)]
pub struct RunReport {
    /// Repositories visited across all providers and organizations.
    pub repositories_processed: usize,
    /// Pull requests created, in creation order.
    pub pull_requests: Vec<CreatedPullRequest>,
    /// Failures, in the order they occurred.
    pub failures: Vec<RunFailure>,
    /// Whether the run stopped early because its context was cancelled.
    pub cancelled: bool,
}

impl RunReport {
    /// Number of pull requests created.
    #[must_use]
    pub fn pull_request_count(&self) -> usize {
        self.pull_requests.len()
    }

    /// Number of failures recorded.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.failures.len()
    }

    /// Whether the run completed without failures or cancellation.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}
