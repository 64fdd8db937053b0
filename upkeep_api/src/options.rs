use serde::{Deserialize, Serialize};

/// Run-scoped filters and flags.
///
/// Every filter is an exact, case-sensitive match against its loop level. An
/// unset or empty filter matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunOptions {
    /// Only process the provider entry with this type identifier.
    #[serde(default)]
    pub provider: Option<String>,
    /// Only process this organization.
    #[serde(default)]
    pub organization: Option<String>,
    /// Only dispatch the updater with this identifier.
    #[serde(default)]
    pub updater: Option<String>,
    /// Plugins must not push branches or open pull requests.
    #[serde(default)]
    pub dry_run: bool,
    /// Emit detailed progress.
    #[serde(default)]
    pub verbose: bool,
}

impl RunOptions {
    /// Whether the provider filter admits `name`.
    #[must_use]
    pub fn matches_provider(&self, name: &str) -> bool {
        filter_matches(self.provider.as_deref(), name)
    }

    /// Whether the organization override admits `organization`.
    #[must_use]
    pub fn matches_organization(&self, organization: &str) -> bool {
        filter_matches(self.organization.as_deref(), organization)
    }

    /// Whether the updater filter admits `name`.
    #[must_use]
    pub fn matches_updater(&self, name: &str) -> bool {
        filter_matches(self.updater.as_deref(), name)
    }
}

fn filter_matches(filter: Option<&str>, value: &str) -> bool {
    match filter {
        Some(expected) if !expected.is_empty() => expected == value,
        _ => true,
    }
}

/// Options handed to an updater for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UpdateOptions {
    /// Copied from [`RunOptions::dry_run`].
    #[serde(default)]
    pub dry_run: bool,
    /// Copied from [`RunOptions::verbose`].
    #[serde(default)]
    pub verbose: bool,
    /// Request auto-complete on created pull requests.
    #[serde(default)]
    pub auto_complete: bool,
    /// Branch override for pull request targets; `None` uses the default branch.
    #[serde(default)]
    pub target_branch: Option<String>,
}

impl UpdateOptions {
    /// Start from the run-wide flags.
    #[must_use]
    pub fn from_run(run: &RunOptions) -> Self {
        Self {
            dry_run: run.dry_run,
            verbose: run.verbose,
            auto_complete: false,
            target_branch: None,
        }
    }

    /// Merge per-updater settings. An empty `target_branch` leaves the override unset.
    #[must_use]
    pub fn with_updater_settings(mut self, auto_complete: bool, target_branch: &str) -> Self {
        self.auto_complete = auto_complete;
        if !target_branch.is_empty() {
            self.target_branch = Some(target_branch.to_owned());
        }
        self
    }

    /// Resolve the branch pull requests should target for `default_branch`.
    #[must_use]
    pub fn target_branch_or<'a>(&'a self, default_branch: &'a str) -> &'a str {
        self.target_branch.as_deref().unwrap_or(default_branch)
    }
}
