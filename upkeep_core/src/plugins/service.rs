use std::sync::Arc;

use tracing::{debug, error, info, info_span, warn};
use upkeep_api::{Repository, RunOptions, UpdateOptions};

use super::{
    Context, CreatedPullRequest, Provider, ProviderRegistry, RunFailure, RunReport, Updater,
    UpdaterRegistry,
};
use crate::config::{Config, ProviderConfig};

/// High-level façade that executes update runs over the registered plugins.
#[derive(Clone)]
pub struct UpdateService {
    providers: Arc<ProviderRegistry>,
    updaters: Arc<UpdaterRegistry>,
}

impl UpdateService {
    /// Create a service backed by the provided registries.
    #[must_use]
    pub fn new(providers: ProviderRegistry, updaters: UpdaterRegistry) -> Self {
        Self {
            providers: Arc::new(providers),
            updaters: Arc::new(updaters),
        }
    }

    /// Access the provider registry.
    #[must_use]
    pub fn providers(&self) -> Arc<ProviderRegistry> {
        Arc::clone(&self.providers)
    }

    /// Access the updater registry.
    #[must_use]
    pub fn updaters(&self) -> Arc<UpdaterRegistry> {
        Arc::clone(&self.updaters)
    }

    /// Execute one full pass over every configured provider, organization,
    /// repository, and updater.
    ///
    /// Never fails: provider initialization, discovery, detection, and update
    /// failures are logged, recorded in the report, and processing moves on
    /// to the next unit of work. Once `ctx` is cancelled no further work is
    /// dispatched and the report is marked cancelled.
    pub fn run(&self, ctx: &Context, config: &Config, options: &RunOptions) -> RunReport {
        info!(
            providers = config.providers.len(),
            updaters = self.updaters.len(),
            dry_run = options.dry_run,
            "starting update run"
        );

        let mut run = Run {
            ctx,
            config,
            options,
            updaters: &self.updaters,
            report: RunReport::default(),
        };

        for entry in &config.providers {
            if run.cancelled() {
                break;
            }
            if !options.matches_provider(&entry.kind) {
                continue;
            }
            match self.providers.get(&entry.kind, &entry.token) {
                Ok(provider) => run.provider(entry, provider.as_ref()),
                Err(source) => {
                    error!(
                        provider = %entry.kind,
                        error = %source,
                        "failed to initialize provider"
                    );
                    run.report.failures.push(RunFailure::ProviderInitialization {
                        provider: entry.kind.clone(),
                        source,
                    });
                }
            }
        }

        let report = run.report;
        if report.cancelled {
            warn!("update run cancelled before completion");
        }
        info!(
            repositories = report.repositories_processed,
            pull_requests = report.pull_request_count(),
            errors = report.error_count(),
            "update run complete"
        );
        report
    }
}

impl std::fmt::Debug for UpdateService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateService")
            .field("providers", &self.providers)
            .field("updaters", &self.updaters)
            .finish()
    }
}

// State for a single run. Counters live here, never on the service.
struct Run<'a> {
    ctx: &'a Context,
    config: &'a Config,
    options: &'a RunOptions,
    updaters: &'a UpdaterRegistry,
    report: RunReport,
}

impl Run<'_> {
    fn cancelled(&mut self) -> bool {
        if !self.report.cancelled && self.ctx.is_cancelled() {
            self.report.cancelled = true;
        }
        self.report.cancelled
    }

    fn provider(&mut self, entry: &ProviderConfig, provider: &dyn Provider) {
        let _span = info_span!("provider", provider = %entry.kind).entered();
        for organization in &entry.organizations {
            if self.cancelled() {
                return;
            }
            if !self.options.matches_organization(organization) {
                continue;
            }
            self.organization(entry, provider, organization);
        }
    }

    fn organization(
        &mut self,
        entry: &ProviderConfig,
        provider: &dyn Provider,
        organization: &str,
    ) {
        let _span = info_span!("organization", organization).entered();
        let repositories = match provider.discover_repositories(self.ctx, organization) {
            Ok(repositories) => repositories,
            Err(source) => {
                error!(
                    provider = %entry.kind,
                    organization,
                    error = %source,
                    "failed to discover repositories"
                );
                self.report.failures.push(RunFailure::Discovery {
                    provider: entry.kind.clone(),
                    organization: organization.to_owned(),
                    source,
                });
                return;
            }
        };
        info!(count = repositories.len(), "discovered repositories");

        for repo in &repositories {
            if self.cancelled() {
                return;
            }
            self.repository(provider, repo);
        }
    }

    fn repository(&mut self, provider: &dyn Provider, repo: &Repository) {
        let repository = repo.full_name();
        let _span = info_span!("repository", repository = %repository).entered();
        self.report.repositories_processed += 1;
        info!("processing repository");

        let updaters = self.updaters;
        for updater in updaters.all() {
            if self.cancelled() {
                return;
            }
            let name = updater.name();
            if !self.options.matches_updater(name) {
                self.note(name, "updater excluded by filter");
                continue;
            }
            if !self.config.is_updater_enabled(name) {
                self.note(name, "updater disabled in configuration");
                continue;
            }
            self.dispatch(provider, updater, repo, &repository);
        }
    }

    fn dispatch(
        &mut self,
        provider: &dyn Provider,
        updater: &dyn Updater,
        repo: &Repository,
        repository: &str,
    ) {
        let name = updater.name();
        match updater.detect(self.ctx, provider, repo) {
            Ok(true) => {}
            Ok(false) => {
                self.note(name, "ecosystem not detected");
                return;
            }
            Err(source) => {
                error!(
                    updater = name,
                    organization = %repo.organization,
                    repository,
                    error = %source,
                    "updater detection failed"
                );
                self.report.failures.push(RunFailure::Detection {
                    updater: name.to_owned(),
                    organization: repo.organization.clone(),
                    repository: repository.to_owned(),
                    source,
                });
                return;
            }
        }

        let options = self.update_options(name);
        info!(updater = name, dry_run = options.dry_run, "running updater");
        match updater.create_update_prs(self.ctx, provider, repo, &options) {
            Ok(pull_requests) => {
                if pull_requests.is_empty() {
                    info!(updater = name, "dependencies up to date");
                }
                for pull_request in pull_requests {
                    info!(
                        updater = name,
                        number = pull_request.id,
                        title = %pull_request.title,
                        url = %pull_request.url,
                        "created pull request"
                    );
                    self.report.pull_requests.push(CreatedPullRequest {
                        updater: name.to_owned(),
                        repository: repository.to_owned(),
                        pull_request,
                    });
                }
            }
            Err(source) => {
                error!(
                    updater = name,
                    organization = %repo.organization,
                    repository,
                    error = %source,
                    "updater failed"
                );
                self.report.failures.push(RunFailure::Update {
                    updater: name.to_owned(),
                    organization: repo.organization.clone(),
                    repository: repository.to_owned(),
                    source,
                });
            }
        }
    }

    fn update_options(&self, updater: &str) -> UpdateOptions {
        let options = UpdateOptions::from_run(self.options);
        match self.config.updater(updater) {
            Some(settings) => {
                options.with_updater_settings(settings.auto_complete, &settings.target_branch)
            }
            None => options,
        }
    }

    // Skips are routine; only surface them at info level when running verbose.
    fn note(&self, updater: &str, message: &str) {
        if self.options.verbose {
            info!(updater, "{message}");
        } else {
            debug!(updater, "{message}");
        }
    }
}
