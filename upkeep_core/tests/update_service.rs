use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing_test::traced_test;
use upkeep_core::plugins::{
    Context, Provider, ProviderError, ProviderRegistry, ProviderResult, Updater, UpdaterError,
    UpdaterRegistry, UpdaterResult,
};
use upkeep_core::{
    BranchInput, Config, File, ProviderConfig, PullRequest, PullRequestInput, PullRequestStatus,
    Repository, RunFailure, RunOptions, UpdateOptions, UpdateService, UpdaterConfig,
};

#[derive(Default)]
struct Calls {
    instantiations: Mutex<Vec<String>>,
    discoveries: Mutex<Vec<String>>,
    detections: Mutex<Vec<(String, String)>>,
    updates: Mutex<Vec<(String, String, UpdateOptions)>>,
}

impl Calls {
    fn instantiations(&self) -> Vec<String> {
        self.instantiations.lock().expect("instantiations lock").clone()
    }

    fn discoveries(&self) -> Vec<String> {
        self.discoveries.lock().expect("discoveries lock").clone()
    }

    fn detections(&self) -> Vec<(String, String)> {
        self.detections.lock().expect("detections lock").clone()
    }

    fn updates(&self) -> Vec<(String, String, UpdateOptions)> {
        self.updates.lock().expect("updates lock").clone()
    }
}

struct FakeProvider {
    kind: String,
    token: String,
    calls: Arc<Calls>,
    failing_orgs: Vec<String>,
    repos_per_org: usize,
}

impl Provider for FakeProvider {
    fn name(&self) -> &str {
        &self.kind
    }

    fn matches_url(&self, url: &str) -> bool {
        url.contains("fake.example.com")
    }

    fn discover_repositories(
        &self,
        ctx: &Context,
        organization: &str,
    ) -> ProviderResult<Vec<Repository>> {
        ctx.check()?;
        self.calls
            .discoveries
            .lock()
            .expect("discoveries lock")
            .push(organization.to_owned());
        if self.failing_orgs.iter().any(|org| org == organization) {
            return Err(ProviderError::request(format!(
                "403 forbidden listing {organization}"
            )));
        }
        Ok((1..=self.repos_per_org)
            .map(|n| repository(&self.kind, organization, &format!("repo-{n}")))
            .collect())
    }

    fn file_content(
        &self,
        _ctx: &Context,
        _repo: &Repository,
        path: &str,
    ) -> ProviderResult<String> {
        Err(ProviderError::NotFound { path: path.into() })
    }

    fn list_files(
        &self,
        _ctx: &Context,
        _repo: &Repository,
        _pattern: Option<&str>,
    ) -> ProviderResult<Vec<File>> {
        Ok(Vec::new())
    }

    fn list_tags(
        &self,
        _ctx: &Context,
        _owner: &str,
        _repo: &str,
    ) -> ProviderResult<Vec<String>> {
        Ok(vec!["v1.2.0".into(), "v1.1.0".into()])
    }

    fn file_exists(
        &self,
        _ctx: &Context,
        _repo: &Repository,
        _path: &str,
    ) -> ProviderResult<bool> {
        Ok(false)
    }

    fn create_branch(
        &self,
        _ctx: &Context,
        _repo: &Repository,
        _input: &BranchInput,
    ) -> ProviderResult<()> {
        Ok(())
    }

    fn create_pull_request(
        &self,
        _ctx: &Context,
        _repo: &Repository,
        input: &PullRequestInput,
    ) -> ProviderResult<PullRequest> {
        Ok(PullRequest {
            id: 1,
            title: input.title.clone(),
            url: "https://fake.example.com/pr/1".into(),
            status: PullRequestStatus::Open,
        })
    }

    fn pull_request_exists(
        &self,
        _ctx: &Context,
        _repo: &Repository,
        _source_branch: &str,
    ) -> ProviderResult<bool> {
        Ok(false)
    }

    fn authenticated_clone_url(&self, repo: &Repository) -> String {
        repo.clone_url
            .replacen("https://", &format!("https://x-access-token:{}@", self.token), 1)
    }

    fn token(&self) -> &str {
        &self.token
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Opens,
    NotDetected,
    DetectFails,
    UpdateFails,
    CancelsRun,
}

struct FakeUpdater {
    name: &'static str,
    behavior: Behavior,
    calls: Arc<Calls>,
    ctx: Option<Context>,
}

impl FakeUpdater {
    fn new(name: &'static str, behavior: Behavior, calls: &Arc<Calls>) -> Self {
        Self {
            name,
            behavior,
            calls: Arc::clone(calls),
            ctx: None,
        }
    }
}

impl Updater for FakeUpdater {
    fn name(&self) -> &'static str {
        self.name
    }

    fn detect(
        &self,
        _ctx: &Context,
        _provider: &dyn Provider,
        repo: &Repository,
    ) -> UpdaterResult<bool> {
        self.calls
            .detections
            .lock()
            .expect("detections lock")
            .push((self.name.to_owned(), repo.full_name()));
        match self.behavior {
            Behavior::NotDetected => Ok(false),
            Behavior::DetectFails => Err(anyhow::anyhow!("package.json is not valid JSON").into()),
            _ => Ok(true),
        }
    }

    fn create_update_prs(
        &self,
        ctx: &Context,
        provider: &dyn Provider,
        repo: &Repository,
        options: &UpdateOptions,
    ) -> UpdaterResult<Vec<PullRequest>> {
        self.calls
            .updates
            .lock()
            .expect("updates lock")
            .push((self.name.to_owned(), repo.full_name(), options.clone()));
        match self.behavior {
            Behavior::UpdateFails => {
                Err(UpdaterError::message("go mod tidy exited with status 1"))
            }
            Behavior::CancelsRun => {
                if let Some(ctx) = &self.ctx {
                    ctx.cancel();
                }
                Ok(Vec::new())
            }
            _ => {
                let input = PullRequestInput {
                    source_branch: format!("upkeep/{}", self.name),
                    target_branch: options.target_branch_or(&repo.default_branch).to_owned(),
                    title: format!("Update {} dependencies", self.name),
                    description: String::new(),
                    auto_complete: options.auto_complete,
                };
                Ok(vec![provider.create_pull_request(ctx, repo, &input)?])
            }
        }
    }
}

fn repository(provider: &str, organization: &str, name: &str) -> Repository {
    Repository {
        id: format!("{organization}-{name}"),
        name: name.into(),
        organization: organization.into(),
        project: None,
        default_branch: "main".into(),
        clone_url: format!("https://fake.example.com/{organization}/{name}.git"),
        ssh_url: format!("git@fake.example.com:{organization}/{name}.git"),
        provider: provider.into(),
    }
}

fn provider_registry(
    calls: &Arc<Calls>,
    failing_orgs: &[&str],
    repos_per_org: usize,
) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    for kind in ["fake", "other"] {
        let calls = Arc::clone(calls);
        let failing_orgs: Vec<String> = failing_orgs.iter().map(|s| (*s).to_owned()).collect();
        registry.register(kind, move |token: &str| -> ProviderResult<Box<dyn Provider>> {
            calls
                .instantiations
                .lock()
                .expect("instantiations lock")
                .push(kind.to_owned());
            Ok(Box::new(FakeProvider {
                kind: kind.to_owned(),
                token: token.to_owned(),
                calls: Arc::clone(&calls),
                failing_orgs: failing_orgs.clone(),
                repos_per_org,
            }))
        });
    }
    registry
}

fn provider_entry(kind: &str, organizations: &[&str]) -> ProviderConfig {
    ProviderConfig {
        kind: kind.into(),
        token: "token".into(),
        token_file: None,
        organizations: organizations.iter().map(|s| (*s).to_owned()).collect(),
    }
}

fn config(providers: Vec<ProviderConfig>) -> Config {
    Config {
        providers,
        updaters: HashMap::new(),
    }
}

#[test]
fn provider_filter_skips_instantiation_and_discovery() {
    let calls = Arc::new(Calls::default());
    let mut updaters = UpdaterRegistry::new();
    updaters.register(FakeUpdater::new("gomod", Behavior::Opens, &calls));
    let service = UpdateService::new(provider_registry(&calls, &[], 1), updaters);

    let config = config(vec![
        provider_entry("fake", &["acme"]),
        provider_entry("other", &["contoso"]),
    ]);
    let options = RunOptions {
        provider: Some("other".into()),
        ..RunOptions::default()
    };
    let report = service.run(&Context::new(), &config, &options);

    assert_eq!(calls.instantiations(), ["other"]);
    assert_eq!(calls.discoveries(), ["contoso"]);
    assert_eq!(report.repositories_processed, 1);
    assert!(report.is_clean());
}

#[test]
fn organization_override_limits_discovery() {
    let calls = Arc::new(Calls::default());
    let service = UpdateService::new(provider_registry(&calls, &[], 1), UpdaterRegistry::new());

    let config = config(vec![provider_entry("fake", &["skip-org", "target-org"])]);
    let options = RunOptions {
        organization: Some("target-org".into()),
        ..RunOptions::default()
    };
    service.run(&Context::new(), &config, &options);

    assert_eq!(calls.discoveries(), ["target-org"]);
}

#[test]
fn every_repository_is_detected_and_updated_once() {
    let calls = Arc::new(Calls::default());
    let mut updaters = UpdaterRegistry::new();
    updaters.register(FakeUpdater::new("gomod", Behavior::Opens, &calls));
    let service = UpdateService::new(provider_registry(&calls, &[], 3), updaters);

    let config = config(vec![provider_entry("fake", &["acme"])]);
    let report = service.run(&Context::new(), &config, &RunOptions::default());

    assert_eq!(calls.detections().len(), 3);
    assert_eq!(calls.updates().len(), 3);
    assert_eq!(report.repositories_processed, 3);
    assert_eq!(report.pull_request_count(), 3);
    assert_eq!(report.pull_requests[0].repository, "acme/repo-1");
    assert_eq!(report.pull_requests[0].updater, "gomod");
}

#[test]
fn update_runs_only_after_positive_detection() {
    let calls = Arc::new(Calls::default());
    let mut updaters = UpdaterRegistry::new();
    updaters.register(FakeUpdater::new("npm", Behavior::NotDetected, &calls));
    updaters.register(FakeUpdater::new("gomod", Behavior::Opens, &calls));
    let service = UpdateService::new(provider_registry(&calls, &[], 2), updaters);

    let config = config(vec![provider_entry("fake", &["acme"])]);
    let report = service.run(&Context::new(), &config, &RunOptions::default());

    assert_eq!(
        calls.detections(),
        [
            ("npm".to_owned(), "acme/repo-1".to_owned()),
            ("gomod".to_owned(), "acme/repo-1".to_owned()),
            ("npm".to_owned(), "acme/repo-2".to_owned()),
            ("gomod".to_owned(), "acme/repo-2".to_owned()),
        ]
    );
    let updated: Vec<String> = calls.updates().into_iter().map(|(name, _, _)| name).collect();
    assert_eq!(updated, ["gomod", "gomod"]);
    assert!(report.is_clean());
}

#[test]
fn disabled_updater_is_never_detected() {
    let calls = Arc::new(Calls::default());
    let mut updaters = UpdaterRegistry::new();
    updaters.register(FakeUpdater::new("npm", Behavior::Opens, &calls));
    updaters.register(FakeUpdater::new("gomod", Behavior::Opens, &calls));
    let service = UpdateService::new(provider_registry(&calls, &[], 2), updaters);

    let mut config = config(vec![provider_entry("fake", &["acme"])]);
    config.updaters.insert(
        "npm".into(),
        UpdaterConfig {
            enabled: false,
            ..UpdaterConfig::default()
        },
    );
    let report = service.run(&Context::new(), &config, &RunOptions::default());

    assert!(calls.detections().iter().all(|(name, _)| name == "gomod"));
    assert!(calls.updates().iter().all(|(name, _, _)| name == "gomod"));
    assert_eq!(report.pull_request_count(), 2);
}

#[test]
fn updater_filter_selects_one_plugin() {
    let calls = Arc::new(Calls::default());
    let mut updaters = UpdaterRegistry::new();
    updaters.register(FakeUpdater::new("npm", Behavior::Opens, &calls));
    updaters.register(FakeUpdater::new("gomod", Behavior::Opens, &calls));
    let service = UpdateService::new(provider_registry(&calls, &[], 1), updaters);

    let config = config(vec![provider_entry("fake", &["acme"])]);
    let options = RunOptions {
        updater: Some("npm".into()),
        ..RunOptions::default()
    };
    service.run(&Context::new(), &config, &options);

    assert_eq!(calls.detections(), [("npm".to_owned(), "acme/repo-1".to_owned())]);
}

#[test]
fn discovery_failure_moves_to_next_organization() {
    let calls = Arc::new(Calls::default());
    let mut updaters = UpdaterRegistry::new();
    updaters.register(FakeUpdater::new("gomod", Behavior::Opens, &calls));
    let service = UpdateService::new(provider_registry(&calls, &["broken"], 1), updaters);

    let config = config(vec![provider_entry("fake", &["broken", "acme"])]);
    let report = service.run(&Context::new(), &config, &RunOptions::default());

    assert_eq!(calls.discoveries(), ["broken", "acme"]);
    assert_eq!(report.repositories_processed, 1);
    assert_eq!(report.pull_request_count(), 1);
    assert_eq!(report.error_count(), 1);
    assert!(matches!(
        &report.failures[0],
        RunFailure::Discovery { organization, .. } if organization == "broken"
    ));
}

#[test]
fn updater_failure_does_not_stop_other_updaters_or_repositories() {
    let calls = Arc::new(Calls::default());
    let mut updaters = UpdaterRegistry::new();
    updaters.register(FakeUpdater::new("gomod", Behavior::UpdateFails, &calls));
    updaters.register(FakeUpdater::new("docker", Behavior::DetectFails, &calls));
    updaters.register(FakeUpdater::new("npm", Behavior::Opens, &calls));
    let service = UpdateService::new(provider_registry(&calls, &[], 2), updaters);

    let config = config(vec![provider_entry("fake", &["acme"])]);
    let report = service.run(&Context::new(), &config, &RunOptions::default());

    assert_eq!(calls.detections().len(), 6);
    let updated: Vec<String> = calls.updates().into_iter().map(|(name, _, _)| name).collect();
    assert_eq!(updated, ["gomod", "npm", "gomod", "npm"]);
    assert_eq!(report.pull_request_count(), 2);
    assert_eq!(report.error_count(), 4);
    assert!(matches!(
        &report.failures[0],
        RunFailure::Update { updater, repository, .. }
            if updater == "gomod" && repository == "acme/repo-1"
    ));
    assert!(matches!(
        &report.failures[1],
        RunFailure::Detection { updater, .. } if updater == "docker"
    ));
}

#[test]
fn unknown_provider_type_is_recorded_and_skipped() {
    let calls = Arc::new(Calls::default());
    let mut updaters = UpdaterRegistry::new();
    updaters.register(FakeUpdater::new("gomod", Behavior::Opens, &calls));
    let service = UpdateService::new(provider_registry(&calls, &[], 1), updaters);

    let config = config(vec![
        provider_entry("bitbucket", &["acme"]),
        provider_entry("fake", &["acme"]),
    ]);
    let report = service.run(&Context::new(), &config, &RunOptions::default());

    assert_eq!(calls.instantiations(), ["fake"]);
    assert_eq!(report.pull_request_count(), 1);
    assert!(matches!(
        &report.failures[0],
        RunFailure::ProviderInitialization { provider, .. } if provider == "bitbucket"
    ));
}

#[test]
fn run_and_updater_options_are_propagated() {
    let calls = Arc::new(Calls::default());
    let mut updaters = UpdaterRegistry::new();
    updaters.register(FakeUpdater::new("gomod", Behavior::Opens, &calls));
    updaters.register(FakeUpdater::new("npm", Behavior::Opens, &calls));
    let service = UpdateService::new(provider_registry(&calls, &[], 1), updaters);

    let mut config = config(vec![provider_entry("fake", &["acme"])]);
    config.updaters.insert(
        "gomod".into(),
        UpdaterConfig {
            enabled: true,
            auto_complete: true,
            target_branch: "develop".into(),
        },
    );
    config.updaters.insert(
        "npm".into(),
        UpdaterConfig {
            target_branch: String::new(),
            ..UpdaterConfig::default()
        },
    );
    let options = RunOptions {
        dry_run: true,
        verbose: true,
        ..RunOptions::default()
    };
    service.run(&Context::new(), &config, &options);

    let updates = calls.updates();
    assert_eq!(updates.len(), 2);
    for (_, _, options) in &updates {
        assert!(options.dry_run);
        assert!(options.verbose);
    }
    let (_, _, gomod) = &updates[0];
    assert!(gomod.auto_complete);
    assert_eq!(gomod.target_branch.as_deref(), Some("develop"));
    let (_, _, npm) = &updates[1];
    assert!(!npm.auto_complete);
    assert!(npm.target_branch.is_none());
}

#[test]
fn cancellation_stops_dispatch() {
    let calls = Arc::new(Calls::default());
    let ctx = Context::new();
    let mut updaters = UpdaterRegistry::new();
    updaters.register(FakeUpdater {
        ctx: Some(ctx.clone()),
        ..FakeUpdater::new("gomod", Behavior::CancelsRun, &calls)
    });
    updaters.register(FakeUpdater::new("npm", Behavior::Opens, &calls));
    let service = UpdateService::new(provider_registry(&calls, &[], 3), updaters);

    let config = config(vec![provider_entry("fake", &["acme", "contoso"])]);
    let report = service.run(&ctx, &config, &RunOptions::default());

    assert!(report.cancelled);
    assert!(!report.is_clean());
    assert_eq!(calls.updates().len(), 1);
    assert_eq!(calls.discoveries(), ["acme"]);
    assert_eq!(report.repositories_processed, 1);
}

#[test]
fn cancelled_context_runs_nothing() {
    let calls = Arc::new(Calls::default());
    let service = UpdateService::new(provider_registry(&calls, &[], 1), UpdaterRegistry::new());
    let ctx = Context::new();
    ctx.cancel();

    let config = config(vec![provider_entry("fake", &["acme"])]);
    let report = service.run(&ctx, &config, &RunOptions::default());

    assert!(report.cancelled);
    assert!(calls.instantiations().is_empty());
}

#[test]
#[traced_test]
fn failures_and_summary_are_logged() {
    let calls = Arc::new(Calls::default());
    let mut updaters = UpdaterRegistry::new();
    updaters.register(FakeUpdater::new("gomod", Behavior::Opens, &calls));
    let service = UpdateService::new(provider_registry(&calls, &["broken"], 1), updaters);

    let config = config(vec![provider_entry("fake", &["broken", "acme"])]);
    service.run(&Context::new(), &config, &RunOptions::default());

    assert!(logs_contain("failed to discover repositories"));
    assert!(logs_contain("403 forbidden listing broken"));
    assert!(logs_contain("created pull request"));
    assert!(logs_contain("update run complete"));
    assert!(logs_contain("errors=1"));
}

#[test]
#[traced_test]
fn verbose_runs_log_skipped_updaters() {
    let calls = Arc::new(Calls::default());
    let mut updaters = UpdaterRegistry::new();
    updaters.register(FakeUpdater::new("npm", Behavior::NotDetected, &calls));
    let service = UpdateService::new(provider_registry(&calls, &[], 1), updaters);

    let config = config(vec![provider_entry("fake", &["acme"])]);
    let options = RunOptions {
        verbose: true,
        ..RunOptions::default()
    };
    service.run(&Context::new(), &config, &options);

    assert!(logs_contain("ecosystem not detected"));
}
