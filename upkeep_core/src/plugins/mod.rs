//! Provider and updater integration entry points.

mod report;
mod service;

pub use upkeep_plugin_api::{
    Context, Provider, ProviderError, ProviderFactory, ProviderRegistry, ProviderResult,
    RegistryError, RegistryResult, Updater, UpdaterError, UpdaterRegistry, UpdaterResult,
};

pub use report::{CreatedPullRequest, RunFailure, RunReport};
pub use service::UpdateService;
