//! Core library for upkeep's dependency-update runs.
//!
//! The crate is layered around three primary responsibilities:
//! - loading the provider and updater configuration
//! - orchestrating a run across providers, organizations, repositories and updaters
//! - editing changelog documents on behalf of updater plugins

#![warn(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    missing_docs
)]
#![cfg_attr(
    not(test),
    deny(
        clippy::dbg_macro,
        clippy::expect_used,
        clippy::panic,
        clippy::print_stderr,
        clippy::print_stdout,
        clippy::todo,
        clippy::unwrap_used
    )
)]

/// Changelog section editing used by updater plugins.
pub mod changelog;
/// Provider and updater configuration.
pub mod config;
/// Capability contracts, registries, and the run orchestrator.
pub mod plugins;

pub use config::{Config, ProviderConfig, UpdaterConfig};
pub use plugins::{CreatedPullRequest, RunFailure, RunReport, UpdateService};
pub use upkeep_api::*;

/// Common result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors. These are fatal and occur before a run starts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem interaction failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Filesystem path involved in the failed operation.
        path: String,
        /// Source I/O error returned by the standard library.
        #[source]
        source: std::io::Error,
    },
    /// Configuration document is not valid TOML or has the wrong shape.
    #[error("failed to parse configuration {path}: {source}")]
    Parse {
        /// Origin of the document.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
    /// A token referenced an environment variable that is not set.
    #[error("provider '{provider}' references unset environment variable {variable}")]
    MissingEnvVar {
        /// Provider type identifier.
        provider: String,
        /// Variable name.
        variable: String,
    },
    /// A token file could not be read.
    #[error("provider '{provider}' token file {path} could not be read: {source}")]
    TokenFile {
        /// Provider type identifier.
        provider: String,
        /// Token file path.
        path: String,
        /// Source I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A provider has no token after resolution.
    #[error("provider '{provider}' has no token configured")]
    MissingToken {
        /// Provider type identifier.
        provider: String,
    },
}
