/// Errors surfaced by provider adapters.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Platform rejected or failed a request.
    #[error("{message}")]
    Request {
        /// Human-readable error message.
        message: String,
    },
    /// Requested file or resource does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// Path or resource that was missing.
        path: String,
    },
    /// Operation is not supported by this platform.
    #[error("operation '{operation}' is not supported by this provider")]
    Unsupported {
        /// Name of the unsupported operation.
        operation: &'static str,
    },
    /// The run was cancelled while the call was pending.
    #[error("operation cancelled")]
    Cancelled,
    /// Any other adapter failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProviderError {
    /// Helper to construct a request failure from any displayable message.
    #[must_use]
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }
}

/// Convenience result alias for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Errors surfaced by updater plugins.
#[derive(Debug, thiserror::Error)]
pub enum UpdaterError {
    /// A provider call made by the plugin failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    /// Generic failure surfaced by the plugin.
    #[error("{message}")]
    Failure {
        /// Human-readable error message.
        message: String,
    },
    /// The run was cancelled while the plugin was working.
    #[error("update cancelled")]
    Cancelled,
    /// Any other plugin failure (command execution, parsing, ...).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UpdaterError {
    /// Helper to construct a failure from any displayable message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}

/// Convenience result alias for updater operations.
pub type UpdaterResult<T> = std::result::Result<T, UpdaterError>;

/// Errors surfaced when resolving a provider from the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No factory is registered under the identifier.
    #[error("no such provider type: {name}")]
    UnknownProvider {
        /// Requested identifier.
        name: String,
    },
    /// The factory failed to construct the provider.
    #[error("failed to construct provider '{name}': {source}")]
    Construction {
        /// Requested identifier.
        name: String,
        /// Failure returned by the factory.
        #[source]
        source: ProviderError,
    },
}

/// Convenience result alias for registry lookups.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
