//! Registries mapping identifiers to provider factories and updater plugins.
//!
//! Registration happens once while wiring the process; both registries are
//! read-only while a run is in progress.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{Provider, ProviderResult, RegistryError, RegistryResult, Updater};

/// Builds a provider from an authentication token.
pub type ProviderFactory = Box<dyn Fn(&str) -> ProviderResult<Box<dyn Provider>> + Send + Sync>;

/// In-memory registry of provider factories keyed by type identifier.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: HashMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&str) -> ProviderResult<Box<dyn Provider>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Construct the provider registered under `name` with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownProvider`] for unregistered names and
    /// [`RegistryError::Construction`] when the factory fails.
    pub fn get(&self, name: &str, token: &str) -> RegistryResult<Box<dyn Provider>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RegistryError::UnknownProvider {
                name: name.to_owned(),
            })?;
        factory(token).map_err(|source| RegistryError::Construction {
            name: name.to_owned(),
            source,
        })
    }

    /// Whether a factory is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered identifiers, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no factories are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ProviderRegistry")
            .field("providers", &names)
            .finish()
    }
}

/// In-memory registry of updater plugins, iterated in registration order.
#[derive(Default)]
pub struct UpdaterRegistry {
    updaters: Vec<Arc<dyn Updater>>,
    index: HashMap<&'static str, usize>,
}

impl UpdaterRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an updater keyed by its `Updater::name`.
    ///
    /// Re-registering a name replaces the previous instance in its original slot.
    pub fn register<U>(&mut self, updater: U)
    where
        U: Updater + 'static,
    {
        self.register_arc(Arc::new(updater));
    }

    /// Register a shared updater instance.
    pub fn register_arc(&mut self, updater: Arc<dyn Updater>) {
        let name = updater.name();
        match self.index.get(name).copied() {
            Some(slot) => self.updaters[slot] = updater,
            None => {
                self.index.insert(name, self.updaters.len());
                self.updaters.push(updater);
            }
        }
    }

    /// Retrieve an updater by identifier; `None` when absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Updater>> {
        self.index
            .get(name)
            .map(|&slot| Arc::clone(&self.updaters[slot]))
    }

    /// Whether an updater is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Every registered updater, in registration order.
    pub fn all(&self) -> impl Iterator<Item = &dyn Updater> + '_ {
        self.updaters.iter().map(|updater| updater.as_ref())
    }

    /// Registered identifiers, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.updaters.iter().map(|updater| updater.name())
    }

    /// Number of registered updaters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.updaters.len()
    }

    /// Whether no updaters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updaters.is_empty()
    }
}

impl std::fmt::Debug for UpdaterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.names().collect();
        f.debug_struct("UpdaterRegistry")
            .field("updaters", &names)
            .finish()
    }
}
