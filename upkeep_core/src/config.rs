use std::collections::HashMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[allow(clippy::expect_used)]
static ENV_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env reference pattern")
});

/// Resolved configuration consumed by [`crate::UpdateService::run`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider entries, processed in order.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    /// Per-updater settings keyed by updater identifier.
    #[serde(default)]
    pub updaters: HashMap<String, UpdaterConfig>,
}

/// One hosting-platform account to scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type identifier as registered in the provider registry.
    #[serde(rename = "type")]
    pub kind: String,
    /// Authentication token. `${VAR}` references are expanded on load.
    #[serde(default)]
    pub token: String,
    /// File holding the token; takes precedence over `token`.
    #[serde(default)]
    pub token_file: Option<Utf8PathBuf>,
    /// Organizations or groups to scan, processed in order.
    #[serde(default)]
    pub organizations: Vec<String>,
}

/// Settings for a single updater plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Whether the updater runs at all.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Request auto-complete on created pull requests.
    #[serde(default)]
    pub auto_complete: bool,
    /// Target branch override; empty means the repository default branch.
    #[serde(default)]
    pub target_branch: String,
}

const fn enabled_by_default() -> bool {
    true
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_complete: false,
            target_branch: String::new(),
        }
    }
}

impl Config {
    /// Parse a TOML document without resolving tokens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the document is malformed.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|source| Error::Parse {
            path: "<string>".into(),
            source,
        })
    }

    /// Read a TOML file and resolve every provider token from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed, or when a token
    /// cannot be resolved.
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_string(),
            source,
        })?;
        let mut config: Self = toml::from_str(&raw).map_err(|source| Error::Parse {
            path: path.to_string(),
            source,
        })?;
        config.resolve_tokens_with(|name| std::env::var(name).ok())?;
        tracing::debug!(
            path = %path,
            providers = config.providers.len(),
            updaters = config.updaters.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Resolve provider tokens using `lookup` for environment variables.
    ///
    /// `token_file` wins over `token`; file contents are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TokenFile`], [`Error::MissingEnvVar`], or
    /// [`Error::MissingToken`] for the first provider that cannot be resolved.
    pub fn resolve_tokens_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        for provider in &mut self.providers {
            let token = match &provider.token_file {
                Some(path) => fs::read_to_string(path)
                    .map_err(|source| Error::TokenFile {
                        provider: provider.kind.clone(),
                        path: path.to_string(),
                        source,
                    })?
                    .trim()
                    .to_owned(),
                None => expand_env(&provider.kind, &provider.token, &lookup)?,
            };
            if token.is_empty() {
                return Err(Error::MissingToken {
                    provider: provider.kind.clone(),
                });
            }
            provider.token = token;
        }
        Ok(())
    }

    /// Settings for `updater`, if configured.
    #[must_use]
    pub fn updater(&self, updater: &str) -> Option<&UpdaterConfig> {
        self.updaters.get(updater)
    }

    /// An updater is enabled unless its entry explicitly sets `enabled = false`.
    #[must_use]
    pub fn is_updater_enabled(&self, updater: &str) -> bool {
        self.updater(updater).map_or(true, |settings| settings.enabled)
    }
}

fn expand_env<F>(provider: &str, raw: &str, lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut expanded = String::with_capacity(raw.len());
    let mut last = 0;
    for captures in ENV_REFERENCE.captures_iter(raw) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let value = lookup(name.as_str()).ok_or_else(|| Error::MissingEnvVar {
            provider: provider.to_owned(),
            variable: name.as_str().to_owned(),
        })?;
        expanded.push_str(&raw[last..whole.start()]);
        expanded.push_str(&value);
        last = whole.end();
    }
    expanded.push_str(&raw[last..]);
    Ok(expanded)
}
