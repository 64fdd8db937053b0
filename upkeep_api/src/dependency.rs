use serde::{Deserialize, Serialize};

/// A dependency reference found by an updater plugin.
///
/// The orchestration layer never inspects these; they flow between a plugin's
/// scanning and upgrade phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Display name or label (module path, package name, image name).
    pub name: String,
    /// Source locator (registry URL, git remote, image repository).
    #[serde(default)]
    pub source: String,
    /// Version currently referenced.
    pub current_version: String,
    /// Latest version available from the source.
    pub latest_version: String,
    /// File the reference was found in.
    pub file_path: String,
    /// 1-based line of the reference within `file_path`.
    #[serde(default)]
    pub line: u32,
}

impl Dependency {
    /// Whether the latest version differs from the current one.
    #[must_use]
    pub fn is_outdated(&self) -> bool {
        !self.latest_version.is_empty() && self.current_version != self.latest_version
    }
}
