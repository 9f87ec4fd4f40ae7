//! Builder-style options for the [`AccessControl`](crate::AccessControl) engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AclError, Result};

fn default_true() -> bool {
    true
}

/// Tunable behaviour of ACL evaluation.
///
/// Options never change a decision; they control diagnostics, memoization and
/// the role recursion guard. Every field has a serde default, so a partial JSON
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclOptions {
    /// Emit a `debug` event on the `wsacl::acl` target for every deny decision.
    #[serde(default = "default_true")]
    pub log_denials: bool,
    /// Maximum number of memoized decisions. 0 disables the cache.
    /// The cache is cleared when it reaches the bound.
    #[serde(default)]
    pub decision_cache_capacity: usize,
    /// Guard role ancestry recursion with a visited set keyed by (role, workspace).
    /// Disabling it is only safe for graphs without role cycles.
    #[serde(default = "default_true")]
    pub role_cycle_guard: bool,
}

impl Default for AclOptions {
    fn default() -> Self {
        Self {
            log_denials: true,
            decision_cache_capacity: 0,
            role_cycle_guard: true,
        }
    }
}

impl AclOptions {
    /// Start a fluent builder for `AclOptions`.
    #[must_use]
    pub fn builder() -> AclOptionsBuilder {
        AclOptionsBuilder::default()
    }

    /// Parse options from a JSON document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs_err::read_to_string(path).map_err(|source| AclError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AclOptionsBuilder {
    inner: AclOptions,
}

impl AclOptionsBuilder {
    #[must_use]
    pub fn log_denials(mut self, enabled: bool) -> Self {
        self.inner.log_denials = enabled;
        self
    }

    #[must_use]
    pub fn decision_cache_capacity(mut self, capacity: usize) -> Self {
        self.inner.decision_cache_capacity = capacity;
        self
    }

    #[must_use]
    pub fn role_cycle_guard(mut self, enabled: bool) -> Self {
        self.inner.role_cycle_guard = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> AclOptions {
        self.inner
    }
}
