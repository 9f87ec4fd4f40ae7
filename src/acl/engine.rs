//! Shared ACL engine over a built application.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use super::published::PublishedTypes;
use super::roles::{expand_roles, role_ancestors};
use super::{Decision, check};
use crate::appdef::{AppDef, WorkspaceRef};
use crate::error::{AclError, Result};
use crate::types::{AclOptions, OperationKind, QName};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DecisionKey {
    workspace: QName,
    op: OperationKind,
    resource: QName,
    /// Requested fields in request order; the reported denied field depends on it.
    fields: Vec<String>,
    /// Supplied roles, sorted and deduplicated.
    roles: Vec<QName>,
}

/// ACL checks against one immutable [`AppDef`], addressed by workspace name.
///
/// Cheap to share: the application sits behind an `Arc` and the only mutable state is
/// the optional decision cache.
#[derive(Debug)]
pub struct AccessControl {
    app: Arc<AppDef>,
    options: AclOptions,
    cache: Mutex<HashMap<DecisionKey, Decision>>,
}

impl AccessControl {
    #[must_use]
    pub fn new(app: Arc<AppDef>) -> Self {
        Self::with_options(app, AclOptions::default())
    }

    #[must_use]
    pub fn with_options(app: Arc<AppDef>, options: AclOptions) -> Self {
        Self {
            app,
            options,
            cache: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn app(&self) -> &Arc<AppDef> {
        &self.app
    }

    #[must_use]
    pub fn options(&self) -> &AclOptions {
        &self.options
    }

    pub fn workspace(&self, name: &QName) -> Result<WorkspaceRef<'_>> {
        self.app
            .workspace(name)
            .ok_or_else(|| AclError::not_found(format!("workspace «{name}»")))
    }

    /// Checks `op` on `res` for any of `roles` in workspace `ws`.
    ///
    /// Decisions are memoized when `decision_cache_capacity` is non-zero. Errors are
    /// never cached, and cache hits do not repeat the deny diagnostic.
    pub fn is_operation_allowed(
        &self,
        ws: &QName,
        op: OperationKind,
        res: &QName,
        fields: &[&str],
        roles: &[QName],
    ) -> Result<Decision> {
        let workspace = self.workspace(ws)?;
        if self.options.decision_cache_capacity == 0 {
            return check(workspace, op, res, fields, roles, &self.options);
        }

        let key = DecisionKey {
            workspace: ws.clone(),
            op,
            resource: res.clone(),
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            roles: roles
                .iter()
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        };
        if let Some(hit) = self.cached(&key) {
            return Ok(hit);
        }

        let decision = check(workspace, op, res, fields, roles, &self.options)?;
        self.remember(key, decision.clone());
        Ok(decision)
    }

    /// Role ancestry of `role` in workspace `ws`.
    pub fn recursive_role_ancestors(&self, role: &QName, ws: &QName) -> Result<BTreeSet<QName>> {
        let workspace = self.workspace(ws)?;
        Ok(role_ancestors(role, workspace, self.options.role_cycle_guard))
    }

    /// Lazy enumeration of what `role` may do in workspace `ws`.
    pub fn published_types(&self, ws: &QName, role: &QName) -> Result<PublishedTypes<'_>> {
        let workspace = self.workspace(ws)?;
        let roles = expand_roles([role], workspace, self.options.role_cycle_guard);
        Ok(PublishedTypes::new(workspace, roles))
    }

    /// Number of memoized decisions.
    #[must_use]
    pub fn cached_decisions(&self) -> usize {
        self.cache.lock().map_or(0, |cache| cache.len())
    }

    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    fn cached(&self, key: &DecisionKey) -> Option<Decision> {
        self.cache.lock().ok()?.get(key).cloned()
    }

    fn remember(&self, key: DecisionKey, decision: Decision) {
        let Ok(mut cache) = self.cache.lock() else {
            return;
        };
        if cache.len() >= self.options.decision_cache_capacity {
            tracing::debug!(
                target: "wsacl::acl",
                capacity = self.options.decision_cache_capacity,
                "decision cache full, clearing"
            );
            cache.clear();
        }
        cache.insert(key, decision);
    }
}
