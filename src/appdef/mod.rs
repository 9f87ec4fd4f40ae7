//! Application definition: the immutable workspace graph consumed by the ACL engine.
//!
//! An [`AppDef`] owns every type and workspace. It is produced once by
//! [`AppDefBuilder::build`] and never mutated afterwards, so it can be shared between
//! threads behind an `Arc` without locking. Workspaces are addressed through the
//! lightweight [`WorkspaceRef`] view.

mod builder;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub use builder::{AppDefBuilder, FunctionBuilder, StructureBuilder, ViewBuilder, WorkspaceBuilder};

use crate::types::{AclRule, QName, TypeDef};

/// A node of the workspace DAG.
#[derive(Debug, Clone)]
pub struct Workspace {
    qname: QName,
    /// Direct ancestors, in declaration order.
    ancestors: Vec<QName>,
    /// The workspace itself plus every transitive ancestor.
    lineage: BTreeSet<QName>,
    /// Types declared directly in the workspace, in declaration order.
    local_types: Vec<QName>,
    acl: Vec<AclRule>,
    comment: Option<String>,
}

/// Built application: all types and workspaces.
#[derive(Debug, Clone, Default)]
pub struct AppDef {
    types: BTreeMap<QName, TypeDef>,
    workspaces: BTreeMap<QName, Workspace>,
}

impl AppDef {
    /// Start building an application.
    #[must_use]
    pub fn builder() -> AppDefBuilder {
        AppDefBuilder::new()
    }

    #[must_use]
    pub fn workspace(&self, name: &QName) -> Option<WorkspaceRef<'_>> {
        self.workspaces
            .get(name)
            .map(|ws| WorkspaceRef { app: self, ws })
    }

    /// Workspaces in QName order.
    pub fn workspaces(&self) -> impl Iterator<Item = WorkspaceRef<'_>> {
        self.workspaces
            .values()
            .map(move |ws| WorkspaceRef { app: self, ws })
    }

    /// Looks a type up regardless of the workspace that declares it.
    #[must_use]
    pub fn type_def(&self, name: &QName) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Every type in QName order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn workspace_count(&self) -> usize {
        self.workspaces.len()
    }
}

/// Borrowed view of a workspace inside its application.
#[derive(Debug, Clone, Copy)]
pub struct WorkspaceRef<'a> {
    app: &'a AppDef,
    ws: &'a Workspace,
}

impl<'a> WorkspaceRef<'a> {
    #[must_use]
    pub fn name(self) -> &'a QName {
        &self.ws.qname
    }

    #[must_use]
    pub fn app(self) -> &'a AppDef {
        self.app
    }

    #[must_use]
    pub fn comment(self) -> Option<&'a str> {
        self.ws.comment.as_deref()
    }

    /// Direct ancestor workspaces, in declaration order.
    pub fn ancestors(self) -> impl Iterator<Item = WorkspaceRef<'a>> + 'a {
        let app = self.app;
        self.ws
            .ancestors
            .iter()
            .filter_map(move |name| app.workspace(name))
    }

    /// Rules declared directly in this workspace, in declaration order.
    #[must_use]
    pub fn acl(self) -> &'a [AclRule] {
        &self.ws.acl
    }

    /// The workspace is `name` or inherits from it, directly or transitively.
    #[must_use]
    pub fn inherits(self, name: &QName) -> bool {
        self.ws.lineage.contains(name)
    }

    /// Finds a type declared in this workspace or in any of its ancestors.
    #[must_use]
    pub fn type_def(self, name: &QName) -> Option<&'a TypeDef> {
        self.app
            .types
            .get(name)
            .filter(|t| self.inherits(t.workspace()))
    }

    /// Local and inherited types, each once, in QName order.
    pub fn types(self) -> impl Iterator<Item = &'a TypeDef> + 'a {
        let lineage = &self.ws.lineage;
        self.app
            .types
            .values()
            .filter(move |t| lineage.contains(t.workspace()))
    }

    /// Types declared directly in this workspace, in declaration order.
    pub fn local_types(self) -> impl Iterator<Item = &'a TypeDef> + 'a {
        let app = self.app;
        self.ws
            .local_types
            .iter()
            .filter_map(move |name| app.types.get(name))
    }
}

impl fmt::Display for WorkspaceRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Workspace «{}»", self.ws.qname)
    }
}
