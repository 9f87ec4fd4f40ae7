//! Rule evaluation over the workspace graph.
//!
//! Ancestor workspaces are walked before the workspace itself, each workspace at most
//! once, and rules inside a workspace are applied in declaration order. The last
//! matching rule wins for the fields it covers.

use std::collections::BTreeSet;

use crate::appdef::WorkspaceRef;
use crate::constants::QNAME_ROLE_SYSTEM;
use crate::types::{AclRule, FieldName, OperationKind, PolicyKind, QName, TypeDef};

/// Outcome of one evaluator run.
#[derive(Debug, Clone)]
pub(crate) struct Evaluation<'a> {
    pub(crate) allowed: bool,
    /// Accumulated allowed fields. `None` for resources without fields.
    fields: Option<BTreeSet<&'a str>>,
}

impl Evaluation<'_> {
    /// First requested field outside the allowed set.
    pub(crate) fn denied_field<'f>(&self, requested: &[&'f str]) -> Option<&'f str> {
        let fields = self.fields.as_ref()?;
        requested.iter().copied().find(|f| !fields.contains(*f))
    }

    /// Allowed fields in the resource's field order.
    ///
    /// `None` when every field is allowed or the resource has no fields; an empty list
    /// when nothing is allowed.
    pub(crate) fn allowed_fields(&self, resource: &TypeDef) -> Option<Vec<FieldName>> {
        let fields = self.fields.as_ref()?;
        if resource.field_names().all(|f| fields.contains(f.as_str())) {
            return None;
        }
        Some(
            resource
                .field_names()
                .filter(|f| fields.contains(f.as_str()))
                .cloned()
                .collect(),
        )
    }
}

/// Evaluates `op` on `resource` in `ws` for an already expanded role set.
pub(crate) fn evaluate<'a>(
    ws: WorkspaceRef<'a>,
    op: OperationKind,
    resource: &'a TypeDef,
    roles: &BTreeSet<QName>,
) -> Evaluation<'a> {
    let has_fields = resource.with_fields().is_some();

    if roles.contains(&*QNAME_ROLE_SYSTEM) {
        return Evaluation {
            allowed: true,
            fields: has_fields.then(|| resource.field_names().map(String::as_str).collect()),
        };
    }

    let mut walker = Walker {
        op,
        resource,
        roles,
        allowed: false,
        fields: has_fields.then(BTreeSet::new),
        visited: BTreeSet::new(),
    };
    walker.walk(ws);

    tracing::trace!(
        target: "wsacl::acl",
        op = %op,
        resource = %resource.qname(),
        workspace = %ws.name(),
        allowed = walker.allowed,
        workspaces = walker.visited.len(),
        "rules evaluated"
    );

    Evaluation {
        allowed: walker.allowed,
        fields: walker.fields,
    }
}

struct Walker<'a, 'r> {
    op: OperationKind,
    resource: &'a TypeDef,
    roles: &'r BTreeSet<QName>,
    allowed: bool,
    fields: Option<BTreeSet<&'a str>>,
    visited: BTreeSet<&'a QName>,
}

impl<'a> Walker<'a, '_> {
    fn walk(&mut self, ws: WorkspaceRef<'a>) {
        if !self.visited.insert(ws.name()) {
            return;
        }

        for ancestor in ws.ancestors() {
            self.walk(ancestor);
        }

        for rule in ws.acl() {
            if rule.op(self.op)
                && rule.filter().matches(self.resource)
                && self.roles.contains(rule.principal())
            {
                self.apply(rule);
            }
        }
    }

    fn apply(&mut self, rule: &'a AclRule) {
        let flt = rule.filter();
        match (rule.policy(), self.fields.as_mut()) {
            (PolicyKind::Allow, Some(fields)) => {
                self.allowed = true;
                if flt.has_fields() {
                    fields.extend(flt.fields().iter().map(String::as_str));
                } else {
                    fields.extend(self.resource.field_names().map(String::as_str));
                }
            }
            (PolicyKind::Deny, Some(fields)) => {
                if flt.has_fields() {
                    for f in flt.fields() {
                        fields.remove(f.as_str());
                    }
                    self.allowed = !fields.is_empty();
                } else {
                    fields.clear();
                    self.allowed = false;
                }
            }
            (PolicyKind::Allow, None) => self.allowed = true,
            (PolicyKind::Deny, None) => self.allowed = false,
        }
    }
}
