//! Role ancestry: `GRANT role TO role` resolved over the role graph and the workspace graph.

use std::collections::BTreeSet;

use crate::appdef::WorkspaceRef;
use crate::types::{OperationKind, QName};

/// Returns `role` together with every role it inherits in `ws`.
///
/// Inheritance is declared with `Inherits` rules whose principal is the inheriting role.
/// Such rules may live in `ws` or in any of its ancestors; both axes are explored
/// exhaustively. Each (role, workspace) pair is expanded once, so cyclic role grants
/// terminate.
#[must_use]
pub fn recursive_role_ancestors(role: &QName, ws: WorkspaceRef<'_>) -> BTreeSet<QName> {
    role_ancestors(role, ws, true)
}

/// Same as [`recursive_role_ancestors`]; `guard = false` drops the visited set.
pub(crate) fn role_ancestors(role: &QName, ws: WorkspaceRef<'_>, guard: bool) -> BTreeSet<QName> {
    let mut roles = BTreeSet::new();
    let mut visited = guard.then(BTreeSet::new);
    collect(role, ws, &mut roles, visited.as_mut());

    tracing::trace!(
        target: "wsacl::acl",
        role = %role,
        workspace = %ws.name(),
        ancestors = roles.len(),
        "role ancestors resolved"
    );
    roles
}

/// Expands every supplied role and unions the results.
///
/// Names that are not roles visible in `ws` (the System role among them) are kept as is.
pub(crate) fn expand_roles<'r>(
    roles: impl IntoIterator<Item = &'r QName>,
    ws: WorkspaceRef<'_>,
    guard: bool,
) -> BTreeSet<QName> {
    let mut expanded = BTreeSet::new();
    for role in roles {
        if ws.type_def(role).is_some_and(|t| t.is_role()) {
            expanded.extend(role_ancestors(role, ws, guard));
        } else {
            expanded.insert(role.clone());
        }
    }
    expanded
}

fn collect<'a>(
    role: &'a QName,
    ws: WorkspaceRef<'a>,
    roles: &mut BTreeSet<QName>,
    mut visited: Option<&mut BTreeSet<(&'a QName, &'a QName)>>,
) {
    if let Some(visited) = visited.as_deref_mut() {
        if !visited.insert((role, ws.name())) {
            return;
        }
    }
    roles.insert(role.clone());

    for rule in ws.acl() {
        if !rule.op(OperationKind::Inherits) || rule.principal() != role {
            continue;
        }
        for parent in ws
            .types()
            .filter(|t| t.is_role() && rule.filter().matches(t))
        {
            collect(parent.qname(), ws, roles, visited.as_deref_mut());
        }
    }

    for ancestor in ws.ancestors() {
        collect(role, ancestor, roles, visited.as_deref_mut());
    }
}
