//! Workspace-graph ACL: operation checks, role ancestry and published types.
//!
//! A request is answered in three steps. The operation is validated against the
//! resource, the supplied roles are expanded through `Inherits` grants, then the rules
//! of the workspace and its ancestors are applied in order. Denials are ordinary
//! results; only malformed requests produce an [`AclError`](crate::AclError).

mod engine;
mod evaluate;
mod published;
mod roles;
mod validate;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use engine::AccessControl;
pub use published::{
    PublishedOp, PublishedOperation, PublishedOps, PublishedType, PublishedTypes,
    collect_published,
};
pub use roles::recursive_role_ancestors;

use crate::appdef::WorkspaceRef;
use crate::error::Result;
use crate::types::qname::display_names;
use crate::types::{AclOptions, FieldName, OperationKind, QName};

/// Answer of [`is_operation_allowed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub allowed: bool,
    /// `None`: every field (also for resources without fields).
    /// `Some([])`: no field. Otherwise the allowed fields in the type's field order.
    pub allowed_fields: Option<Vec<FieldName>>,
    /// Requested field that turned an allowed operation into a deny.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denied_field: Option<FieldName>,
}

/// Checks whether any of `roles` may perform `op` on `res` in `ws`.
///
/// For `Select`, `Insert` and `Update` a non-empty `fields` list must be fully covered
/// by the allowed fields; an empty list asks about the resource as a whole.
pub fn is_operation_allowed(
    ws: WorkspaceRef<'_>,
    op: OperationKind,
    res: &QName,
    fields: &[&str],
    roles: &[QName],
) -> Result<Decision> {
    check(ws, op, res, fields, roles, &AclOptions::default())
}

/// Lazily lists the types and operations published to `role` in `ws` and its ancestors.
#[must_use]
pub fn published_types<'a>(ws: WorkspaceRef<'a>, role: &QName) -> PublishedTypes<'a> {
    let roles = roles::expand_roles([role], ws, true);
    PublishedTypes::new(ws, roles)
}

pub(crate) fn check(
    ws: WorkspaceRef<'_>,
    op: OperationKind,
    res: &QName,
    fields: &[&str],
    roles: &[QName],
    options: &AclOptions,
) -> Result<Decision> {
    let resource = validate::validate(ws, op, res, fields, roles)?;
    let expanded = roles::expand_roles(roles, ws, options.role_cycle_guard);
    let eval = evaluate::evaluate(ws, op, resource, &expanded);

    let denied_field = if eval.allowed {
        eval.denied_field(fields)
    } else {
        None
    };
    let allowed = eval.allowed && denied_field.is_none();

    if !allowed && options.log_denials {
        log_denial(ws, op, res, denied_field, &expanded);
    }

    Ok(Decision {
        allowed,
        allowed_fields: eval.allowed_fields(resource),
        denied_field: denied_field.map(str::to_string),
    })
}

fn log_denial(
    ws: WorkspaceRef<'_>,
    op: OperationKind,
    res: &QName,
    field: Option<&str>,
    roles: &BTreeSet<QName>,
) {
    tracing::debug!(
        target: "wsacl::acl",
        op = %op,
        resource = %res,
        field = ?field,
        roles = %display_names(roles),
        workspace = %ws.name(),
        "operation denied"
    );
}
