//! Structural checks of an ACL request, run before any rule is evaluated.

use crate::appdef::WorkspaceRef;
use crate::constants::SYSTEM_FIELD_IS_ACTIVE;
use crate::error::{AclError, Result};
use crate::types::{OperationKind, QName, TypeDef};

/// Resolves `res` in `ws` and checks that `op` applies to it.
///
/// Errors, in the order they are checked: unknown resource, operation not applicable
/// to the resource, unknown requested field or missing `sys.IsActive`, unsupported
/// operation, empty role list.
pub(crate) fn validate<'a>(
    ws: WorkspaceRef<'a>,
    op: OperationKind,
    res: &QName,
    fields: &[&str],
    roles: &[QName],
) -> Result<&'a TypeDef> {
    let Some(t) = ws.type_def(res) else {
        return Err(AclError::not_found(format!("resource «{res}» in {ws}")));
    };

    match op {
        OperationKind::Insert | OperationKind::Update | OperationKind::Select => {
            let Some(with_fields) = t.with_fields() else {
                return Err(AclError::incompatible(format!("{t} has no fields")));
            };
            if let Some(f) = fields.iter().find(|f| with_fields.field(f).is_none()) {
                return Err(AclError::not_found(format!("field «{f}» in {t}")));
            }
        }
        OperationKind::Activate | OperationKind::Deactivate => {
            let Some(rec) = t.as_record() else {
                return Err(AclError::incompatible(format!("{t} is not a record")));
            };
            if rec.is_active_field().is_none() {
                return Err(AclError::not_found(format!(
                    "field «{SYSTEM_FIELD_IS_ACTIVE}» in {t}"
                )));
            }
        }
        OperationKind::Execute => {
            if t.as_function().is_none() {
                return Err(AclError::incompatible(format!("{t} is not a function")));
            }
        }
        OperationKind::Inherits => {
            return Err(AclError::unsupported(format!("operation «{op}»")));
        }
    }

    if roles.is_empty() {
        return Err(AclError::missed("participants"));
    }

    Ok(t)
}
