//! Well-known names of the system package.

use once_cell::sync::Lazy;

use crate::types::QName;

/// Package that owns built-in names.
pub const SYS_PACKAGE: &str = "sys";

/// Record identifier.
pub const SYSTEM_FIELD_ID: &str = "sys.ID";
/// Parent record identifier of nested records.
pub const SYSTEM_FIELD_PARENT_ID: &str = "sys.ParentID";
/// Activity flag, required for ACTIVATE and DEACTIVATE.
pub const SYSTEM_FIELD_IS_ACTIVE: &str = "sys.IsActive";
/// Container name of nested records and objects.
pub const SYSTEM_FIELD_CONTAINER: &str = "sys.Container";
/// Qualified name of the type a row belongs to.
pub const SYSTEM_FIELD_QNAME: &str = "sys.QName";

/// Entity name of the System role.
pub const SYSTEM_ROLE_ENTITY: &str = "System";

/// `sys.System`: principal that bypasses every ACL rule.
#[allow(clippy::non_std_lazy_statics)]
pub static QNAME_ROLE_SYSTEM: Lazy<QName> =
    Lazy::new(|| QName::new(SYS_PACKAGE, SYSTEM_ROLE_ENTITY));
