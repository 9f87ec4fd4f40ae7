//! ACL rules as stored in a workspace.

use std::fmt;

use super::filter::AclFilter;
use super::kind::{OperationKind, OperationsSet, PolicyKind};
use super::qname::QName;

/// One `GRANT`/`REVOKE` statement: operations, filter, principal and policy.
///
/// Immutable once the application is built. Rules of a workspace are kept in
/// declaration order.
#[derive(Debug, Clone)]
pub struct AclRule {
    pub(crate) ops: OperationsSet,
    pub(crate) policy: PolicyKind,
    pub(crate) filter: AclFilter,
    pub(crate) principal: QName,
    pub(crate) workspace: QName,
    pub(crate) comment: Option<String>,
}

impl AclRule {
    /// The rule applies to `op`.
    #[must_use]
    pub fn op(&self, op: OperationKind) -> bool {
        self.ops.contains(op)
    }

    #[must_use]
    pub fn ops(&self) -> OperationsSet {
        self.ops
    }

    #[must_use]
    pub fn policy(&self) -> PolicyKind {
        self.policy
    }

    #[must_use]
    pub fn filter(&self) -> &AclFilter {
        &self.filter
    }

    /// Role the rule is granted to or revoked from.
    #[must_use]
    pub fn principal(&self) -> &QName {
        &self.principal
    }

    /// Workspace the rule is declared in.
    #[must_use]
    pub fn workspace(&self) -> &QName {
        &self.workspace
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

impl fmt::Display for AclRule {
    // GRANT [Select] ON QNAMES(test.doc) TO test.reader
    // REVOKE [Update] ON QNAMES(test.doc)[hiddenField] FROM test.writer
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.policy {
            PolicyKind::Allow => "TO",
            PolicyKind::Deny => "FROM",
        };
        write!(
            f,
            "{} {} ON {} {dir} {}",
            self.policy.action(),
            self.ops,
            self.filter,
            self.principal
        )
    }
}
