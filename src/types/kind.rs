//! Kinds of types, ACL operations and policies, and the per-kind operation table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a type declared in a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeKind {
    GDoc,
    CDoc,
    WDoc,
    ODoc,
    GRecord,
    CRecord,
    WRecord,
    ORecord,
    Object,
    ViewRecord,
    Command,
    Query,
    Role,
    Tag,
}

impl TypeKind {
    /// Documents and nested records.
    pub const RECORDS: [TypeKind; 8] = [
        TypeKind::GDoc,
        TypeKind::CDoc,
        TypeKind::WDoc,
        TypeKind::ODoc,
        TypeKind::GRecord,
        TypeKind::CRecord,
        TypeKind::WRecord,
        TypeKind::ORecord,
    ];

    /// Commands and queries.
    pub const FUNCTIONS: [TypeKind; 2] = [TypeKind::Command, TypeKind::Query];

    #[must_use]
    pub fn is_record(self) -> bool {
        Self::RECORDS.contains(&self)
    }

    #[must_use]
    pub fn is_function(self) -> bool {
        Self::FUNCTIONS.contains(&self)
    }

    /// Structures and views carry fields.
    #[must_use]
    pub fn has_fields(self) -> bool {
        self.is_record() || matches!(self, TypeKind::Object | TypeKind::ViewRecord)
    }

    /// Kinds listed by the published-types enumerator.
    #[must_use]
    pub fn is_publishable(self) -> bool {
        self.has_fields() || self.is_function()
    }

    /// ACL operations applicable to the kind, in publication order.
    ///
    /// Empty for kinds that can not be an ACL resource.
    #[must_use]
    pub fn acl_operations(self) -> &'static [OperationKind] {
        use OperationKind::{Activate, Deactivate, Execute, Inherits, Insert, Select, Update};

        match self {
            TypeKind::GDoc
            | TypeKind::CDoc
            | TypeKind::WDoc
            | TypeKind::ODoc
            | TypeKind::GRecord
            | TypeKind::CRecord
            | TypeKind::WRecord
            | TypeKind::ORecord => &[Select, Insert, Update, Activate, Deactivate],
            TypeKind::Object | TypeKind::ViewRecord => &[Select, Insert, Update],
            TypeKind::Command | TypeKind::Query => &[Execute],
            TypeKind::Role => &[Inherits],
            TypeKind::Tag => &[],
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Operation an ACL rule grants or revokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OperationKind {
    Insert,
    Update,
    Select,
    Execute,
    Inherits,
    Activate,
    Deactivate,
}

impl OperationKind {
    pub const ALL: [OperationKind; 7] = [
        OperationKind::Insert,
        OperationKind::Update,
        OperationKind::Select,
        OperationKind::Execute,
        OperationKind::Inherits,
        OperationKind::Activate,
        OperationKind::Deactivate,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Operations that read or write rows.
    #[must_use]
    pub fn is_data(self) -> bool {
        matches!(
            self,
            OperationKind::Insert
                | OperationKind::Update
                | OperationKind::Select
                | OperationKind::Activate
                | OperationKind::Deactivate
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Outcome a rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    Allow,
    Deny,
}

impl PolicyKind {
    /// `GRANT` or `REVOKE`, as rules are written.
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            PolicyKind::Allow => "GRANT",
            PolicyKind::Deny => "REVOKE",
        }
    }
}

/// Data kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataKind {
    Int32,
    Int64,
    Float32,
    Float64,
    Bytes,
    String,
    QName,
    Bool,
    RecordId,
}

/// Compact set of operation kinds. Iterates in declaration order of [`OperationKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OperationsSet(u8);

impl OperationsSet {
    #[must_use]
    pub fn new() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, op: OperationKind) {
        self.0 |= op.bit();
    }

    #[must_use]
    pub fn contains(self, op: OperationKind) -> bool {
        self.0 & op.bit() != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = OperationKind> {
        OperationKind::ALL
            .into_iter()
            .filter(move |op| self.contains(*op))
    }

    /// Operations of one rule must come from a single group: data operations,
    /// `Execute`, or `Inherits`.
    #[must_use]
    pub fn is_compatible(self) -> bool {
        let data = self.iter().filter(|op| op.is_data()).count();
        let execute = usize::from(self.contains(OperationKind::Execute));
        let inherits = usize::from(self.contains(OperationKind::Inherits));
        [data, execute, inherits].iter().filter(|n| **n > 0).count() <= 1
    }
}

impl FromIterator<OperationKind> for OperationsSet {
    fn from_iter<I: IntoIterator<Item = OperationKind>>(iter: I) -> Self {
        let mut set = Self::new();
        for op in iter {
            set.insert(op);
        }
        set
    }
}

impl fmt::Display for OperationsSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, op) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{op}")?;
        }
        f.write_str("]")
    }
}
