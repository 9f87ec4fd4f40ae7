//! Type filters used by ACL rules to select resources.

use std::collections::BTreeSet;
use std::fmt;

use smallvec::SmallVec;

use super::field::FieldName;
use super::kind::TypeKind;
use super::qname::QName;
use super::typedef::TypeDef;

/// Predicate over types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Types with one of the names.
    QNames(BTreeSet<QName>),
    /// Types of one of the kinds, wherever declared.
    Types(BTreeSet<TypeKind>),
    /// Types of one of the kinds declared in the workspace.
    WSTypes {
        workspace: QName,
        kinds: BTreeSet<TypeKind>,
    },
    /// Types marked with any of the tags.
    Tags(BTreeSet<QName>),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn qnames(names: impl IntoIterator<Item = QName>) -> Self {
        Self::QNames(names.into_iter().collect())
    }

    pub fn types(kinds: impl IntoIterator<Item = TypeKind>) -> Self {
        Self::Types(kinds.into_iter().collect())
    }

    pub fn ws_types(workspace: QName, kinds: impl IntoIterator<Item = TypeKind>) -> Self {
        Self::WSTypes {
            workspace,
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn tags(tags: impl IntoIterator<Item = QName>) -> Self {
        Self::Tags(tags.into_iter().collect())
    }

    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::And(filters.into_iter().collect())
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::Or(filters.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: Filter) -> Self {
        Self::Not(Box::new(filter))
    }

    /// Documents and records declared in the workspace.
    pub fn all_ws_tables(workspace: QName) -> Self {
        Self::ws_types(workspace, TypeKind::RECORDS)
    }

    /// Commands and queries declared in the workspace.
    pub fn all_ws_functions(workspace: QName) -> Self {
        Self::ws_types(workspace, TypeKind::FUNCTIONS)
    }

    #[must_use]
    pub fn matches(&self, t: &TypeDef) -> bool {
        match self {
            Filter::QNames(names) => names.contains(t.qname()),
            Filter::Types(kinds) => kinds.contains(&t.kind()),
            Filter::WSTypes { workspace, kinds } => {
                t.workspace() == workspace && kinds.contains(&t.kind())
            }
            Filter::Tags(tags) => t.tags().iter().any(|tag| tags.contains(tag)),
            Filter::And(filters) => filters.iter().all(|f| f.matches(t)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(t)),
            Filter::Not(filter) => !filter.matches(t),
        }
    }
}

fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::QNames(names) => {
                f.write_str("QNAMES(")?;
                write_list(f, names)?;
            }
            Filter::Types(kinds) => {
                f.write_str("TYPES(")?;
                write_list(f, kinds)?;
            }
            Filter::WSTypes { workspace, kinds } => {
                write!(f, "WSTYPES({workspace}, ")?;
                write_list(f, kinds)?;
            }
            Filter::Tags(tags) => {
                f.write_str("TAGS(")?;
                write_list(f, tags)?;
            }
            Filter::And(filters) => {
                f.write_str("AND(")?;
                write_list(f, filters)?;
            }
            Filter::Or(filters) => {
                f.write_str("OR(")?;
                write_list(f, filters)?;
            }
            Filter::Not(filter) => write!(f, "NOT({filter}")?,
        }
        f.write_str(")")
    }
}

/// Filter of an ACL rule, optionally narrowed to a field subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclFilter {
    filter: Filter,
    fields: SmallVec<[FieldName; 4]>,
}

impl AclFilter {
    pub(crate) fn new(filter: Filter, fields: impl IntoIterator<Item = FieldName>) -> Self {
        Self {
            filter,
            fields: fields.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    #[must_use]
    pub fn matches(&self, t: &TypeDef) -> bool {
        self.filter.matches(t)
    }

    /// The rule is restricted to specific fields.
    #[must_use]
    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldName] {
        &self.fields
    }
}

impl fmt::Display for AclFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filter)?;
        if self.has_fields() {
            f.write_str("[")?;
            write_list(f, self.fields.iter())?;
            f.write_str("]")?;
        }
        Ok(())
    }
}
