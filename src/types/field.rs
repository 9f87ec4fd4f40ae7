//! Fields of structures and views.

use serde::{Deserialize, Serialize};

use super::kind::{DataKind, TypeKind};
use crate::constants::{
    SYSTEM_FIELD_CONTAINER, SYSTEM_FIELD_ID, SYSTEM_FIELD_IS_ACTIVE, SYSTEM_FIELD_PARENT_ID,
    SYSTEM_FIELD_QNAME,
};

/// Name of a field, e.g. `field1` or `sys.IsActive`.
pub type FieldName = String;

/// A single field of a structure or view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: FieldName,
    pub data: DataKind,
    pub required: bool,
    /// Added automatically by the type kind, not declared by the user.
    #[serde(default)]
    pub system: bool,
}

impl Field {
    pub fn new(name: impl Into<FieldName>, data: DataKind, required: bool) -> Self {
        Self {
            name: name.into(),
            data,
            required,
            system: false,
        }
    }

    fn system(name: &str, data: DataKind) -> Self {
        Self {
            name: name.to_string(),
            data,
            required: true,
            system: true,
        }
    }
}

/// System fields every type of `kind` starts with, in declaration order.
pub(crate) fn system_fields(kind: TypeKind) -> Vec<Field> {
    let qname = || Field::system(SYSTEM_FIELD_QNAME, DataKind::QName);
    let id = || Field::system(SYSTEM_FIELD_ID, DataKind::RecordId);
    let parent = || Field::system(SYSTEM_FIELD_PARENT_ID, DataKind::RecordId);
    let container = || Field::system(SYSTEM_FIELD_CONTAINER, DataKind::String);
    let active = || Field::system(SYSTEM_FIELD_IS_ACTIVE, DataKind::Bool);

    match kind {
        TypeKind::GDoc | TypeKind::CDoc | TypeKind::WDoc => vec![qname(), id(), active()],
        TypeKind::ODoc => vec![qname(), id()],
        TypeKind::GRecord | TypeKind::CRecord | TypeKind::WRecord => {
            vec![qname(), id(), parent(), container(), active()]
        }
        TypeKind::ORecord => vec![qname(), id(), parent(), container()],
        TypeKind::Object => vec![qname(), container()],
        TypeKind::ViewRecord => vec![qname()],
        TypeKind::Command | TypeKind::Query | TypeKind::Role | TypeKind::Tag => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(kind: TypeKind) -> Vec<String> {
        system_fields(kind).into_iter().map(|f| f.name).collect()
    }

    #[test]
    fn documents_lead_with_qname_id_active() {
        assert_eq!(names(TypeKind::CDoc), ["sys.QName", "sys.ID", "sys.IsActive"]);
        assert_eq!(names(TypeKind::ODoc), ["sys.QName", "sys.ID"]);
    }

    #[test]
    fn nested_records_carry_parent_and_container() {
        let fields = names(TypeKind::CRecord);
        assert!(fields.contains(&"sys.ParentID".to_string()));
        assert!(fields.contains(&"sys.Container".to_string()));
        assert!(!names(TypeKind::ORecord).contains(&"sys.IsActive".to_string()));
    }

    #[test]
    fn functions_have_no_fields() {
        assert!(system_fields(TypeKind::Command).is_empty());
        assert!(system_fields(TypeKind::Role).is_empty());
    }
}
