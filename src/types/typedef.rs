//! Type definitions and their capability views.
//!
//! A [`TypeDef`] is a tagged union over the type kinds. Whether a type "has fields",
//! "is a record" or "is a function" is answered by the capability accessors
//! ([`TypeDef::with_fields`], [`TypeDef::as_record`], [`TypeDef::as_function`]) which
//! return trait objects for the matching variants only.

use std::fmt;

use serde::Serialize;

use super::field::{Field, FieldName, system_fields};
use super::kind::TypeKind;
use super::qname::QName;
use crate::constants::SYSTEM_FIELD_IS_ACTIVE;

/// Types that expose an ordered field list.
pub trait WithFields {
    fn fields(&self) -> &[Field];

    fn field(&self, name: &str) -> Option<&Field> {
        self.fields().iter().find(|f| f.name == name)
    }

    fn field_count(&self) -> usize {
        self.fields().len()
    }
}

/// Documents and records.
pub trait Record: WithFields {
    /// The `sys.IsActive` field, if the record kind declares it.
    fn is_active_field(&self) -> Option<&Field> {
        self.field(SYSTEM_FIELD_IS_ACTIVE)
    }
}

/// Commands and queries.
pub trait Function {
    fn param(&self) -> Option<&QName>;
    fn result(&self) -> Option<&QName>;
}

/// Body of documents, records and objects.
#[derive(Debug, Clone, Serialize)]
pub struct Structure {
    pub(crate) fields: Vec<Field>,
}

impl WithFields for Structure {
    fn fields(&self) -> &[Field] {
        &self.fields
    }
}

impl Record for Structure {}

/// Body of view records: system fields, then partition key, clustering columns and values.
#[derive(Debug, Clone, Serialize)]
pub struct View {
    pub(crate) fields: Vec<Field>,
    pub(crate) part_key_len: usize,
    pub(crate) clust_cols_len: usize,
}

impl View {
    fn sys_len(&self) -> usize {
        self.fields.iter().take_while(|f| f.system).count()
    }

    /// Partition key fields.
    #[must_use]
    pub fn partition_key(&self) -> &[Field] {
        let sys = self.sys_len();
        &self.fields[sys..sys + self.part_key_len]
    }

    /// Partition key followed by clustering columns.
    #[must_use]
    pub fn key(&self) -> &[Field] {
        let sys = self.sys_len();
        &self.fields[sys..sys + self.part_key_len + self.clust_cols_len]
    }

    /// Value fields, after the key.
    #[must_use]
    pub fn value(&self) -> &[Field] {
        let sys = self.sys_len();
        &self.fields[sys + self.part_key_len + self.clust_cols_len..]
    }

    pub(crate) fn insert_part_key(&mut self, field: Field) {
        let at = self.sys_len() + self.part_key_len;
        self.fields.insert(at, field);
        self.part_key_len += 1;
    }

    pub(crate) fn insert_clust_col(&mut self, field: Field) {
        let at = self.sys_len() + self.part_key_len + self.clust_cols_len;
        self.fields.insert(at, field);
        self.clust_cols_len += 1;
    }
}

impl WithFields for View {
    fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// Signature of a command or query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FunctionSig {
    pub(crate) param: Option<QName>,
    pub(crate) result: Option<QName>,
}

impl Function for FunctionSig {
    fn param(&self) -> Option<&QName> {
        self.param.as_ref()
    }

    fn result(&self) -> Option<&QName> {
        self.result.as_ref()
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) enum TypeBody {
    Structure(Structure),
    View(View),
    Function(FunctionSig),
    Role,
    Tag,
}

/// A named type declared in a workspace.
#[derive(Debug, Clone, Serialize)]
pub struct TypeDef {
    qname: QName,
    kind: TypeKind,
    workspace: QName,
    pub(crate) tags: Vec<QName>,
    pub(crate) comment: Option<String>,
    pub(crate) body: TypeBody,
}

impl TypeDef {
    pub(crate) fn new(qname: QName, kind: TypeKind, workspace: QName) -> Self {
        let body = match kind {
            TypeKind::ViewRecord => TypeBody::View(View {
                fields: system_fields(kind),
                part_key_len: 0,
                clust_cols_len: 0,
            }),
            TypeKind::Command | TypeKind::Query => TypeBody::Function(FunctionSig::default()),
            TypeKind::Role => TypeBody::Role,
            TypeKind::Tag => TypeBody::Tag,
            _ => TypeBody::Structure(Structure {
                fields: system_fields(kind),
            }),
        };
        Self {
            qname,
            kind,
            workspace,
            tags: Vec::new(),
            comment: None,
            body,
        }
    }

    #[must_use]
    pub fn qname(&self) -> &QName {
        &self.qname
    }

    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Workspace the type is declared in.
    #[must_use]
    pub fn workspace(&self) -> &QName {
        &self.workspace
    }

    #[must_use]
    pub fn tags(&self) -> &[QName] {
        &self.tags
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    #[must_use]
    pub fn with_fields(&self) -> Option<&dyn WithFields> {
        match &self.body {
            TypeBody::Structure(s) => Some(s),
            TypeBody::View(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&dyn Record> {
        match &self.body {
            TypeBody::Structure(s) if self.kind.is_record() => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_view(&self) -> Option<&View> {
        match &self.body {
            TypeBody::View(v) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn view_mut(&mut self) -> Option<&mut View> {
        match &mut self.body {
            TypeBody::View(v) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn function_mut(&mut self) -> Option<&mut FunctionSig> {
        match &mut self.body {
            TypeBody::Function(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_function(&self) -> Option<&dyn Function> {
        match &self.body {
            TypeBody::Function(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_role(&self) -> bool {
        matches!(self.body, TypeBody::Role)
    }

    /// Field names in declaration order, empty for types without fields.
    pub fn field_names(&self) -> impl Iterator<Item = &FieldName> {
        self.with_fields()
            .map(WithFields::fields)
            .unwrap_or_default()
            .iter()
            .map(|f| &f.name)
    }

    pub(crate) fn fields_mut(&mut self) -> Option<&mut Vec<Field>> {
        match &mut self.body {
            TypeBody::Structure(s) => Some(&mut s.fields),
            TypeBody::View(v) => Some(&mut v.fields),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} «{}»", self.kind, self.qname)
    }
}
