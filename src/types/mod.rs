//! Public types exposed by the `wsacl-core` crate.

pub mod field;
pub mod filter;
pub mod kind;
pub mod options;
pub mod qname;
pub mod rule;
pub mod typedef;

pub use field::{Field, FieldName};
pub use filter::{AclFilter, Filter};
pub use kind::{DataKind, OperationKind, OperationsSet, PolicyKind, TypeKind};
pub use options::{AclOptions, AclOptionsBuilder};
pub use qname::QName;
pub use rule::AclRule;
pub use typedef::{Function, FunctionSig, Record, Structure, TypeDef, View, WithFields};
