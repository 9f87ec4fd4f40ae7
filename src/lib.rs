#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(
    test,
    allow(
        clippy::useless_vec,
        clippy::uninlined_format_args,
        clippy::redundant_closure_for_method_calls
    )
)]
#![allow(clippy::module_name_repetitions)]
//
// Strategic lint exceptions - these are allowed project-wide for pragmatic reasons:
//
// Documentation lints: builders and accessors are self-describing.
// Public entry points still document their error cases in prose.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Style: the rule resolver and the evaluator read better as one function each.
#![allow(clippy::too_many_lines)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::similar_names)]
// e.g., ws, wsb and ws_name are intentionally similar
//
// Pattern matching: These pedantic lints often suggest changes that reduce clarity.
#![allow(clippy::manual_let_else)]
#![allow(clippy::match_same_arms)]
//
// Ergonomics trade-offs that are acceptable for this codebase:
#![allow(clippy::needless_pass_by_value)] // Builders take owned names and filters intentionally
#![allow(clippy::return_self_not_must_use)] // Builder patterns don't need must_use on every method
#![allow(clippy::should_implement_trait)] // Filter::not reads better than a Not impl
#![allow(clippy::implicit_hasher)]
#![allow(clippy::struct_excessive_bools)] // Option structs naturally carry flags

//! Access control over a hierarchical workspace/type model.
//!
//! Build an [`AppDef`] with [`AppDefBuilder`], then ask [`is_operation_allowed`],
//! [`recursive_role_ancestors`] or [`published_types`] against one of its workspaces,
//! or wrap it in an [`AccessControl`] engine to address workspaces by name.

/// The wsacl-core crate version (matches `Cargo.toml`).
pub const WSACL_CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod acl;
pub mod appdef;
pub mod constants;
pub mod error;
pub mod types;

pub use acl::{
    AccessControl, Decision, PublishedOp, PublishedOperation, PublishedOps, PublishedType,
    PublishedTypes, collect_published, is_operation_allowed, published_types,
    recursive_role_ancestors,
};
pub use appdef::{
    AppDef, AppDefBuilder, FunctionBuilder, StructureBuilder, ViewBuilder, Workspace,
    WorkspaceBuilder, WorkspaceRef,
};
pub use constants::QNAME_ROLE_SYSTEM;
pub use error::{AclError, AclErrorKind, Result};
pub use types::{
    AclFilter, AclOptions, AclOptionsBuilder, AclRule, DataKind, Field, FieldName, Filter,
    Function, FunctionSig, OperationKind, OperationsSet, PolicyKind, QName, Record,
    Structure, TypeDef, TypeKind, View, WithFields,
};
