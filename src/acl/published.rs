//! Enumeration of the types and operations a role may use in a workspace.
//!
//! Both levels are lazy: a type is evaluated only when the outer iterator is advanced
//! to it, and its remaining operations only when the inner iterator is. A consumer that
//! stops early never pays for the rest.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use super::evaluate::evaluate;
use crate::appdef::WorkspaceRef;
use crate::types::{FieldName, OperationKind, QName, TypeDef, TypeKind};

/// One published operation. `None` fields means every field.
pub type PublishedOp = (OperationKind, Option<Vec<FieldName>>);

/// Published types of a workspace in QName order, each with its allowed operations.
///
/// Types without any allowed operation are skipped.
#[derive(Debug)]
pub struct PublishedTypes<'a> {
    ws: WorkspaceRef<'a>,
    roles: Arc<BTreeSet<QName>>,
    types: std::vec::IntoIter<&'a TypeDef>,
    evaluations: Arc<AtomicUsize>,
}

impl<'a> PublishedTypes<'a> {
    pub(crate) fn new(ws: WorkspaceRef<'a>, roles: BTreeSet<QName>) -> Self {
        let types: Vec<&'a TypeDef> = ws
            .types()
            .filter(|t| t.kind().is_publishable())
            .collect();
        Self {
            ws,
            roles: Arc::new(roles),
            types: types.into_iter(),
            evaluations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Expanded roles the enumeration runs for.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<QName> {
        &self.roles
    }

    /// Number of evaluator runs performed so far, across this iterator and every
    /// [`PublishedOps`] it produced.
    #[must_use]
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }
}

impl<'a> Iterator for PublishedTypes<'a> {
    type Item = (&'a TypeDef, PublishedOps<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        for resource in self.types.by_ref() {
            let mut ops = PublishedOps {
                ws: self.ws,
                resource,
                roles: Arc::clone(&self.roles),
                ops: resource.kind().acl_operations().iter(),
                first: None,
                evaluations: Arc::clone(&self.evaluations),
            };
            // a type is published only if at least one operation is allowed
            if let Some(first) = ops.advance() {
                ops.first = Some(first);
                return Some((resource, ops));
            }
        }
        None
    }
}

/// Allowed operations of one published type, in the fixed per-kind order.
#[derive(Debug)]
pub struct PublishedOps<'a> {
    ws: WorkspaceRef<'a>,
    resource: &'a TypeDef,
    roles: Arc<BTreeSet<QName>>,
    ops: std::slice::Iter<'static, OperationKind>,
    first: Option<PublishedOp>,
    evaluations: Arc<AtomicUsize>,
}

impl<'a> PublishedOps<'a> {
    #[must_use]
    pub fn resource(&self) -> &'a TypeDef {
        self.resource
    }

    fn advance(&mut self) -> Option<PublishedOp> {
        for &op in self.ops.by_ref() {
            self.evaluations.fetch_add(1, Ordering::Relaxed);
            let eval = evaluate(self.ws, op, self.resource, &self.roles);
            if eval.allowed {
                return Some((op, eval.allowed_fields(self.resource)));
            }
        }
        None
    }
}

impl Iterator for PublishedOps<'_> {
    type Item = PublishedOp;

    fn next(&mut self) -> Option<Self::Item> {
        self.first.take().or_else(|| self.advance())
    }
}

/// Serializable snapshot of one published type.
///
/// `fields: null` on the wire means every field, `[]` means none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedType {
    pub qname: QName,
    pub kind: TypeKind,
    pub operations: Vec<PublishedOperation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedOperation {
    pub operation: OperationKind,
    pub fields: Option<Vec<FieldName>>,
}

/// Drains the enumeration into owned snapshots.
#[must_use]
pub fn collect_published(types: PublishedTypes<'_>) -> Vec<PublishedType> {
    types
        .map(|(t, ops)| PublishedType {
            qname: t.qname().clone(),
            kind: t.kind(),
            operations: ops
                .map(|(operation, fields)| PublishedOperation { operation, fields })
                .collect(),
        })
        .collect()
}
