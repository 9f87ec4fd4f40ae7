//! Rules declared in ancestor workspaces apply to descendants; descendants refine them.
//!
//! ```text
//! abstractWS        doc1 S--  doc2 S--
//!   <- ws1          doc1 SIU  doc2 S--
//!   <- ws2          doc1 S--  doc2 SIU   (through a ws2 role granted to role)
//!   <- ws3          doc1 ---  doc2 ---
//! ```
//!
//! # Tests
//!
//! - `test_operations_follow_request_workspace`: the same role gets different answers
//!   depending on the workspace the request is made in
//! - `test_published_types_follow_request_workspace`: the enumeration agrees with the
//!   operation checks, Activate and Deactivate included
//! - `test_descendant_types_are_invisible_to_ancestors`: a role declared in ws2 is not a
//!   resource of abstractWS
//! - `test_diamond_applies_shared_ancestor_once`: a grant in a workspace reached through two
//!   ancestors is not re-applied after a revoke on one of the paths
//! - `test_diamond_follows_ancestor_declaration_order`: the later-declared ancestor's rules
//!   win

mod common;

use std::collections::BTreeMap;

use common::{diamond_app, inheritance_app, name};
use wsacl_core::{
    AclErrorKind, AppDef, Decision, OperationKind, OperationsSet, PolicyKind, PublishedOp, QName,
    is_operation_allowed, published_types,
};

use wsacl_core::OperationKind::{Activate, Deactivate, Insert, Select, Update};

fn ops(list: &[OperationKind]) -> OperationsSet {
    list.iter().copied().collect()
}

#[test]
fn test_operations_follow_request_workspace() {
    let app = inheritance_app();
    let role = [name("role")];

    let cases = [
        ("abstractWS", ops(&[Select]), ops(&[Select])),
        ("ws1", ops(&[Select, Insert, Update]), ops(&[Select])),
        ("ws2", ops(&[Select]), ops(&[Select, Insert, Update])),
        ("ws3", ops(&[]), ops(&[])),
    ];

    for (ws_name, doc1, doc2) in cases {
        let ws = app.workspace(&name(ws_name)).unwrap();
        for op in [Select, Insert, Update] {
            for (doc, want) in [("doc1", doc1), ("doc2", doc2)] {
                let decision = is_operation_allowed(ws, op, &name(doc), &[], &role).unwrap();
                assert_eq!(
                    decision.allowed,
                    want.contains(op),
                    "{op} {doc} in {ws_name}"
                );
            }
        }
    }
}

#[test]
fn test_published_types_follow_request_workspace() {
    let app = inheritance_app();
    let all = vec![
        (Select, None),
        (Insert, None),
        (Update, None),
        (Activate, None),
        (Deactivate, None),
    ];
    let select = vec![(Select, None)];

    let cases: Vec<(&str, BTreeMap<QName, Vec<PublishedOp>>)> = vec![
        (
            "abstractWS",
            BTreeMap::from([(name("doc1"), select.clone()), (name("doc2"), select.clone())]),
        ),
        (
            "ws1",
            BTreeMap::from([(name("doc1"), all.clone()), (name("doc2"), select.clone())]),
        ),
        (
            "ws2",
            BTreeMap::from([(name("doc1"), select.clone()), (name("doc2"), all.clone())]),
        ),
        ("ws3", BTreeMap::new()),
    ];

    for (ws_name, want) in cases {
        let ws = app.workspace(&name(ws_name)).unwrap();
        let got: BTreeMap<QName, Vec<PublishedOp>> = published_types(ws, &name("role"))
            .map(|(t, ops)| (t.qname().clone(), ops.collect()))
            .collect();
        assert_eq!(got, want, "published in {ws_name}");
    }
}

#[test]
fn test_descendant_types_are_invisible_to_ancestors() {
    let app = inheritance_app();
    let aws = app.workspace(&name("abstractWS")).unwrap();
    let ws2 = app.workspace(&name("ws2")).unwrap();

    assert!(ws2.type_def(&name("r2")).is_some());
    assert!(aws.type_def(&name("r2")).is_none());

    let err = is_operation_allowed(aws, OperationKind::Select, &name("r2"), &[], &[name("role")])
        .unwrap_err();
    assert_eq!(err.kind(), AclErrorKind::NotFound);
}

fn select_doc(app: &AppDef, ws_name: &str) -> Decision {
    let ws = app.workspace(&name(ws_name)).unwrap();
    is_operation_allowed(ws, Select, &name("doc"), &[], &[name("role")]).unwrap()
}

#[test]
fn test_diamond_applies_shared_ancestor_once() {
    // base grants, left revokes, right adds nothing
    let app = diamond_app(
        Some(PolicyKind::Allow),
        Some(PolicyKind::Deny),
        None,
        ["left", "right"],
    );

    let base = select_doc(&app, "base");
    assert!(base.allowed);
    assert_eq!(base.allowed_fields, None);

    assert!(!select_doc(&app, "left").allowed);
    assert!(select_doc(&app, "right").allowed);

    let child = select_doc(&app, "child");
    assert!(!child.allowed, "{child:?}");
    assert_eq!(child.allowed_fields, Some(vec![]));
}

#[test]
fn test_diamond_follows_ancestor_declaration_order() {
    let grant_left = Some(PolicyKind::Allow);
    let revoke_right = Some(PolicyKind::Deny);

    let right_first = diamond_app(None, grant_left, revoke_right, ["right", "left"]);
    assert!(select_doc(&right_first, "child").allowed);

    let left_first = diamond_app(None, grant_left, revoke_right, ["left", "right"]);
    assert!(!select_doc(&left_first, "child").allowed);

    assert!(!select_doc(&left_first, "base").allowed);
}
