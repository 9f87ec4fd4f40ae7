//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use wsacl_core::{
    AppDef, DataKind, Filter, OperationKind, PolicyKind, QName, TypeKind, WorkspaceBuilder,
};

pub fn name(entity: &str) -> QName {
    QName::new("test", entity)
}

pub const WS: &str = "workspace";

/// One workspace with a tagged CDoc and ODoc, a view, a query, a command and five roles:
///
/// - `everyone` may select from the view;
/// - `reader` inherits `everyone`, selects tagged CDocs except `hiddenField`, executes the query;
/// - `writer` inherits `everyone`, inserts tagged CDocs, updates `field1` and `field3`,
///   executes every function;
/// - `admin` inherits `everyone`, has every operation on every table and function;
/// - `intruder` inherits `everyone`, loses every operation on CDocs and functions.
pub fn roles_app() -> AppDef {
    let ws_name = name(WS);
    let mut adb = AppDef::builder();
    let ws = adb.add_workspace(ws_name.clone());

    ws.add_tag(name("tag"));

    ws.add_cdoc(name("cDoc"))
        .add_field("field1", DataKind::Int32, true)
        .add_field("hiddenField", DataKind::Int32, false)
        .add_field("field3", DataKind::Int32, false)
        .set_tag(name("tag"));

    ws.add_odoc(name("oDoc"))
        .add_field("field1", DataKind::Int32, true)
        .set_tag(name("tag"));

    ws.add_view(name("view"))
        .add_part_key_field("field1", DataKind::Int32)
        .add_clust_col_field("field2", DataKind::Int32)
        .add_value_field("field3", DataKind::Int32, false);

    ws.add_query(name("qry")).set_result(name("cDoc"));
    ws.add_command(name("cmd")).set_param(QName::sys("ANY"));

    let tagged_cdocs = || {
        Filter::and([
            Filter::ws_types(ws_name.clone(), [TypeKind::CDoc]),
            Filter::tags([name("tag")]),
        ])
    };
    let inherit_everyone = [OperationKind::Inherits];

    ws.add_role(name("everyone"));
    ws.grant(
        [OperationKind::Select],
        Filter::qnames([name("view")]),
        &[],
        name("everyone"),
        "grant select view to everyone",
    );

    ws.add_role(name("reader"));
    ws.grant(
        inherit_everyone,
        Filter::qnames([name("everyone")]),
        &[],
        name("reader"),
        "grant inherits everyone to reader",
    );
    ws.grant(
        [OperationKind::Select],
        tagged_cdocs(),
        &[],
        name("reader"),
        "grant select any CDoc with tag to reader",
    );
    ws.revoke(
        [OperationKind::Select],
        Filter::qnames([name("cDoc")]),
        &["hiddenField"],
        name("reader"),
        "revoke select cDoc.hiddenField from reader",
    );
    ws.grant(
        [OperationKind::Execute],
        Filter::qnames([name("qry")]),
        &[],
        name("reader"),
        "grant execute query to reader",
    );

    ws.add_role(name("writer"));
    ws.grant(
        inherit_everyone,
        Filter::qnames([name("everyone")]),
        &[],
        name("writer"),
        "grant inherits everyone to writer",
    );
    ws.grant(
        [OperationKind::Insert],
        tagged_cdocs(),
        &[],
        name("writer"),
        "grant insert any CDoc with tag to writer",
    );
    ws.grant(
        [OperationKind::Update],
        Filter::qnames([name("cDoc")]),
        &["field1", "hiddenField", "field3"],
        name("writer"),
        "grant update cDoc.[field1, hiddenField, field3] to writer",
    );
    ws.revoke(
        [OperationKind::Update],
        Filter::qnames([name("cDoc")]),
        &["hiddenField"],
        name("writer"),
        "revoke update cDoc.hiddenField from writer",
    );
    ws.grant(
        [OperationKind::Execute],
        Filter::all_ws_functions(ws_name.clone()),
        &[],
        name("writer"),
        "grant execute all commands and queries to writer",
    );

    ws.add_role(name("admin"));
    ws.grant(
        inherit_everyone,
        Filter::qnames([name("everyone")]),
        &[],
        name("admin"),
        "grant inherits everyone to admin",
    );
    ws.grant_all(Filter::all_ws_tables(ws_name.clone()), name("admin"), "");
    ws.grant_all(Filter::all_ws_functions(ws_name.clone()), name("admin"), "");

    ws.add_role(name("intruder"));
    ws.grant(
        inherit_everyone,
        Filter::qnames([name("everyone")]),
        &[],
        name("intruder"),
        "grant inherits everyone to intruder",
    );
    ws.revoke_all(
        Filter::ws_types(ws_name.clone(), [TypeKind::CDoc]),
        name("intruder"),
        "revoke all access to CDocs from intruder",
    );
    ws.revoke_all(
        Filter::all_ws_functions(ws_name),
        name("intruder"),
        "revoke all access to functions from intruder",
    );

    adb.build().expect("fixture application must build")
}

/// Four workspaces over two documents:
///
/// ```text
/// abstractWS        S-- S--   grant select on all tables to role
///   <- ws1          SIU S--   grant all on doc1 to role
///   <- ws2          S-- SIU   grant all on doc2 to r2, grant r2 to role
///   <- ws3          --- ---   revoke all on doc1, doc2 from role
/// ```
pub fn inheritance_app() -> AppDef {
    let aws = name("abstractWS");
    let mut adb = AppDef::builder();

    let ws = adb.add_workspace(aws.clone());
    ws.add_cdoc(name("doc1"));
    ws.add_cdoc(name("doc2"));
    ws.add_role(name("role"));
    ws.grant(
        [OperationKind::Select],
        Filter::all_ws_tables(aws.clone()),
        &[],
        name("role"),
        "grant select all tables to role",
    );

    adb.add_workspace(name("ws1"))
        .set_ancestors([aws.clone()])
        .grant_all(
            Filter::qnames([name("doc1")]),
            name("role"),
            "grant all on doc1 to role",
        );

    adb.add_workspace(name("ws2"))
        .set_ancestors([aws.clone()])
        .add_role(name("r2"))
        .grant_all(
            Filter::qnames([name("doc2")]),
            name("r2"),
            "grant all on doc2 to r2",
        )
        .grant_all(
            Filter::ws_types(name("ws2"), [TypeKind::Role]),
            name("role"),
            "grant every ws2 role to role",
        );

    adb.add_workspace(name("ws3"))
        .set_ancestors([aws])
        .revoke_all(
            Filter::qnames([name("doc1"), name("doc2")]),
            name("role"),
            "revoke all on doc1, doc2 from role",
        );

    adb.build().expect("fixture application must build")
}

/// Diamond over one document, each workspace optionally granting or revoking Select on
/// `doc` to `role`:
///
/// ```text
/// base <- left  <-+
/// base <- right <-+- child (ancestors in the given order)
/// ```
pub fn diamond_app(
    base: Option<PolicyKind>,
    left: Option<PolicyKind>,
    right: Option<PolicyKind>,
    child_ancestors: [&str; 2],
) -> AppDef {
    let mut adb = AppDef::builder();

    let ws = adb.add_workspace(name("base"));
    ws.add_cdoc(name("doc"))
        .add_field("title", DataKind::String, false);
    ws.add_role(name("role"));
    select_rule(ws, base);

    for (side, policy) in [("left", left), ("right", right)] {
        let ws = adb.add_workspace(name(side));
        ws.set_ancestors([name("base")]);
        select_rule(ws, policy);
    }

    adb.add_workspace(name("child"))
        .set_ancestors(child_ancestors.map(name));

    adb.build().unwrap()
}

fn select_rule(ws: &mut WorkspaceBuilder, policy: Option<PolicyKind>) {
    let filter = Filter::qnames([name("doc")]);
    match policy {
        Some(PolicyKind::Allow) => {
            ws.grant([OperationKind::Select], filter, &[], name("role"), "grant select on doc");
        }
        Some(PolicyKind::Deny) => {
            ws.revoke([OperationKind::Select], filter, &[], name("role"), "revoke select on doc");
        }
        None => {}
    }
}

pub fn fields(names: &[&str]) -> Option<Vec<String>> {
    Some(names.iter().map(|n| (*n).to_string()).collect())
}
