//! ACL evaluation benchmarks over a synthetic workspace chain.
//!
//! The application is a chain of workspaces, each inheriting the previous one and
//! declaring its own documents, a role that inherits the previous workspace's role,
//! a grant on its documents and a field-level revoke. Requests made in the last
//! workspace walk every rule of the chain.
//!
//! # Benchmarks
//!
//! - `is_operation_allowed`: one field-level check in the deepest workspace
//! - `is_operation_allowed_cached`: the same check through a memoizing `AccessControl`
//! - `published_types_first`: first operation of the first published type
//! - `published_types_all`: full enumeration for the deepest role
//!
//! # Running
//!
//! ```bash
//! cargo bench --bench acl_benchmark
//! ```

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use wsacl_core::{
    AccessControl, AclOptions, AppDef, DataKind, Filter, OperationKind, QName,
    is_operation_allowed, published_types,
};

const DEPTH: usize = 8;
const DOCS_PER_WS: usize = 16;

fn name(entity: impl Into<String>) -> QName {
    QName::new("bench", entity)
}

fn setup_app() -> AppDef {
    let mut adb = AppDef::builder();

    for level in 0..DEPTH {
        let ws_name = name(format!("ws{level}"));
        let role = name(format!("role{level}"));
        let ws = adb.add_workspace(ws_name.clone());
        if level > 0 {
            ws.set_ancestors([name(format!("ws{}", level - 1))]);
        }

        for doc in 0..DOCS_PER_WS {
            ws.add_cdoc(name(format!("doc{level}_{doc}")))
                .add_field("title", DataKind::String, true)
                .add_field("amount", DataKind::Int64, false)
                .add_field("secret", DataKind::Bytes, false);
        }

        ws.add_role(role.clone());
        if level > 0 {
            ws.grant_all(
                Filter::qnames([name(format!("role{}", level - 1))]),
                role.clone(),
                "inherit previous level",
            );
        }
        ws.grant(
            [OperationKind::Select, OperationKind::Insert, OperationKind::Update],
            Filter::all_ws_tables(ws_name.clone()),
            &[],
            role.clone(),
            "grant data access on own tables",
        );
        ws.revoke(
            [OperationKind::Select],
            Filter::all_ws_tables(ws_name),
            &["secret"],
            role,
            "hide secrets",
        );
    }

    adb.build().unwrap()
}

fn bench_is_operation_allowed(c: &mut Criterion) {
    let app = setup_app();
    let ws = app.workspace(&name(format!("ws{}", DEPTH - 1))).unwrap();
    let res = name("doc0_0");
    let roles = [name(format!("role{}", DEPTH - 1))];

    c.bench_function("is_operation_allowed", |b| {
        b.iter(|| {
            let decision = is_operation_allowed(
                black_box(ws),
                OperationKind::Select,
                black_box(&res),
                &["title", "amount"],
                &roles,
            )
            .unwrap();
            black_box(decision)
        });
    });
}

fn bench_is_operation_allowed_cached(c: &mut Criterion) {
    let options = AclOptions::builder()
        .decision_cache_capacity(1024)
        .log_denials(false)
        .build();
    let acl = AccessControl::with_options(Arc::new(setup_app()), options);
    let ws = name(format!("ws{}", DEPTH - 1));
    let res = name("doc0_0");
    let roles = [name(format!("role{}", DEPTH - 1))];

    c.bench_function("is_operation_allowed_cached", |b| {
        b.iter(|| {
            let decision = acl
                .is_operation_allowed(
                    black_box(&ws),
                    OperationKind::Select,
                    black_box(&res),
                    &["title", "amount"],
                    &roles,
                )
                .unwrap();
            black_box(decision)
        });
    });
}

fn bench_published_types(c: &mut Criterion) {
    let app = setup_app();
    let ws = app.workspace(&name(format!("ws{}", DEPTH - 1))).unwrap();
    let role = name(format!("role{}", DEPTH - 1));

    c.bench_function("published_types_first", |b| {
        b.iter(|| {
            let first = published_types(black_box(ws), &role)
                .next()
                .and_then(|(_, mut ops)| ops.next());
            black_box(first)
        });
    });

    c.bench_function("published_types_all", |b| {
        b.iter(|| {
            let count: usize = published_types(black_box(ws), &role)
                .map(|(_, ops)| ops.count())
                .sum();
            black_box(count)
        });
    });
}

criterion_group!(
    benches,
    bench_is_operation_allowed,
    bench_is_operation_allowed_cached,
    bench_published_types
);
criterion_main!(benches);
