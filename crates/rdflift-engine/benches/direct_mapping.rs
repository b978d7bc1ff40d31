//! Benchmarks for direct mapping and quality validation
//!
//! These benchmarks measure how mapping and validation scale with the number
//! of rows in a synthetic two-table schema.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rdflift_core::{
    syntax, Column, DatabaseSnapshot, ForeignKey, PrefixMap, RdfFormat, Row, SchemaSnapshot,
    Table,
};
use rdflift_engine::{DirectMapper, QualityValidator};

const BASE: &str = "http://example.org/";

/// Generate a users/departments snapshot with N users
fn generate_snapshot(num_users: usize) -> DatabaseSnapshot {
    let departments = Table::new(
        "departments",
        vec![Column::new("id", "integer"), Column::new("name", "varchar(100)")],
    )
    .with_primary_key("id");

    let users = Table::new(
        "users",
        vec![
            Column::new("id", "integer"),
            Column::new("email", "varchar(255)"),
            Column::new("salary", "numeric(10,2)"),
            Column::new("active", "boolean"),
            Column::new("department_id", "integer"),
        ],
    )
    .with_primary_key("id")
    .with_foreign_key(ForeignKey::new("department_id", "departments", "id"));

    let department_rows = (0..10)
        .map(|i| Row::new().with("id", i as i64).with("name", format!("Dept {}", i)))
        .collect();

    let user_rows = (0..num_users)
        .map(|i| {
            Row::new()
                .with("id", i as i64)
                .with("email", format!("user{}@example.org", i))
                .with("salary", 1000.0 + i as f64)
                .with("active", i % 2 == 0)
                .with("department_id", (i % 10) as i64)
        })
        .collect();

    DatabaseSnapshot::new(SchemaSnapshot::from_tables(vec![departments, users]))
        .with_rows("departments", department_rows)
        .with_rows("users", user_rows)
}

/// Benchmark: Direct mapping (100, 1000, 10000 rows)
fn bench_direct_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("direct_mapping");

    for num_users in [100, 1_000, 10_000].iter() {
        let snapshot = generate_snapshot(*num_users);
        let mapper = DirectMapper::new(BASE).with_row_limit(*num_users);

        group.bench_with_input(BenchmarkId::from_parameter(num_users), num_users, |b, _| {
            b.iter(|| black_box(mapper.map(&snapshot.schema, &snapshot)));
        });
    }

    group.finish();
}

/// Benchmark: Turtle serialization of a mapped graph
fn bench_serialization(c: &mut Criterion) {
    let snapshot = generate_snapshot(1_000);
    let graph = DirectMapper::new(BASE).map(&snapshot.schema, &snapshot).triples;
    let prefixes = PrefixMap::default();

    c.bench_function("serialize_turtle_1000", |b| {
        b.iter(|| black_box(syntax::serialize(&graph, RdfFormat::Turtle, &prefixes)))
    });
}

/// Benchmark: Full validation of serialized output
fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    let validator = QualityValidator::new();

    for num_users in [100, 1_000].iter() {
        let snapshot = generate_snapshot(*num_users);
        let graph = DirectMapper::new(BASE).map(&snapshot.schema, &snapshot).triples;
        let turtle = syntax::serialize(&graph, RdfFormat::Turtle, &PrefixMap::default())
            .expect("serializable graph");

        group.bench_with_input(BenchmarkId::from_parameter(num_users), num_users, |b, _| {
            b.iter(|| {
                black_box(validator.validate(&turtle, RdfFormat::Turtle, None, Some(&snapshot.schema)))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_direct_mapping, bench_serialization, bench_validation);
criterion_main!(benches);
