//! Integration tests for mapping, rendering and validating RDF

use oxrdf::vocab::{rdf, xsd};
use oxrdf::{Literal, NamedNode, Triple};
use pretty_assertions::assert_eq;
use rdflift_core::{
    syntax, Column, Config, DatabaseSnapshot, DiagnosticCode, ForeignKey, PrefixMap, RdfFormat,
    Row, SchemaSnapshot, SqlValue, Table,
};
use rdflift_engine::{
    DirectMapper, MappingConfiguration, MappingDocument, MappingExecutor, MappingGenerator,
    QualityValidator, TemplateGenerator,
};

fn shop() -> DatabaseSnapshot {
    let departments = Table::new(
        "departments",
        vec![Column::new("id", "integer"), Column::new("name", "varchar(100)")],
    )
    .with_primary_key("id")
    .with_row_count(1);

    let users = Table::new(
        "users",
        vec![
            Column::new("id", "integer"),
            Column::new("email", "varchar(255)"),
            Column::new("department_id", "integer"),
            Column::new("created_at", "timestamp without time zone"),
        ],
    )
    .with_primary_key("id")
    .with_foreign_key(ForeignKey::new("department_id", "departments", "id"))
    .with_row_count(2);

    DatabaseSnapshot::new(SchemaSnapshot::from_tables(vec![departments, users]))
        .with_rows(
            "departments",
            vec![Row::new().with("id", 7i64).with("name", "Research")],
        )
        .with_rows(
            "users",
            vec![
                Row::new()
                    .with("id", 1i64)
                    .with("email", "a@x.io")
                    .with("department_id", 7i64)
                    .with("created_at", "2024-01-02T03:04:05"),
                Row::new()
                    .with("id", 2i64)
                    .with("email", SqlValue::Null)
                    .with("department_id", 7i64)
                    .with("created_at", SqlValue::Null),
            ],
        )
}

fn node(iri: &str) -> NamedNode {
    NamedNode::new_unchecked(iri)
}

#[test]
fn direct_mapping_then_validation() {
    let db = shop();
    let config = Config::default();
    let mapping = DirectMapper::from_config(&config).map(&db.schema, &db);

    assert!(mapping.diagnostics.is_empty());
    assert_eq!(mapping.stats.rows_mapped, 3);
    assert!(mapping.triples.contains(&Triple::new(
        node("http://example.org/users/1"),
        node("http://example.org/users#department_id"),
        node("http://example.org/departments/7"),
    )));
    assert!(mapping.triples.contains(&Triple::new(
        node("http://example.org/users/1"),
        node("http://example.org/users#created_at"),
        Literal::new_typed_literal("2024-01-02T03:04:05", xsd::DATE_TIME),
    )));

    let turtle = syntax::serialize(&mapping.triples, RdfFormat::Turtle, &PrefixMap::default()).unwrap();
    let report = QualityValidator::from_config(&config).validate(
        &turtle,
        RdfFormat::Turtle,
        None,
        Some(&db.schema),
    );

    assert!(report.valid, "{:?}", report.errors);
    assert!(report.has_code(DiagnosticCode::ReferentialIntegrity));
    assert!(report.has_code(DiagnosticCode::Completeness));
    assert_eq!(report.metrics.total_triples, mapping.triples.len());
    assert_eq!(report.metrics.expected_resources, Some(3));
    assert!(report.score >= 90);
}

#[test]
fn serialized_output_parses_back_to_the_same_count() {
    let db = shop();
    let graph = DirectMapper::new("http://example.org/").map(&db.schema, &db).triples;

    for format in [RdfFormat::Turtle, RdfFormat::NTriples, RdfFormat::NQuads, RdfFormat::RdfXml] {
        let text = syntax::serialize(&graph, format, &PrefixMap::default()).unwrap();
        let parsed = syntax::parse(&text, format).unwrap();
        assert_eq!(parsed.len(), graph.len(), "{}", format.name());
    }
}

#[test]
fn template_generator_feeds_the_mapping_generator() {
    let db = shop();
    let templates = TemplateGenerator::new("http://example.org/").unwrap();
    let maps = db
        .schema
        .tables
        .iter()
        .map(|t| templates.for_table(t))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let config = MappingConfiguration::new(maps);

    let document = config.to_document();
    assert!(document.validate().valid);

    let generator = MappingGenerator::from_config(&Config::default()).unwrap();
    let first = generator.render(&config, RdfFormat::Turtle).unwrap();
    let second = generator.render(&config, RdfFormat::Turtle).unwrap();
    assert_eq!(first, second);

    let report = QualityValidator::new().validate_quick(&first, RdfFormat::Turtle);
    assert!(report.valid);
}

#[test]
fn generated_mapping_is_valid_rdf() {
    let json = r#"{ "triplesMaps": [{
        "id": "TriplesMap_users",
        "logicalTable": { "tableName": "users" },
        "subjectMap": { "template": "http://example.org/users/{id}", "classes": ["http://example.org/Users"] },
        "predicateObjectMaps": [
          { "predicate": "http://example.org/email", "objectMap": { "column": "email" } }
        ] }] }"#;

    let generator = MappingGenerator::from_config(&Config::default()).unwrap();
    let triples = generator
        .generate_document(&MappingDocument::from_json(json).unwrap())
        .unwrap();
    let report = QualityValidator::new().validate_graph(&triples, None, None);

    assert!(report.valid);
    // sub-map nodes carry no rdf:type
    assert!(report.has_code(DiagnosticCode::MissingType));
    assert!(triples.contains(&Triple::new(
        node("http://example.org/mapping/TriplesMap_users"),
        rdf::TYPE,
        node("http://www.w3.org/ns/r2rml#TriplesMap"),
    )));
}

#[test]
fn missing_predicate_object_maps_reported_once() {
    let json = r#"{ "triplesMaps": [{
        "id": "TriplesMap_orders",
        "logicalTable": { "tableName": "orders" },
        "subjectMap": { "template": "http://example.org/orders/{id}" }
    }] }"#;

    let generator = MappingGenerator::from_config(&Config::default()).unwrap();
    let validation = generator.validate(&MappingDocument::from_json(json).unwrap());
    assert!(!validation.valid);
    assert_eq!(validation.errors.len(), 1);
    assert!(validation.errors[0].contains("TriplesMap_orders"));
}

#[test]
fn executed_mapping_validates_with_schema_types() {
    let db = shop();
    let json = r#"{ "triplesMaps": [
      { "id": "TriplesMap_users",
        "logicalTable": { "tableName": "users" },
        "subjectMap": { "template": "http://example.org/users/{id}", "classes": ["http://example.org/Users"] },
        "predicateObjectMaps": [
          { "predicate": "http://example.org/users#id", "objectMap": { "column": "id" } },
          { "predicate": "http://example.org/users#department", "objectMap": {
              "parentTriplesMap": "TriplesMap_departments",
              "joinCondition": { "child": "department_id", "parent": "id" } } }
        ] },
      { "id": "TriplesMap_departments",
        "logicalTable": { "tableName": "departments" },
        "subjectMap": { "template": "http://example.org/departments/{id}", "classes": ["http://example.org/Departments"] },
        "predicateObjectMaps": [
          { "predicate": "http://example.org/departments#name", "objectMap": { "column": "name" } }
        ] }
    ] }"#;
    let config = MappingConfiguration::from_json(json).unwrap();

    let execution = MappingExecutor::default()
        .execute(&config, Some(&db.schema), &db)
        .unwrap();
    assert!(execution.diagnostics.is_empty());
    assert!(execution.triples.contains(&Triple::new(
        node("http://example.org/users/2"),
        node("http://example.org/users#id"),
        Literal::new_typed_literal("2", xsd::INTEGER),
    )));

    let report = QualityValidator::new().validate_graph(&execution.triples, Some(&config), Some(&db.schema));
    assert!(report.valid, "{:?}", report.errors);
    // the two class IRIs are never described
    assert_eq!(report.metrics.broken_references, 2);
    assert_eq!(report.metrics.expected_resources, Some(3));
    assert_eq!(report.metrics.completeness, Some(100.0));
}
