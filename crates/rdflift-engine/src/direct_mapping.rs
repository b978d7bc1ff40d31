//! Direct mapping of relational tables to RDF
//!
//! Every table becomes an `rdfs:Class`. Every row of a table with a single
//! column primary key becomes an instance of that class, with one triple per
//! non-null column. Foreign key columns point at the referenced row instead
//! of carrying a literal.
//!
//! Failures are local: a table that cannot be scanned or a row that cannot be
//! turned into IRIs is reported as a warning and skipped.

use crate::iri::{class_iri, instance_iri, property_iri};
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{IriParseError, Literal, NamedNode};
use rdflift_core::namespace::capitalize;
use rdflift_core::{
    Config, Diagnostic, DiagnosticCode, DirectMappingConfig, Location, PrimaryKey, Row,
    RowSource, RowSourceError, SchemaSnapshot, Severity, Table, TripleSet, XsdType,
    DEFAULT_ROW_LIMIT,
};
use serde::Serialize;

/// Errors that drop one table or one row from the mapping
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowProcessingError {
    #[error("invalid IRI: {0}")]
    InvalidIri(String),

    #[error(transparent)]
    Scan(#[from] RowSourceError),
}

impl From<IriParseError> for RowProcessingError {
    fn from(err: IriParseError) -> Self {
        Self::InvalidIri(err.to_string())
    }
}

/// Counters for one mapping run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMappingStats {
    /// Tables in the schema
    pub tables: usize,

    /// Tables whose rows were mapped
    pub tables_mapped: usize,

    pub rows_mapped: usize,
    pub rows_skipped: usize,

    /// Tables with more rows than the row limit
    pub truncated_tables: Vec<String>,
}

/// Output of [`DirectMapper::map`]
#[derive(Debug, Clone)]
pub struct DirectMapping {
    pub triples: TripleSet,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: DirectMappingStats,
}

impl DirectMapping {
    /// Check if any table or row was skipped with a warning
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Warn)
    }
}

/// Size estimate of one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStatistics {
    pub table: String,

    /// Row count, when known
    pub rows: Option<u64>,

    pub columns: usize,

    /// `rows * columns`
    pub estimated_triples: Option<u64>,
}

/// Size estimate of a whole schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaStatistics {
    pub total_tables: usize,

    /// Sum of the known row counts
    pub total_rows: u64,

    pub tables: Vec<TableStatistics>,
}

/// Turns a schema and its rows into RDF
#[derive(Debug, Clone)]
pub struct DirectMapper {
    base: String,
    settings: DirectMappingConfig,
}

impl DirectMapper {
    /// Mapper with the default row limit and no skipped tables
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            settings: DirectMappingConfig::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            base: config.base_namespace.clone(),
            settings: config.direct_mapping.clone(),
        }
    }

    /// Maximum rows mapped per table (zero falls back to the default)
    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.settings.row_limit = if row_limit == 0 {
            DEFAULT_ROW_LIMIT
        } else {
            row_limit
        };
        self
    }

    /// Leave tables matching `pattern` out of the output
    pub fn skip_table(mut self, pattern: impl Into<String>) -> Self {
        self.settings.skip_tables.push(pattern.into());
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn row_limit(&self) -> usize {
        self.settings.row_limit
    }

    /// Map every table of `schema`, reading rows from `rows`
    pub fn map<R: RowSource + ?Sized>(&self, schema: &SchemaSnapshot, rows: &R) -> DirectMapping {
        let mut run = Run {
            triples: TripleSet::new(),
            diagnostics: Vec::new(),
            stats: DirectMappingStats {
                tables: schema.tables.len(),
                ..DirectMappingStats::default()
            },
        };

        for table in &schema.tables {
            if self.settings.is_table_skipped(&table.name) {
                tracing::debug!(table = %table.name, "table skipped by configuration");
                run.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::DmTableSkipped,
                        Severity::Info,
                        format!("Table '{}' is excluded by configuration", table.name),
                    )
                    .with_location(Location::table(&table.name)),
                );
                continue;
            }

            if let Err(e) = self.map_table(table, rows, &mut run) {
                tracing::warn!(table = %table.name, "table skipped: {}", e);
                run.warn(
                    DiagnosticCode::DmRowProcessing,
                    Location::table(&table.name),
                    format!("Table '{}' skipped: {}", table.name, e),
                );
            }
        }

        tracing::info!(
            tables = run.stats.tables,
            rows = run.stats.rows_mapped,
            skipped = run.stats.rows_skipped,
            triples = run.triples.len(),
            "direct mapping finished"
        );

        DirectMapping {
            triples: run.triples,
            diagnostics: run.diagnostics,
            stats: run.stats,
        }
    }

    fn map_table<R: RowSource + ?Sized>(
        &self,
        table: &Table,
        source: &R,
        run: &mut Run,
    ) -> Result<(), RowProcessingError> {
        let class = class_iri(&self.base, &table.name)?;
        run.triples.add(class.clone(), rdf::TYPE, rdfs::CLASS);
        run.triples.add_literal(
            class.clone(),
            rdfs::LABEL,
            Literal::new_simple_literal(capitalize(&table.name)),
        );

        let key = match table.primary_key() {
            PrimaryKey::Single(column) => column,
            PrimaryKey::None => {
                run.warn(
                    DiagnosticCode::DmNoPrimaryKey,
                    Location::table(&table.name),
                    format!("Table '{}' has no primary key, rows not mapped", table.name),
                );
                return Ok(());
            }
            PrimaryKey::Composite(columns) => {
                run.warn(
                    DiagnosticCode::DmCompositeKey,
                    Location::table(&table.name),
                    format!(
                        "Table '{}' has a composite primary key ({}), rows not mapped",
                        table.name,
                        columns.join(", ")
                    ),
                );
                return Ok(());
            }
        };

        let limit = self.settings.row_limit;
        let mut rows = source.scan(&table.name, limit.saturating_add(1))?;
        let over_limit = rows.len() > limit || table.row_count.is_some_and(|n| n > limit as u64);
        if over_limit {
            tracing::debug!(table = %table.name, limit, "row limit reached");
            run.stats.truncated_tables.push(table.name.clone());
            rows.truncate(limit);
        }

        run.stats.tables_mapped += 1;
        for (index, row) in rows.iter().enumerate() {
            match self.map_row(table, key, &class, row) {
                Ok(Some(triples)) => {
                    run.triples.extend(triples);
                    run.stats.rows_mapped += 1;
                }
                Ok(None) => run.stats.rows_skipped += 1,
                Err(e) => {
                    run.stats.rows_skipped += 1;
                    run.warn(
                        DiagnosticCode::DmRowProcessing,
                        Location::table(&table.name).with_index(index),
                        format!("Row {} of '{}' skipped: {}", index, table.name, e),
                    );
                }
            }
        }

        Ok(())
    }

    /// Triples of one row; `None` when the key is null
    fn map_row(
        &self,
        table: &Table,
        key: &str,
        class: &NamedNode,
        row: &Row,
    ) -> Result<Option<TripleSet>, RowProcessingError> {
        let Some(key_value) = row.lexical(key) else {
            return Ok(None);
        };

        let mut triples = TripleSet::new();
        let subject = instance_iri(&self.base, &table.name, &key_value)?;
        triples.add(subject.clone(), rdf::TYPE, class.clone());

        for column in &table.columns {
            let Some(value) = row.lexical(&column.name) else {
                continue;
            };
            let property = property_iri(&self.base, &table.name, &column.name)?;

            match table.foreign_key_for(&column.name) {
                Some(fk) => {
                    let target = instance_iri(&self.base, &fk.target_table, &value)?;
                    triples.add(subject.clone(), property, target);
                }
                None => {
                    let datatype = XsdType::from_sql_type(&column.sql_type);
                    triples.add_literal(
                        subject.clone(),
                        property,
                        Literal::new_typed_literal(value, datatype.iri()),
                    );
                }
            }
        }

        Ok(Some(triples))
    }

    /// Per-table size estimates from the schema's row counts
    pub fn statistics(schema: &SchemaSnapshot) -> SchemaStatistics {
        let tables: Vec<TableStatistics> = schema
            .tables
            .iter()
            .map(|t| TableStatistics {
                table: t.name.clone(),
                rows: t.row_count,
                columns: t.columns.len(),
                estimated_triples: t
                    .row_count
                    .map(|rows| rows.saturating_mul(t.columns.len() as u64)),
            })
            .collect();

        SchemaStatistics {
            total_tables: tables.len(),
            total_rows: tables
                .iter()
                .filter_map(|t| t.rows)
                .fold(0, u64::saturating_add),
            tables,
        }
    }
}

struct Run {
    triples: TripleSet,
    diagnostics: Vec<Diagnostic>,
    stats: DirectMappingStats,
}

impl Run {
    fn warn(&mut self, code: DiagnosticCode, location: Location, message: String) {
        self.diagnostics
            .push(Diagnostic::warn(code, message).with_location(location));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::vocab::xsd;
    use oxrdf::Triple;
    use rdflift_core::{Column, DatabaseSnapshot, ForeignKey};

    const BASE: &str = "http://ex.org/";

    fn node(iri: &str) -> NamedNode {
        NamedNode::new_unchecked(iri)
    }

    fn users() -> Table {
        Table::new(
            "users",
            vec![
                Column::new("id", "integer"),
                Column::new("email", "varchar(255)"),
                Column::new("dept_id", "integer"),
            ],
        )
        .with_primary_key("id")
        .with_foreign_key(ForeignKey::new("dept_id", "departments", "id"))
    }

    fn snapshot(tables: Vec<Table>) -> DatabaseSnapshot {
        DatabaseSnapshot::new(SchemaSnapshot::from_tables(tables))
    }

    #[test]
    fn maps_row_with_foreign_key() {
        let db = snapshot(vec![users()]).with_rows(
            "users",
            vec![Row::new()
                .with("id", 1i64)
                .with("email", "a@x.io")
                .with("dept_id", 7i64)],
        );

        let result = DirectMapper::new(BASE).map(&db.schema, &db);
        let triples = &result.triples;
        let subject = node("http://ex.org/users/1");

        assert!(triples.contains(&Triple::new(subject.clone(), rdf::TYPE, node("http://ex.org/Users"))));
        assert!(triples.contains(&Triple::new(
            subject.clone(),
            node("http://ex.org/users#email"),
            Literal::new_typed_literal("a@x.io", xsd::STRING),
        )));
        assert!(triples.contains(&Triple::new(
            subject.clone(),
            node("http://ex.org/users#dept_id"),
            node("http://ex.org/departments/7"),
        )));
        assert!(triples.contains(&Triple::new(
            subject,
            node("http://ex.org/users#id"),
            Literal::new_typed_literal("1", xsd::INTEGER),
        )));
        assert_eq!(result.stats.rows_mapped, 1);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn class_triples_for_every_table() {
        let db = snapshot(vec![Table::new("logs", vec![Column::new("msg", "text")])]);
        let result = DirectMapper::new(BASE).map(&db.schema, &db);

        assert_eq!(result.triples.len(), 2);
        assert!(result.triples.contains(&Triple::new(
            node("http://ex.org/Logs"),
            rdfs::LABEL,
            Literal::new_simple_literal("Logs"),
        )));
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::DmNoPrimaryKey);
    }

    #[test]
    fn composite_key_rows_are_not_mapped() {
        let table = Table::new(
            "order_items",
            vec![Column::new("order_id", "integer"), Column::new("line", "integer")],
        )
        .with_primary_key("order_id")
        .with_primary_key("line");
        let db = snapshot(vec![table]).with_rows(
            "order_items",
            vec![Row::new().with("order_id", 1i64).with("line", 1i64)],
        );

        let result = DirectMapper::new(BASE).map(&db.schema, &db);
        assert_eq!(result.triples.len(), 2);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::DmCompositeKey);
        assert!(result.diagnostics[0].message.contains("order_id, line"));
    }

    #[test]
    fn null_values_and_null_keys() {
        let db = snapshot(vec![users()]).with_rows(
            "users",
            vec![
                Row::new().with("id", 2i64).with("email", rdflift_core::SqlValue::Null),
                Row::new().with("email", "orphan@x.io"),
            ],
        );

        let result = DirectMapper::new(BASE).map(&db.schema, &db);
        // 2 class triples + rdf:type + id
        assert_eq!(result.triples.len(), 4);
        assert_eq!(result.stats.rows_mapped, 1);
        assert_eq!(result.stats.rows_skipped, 1);
    }

    #[test]
    fn failing_scan_skips_only_that_table() {
        let db = snapshot(vec![users(), Table::new("tags", vec![Column::new("id", "int")]).with_primary_key("id")])
            .with_failure("users", "permission denied")
            .with_rows("tags", vec![Row::new().with("id", 3i64)]);

        let result = DirectMapper::new(BASE).map(&db.schema, &db);
        assert!(result.has_warnings());
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::DmRowProcessing);
        assert_eq!(result.stats.tables_mapped, 1);
        assert!(result
            .triples
            .contains(&Triple::new(node("http://ex.org/tags/3"), rdf::TYPE, node("http://ex.org/Tags"))));
    }

    #[test]
    fn row_limit_truncates() {
        let rows = (0..5).map(|i| Row::new().with("id", i as i64)).collect();
        let db = snapshot(vec![users()]).with_rows("users", rows);

        let result = DirectMapper::new(BASE).with_row_limit(3).map(&db.schema, &db);
        assert_eq!(result.stats.rows_mapped, 3);
        assert_eq!(result.stats.truncated_tables, vec!["users".to_string()]);
    }

    #[test]
    fn skipped_tables_produce_info() {
        let db = snapshot(vec![users(), Table::new("audit_log", vec![])]);
        let result = DirectMapper::new(BASE)
            .skip_table("audit_*")
            .map(&db.schema, &db);

        let skipped: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.code == DiagnosticCode::DmTableSkipped)
            .collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].severity, Severity::Info);
        assert!(!result.has_warnings());
    }

    #[test]
    fn invalid_base_reports_table() {
        let db = snapshot(vec![users()]);
        let result = DirectMapper::new("not an iri").map(&db.schema, &db);
        assert!(result.triples.is_empty());
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::DmRowProcessing);
    }

    #[test]
    fn statistics_estimate_triples() {
        let schema = SchemaSnapshot::from_tables(vec![
            users().with_row_count(10),
            Table::new("tags", vec![Column::new("id", "int")]),
        ]);

        let stats = DirectMapper::statistics(&schema);
        assert_eq!(stats.total_tables, 2);
        assert_eq!(stats.total_rows, 10);
        assert_eq!(stats.tables[0].estimated_triples, Some(30));
        assert_eq!(stats.tables[1].estimated_triples, None);
    }

    #[test]
    fn statistics_saturate_on_huge_counts() {
        let schema = SchemaSnapshot::from_tables(vec![
            users().with_row_count(u64::MAX),
            Table::new("tags", vec![Column::new("id", "int")]).with_row_count(5),
        ]);

        let stats = DirectMapper::statistics(&schema);
        assert_eq!(stats.tables[0].estimated_triples, Some(u64::MAX));
        assert_eq!(stats.total_rows, u64::MAX);
    }
}
