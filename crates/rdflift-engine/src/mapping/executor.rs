//! Run a mapping configuration against database rows
//!
//! Only table-based logical tables are read; SQL query logical tables are
//! reported and skipped. A row whose terms cannot be built is skipped with a
//! warning. A template naming a column the rows do not have aborts its
//! triples map, and the triples map contributes nothing.

use super::model::{
    LogicalTable, MappingConfigError, MappingConfiguration, ObjectMap, SubjectTerm, TriplesMap,
};
use super::template::TemplateError;
use oxrdf::vocab::rdf;
use oxrdf::{Literal, NamedNode, Term};
use rdflift_core::{
    Diagnostic, DiagnosticCode, Location, Row, RowSource, SchemaSnapshot, TripleSet, XsdType,
    DEFAULT_ROW_LIMIT,
};
use std::collections::HashMap;
use std::rc::Rc;

/// Output of [`MappingExecutor::execute`]
#[derive(Debug, Clone, Default)]
pub struct Execution {
    pub triples: TripleSet,
    pub diagnostics: Vec<Diagnostic>,
    pub rows_read: usize,
}

enum Abort {
    Scan(String),
    Placeholder(String),
}

#[derive(Debug, thiserror::Error)]
enum TermError {
    #[error("placeholder {{{0}}} has no matching column")]
    Unresolved(String),

    #[error("{0}")]
    Invalid(String),
}

impl From<TemplateError> for TermError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::UnresolvedColumn(column) => Self::Unresolved(column),
            other => Self::Invalid(other.to_string()),
        }
    }
}

/// Executes mapping configurations
#[derive(Debug, Clone)]
pub struct MappingExecutor {
    row_limit: usize,
}

impl Default for MappingExecutor {
    fn default() -> Self {
        Self {
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }
}

impl MappingExecutor {
    pub fn new(row_limit: usize) -> Self {
        Self {
            row_limit: if row_limit == 0 {
                DEFAULT_ROW_LIMIT
            } else {
                row_limit
            },
        }
    }

    /// Produce the data triples described by `config`
    ///
    /// Column object maps without a datatype take it from the column's SQL
    /// type when `schema` describes the table.
    pub fn execute<R: RowSource + ?Sized>(
        &self,
        config: &MappingConfiguration,
        schema: Option<&SchemaSnapshot>,
        source: &R,
    ) -> Result<Execution, MappingConfigError> {
        config.check_parents(&[])?;

        let mut run = ExecutionRun {
            executor: self,
            config,
            schema,
            source,
            rows: HashMap::new(),
            joins: HashMap::new(),
            output: Execution::default(),
        };

        for tm in &config.triples_maps {
            run.triples_map(tm);
        }

        tracing::info!(
            maps = config.triples_maps.len(),
            rows = run.output.rows_read,
            triples = run.output.triples.len(),
            "mapping executed"
        );
        Ok(run.output)
    }
}

struct ExecutionRun<'a, R: ?Sized> {
    executor: &'a MappingExecutor,
    config: &'a MappingConfiguration,
    schema: Option<&'a SchemaSnapshot>,
    source: &'a R,

    /// Rows per table, read once
    rows: HashMap<String, Result<Rc<Vec<Row>>, String>>,

    /// Parent subjects keyed by join column value, per (parent map, parent column)
    joins: HashMap<(String, String), Rc<HashMap<String, Vec<Term>>>>,

    output: Execution,
}

impl<R: RowSource + ?Sized> ExecutionRun<'_, R> {
    fn rows(&mut self, table: &str) -> Result<Rc<Vec<Row>>, String> {
        if let Some(cached) = self.rows.get(table) {
            return cached.clone();
        }
        let result = self
            .source
            .scan(table, self.executor.row_limit)
            .map(Rc::new)
            .map_err(|e| e.to_string());
        if let Ok(rows) = &result {
            self.output.rows_read += rows.len();
        }
        self.rows.insert(table.to_string(), result.clone());
        result
    }

    fn warn(&mut self, code: DiagnosticCode, tm: &TriplesMap, index: Option<usize>, message: String) {
        let mut location = Location::triples_map(&tm.id);
        if let Some(index) = index {
            location = location.with_index(index);
        }
        self.output
            .diagnostics
            .push(Diagnostic::warn(code, message).with_location(location));
    }

    fn triples_map(&mut self, tm: &TriplesMap) {
        let table = match &tm.logical_table {
            LogicalTable::Table(table) => table.clone(),
            LogicalTable::Query(_) => {
                self.warn(
                    DiagnosticCode::R2rmlQueryUnsupported,
                    tm,
                    None,
                    format!("TriplesMap '{}': sqlQuery logical tables are not executed", tm.id),
                );
                return;
            }
        };

        match self.map_rows(tm, &table) {
            Ok(triples) => self.output.triples.extend(triples),
            Err(Abort::Scan(message)) => self.warn(
                DiagnosticCode::R2rmlScanFailed,
                tm,
                None,
                format!("TriplesMap '{}': {}", tm.id, message),
            ),
            Err(Abort::Placeholder(column)) => self.warn(
                DiagnosticCode::R2rmlUnresolvedPlaceholder,
                tm,
                None,
                format!(
                    "TriplesMap '{}': placeholder {{{}}} names no column of '{}', map skipped",
                    tm.id, column, table
                ),
            ),
        }
    }

    fn map_rows(&mut self, tm: &TriplesMap, table: &str) -> Result<TripleSet, Abort> {
        let rows = self.rows(table).map_err(Abort::Scan)?;
        let mut triples = TripleSet::new();

        for (index, row) in rows.iter().enumerate() {
            match self.map_row(tm, table, row) {
                Ok(row_triples) => triples.extend(row_triples),
                Err(TermError::Unresolved(column)) => return Err(Abort::Placeholder(column)),
                Err(TermError::Invalid(message)) => self.warn(
                    DiagnosticCode::R2rmlInvalidTerm,
                    tm,
                    Some(index),
                    format!("TriplesMap '{}' row {} skipped: {}", tm.id, index, message),
                ),
            }
        }
        Ok(triples)
    }

    fn map_row(&mut self, tm: &TriplesMap, table: &str, row: &Row) -> Result<TripleSet, TermError> {
        let mut triples = TripleSet::new();
        let Some(subject_node) = subject(tm, row)? else {
            return Ok(triples);
        };

        for class in &tm.subject_map.classes {
            triples.add(subject_node.clone(), rdf::TYPE, class.clone());
        }

        for pom in &tm.predicate_object_maps {
            let objects: Vec<Term> = match &pom.object_map {
                ObjectMap::Column {
                    column,
                    datatype,
                    language,
                } => {
                    let Some(value) = lookup(row, column)? else {
                        continue;
                    };
                    let literal = match (datatype, language) {
                        (_, Some(language)) => Literal::new_language_tagged_literal(value, language)
                            .map_err(|e| TermError::Invalid(e.to_string()))?,
                        (Some(datatype), None) => Literal::new_typed_literal(value, datatype.clone()),
                        (None, None) => match self.column_type(table, column) {
                            Some(xsd) => Literal::new_typed_literal(value, xsd.iri()),
                            None => Literal::new_simple_literal(value),
                        },
                    };
                    vec![literal.into()]
                }
                ObjectMap::Template(template) => match template.expand(row)? {
                    Some(iri) => vec![named_node(iri)?.into()],
                    None => continue,
                },
                ObjectMap::Constant(value) => vec![Literal::new_simple_literal(value).into()],
                ObjectMap::Reference { parent, join } => {
                    let Some(parent_map) = self.config.find(parent) else {
                        continue;
                    };
                    match join {
                        None => subject(parent_map, row)?.into_iter().map(Term::from).collect(),
                        Some(join) => self.joined_subjects(parent_map, &join.child, &join.parent, row)?,
                    }
                }
            };

            for object in objects {
                triples.add(subject_node.clone(), pom.predicate.clone(), object);
            }
        }

        Ok(triples)
    }

    /// Subjects of parent rows whose `parent_column` equals the child row's `child_column`
    fn joined_subjects(
        &mut self,
        parent: &TriplesMap,
        child_column: &str,
        parent_column: &str,
        row: &Row,
    ) -> Result<Vec<Term>, TermError> {
        let Some(key) = lookup(row, child_column)? else {
            return Ok(Vec::new());
        };
        let index = self.join_index(parent, parent_column)?;
        Ok(index.get(&key).cloned().unwrap_or_default())
    }

    /// Parent subjects grouped by their `parent_column` value, built once per join
    fn join_index(
        &mut self,
        parent: &TriplesMap,
        parent_column: &str,
    ) -> Result<Rc<HashMap<String, Vec<Term>>>, TermError> {
        let key = (parent.id.clone(), parent_column.to_string());
        if let Some(index) = self.joins.get(&key) {
            return Ok(Rc::clone(index));
        }
        let Some(parent_table) = parent.logical_table.table_name() else {
            return Ok(Rc::default());
        };
        let parent_rows = self
            .rows(parent_table)
            .map_err(|e| TermError::Invalid(format!("parent rows unavailable: {}", e)))?;

        let mut index: HashMap<String, Vec<Term>> = HashMap::new();
        for parent_row in parent_rows.iter() {
            let Some(value) = parent_row.lexical(parent_column) else {
                continue;
            };
            if let Some(s) = subject(parent, parent_row)? {
                index.entry(value).or_default().push(s.into());
            }
        }

        let index = Rc::new(index);
        self.joins.insert(key, Rc::clone(&index));
        Ok(index)
    }

    fn column_type(&self, table: &str, column: &str) -> Option<XsdType> {
        self.schema?
            .find_table(table)?
            .find_column(column)
            .map(|c| XsdType::from_sql_type(&c.sql_type))
    }
}

/// Value of a column; an absent column is an unresolved reference
fn lookup(row: &Row, column: &str) -> Result<Option<String>, TermError> {
    match row.get(column) {
        Some(value) => Ok(value.lexical()),
        None => Err(TermError::Unresolved(column.to_string())),
    }
}

fn named_node(iri: String) -> Result<NamedNode, TermError> {
    NamedNode::new(iri.as_str()).map_err(|e| TermError::Invalid(format!("'{}' is not an IRI: {}", iri, e)))
}

fn subject(tm: &TriplesMap, row: &Row) -> Result<Option<NamedNode>, TermError> {
    let iri = match &tm.subject_map.term {
        SubjectTerm::Template(template) => template.expand(row)?,
        SubjectTerm::Column(column) => lookup(row, column)?,
    };
    iri.map(named_node).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::vocab::xsd;
    use oxrdf::Triple;
    use rdflift_core::{Column, DatabaseSnapshot, Table};

    const CONFIG: &str = r#"{ "triplesMaps": [
      { "id": "TriplesMap_users",
        "logicalTable": { "tableName": "users" },
        "subjectMap": { "template": "http://ex.org/users/{id}", "classes": ["http://ex.org/User"] },
        "predicateObjectMaps": [
          { "predicate": "http://ex.org/email", "objectMap": { "column": "email" } },
          { "predicate": "http://ex.org/bio", "objectMap": { "column": "bio", "language": "en" } },
          { "predicate": "http://ex.org/kind", "objectMap": { "constant": "person" } },
          { "predicate": "http://ex.org/dept", "objectMap": {
              "parentTriplesMap": "TriplesMap_departments",
              "joinCondition": { "child": "dept_id", "parent": "id" } } }
        ] },
      { "id": "TriplesMap_departments",
        "logicalTable": { "tableName": "departments" },
        "subjectMap": { "template": "http://ex.org/departments/{id}" },
        "predicateObjectMaps": [
          { "predicate": "http://ex.org/name", "objectMap": { "column": "name" } }
        ] }
    ] }"#;

    fn database() -> DatabaseSnapshot {
        let schema = SchemaSnapshot::from_tables(vec![
            Table::new(
                "users",
                vec![
                    Column::new("id", "integer"),
                    Column::new("email", "text"),
                    Column::new("bio", "text"),
                    Column::new("dept_id", "integer"),
                ],
            ),
            Table::new("departments", vec![Column::new("id", "integer"), Column::new("name", "text")]),
        ]);
        DatabaseSnapshot::new(schema)
            .with_rows(
                "users",
                vec![Row::new()
                    .with("id", 1i64)
                    .with("email", "a@x.io")
                    .with("bio", "Hello")
                    .with("dept_id", 7i64)],
            )
            .with_rows("departments", vec![Row::new().with("id", 7i64).with("name", "R&D")])
    }

    fn node(iri: &str) -> NamedNode {
        NamedNode::new_unchecked(iri)
    }

    #[test]
    fn executes_columns_constants_and_joins() {
        let config = MappingConfiguration::from_json(CONFIG).unwrap();
        let db = database();
        let result = MappingExecutor::default()
            .execute(&config, Some(&db.schema), &db)
            .unwrap();

        let user = node("http://ex.org/users/1");
        let triples = &result.triples;
        assert!(triples.contains(&Triple::new(user.clone(), rdf::TYPE, node("http://ex.org/User"))));
        assert!(triples.contains(&Triple::new(
            user.clone(),
            node("http://ex.org/email"),
            Literal::new_typed_literal("a@x.io", xsd::STRING),
        )));
        assert!(triples.contains(&Triple::new(
            user.clone(),
            node("http://ex.org/bio"),
            Literal::new_language_tagged_literal_unchecked("Hello", "en"),
        )));
        assert!(triples.contains(&Triple::new(
            user.clone(),
            node("http://ex.org/kind"),
            Literal::new_simple_literal("person"),
        )));
        assert!(triples.contains(&Triple::new(
            user,
            node("http://ex.org/dept"),
            node("http://ex.org/departments/7"),
        )));
        assert_eq!(result.rows_read, 2);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn reference_without_join_uses_the_same_row() {
        let config = MappingConfiguration::from_json(
            r#"{ "triplesMaps": [
              { "id": "TriplesMap_people",
                "logicalTable": { "tableName": "users" },
                "subjectMap": { "template": "http://ex.org/people/{id}" },
                "predicateObjectMaps": [
                  { "predicate": "http://ex.org/account", "objectMap": { "parentTriplesMap": "TriplesMap_accounts" } }
                ] },
              { "id": "TriplesMap_accounts",
                "logicalTable": { "tableName": "users" },
                "subjectMap": { "template": "http://ex.org/accounts/{email}" },
                "predicateObjectMaps": [
                  { "predicate": "http://ex.org/kind", "objectMap": { "constant": "account" } }
                ] }
            ] }"#,
        )
        .unwrap();
        let db = database();
        let result = MappingExecutor::default().execute(&config, None, &db).unwrap();

        assert!(result.diagnostics.is_empty());
        assert!(result.triples.contains(&Triple::new(
            node("http://ex.org/people/1"),
            node("http://ex.org/account"),
            node("http://ex.org/accounts/a%40x.io"),
        )));
        // the users table is scanned once for both maps
        assert_eq!(result.rows_read, 1);
    }

    #[test]
    fn join_matches_every_child_row() {
        let config = MappingConfiguration::from_json(CONFIG).unwrap();
        let users = (1..=4)
            .map(|id| {
                Row::new()
                    .with("id", id as i64)
                    .with("email", format!("u{}@x.io", id))
                    .with("bio", "Hi")
                    .with("dept_id", if id % 2 == 0 { 7i64 } else { 8i64 })
            })
            .collect();
        let db = DatabaseSnapshot::new(database().schema)
            .with_rows("users", users)
            .with_rows(
                "departments",
                vec![
                    Row::new().with("id", 7i64).with("name", "R&D"),
                    Row::new().with("id", 8i64).with("name", "Ops"),
                ],
            );

        let result = MappingExecutor::default().execute(&config, None, &db).unwrap();
        let dept = node("http://ex.org/dept");
        for (user, department) in [(1, 8), (2, 7), (3, 8), (4, 7)] {
            assert!(result.triples.contains(&Triple::new(
                node(&format!("http://ex.org/users/{}", user)),
                dept.clone(),
                node(&format!("http://ex.org/departments/{}", department)),
            )));
        }
        assert_eq!(result.rows_read, 6);
    }

    #[test]
    fn query_logical_tables_are_skipped() {
        let config = MappingConfiguration::from_json(
            r#"{ "triplesMaps": [{ "id": "q", "logicalTable": { "sqlQuery": "SELECT 1" },
                "subjectMap": { "template": "http://ex.org/{id}" },
                "predicateObjectMaps": [ { "predicate": "http://ex.org/p", "objectMap": { "constant": "c" } } ] }] }"#,
        )
        .unwrap();
        let result = MappingExecutor::default().execute(&config, None, &database()).unwrap();
        assert!(result.triples.is_empty());
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::R2rmlQueryUnsupported);
    }

    #[test]
    fn unresolved_placeholder_aborts_the_map() {
        let config = MappingConfiguration::from_json(
            r#"{ "triplesMaps": [{ "id": "m", "logicalTable": { "tableName": "users" },
                "subjectMap": { "template": "http://ex.org/users/{missing}" },
                "predicateObjectMaps": [ { "predicate": "http://ex.org/p", "objectMap": { "constant": "c" } } ] }] }"#,
        )
        .unwrap();
        let result = MappingExecutor::default().execute(&config, None, &database()).unwrap();
        assert!(result.triples.is_empty());
        assert_eq!(
            result.diagnostics[0].code,
            DiagnosticCode::R2rmlUnresolvedPlaceholder
        );
    }

    #[test]
    fn scan_failure_is_reported() {
        let config = MappingConfiguration::from_json(CONFIG).unwrap();
        let db = database().with_failure("users", "timeout");
        let result = MappingExecutor::default().execute(&config, None, &db).unwrap();
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::R2rmlScanFailed);
        assert!(result.triples.contains(&Triple::new(
            node("http://ex.org/departments/7"),
            node("http://ex.org/name"),
            Literal::new_simple_literal("R&D"),
        )));
    }
}
