//! Row values and the row-source boundary
//!
//! Engines read rows only through [`RowSource`]. [`DatabaseSnapshot`] is the
//! in-memory implementation: a schema plus the rows captured for each table,
//! loadable from and savable to JSON.

use crate::schema::SchemaSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A single SQL value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Structured values (arrays, json columns) kept as JSON
    Json(serde_json::Value),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Lexical form used for literals and identifiers; `None` for NULL
    pub fn lexical(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Json(serde_json::Value::String(s)) => Some(s.clone()),
            Self::Json(v) => Some(v.to_string()),
        }
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Self::Integer(i),
                (None, Some(f)) => Self::Float(f),
                _ => Self::Text(n.to_string()),
            },
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A row: column name to value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, SqlValue>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: SqlValue) {
        self.0.insert(column.into(), value);
    }

    /// Raw value, including explicit NULLs
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.0.get(column)
    }

    /// Whether the row carries the column at all
    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    /// Lexical form of a non-null value; absent columns read as NULL
    pub fn lexical(&self, column: &str) -> Option<String> {
        self.0.get(column).and_then(SqlValue::lexical)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, SqlValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, SqlValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Errors raised while reading rows of one table
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowSourceError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Scan of table {table} failed: {message}")]
    ScanFailed { table: String, message: String },
}

/// Synchronous row reader consumed by the mapping engines
pub trait RowSource {
    /// Read at most `limit` rows of `table`, in source order
    fn scan(&self, table: &str, limit: usize) -> Result<Vec<Row>, RowSourceError>;
}

/// Schema plus captured rows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub schema: SchemaSnapshot,

    /// Rows per table name
    #[serde(default)]
    pub rows: BTreeMap<String, Vec<Row>>,

    /// Tables whose rows could not be captured, with the reason
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub failures: BTreeMap<String, String>,
}

impl DatabaseSnapshot {
    pub fn new(schema: SchemaSnapshot) -> Self {
        Self {
            schema,
            rows: BTreeMap::new(),
            failures: BTreeMap::new(),
        }
    }

    /// Attach rows for a table
    pub fn with_rows(mut self, table: impl Into<String>, rows: Vec<Row>) -> Self {
        self.rows.insert(table.into(), rows);
        self
    }

    /// Record a failed capture for a table
    pub fn with_failure(mut self, table: impl Into<String>, reason: impl Into<String>) -> Self {
        self.failures.insert(table.into(), reason.into());
        self
    }

    /// Load from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SnapshotError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    /// Load from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::ParseError(e.to_string()))
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = self
            .to_json()
            .map_err(|e| SnapshotError::ParseError(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| SnapshotError::IoError(e.to_string()))
    }

    /// Total number of captured rows
    pub fn row_total(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }
}

impl RowSource for DatabaseSnapshot {
    fn scan(&self, table: &str, limit: usize) -> Result<Vec<Row>, RowSourceError> {
        if let Some(reason) = self.failures.get(table) {
            return Err(RowSourceError::ScanFailed {
                table: table.to_string(),
                message: reason.clone(),
            });
        }

        match self.rows.get(table) {
            Some(rows) => Ok(rows.iter().take(limit).cloned().collect()),
            None if self.schema.find_table(table).is_some() => Ok(Vec::new()),
            None => Err(RowSourceError::TableNotFound(table.to_string())),
        }
    }
}

/// Snapshot file errors
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, Table};

    #[test]
    fn lexical_forms() {
        assert_eq!(SqlValue::Null.lexical(), None);
        assert_eq!(SqlValue::from(7i64).lexical().as_deref(), Some("7"));
        assert_eq!(SqlValue::from(2.5f64).lexical().as_deref(), Some("2.5"));
        assert_eq!(SqlValue::from(true).lexical().as_deref(), Some("true"));
        assert_eq!(SqlValue::from("Ana").lexical().as_deref(), Some("Ana"));
        assert_eq!(
            SqlValue::from(serde_json::json!([1, 2])).lexical().as_deref(),
            Some("[1,2]")
        );
    }

    #[test]
    fn json_rows_deserialize_into_typed_values() {
        let row: Row = serde_json::from_str(r#"{"id": 1, "name": "Ana", "score": 9.5, "active": true, "note": null}"#).unwrap();
        assert_eq!(row.get("id"), Some(&SqlValue::Integer(1)));
        assert_eq!(row.get("score"), Some(&SqlValue::Float(9.5)));
        assert_eq!(row.get("active"), Some(&SqlValue::Bool(true)));
        assert!(row.get("note").is_some_and(SqlValue::is_null));
        assert_eq!(row.lexical("note"), None);
        assert_eq!(row.lexical("missing"), None);
    }

    #[test]
    fn snapshot_scan_respects_limit_and_failures() {
        let schema = SchemaSnapshot::from_tables(vec![
            Table::new("users", vec![Column::new("id", "integer")]),
            Table::new("empty", vec![]),
            Table::new("broken", vec![]),
        ]);
        let snapshot = DatabaseSnapshot::new(schema)
            .with_rows("users", (0..5).map(|i| Row::new().with("id", i as i64)).collect())
            .with_failure("broken", "permission denied");

        assert_eq!(snapshot.scan("users", 3).unwrap().len(), 3);
        assert!(snapshot.scan("empty", 10).unwrap().is_empty());
        assert!(matches!(
            snapshot.scan("broken", 10),
            Err(RowSourceError::ScanFailed { .. })
        ));
        assert_eq!(
            snapshot.scan("ghost", 10),
            Err(RowSourceError::TableNotFound("ghost".to_string()))
        );
    }

    #[test]
    fn snapshot_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let snapshot = DatabaseSnapshot::new(SchemaSnapshot::from_tables(vec![Table::new(
            "users",
            vec![Column::new("id", "integer")],
        )]))
        .with_rows("users", vec![Row::new().with("id", 1i64)]);

        snapshot.save_to_file(&path).unwrap();
        let loaded = DatabaseSnapshot::from_file(&path).unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.row_total(), 1);
    }
}
