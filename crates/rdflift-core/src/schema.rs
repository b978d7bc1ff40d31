//! Relational schema snapshot
//!
//! A snapshot is read once per mapping run and never mutated afterwards.
//! The JSON form uses camelCase field names.

use serde::{Deserialize, Serialize};

/// A column in a table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column name
    pub name: String,

    /// SQL data type as reported by the database (e.g. `character varying`)
    pub sql_type: String,

    /// Whether the column accepts NULL
    #[serde(default = "default_nullable")]
    pub nullable: bool,

    /// Default expression, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Maximum character length for bounded character types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

fn default_nullable() -> bool {
    true
}

impl Column {
    /// Create a nullable column without default or length
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            nullable: true,
            default: None,
            max_length: None,
        }
    }

    /// Set nullability
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set default expression
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set maximum length
    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

/// Foreign-key edge from a local column to a column of another table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    pub column: String,
    pub target_table: String,
    pub target_column: String,
}

impl ForeignKey {
    pub fn new(
        column: impl Into<String>,
        target_table: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            target_table: target_table.into(),
            target_column: target_column.into(),
        }
    }
}

/// Shape of a table's primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKey<'a> {
    /// No primary key declared
    None,

    /// Exactly one key column
    Single(&'a str),

    /// Two or more key columns
    Composite(&'a [String]),
}

/// A table in the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Table name
    pub name: String,

    /// Ordered list of columns
    pub columns: Vec<Column>,

    /// Primary-key column names, in key order
    #[serde(default)]
    pub primary_key: Vec<String>,

    /// Foreign-key edges
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,

    /// Row count captured with the snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
}

impl Table {
    /// Create a table from columns
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
            row_count: None,
        }
    }

    /// Add a primary-key column
    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key.push(column.into());
        self
    }

    /// Add a foreign-key edge
    pub fn with_foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Set the captured row count
    pub fn with_row_count(mut self, rows: u64) -> Self {
        self.row_count = Some(rows);
        self
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Classify the primary key
    pub fn primary_key(&self) -> PrimaryKey<'_> {
        match self.primary_key.as_slice() {
            [] => PrimaryKey::None,
            [single] => PrimaryKey::Single(single),
            many => PrimaryKey::Composite(many),
        }
    }

    /// The foreign key a column participates in, if any
    pub fn foreign_key_for(&self, column: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| fk.column == column)
    }
}

/// Snapshot of a database schema
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSnapshot {
    /// Database name, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Tables in catalog order
    pub tables: Vec<Table>,
}

impl SchemaSnapshot {
    /// Create a snapshot from tables
    pub fn from_tables(tables: Vec<Table>) -> Self {
        Self {
            database: None,
            tables,
        }
    }

    /// Find a table by name
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Get table names
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Load a snapshot from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
