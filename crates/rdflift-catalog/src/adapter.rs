//! Database catalog trait for reading schemas and rows

use rdflift_core::{Row, SchemaSnapshot};
use std::fmt;

/// Identifies a table inside a database schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIdentifier {
    /// Schema name (e.g. `public`)
    pub schema: String,

    /// Table name
    pub table: String,
}

impl TableIdentifier {
    /// Create a new table identifier
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Get qualified name
    pub fn fqn(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }

    /// Qualified name with both parts quoted as SQL identifiers
    pub fn quoted(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.table))
    }
}

impl fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fqn())
    }
}

/// Quote a SQL identifier, doubling embedded quotes
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Errors that can occur when reading a database catalog
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaAccessError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Query failed: {0}")]
    QueryError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Trait for database catalogs that expose a schema snapshot and table rows
#[async_trait::async_trait]
pub trait DatabaseCatalog: Send + Sync {
    /// Get the catalog name (e.g., "PostgreSQL")
    fn name(&self) -> &'static str;

    /// Read tables, columns, primary keys and foreign keys
    ///
    /// Row counts are left unset; [`crate::capture`] fills them in.
    async fn fetch_schema(&self) -> Result<SchemaSnapshot, SchemaAccessError>;

    /// Count the rows of a table
    async fn count_rows(&self, table: &str) -> Result<u64, SchemaAccessError>;

    /// Read at most `limit` rows of a table
    async fn fetch_rows(&self, table: &str, limit: usize) -> Result<Vec<Row>, SchemaAccessError>;

    /// Test the connection to the database
    ///
    /// This is useful for validating credentials before reading anything.
    async fn test_connection(&self) -> Result<(), SchemaAccessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_identifier() {
        let table = TableIdentifier::new("public", "users");
        assert_eq!(table.fqn(), "public.users");
        assert_eq!(table.to_string(), "public.users");
        assert_eq!(table.quoted(), "\"public\".\"users\"");
    }

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    }
}
