//! Mock database catalog for testing
//!
//! Serves a predefined schema and rows without connecting to any database.
//! It's useful for:
//! - Unit testing snapshot capture and the mapping engines
//! - Demos without real credentials
//! - Simulating per-table failures and slow connections
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rdflift_catalog::{MockCatalog, DatabaseCatalog};
//! use rdflift_core::{Column, Row, Table};
//!
//! let catalog = MockCatalog::new();
//! catalog.add_table(
//!     Table::new("users", vec![Column::new("id", "integer")]).with_primary_key("id"),
//!     vec![Row::new().with("id", 1i64)],
//! ).await;
//!
//! let schema = catalog.fetch_schema().await?;
//! ```

use crate::adapter::{DatabaseCatalog, SchemaAccessError};
use rdflift_core::{Row, SchemaSnapshot, Table};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mock database catalog
///
/// Tables keep their insertion order. Clones share the same state.
pub struct MockCatalog {
    /// Tables in catalog order
    tables: Arc<RwLock<Vec<Table>>>,

    /// Rows by table name
    rows: Arc<RwLock<HashMap<String, Vec<Row>>>>,

    /// Errors to return for row reads and counts of specific tables
    errors: Arc<RwLock<HashMap<String, SchemaAccessError>>>,

    /// Error returned by `fetch_schema`
    schema_error: Option<SchemaAccessError>,

    /// Simulate connection failure
    fail_connection: bool,

    /// Simulate query latency (milliseconds)
    latency_ms: u64,

    database: Option<String>,
}

impl MockCatalog {
    /// Create a new mock catalog with no tables
    pub fn new() -> Self {
        MockCatalogBuilder::new().build()
    }

    /// Add a table together with its rows
    pub async fn add_table(&self, table: Table, rows: Vec<Row>) {
        let name = table.name.clone();
        let mut tables = self.tables.write().await;
        match tables.iter_mut().find(|t| t.name == name) {
            Some(existing) => *existing = table,
            None => tables.push(table),
        }
        self.rows.write().await.insert(name, rows);
    }

    /// Configure an error for row reads and counts of one table
    pub async fn add_error_for_table(&self, table: &str, error: SchemaAccessError) {
        self.errors.write().await.insert(table.to_string(), error);
    }

    /// Configure to fail all connection tests
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Configure simulated latency for all operations
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Get the number of tables stored in the catalog
    pub async fn table_count(&self) -> usize {
        self.tables.read().await.len()
    }

    /// Clear all stored errors
    pub async fn clear_errors(&self) {
        self.errors.write().await.clear();
    }

    async fn simulate_latency(&self) {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }
    }

    async fn table_error(&self, table: &str) -> Result<(), SchemaAccessError> {
        if let Some(error) = self.errors.read().await.get(table) {
            return Err(error.clone());
        }
        if !self.tables.read().await.iter().any(|t| t.name == table) {
            return Err(SchemaAccessError::TableNotFound(table.to_string()));
        }
        Ok(())
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MockCatalog {
    fn clone(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
            rows: Arc::clone(&self.rows),
            errors: Arc::clone(&self.errors),
            schema_error: self.schema_error.clone(),
            fail_connection: self.fail_connection,
            latency_ms: self.latency_ms,
            database: self.database.clone(),
        }
    }
}

#[async_trait::async_trait]
impl DatabaseCatalog for MockCatalog {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn fetch_schema(&self) -> Result<SchemaSnapshot, SchemaAccessError> {
        self.simulate_latency().await;

        if let Some(error) = &self.schema_error {
            return Err(error.clone());
        }

        Ok(SchemaSnapshot {
            database: self.database.clone(),
            tables: self.tables.read().await.clone(),
        })
    }

    async fn count_rows(&self, table: &str) -> Result<u64, SchemaAccessError> {
        self.simulate_latency().await;
        self.table_error(table).await?;

        let rows = self.rows.read().await;
        Ok(rows.get(table).map_or(0, |r| r.len() as u64))
    }

    async fn fetch_rows(&self, table: &str, limit: usize) -> Result<Vec<Row>, SchemaAccessError> {
        self.simulate_latency().await;
        self.table_error(table).await?;

        let rows = self.rows.read().await;
        Ok(rows
            .get(table)
            .map(|r| r.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn test_connection(&self) -> Result<(), SchemaAccessError> {
        self.simulate_latency().await;

        if self.fail_connection {
            Err(SchemaAccessError::NetworkError(
                "Simulated connection failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

/// Builder for creating MockCatalog with multiple tables
///
/// # Example
///
/// ```rust,ignore
/// let catalog = MockCatalogBuilder::new()
///     .with_database("shop")
///     .with_table(users_table, users_rows)
///     .with_table(orders_table, orders_rows)
///     .with_latency(50)
///     .build();
/// ```
pub struct MockCatalogBuilder {
    tables: Vec<Table>,
    rows: HashMap<String, Vec<Row>>,
    errors: HashMap<String, SchemaAccessError>,
    schema_error: Option<SchemaAccessError>,
    fail_connection: bool,
    latency_ms: u64,
    database: Option<String>,
}

impl MockCatalogBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            rows: HashMap::new(),
            errors: HashMap::new(),
            schema_error: None,
            fail_connection: false,
            latency_ms: 0,
            database: None,
        }
    }

    /// Set the database name reported in the snapshot
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Add a table and its rows
    pub fn with_table(mut self, table: Table, rows: Vec<Row>) -> Self {
        self.rows.insert(table.name.clone(), rows);
        self.tables.push(table);
        self
    }

    /// Add an error for row reads and counts of a table
    pub fn with_error(mut self, table: &str, error: SchemaAccessError) -> Self {
        self.errors.insert(table.to_string(), error);
        self
    }

    /// Make `fetch_schema` fail
    pub fn with_schema_error(mut self, error: SchemaAccessError) -> Self {
        self.schema_error = Some(error);
        self
    }

    /// Configure connection failure
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Configure latency
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Build the MockCatalog
    pub fn build(self) -> MockCatalog {
        MockCatalog {
            tables: Arc::new(RwLock::new(self.tables)),
            rows: Arc::new(RwLock::new(self.rows)),
            errors: Arc::new(RwLock::new(self.errors)),
            schema_error: self.schema_error,
            fail_connection: self.fail_connection,
            latency_ms: self.latency_ms,
            database: self.database,
        }
    }
}

impl Default for MockCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
