//! PostgreSQL catalog using information_schema
//!
//! Reads base tables of one database schema together with their columns,
//! primary keys and foreign keys, and reads table rows as JSON objects
//! (`to_jsonb`) so every column type arrives as a [`SqlValue`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! // Using direct credentials
//! let catalog = PostgresCatalog::connect(
//!     "localhost", 5432, "mydb", "username", "password", "public"
//! ).await?;
//!
//! // Using connection string with TLS
//! let catalog = PostgresCatalog::from_connection_string_with_tls(
//!     "host=db.example.com dbname=mydb user=app password=secret",
//!     "public",
//! ).await?;
//! ```
//!
//! Reference: https://www.postgresql.org/docs/current/information-schema.html

use crate::adapter::{DatabaseCatalog, SchemaAccessError};
use rdflift_core::{Row, SchemaSnapshot};

#[cfg(feature = "postgres")]
use crate::adapter::TableIdentifier;

#[cfg(feature = "postgres")]
use rdflift_core::{Column, ForeignKey, SqlValue, Table};

#[cfg(feature = "postgres")]
use tokio_postgres::{Client, Config as PgConfig, NoTls};

#[cfg(feature = "postgres")]
use postgres_native_tls::MakeTlsConnector;

#[cfg(feature = "postgres")]
use native_tls::TlsConnector;

#[cfg(not(feature = "postgres"))]
const NOT_COMPILED: &str =
    "PostgreSQL support not compiled. Rebuild with: cargo build --features postgres";

#[cfg(feature = "postgres")]
const TABLES_QUERY: &str = r#"
    SELECT table_name::text
    FROM information_schema.tables
    WHERE table_schema = $1
      AND table_type = 'BASE TABLE'
    ORDER BY table_name
"#;

#[cfg(feature = "postgres")]
const COLUMNS_QUERY: &str = r#"
    SELECT
        column_name::text,
        data_type::text,
        is_nullable::text,
        column_default::text,
        character_maximum_length::int4
    FROM information_schema.columns
    WHERE table_schema = $1
      AND table_name = $2
    ORDER BY ordinal_position
"#;

#[cfg(feature = "postgres")]
const PRIMARY_KEY_QUERY: &str = r#"
    SELECT kcu.column_name::text
    FROM information_schema.table_constraints AS tc
    JOIN information_schema.key_column_usage AS kcu
      ON tc.constraint_name = kcu.constraint_name
     AND tc.table_schema = kcu.table_schema
    WHERE tc.constraint_type = 'PRIMARY KEY'
      AND tc.table_schema = $1
      AND tc.table_name = $2
    ORDER BY kcu.ordinal_position
"#;

#[cfg(feature = "postgres")]
const FOREIGN_KEY_QUERY: &str = r#"
    SELECT
        kcu.column_name::text,
        ccu.table_name::text AS foreign_table_name,
        ccu.column_name::text AS foreign_column_name
    FROM information_schema.table_constraints AS tc
    JOIN information_schema.key_column_usage AS kcu
      ON tc.constraint_name = kcu.constraint_name
     AND tc.table_schema = kcu.table_schema
    JOIN information_schema.constraint_column_usage AS ccu
      ON ccu.constraint_name = tc.constraint_name
     AND ccu.table_schema = tc.table_schema
    WHERE tc.constraint_type = 'FOREIGN KEY'
      AND tc.table_schema = $1
      AND tc.table_name = $2
    ORDER BY kcu.ordinal_position
"#;

/// PostgreSQL catalog
///
/// Holds one client connection and the database schema it reads from.
pub struct PostgresCatalog {
    /// PostgreSQL client (only available with postgres feature)
    #[cfg(feature = "postgres")]
    client: Client,

    /// Connection host
    host: String,

    /// Connection port
    port: u16,

    /// Database name
    database: String,

    /// Database schema tables are read from
    schema: String,
}

impl PostgresCatalog {
    /// Connect with direct credentials over a plain connection
    #[cfg(feature = "postgres")]
    pub async fn connect(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        schema: impl Into<String>,
    ) -> Result<Self, SchemaAccessError> {
        let host = host.into();
        let database = database.into();
        let user: String = user.into();
        let password: String = password.into();

        let mut config = PgConfig::new();
        config
            .host(&host)
            .port(port)
            .dbname(&database)
            .user(&user)
            .password(password);

        let (client, connection) = config.connect(NoTls).await.map_err(|e| {
            SchemaAccessError::AuthenticationError(format!(
                "Failed to connect to PostgreSQL at {}:{}: {}",
                host, port, e
            ))
        })?;

        let (log_host, log_port) = (host.clone(), port);
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(host = %log_host, port = log_port, "PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self {
            client,
            host,
            port,
            database,
            schema: schema.into(),
        })
    }

    /// Create catalog without postgres feature (returns error)
    #[cfg(not(feature = "postgres"))]
    pub async fn connect(
        _host: impl Into<String>,
        _port: u16,
        _database: impl Into<String>,
        _user: impl Into<String>,
        _password: impl Into<String>,
        _schema: impl Into<String>,
    ) -> Result<Self, SchemaAccessError> {
        Err(SchemaAccessError::ConfigError(NOT_COMPILED.to_string()))
    }

    /// Connect from a PostgreSQL connection string
    ///
    /// Accepts both `host=... dbname=...` and `postgres://` URL forms.
    #[cfg(feature = "postgres")]
    pub async fn from_connection_string(
        conn_str: &str,
        schema: impl Into<String>,
    ) -> Result<Self, SchemaAccessError> {
        let config = parse_config(conn_str)?;
        let (host, port, database) = describe(&config);

        let (client, connection) = config.connect(NoTls).await.map_err(|e| {
            SchemaAccessError::AuthenticationError(format!("Failed to connect: {}", e))
        })?;

        let (log_host, log_port) = (host.clone(), port);
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(host = %log_host, port = log_port, "PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self {
            client,
            host,
            port,
            database,
            schema: schema.into(),
        })
    }

    /// Create catalog without postgres feature (returns error)
    #[cfg(not(feature = "postgres"))]
    pub async fn from_connection_string(
        _conn_str: &str,
        _schema: impl Into<String>,
    ) -> Result<Self, SchemaAccessError> {
        Err(SchemaAccessError::ConfigError(NOT_COMPILED.to_string()))
    }

    /// Connect from a connection string over TLS
    #[cfg(feature = "postgres")]
    pub async fn from_connection_string_with_tls(
        conn_str: &str,
        schema: impl Into<String>,
    ) -> Result<Self, SchemaAccessError> {
        let config = parse_config(conn_str)?;
        let (host, port, database) = describe(&config);

        let connector = TlsConnector::builder().build().map_err(|e| {
            SchemaAccessError::ConfigError(format!("Failed to create TLS connector: {}", e))
        })?;
        let tls = MakeTlsConnector::new(connector);

        let (client, connection) = config.connect(tls).await.map_err(|e| {
            SchemaAccessError::AuthenticationError(format!("Failed to connect with TLS: {}", e))
        })?;

        let (log_host, log_port) = (host.clone(), port);
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(host = %log_host, port = log_port, "PostgreSQL TLS connection error: {}", e);
            }
        });

        Ok(Self {
            client,
            host,
            port,
            database,
            schema: schema.into(),
        })
    }

    /// Create catalog without postgres feature (returns error)
    #[cfg(not(feature = "postgres"))]
    pub async fn from_connection_string_with_tls(
        _conn_str: &str,
        _schema: impl Into<String>,
    ) -> Result<Self, SchemaAccessError> {
        Err(SchemaAccessError::ConfigError(NOT_COMPILED.to_string()))
    }

    /// Get the connection host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the connection port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the database name
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Get the database schema name
    pub fn schema(&self) -> &str {
        &self.schema
    }

    #[cfg(feature = "postgres")]
    fn table_id(&self, table: &str) -> TableIdentifier {
        TableIdentifier::new(&self.schema, table)
    }

    #[cfg(feature = "postgres")]
    async fn read_table(&self, name: String) -> Result<Table, SchemaAccessError> {
        let column_rows = self
            .client
            .query(COLUMNS_QUERY, &[&self.schema, &name])
            .await
            .map_err(|e| classify(&self.table_id(&name), e))?;

        let columns = column_rows
            .iter()
            .map(|row| {
                let nullable: String = row.get(2);
                let mut column = Column::new(row.get::<_, String>(0), row.get::<_, String>(1))
                    .with_nullable(nullable.eq_ignore_ascii_case("YES"));
                column.default = row.get(3);
                column.max_length = row.get::<_, Option<i32>>(4).and_then(|n| u32::try_from(n).ok());
                column
            })
            .collect();

        let primary_key = self
            .client
            .query(PRIMARY_KEY_QUERY, &[&self.schema, &name])
            .await
            .map_err(|e| classify(&self.table_id(&name), e))?
            .iter()
            .map(|row| row.get::<_, String>(0))
            .collect();

        let foreign_keys = self
            .client
            .query(FOREIGN_KEY_QUERY, &[&self.schema, &name])
            .await
            .map_err(|e| classify(&self.table_id(&name), e))?
            .iter()
            .map(|row| {
                ForeignKey::new(
                    row.get::<_, String>(0),
                    row.get::<_, String>(1),
                    row.get::<_, String>(2),
                )
            })
            .collect();

        let mut table = Table::new(name, columns);
        table.primary_key = primary_key;
        table.foreign_keys = foreign_keys;
        Ok(table)
    }
}

#[cfg(feature = "postgres")]
fn parse_config(conn_str: &str) -> Result<PgConfig, SchemaAccessError> {
    conn_str
        .parse()
        .map_err(|e| SchemaAccessError::ConfigError(format!("Invalid connection string: {}", e)))
}

#[cfg(feature = "postgres")]
fn describe(config: &PgConfig) -> (String, u16, String) {
    let host = config
        .get_hosts()
        .first()
        .map(|h| format!("{:?}", h))
        .unwrap_or_else(|| "localhost".to_string());
    let port = config.get_ports().first().copied().unwrap_or(5432);
    let database = config.get_dbname().unwrap_or("postgres").to_string();
    (host, port, database)
}

/// Map a driver error onto the access taxonomy
#[cfg(feature = "postgres")]
fn classify(table: &TableIdentifier, error: tokio_postgres::Error) -> SchemaAccessError {
    let message = error.to_string();
    if message.contains("does not exist") {
        SchemaAccessError::TableNotFound(table.fqn())
    } else if message.contains("permission denied") {
        SchemaAccessError::PermissionDenied(format!("Cannot access {}: {}", table.fqn(), message))
    } else {
        SchemaAccessError::QueryError(message)
    }
}

/// Convert a `to_jsonb` row object into a [`Row`]
#[cfg(feature = "postgres")]
fn json_to_row(value: serde_json::Value) -> Result<Row, SchemaAccessError> {
    match value {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(column, value)| (column, SqlValue::from(value)))
            .collect()),
        other => Err(SchemaAccessError::InvalidResponse(format!(
            "expected a JSON object per row, got {}",
            other
        ))),
    }
}

#[async_trait::async_trait]
impl DatabaseCatalog for PostgresCatalog {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    #[cfg(feature = "postgres")]
    async fn fetch_schema(&self) -> Result<SchemaSnapshot, SchemaAccessError> {
        let names: Vec<String> = self
            .client
            .query(TABLES_QUERY, &[&self.schema])
            .await
            .map_err(|e| SchemaAccessError::QueryError(e.to_string()))?
            .iter()
            .map(|row| row.get(0))
            .collect();

        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            tracing::debug!(table = %name, "reading table metadata");
            tables.push(self.read_table(name).await?);
        }

        Ok(SchemaSnapshot {
            database: Some(self.database.clone()),
            tables,
        })
    }

    #[cfg(not(feature = "postgres"))]
    async fn fetch_schema(&self) -> Result<SchemaSnapshot, SchemaAccessError> {
        Err(SchemaAccessError::ConfigError(NOT_COMPILED.to_string()))
    }

    #[cfg(feature = "postgres")]
    async fn count_rows(&self, table: &str) -> Result<u64, SchemaAccessError> {
        let id = self.table_id(table);
        let query = format!("SELECT COUNT(*) FROM {}", id.quoted());
        let row = self
            .client
            .query_one(&query, &[])
            .await
            .map_err(|e| classify(&id, e))?;
        let count: i64 = row.get(0);
        Ok(count.max(0) as u64)
    }

    #[cfg(not(feature = "postgres"))]
    async fn count_rows(&self, _table: &str) -> Result<u64, SchemaAccessError> {
        Err(SchemaAccessError::ConfigError(NOT_COMPILED.to_string()))
    }

    #[cfg(feature = "postgres")]
    async fn fetch_rows(&self, table: &str, limit: usize) -> Result<Vec<Row>, SchemaAccessError> {
        let id = self.table_id(table);
        let query = format!("SELECT to_jsonb(t) FROM {} AS t LIMIT $1", id.quoted());
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.client
            .query(&query, &[&limit])
            .await
            .map_err(|e| classify(&id, e))?
            .into_iter()
            .map(|row| json_to_row(row.get(0)))
            .collect()
    }

    #[cfg(not(feature = "postgres"))]
    async fn fetch_rows(&self, _table: &str, _limit: usize) -> Result<Vec<Row>, SchemaAccessError> {
        Err(SchemaAccessError::ConfigError(NOT_COMPILED.to_string()))
    }

    #[cfg(feature = "postgres")]
    async fn test_connection(&self) -> Result<(), SchemaAccessError> {
        self.client
            .query("SELECT 1", &[])
            .await
            .map_err(|e| SchemaAccessError::QueryError(format!("Connection test failed: {}", e)))?;
        Ok(())
    }

    #[cfg(not(feature = "postgres"))]
    async fn test_connection(&self) -> Result<(), SchemaAccessError> {
        Err(SchemaAccessError::ConfigError(NOT_COMPILED.to_string()))
    }
}

#[cfg(all(test, feature = "postgres"))]
mod tests {
    use super::*;

    #[test]
    fn json_objects_become_rows() {
        let row = json_to_row(serde_json::json!({"id": 1, "name": "Ana", "dept_id": null})).unwrap();
        assert_eq!(row.get("id"), Some(&SqlValue::Integer(1)));
        assert_eq!(row.lexical("name").as_deref(), Some("Ana"));
        assert_eq!(row.get("dept_id"), Some(&SqlValue::Null));
    }

    #[test]
    fn non_object_rows_are_rejected() {
        let err = json_to_row(serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, SchemaAccessError::InvalidResponse(_)));
    }

    #[test]
    fn connection_string_description() {
        let config = parse_config("host=db.internal port=6543 dbname=shop user=app").unwrap();
        let (_, port, database) = describe(&config);
        assert_eq!(port, 6543);
        assert_eq!(database, "shop");
    }
}
