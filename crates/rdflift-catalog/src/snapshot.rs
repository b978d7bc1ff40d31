//! Capture a database snapshot through a catalog
//!
//! Reads are sequential: one schema read, then a count and a row read per
//! table. A failed schema read fails the capture; a failed table read is
//! recorded in the snapshot and the capture moves on.

use crate::adapter::{DatabaseCatalog, SchemaAccessError};
use rdflift_core::DatabaseSnapshot;

/// Read the schema, row counts and at most `row_limit` rows per table
pub async fn capture(
    catalog: &dyn DatabaseCatalog,
    row_limit: usize,
) -> Result<DatabaseSnapshot, SchemaAccessError> {
    let mut schema = catalog.fetch_schema().await?;
    tracing::info!(
        catalog = catalog.name(),
        tables = schema.tables.len(),
        "schema read"
    );

    let mut snapshot = DatabaseSnapshot::default();
    for table in &mut schema.tables {
        match catalog.count_rows(&table.name).await {
            Ok(count) => table.row_count = Some(count),
            Err(e) => {
                tracing::warn!(table = %table.name, "row count failed: {}", e);
            }
        }

        match catalog.fetch_rows(&table.name, row_limit).await {
            Ok(rows) => {
                tracing::debug!(table = %table.name, rows = rows.len(), "rows read");
                snapshot.rows.insert(table.name.clone(), rows);
            }
            Err(e) => {
                tracing::warn!(table = %table.name, "row read failed: {}", e);
                snapshot.failures.insert(table.name.clone(), e.to_string());
            }
        }
    }

    snapshot.schema = schema;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCatalogBuilder;
    use rdflift_core::{Column, Row, RowSource, Table};

    fn table(name: &str) -> Table {
        Table::new(name, vec![Column::new("id", "integer")]).with_primary_key("id")
    }

    #[tokio::test]
    async fn captures_counts_and_limited_rows() {
        let rows: Vec<Row> = (0..5).map(|i| Row::new().with("id", i as i64)).collect();
        let catalog = MockCatalogBuilder::new()
            .with_database("shop")
            .with_table(table("users"), rows)
            .build();

        let snapshot = capture(&catalog, 2).await.unwrap();
        assert_eq!(snapshot.schema.database.as_deref(), Some("shop"));
        assert_eq!(snapshot.schema.tables[0].row_count, Some(5));
        assert_eq!(snapshot.rows["users"].len(), 2);
        assert!(snapshot.failures.is_empty());
    }

    #[tokio::test]
    async fn table_failures_are_recorded_not_fatal() {
        let catalog = MockCatalogBuilder::new()
            .with_table(table("users"), vec![Row::new().with("id", 1i64)])
            .with_table(table("secrets"), vec![])
            .with_error("secrets", SchemaAccessError::PermissionDenied("secrets".to_string()))
            .build();

        let snapshot = capture(&catalog, 10).await.unwrap();
        assert_eq!(snapshot.rows["users"].len(), 1);
        assert!(snapshot.failures.contains_key("secrets"));
        assert_eq!(snapshot.schema.find_table("secrets").unwrap().row_count, None);
        assert!(snapshot.scan("secrets", 10).is_err());
    }

    #[tokio::test]
    async fn schema_failure_is_fatal() {
        let catalog = MockCatalogBuilder::new()
            .with_schema_error(SchemaAccessError::AuthenticationError("bad password".to_string()))
            .build();

        let err = capture(&catalog, 10).await.unwrap_err();
        assert!(matches!(err, SchemaAccessError::AuthenticationError(_)));
    }
}
