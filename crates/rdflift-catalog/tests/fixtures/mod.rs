//! Test fixtures for catalog integration tests
//!
//! This module provides reusable tables and rows for testing snapshot
//! capture and the mapping engines against a mock catalog. The fixtures
//! model a small shop database: departments, users and orders linked by
//! foreign keys.

#![allow(dead_code)]

use rdflift_catalog::{MockCatalog, MockCatalogBuilder};
use rdflift_core::{Column, ForeignKey, Row, SqlValue, Table};

/// Departments table
///
/// - Primary key (id)
/// - A required name
pub fn departments_table() -> Table {
    Table::new(
        "departments",
        vec![
            Column::new("id", "integer").with_nullable(false),
            Column::new("name", "character varying")
                .with_nullable(false)
                .with_max_length(100),
        ],
    )
    .with_primary_key("id")
}

/// Users table
///
/// - Primary key (id)
/// - Contact information (email, name)
/// - Foreign key to departments
/// - Metadata (created_at, is_active)
pub fn users_table() -> Table {
    Table::new(
        "users",
        vec![
            Column::new("id", "integer").with_nullable(false),
            Column::new("email", "character varying")
                .with_nullable(false)
                .with_max_length(255),
            Column::new("name", "text"),
            Column::new("department_id", "integer"),
            Column::new("created_at", "timestamp without time zone").with_nullable(false),
            Column::new("is_active", "boolean")
                .with_nullable(false)
                .with_default("true"),
        ],
    )
    .with_primary_key("id")
    .with_foreign_key(ForeignKey::new("department_id", "departments", "id"))
}

/// Orders table
///
/// - Primary key (id)
/// - Foreign key to users
/// - Financial data (total_amount)
pub fn orders_table() -> Table {
    Table::new(
        "orders",
        vec![
            Column::new("id", "bigint").with_nullable(false),
            Column::new("user_id", "integer").with_nullable(false),
            Column::new("total_amount", "numeric").with_nullable(false),
            Column::new("status", "text").with_default("'pending'"),
        ],
    )
    .with_primary_key("id")
    .with_foreign_key(ForeignKey::new("user_id", "users", "id"))
}

/// Link table keyed by two columns
pub fn order_items_table() -> Table {
    Table::new(
        "order_items",
        vec![
            Column::new("order_id", "bigint").with_nullable(false),
            Column::new("line", "integer").with_nullable(false),
            Column::new("quantity", "integer"),
        ],
    )
    .with_primary_key("order_id")
    .with_primary_key("line")
}

/// Audit table without a primary key
pub fn audit_log_table() -> Table {
    Table::new(
        "audit_log",
        vec![Column::new("event", "text"), Column::new("at", "timestamp with time zone")],
    )
}

pub fn department_rows() -> Vec<Row> {
    vec![
        Row::new().with("id", 1i64).with("name", "Engineering"),
        Row::new().with("id", 2i64).with("name", "Sales"),
    ]
}

pub fn user_rows() -> Vec<Row> {
    vec![
        Row::new()
            .with("id", 1i64)
            .with("email", "ana@example.org")
            .with("name", "Ana")
            .with("department_id", 1i64)
            .with("created_at", "2024-03-01T09:00:00")
            .with("is_active", true),
        Row::new()
            .with("id", 2i64)
            .with("email", "bo@example.org")
            .with("name", SqlValue::Null)
            .with("department_id", 2i64)
            .with("created_at", "2024-03-02T10:30:00")
            .with("is_active", false),
        Row::new()
            .with("id", 3i64)
            .with("email", "cy@example.org")
            .with("name", "Cy")
            .with("department_id", SqlValue::Null)
            .with("created_at", "2024-03-03T11:45:00")
            .with("is_active", true),
    ]
}

pub fn order_rows() -> Vec<Row> {
    vec![
        Row::new()
            .with("id", 100i64)
            .with("user_id", 1i64)
            .with("total_amount", 42.5)
            .with("status", "shipped"),
        Row::new()
            .with("id", 101i64)
            .with("user_id", 1i64)
            .with("total_amount", 7.25)
            .with("status", "pending"),
        Row::new()
            .with("id", 102i64)
            .with("user_id", 3i64)
            .with("total_amount", 120.0)
            .with("status", SqlValue::Null),
    ]
}

/// Builder preloaded with departments, users and orders
pub fn shop_catalog_builder() -> MockCatalogBuilder {
    MockCatalogBuilder::new()
        .with_database("shop")
        .with_table(departments_table(), department_rows())
        .with_table(users_table(), user_rows())
        .with_table(orders_table(), order_rows())
}

/// Mock catalog for the shop database
pub fn shop_catalog() -> MockCatalog {
    shop_catalog_builder().build()
}
