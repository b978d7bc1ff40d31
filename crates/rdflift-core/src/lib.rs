//! rdflift core
//!
//! Core domain model with stable, versioned types: schema snapshots, rows,
//! triples and their text syntaxes, diagnostics, quality reports and config.
//! Never rename diagnostic codes - they are part of the public API.

pub mod config;
pub mod datatype;
pub mod diagnostic;
pub mod graph;
pub mod namespace;
pub mod report;
pub mod rows;
pub mod schema;
pub mod syntax;

pub use config::{
    Config, ConfigError, DatabaseConfig, DirectMappingConfig, ValidationConfig, DEFAULT_ROW_LIMIT,
};
pub use datatype::XsdType;
pub use diagnostic::{Diagnostic, DiagnosticCode, Location, Severity};
pub use graph::TripleSet;
pub use namespace::PrefixMap;
pub use report::{Finding, QualityMetrics, ReportVersion, ValidationReport};
pub use rows::{DatabaseSnapshot, Row, RowSource, RowSourceError, SnapshotError, SqlValue};
pub use schema::{Column, ForeignKey, PrimaryKey, SchemaSnapshot, Table};
pub use syntax::{ConvertError, RdfSyntaxError, SerializeError};

pub use oxrdfio::RdfFormat;
