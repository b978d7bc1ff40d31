//! rdflift engine - mapping and validation logic
//!
//! This crate turns relational data into RDF and checks the result:
//! - Direct mapping of tables and rows
//! - R2RML mapping configurations: validation, generation, execution
//! - Starter mappings from table metadata
//! - RDF quality validation and scoring

pub mod direct_mapping;
pub mod iri;
pub mod mapping;
pub mod quality;

pub use direct_mapping::{
    DirectMapper, DirectMapping, DirectMappingStats, RowProcessingError, SchemaStatistics,
    TableStatistics,
};
pub use mapping::{
    ConfigValidation, Execution, MappingConfigError, MappingConfiguration, MappingDocument,
    MappingExecutor, MappingGenerator, TemplateGenerator,
};
pub use quality::QualityValidator;
