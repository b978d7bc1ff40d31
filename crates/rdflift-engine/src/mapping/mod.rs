//! R2RML mapping configurations
//!
//! - [`model`]: configuration documents, validation and the checked model
//! - [`template`]: `{column}` templates
//! - [`scaffold`]: starter triples maps from table metadata
//! - [`generator`]: R2RML triples for a configuration
//! - [`executor`]: data triples from a configuration and database rows

pub mod executor;
pub mod generator;
pub mod model;
pub mod scaffold;
pub mod template;

pub use executor::{Execution, MappingExecutor};
pub use generator::MappingGenerator;
pub use model::{
    ConfigIssue, ConfigValidation, JoinCondition, LogicalTable, MappingConfigError,
    MappingConfiguration, MappingDocument, ObjectMap, PredicateObjectMap, SubjectMap,
    SubjectTerm, TriplesMap,
};
pub use scaffold::TemplateGenerator;
pub use template::{Template, TemplateError};
