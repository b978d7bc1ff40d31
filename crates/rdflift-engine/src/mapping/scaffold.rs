//! Starter triples maps built from table metadata

use super::model::{LogicalTable, MappingConfigError, ObjectMap, SubjectMap, SubjectTerm, TriplesMap};
use super::template::Template;
use crate::iri::encode_component;
use oxrdf::NamedNode;
use rdflift_core::namespace::capitalize;
use rdflift_core::{Column, PrimaryKey, Table, XsdType};

/// Builds one triples map per table
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    base: String,
}

impl TemplateGenerator {
    /// `base` must be an absolute IRI ending in `/` or `#`
    pub fn new(base: impl Into<String>) -> Result<Self, MappingConfigError> {
        let base = base.into();
        if NamedNode::new(base.as_str()).is_err() || !(base.ends_with('/') || base.ends_with('#')) {
            return Err(MappingConfigError::InvalidNamespace(base));
        }
        Ok(Self { base })
    }

    /// Triples map for `table_name` with `primary_key` as the subject key
    ///
    /// Every column other than the key gets a predicate `<base><column>` and a
    /// column object map typed from its SQL type.
    pub fn template(&self, table_name: &str, columns: &[Column], primary_key: &str) -> TriplesMap {
        let table = encode_component(table_name);
        let subject_map = SubjectMap {
            term: SubjectTerm::Template(Template::prefixed_column(
                &format!("{}{}/", self.base, table),
                primary_key,
            )),
            classes: vec![self.iri(&encode_component(&capitalize(table_name)))],
        };

        columns.iter().filter(|c| c.name != primary_key).fold(
            TriplesMap::new(
                format!("TriplesMap_{}", table_name),
                LogicalTable::Table(table_name.to_string()),
                subject_map,
            ),
            |tm, column| {
                let datatype = XsdType::from_sql_type(&column.sql_type).iri().into_owned();
                tm.with_predicate_object_map(
                    self.iri(&encode_component(&column.name)),
                    ObjectMap::Column {
                        column: column.name.clone(),
                        datatype: Some(datatype),
                        language: None,
                    },
                )
            },
        )
    }

    /// Triples map for a schema table
    ///
    /// Without a primary key the first column stands in as the subject key.
    pub fn for_table(&self, table: &Table) -> Result<TriplesMap, MappingConfigError> {
        let key = match table.primary_key() {
            PrimaryKey::Single(column) => column,
            PrimaryKey::Composite(_) => {
                return Err(MappingConfigError::CompositeKey(table.name.clone()))
            }
            PrimaryKey::None => match table.columns.first() {
                Some(first) => {
                    tracing::debug!(table = %table.name, column = %first.name, "no primary key, using first column");
                    first.name.as_str()
                }
                None => return Err(MappingConfigError::NoColumns(table.name.clone())),
            },
        };
        Ok(self.template(&table.name, &table.columns, key))
    }

    fn iri(&self, local: &str) -> NamedNode {
        // base is a checked absolute IRI and local is percent-encoded
        NamedNode::new_unchecked(format!("{}{}", self.base, local))
    }
}
