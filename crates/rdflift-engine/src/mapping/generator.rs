//! R2RML graph generation from a mapping configuration
//!
//! Each triples map becomes a node `<mapping><id>`; its sub-maps get named
//! nodes with fixed suffixes (`_LogicalTable`, `_SubjectMap`, `_POM_<i>`,
//! `_ObjectMap_<i>`, `_Join_<i>`). Triples are emitted in configuration order
//! with each node's statements kept together, so the same configuration always
//! renders to the same text.

use super::model::{
    ConfigValidation, LogicalTable, MappingConfigError, MappingConfiguration, MappingDocument,
    ObjectMap, SubjectTerm, TriplesMap,
};
use crate::iri::encode_component;
use oxrdf::vocab::rdf;
use oxrdf::{Literal, NamedNode};
use rdflift_core::namespace::rr;
use rdflift_core::{syntax, Config, PrefixMap, RdfFormat, TripleSet};

/// Generates R2RML triples for mapping configurations
#[derive(Debug, Clone)]
pub struct MappingGenerator {
    mapping_namespace: String,
    prefixes: PrefixMap,
}

impl MappingGenerator {
    pub fn new(base: &str, mapping_namespace: &str) -> Result<Self, MappingConfigError> {
        for ns in [base, mapping_namespace] {
            if NamedNode::new(ns).is_err() {
                return Err(MappingConfigError::InvalidNamespace(ns.to_string()));
            }
        }
        Ok(Self {
            mapping_namespace: mapping_namespace.to_string(),
            prefixes: PrefixMap::standard(base, mapping_namespace),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, MappingConfigError> {
        Self::new(&config.base_namespace, &config.mapping_namespace())
    }

    /// Prefixes used when rendering
    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    pub fn validate(&self, document: &MappingDocument) -> ConfigValidation {
        document.validate()
    }

    /// Triples for a configuration whose parent references are all local
    pub fn generate(&self, config: &MappingConfiguration) -> Result<TripleSet, MappingConfigError> {
        self.generate_linked(config, &[])
    }

    /// Triples for a configuration whose parents may live in `linked` configurations
    pub fn generate_linked(
        &self,
        config: &MappingConfiguration,
        linked: &[&MappingConfiguration],
    ) -> Result<TripleSet, MappingConfigError> {
        config.check_parents(linked)?;

        let mut triples = TripleSet::new();
        for tm in &config.triples_maps {
            self.triples_map(tm, &mut triples);
        }
        tracing::debug!(
            maps = config.triples_maps.len(),
            triples = triples.len(),
            "mapping graph generated"
        );
        Ok(triples)
    }

    /// Validate, check and generate in one step
    pub fn generate_document(&self, document: &MappingDocument) -> Result<TripleSet, MappingConfigError> {
        self.generate(&document.to_configuration()?)
    }

    /// Generate and serialize with the standard prefixes
    ///
    /// Turtle goes through [`syntax::to_turtle`] so mapping nodes abbreviate
    /// as `map:` even though the mapping namespace sits under the base.
    pub fn render(
        &self,
        config: &MappingConfiguration,
        format: RdfFormat,
    ) -> Result<String, MappingConfigError> {
        let triples = self.generate(config)?;
        let text = match format {
            RdfFormat::Turtle => syntax::to_turtle(&triples, &self.prefixes)?,
            other => syntax::serialize(&triples, other, &self.prefixes)?,
        };
        Ok(text)
    }

    fn node(&self, id: &str, suffix: &str) -> NamedNode {
        // mapping namespace is checked in `new` and the id is percent-encoded
        NamedNode::new_unchecked(format!(
            "{}{}{}",
            self.mapping_namespace,
            encode_component(id),
            suffix
        ))
    }

    fn triples_map(&self, tm: &TriplesMap, out: &mut TripleSet) {
        let map = self.node(&tm.id, "");
        let logical = self.node(&tm.id, "_LogicalTable");
        let subject = self.node(&tm.id, "_SubjectMap");

        out.add(map.clone(), rdf::TYPE, rr::TRIPLES_MAP);
        out.add(map.clone(), rr::LOGICAL_TABLE, logical.clone());
        out.add(map.clone(), rr::SUBJECT_MAP, subject.clone());
        for i in 0..tm.predicate_object_maps.len() {
            out.add(
                map.clone(),
                rr::PREDICATE_OBJECT_MAP,
                self.node(&tm.id, &format!("_POM_{}", i)),
            );
        }

        match &tm.logical_table {
            LogicalTable::Table(name) => {
                out.add_literal(logical, rr::TABLE_NAME, Literal::new_simple_literal(name))
            }
            LogicalTable::Query(query) => {
                out.add_literal(logical, rr::SQL_QUERY, Literal::new_simple_literal(query))
            }
        };

        match &tm.subject_map.term {
            SubjectTerm::Template(t) => out.add_literal(
                subject.clone(),
                rr::TEMPLATE,
                Literal::new_simple_literal(t.as_str()),
            ),
            SubjectTerm::Column(c) => {
                out.add_literal(subject.clone(), rr::COLUMN, Literal::new_simple_literal(c))
            }
        };
        for class in &tm.subject_map.classes {
            out.add(subject.clone(), rr::CLASS, class.clone());
        }

        for (i, pom) in tm.predicate_object_maps.iter().enumerate() {
            let pom_node = self.node(&tm.id, &format!("_POM_{}", i));
            let object = self.node(&tm.id, &format!("_ObjectMap_{}", i));
            out.add(pom_node.clone(), rr::PREDICATE, pom.predicate.clone());
            out.add(pom_node, rr::OBJECT_MAP, object.clone());

            match &pom.object_map {
                ObjectMap::Column {
                    column,
                    datatype,
                    language,
                } => {
                    out.add_literal(object.clone(), rr::COLUMN, Literal::new_simple_literal(column));
                    if let Some(datatype) = datatype {
                        out.add(object.clone(), rr::DATATYPE, datatype.clone());
                    }
                    if let Some(language) = language {
                        out.add_literal(object, rr::LANGUAGE, Literal::new_simple_literal(language));
                    }
                }
                ObjectMap::Template(t) => {
                    out.add_literal(object, rr::TEMPLATE, Literal::new_simple_literal(t.as_str()));
                }
                ObjectMap::Constant(value) => {
                    out.add_literal(object, rr::CONSTANT, Literal::new_simple_literal(value));
                }
                ObjectMap::Reference { parent, join } => {
                    out.add(object.clone(), rr::PARENT_TRIPLES_MAP, self.node(parent, ""));
                    if let Some(join) = join {
                        let join_node = self.node(&tm.id, &format!("_Join_{}", i));
                        out.add(object, rr::JOIN_CONDITION, join_node.clone());
                        out.add_literal(
                            join_node.clone(),
                            rr::CHILD,
                            Literal::new_simple_literal(&join.child),
                        );
                        out.add_literal(join_node, rr::PARENT, Literal::new_simple_literal(&join.parent));
                    }
                }
            }
        }
    }
}
