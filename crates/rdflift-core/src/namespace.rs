//! Namespaces, prefix abbreviation and term rendering

use oxrdf::{LiteralRef, NamedNodeRef, SubjectRef, TermRef};

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const RR_NS: &str = "http://www.w3.org/ns/r2rml#";

/// Default base namespace for generated resources
pub const DEFAULT_BASE: &str = "http://example.org/";

/// Namespace roots treated as well-known vocabularies rather than local data
pub const KNOWN_VOCABULARIES: &[&str] = &["http://www.w3.org/", "http://xmlns.com/"];

/// R2RML vocabulary terms
pub mod rr {
    use oxrdf::NamedNodeRef;

    pub const TRIPLES_MAP: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#TriplesMap");
    pub const LOGICAL_TABLE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#logicalTable");
    pub const TABLE_NAME: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#tableName");
    pub const SQL_QUERY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#sqlQuery");
    pub const SUBJECT_MAP: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#subjectMap");
    pub const TEMPLATE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#template");
    pub const COLUMN: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#column");
    pub const CLASS: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#class");
    pub const PREDICATE_OBJECT_MAP: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#predicateObjectMap");
    pub const PREDICATE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#predicate");
    pub const OBJECT_MAP: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#objectMap");
    pub const DATATYPE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#datatype");
    pub const LANGUAGE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#language");
    pub const CONSTANT: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#constant");
    pub const PARENT_TRIPLES_MAP: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#parentTriplesMap");
    pub const JOIN_CONDITION: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#joinCondition");
    pub const CHILD: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#child");
    pub const PARENT: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/r2rml#parent");
}

/// Ordered prefix to namespace table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMap {
    entries: Vec<(String, String)>,
}

impl PrefixMap {
    /// Empty table
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Standard prefixes for generated output: `ex`, `map`, `rr`, `rdf`, `rdfs`, `xsd`
    pub fn standard(base: &str, mapping: &str) -> Self {
        Self::empty()
            .with("ex", base)
            .with("map", mapping)
            .with("rr", RR_NS)
            .with("rdf", RDF_NS)
            .with("rdfs", RDFS_NS)
            .with("xsd", XSD_NS)
    }

    /// Add or replace a prefix
    pub fn with(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let namespace = namespace.into();
        match self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = namespace,
            None => self.entries.push((prefix, namespace)),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, n)| (p.as_str(), n.as_str()))
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, n)| n.as_str())
    }

    /// Abbreviate an IRI as `prefix:local` using the longest matching namespace
    ///
    /// Returns `None` when no namespace matches or the local part would not be
    /// a plain name.
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.entries
            .iter()
            .filter(|(_, ns)| !ns.is_empty() && iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .and_then(|(prefix, ns)| {
                let local = &iri[ns.len()..];
                is_plain_local_name(local).then(|| format!("{}:{}", prefix, local))
            })
    }

    /// Expand `prefix:local`; full IRIs pass through unchanged
    pub fn expand(&self, name: &str) -> Option<String> {
        if name.contains("://") {
            return Some(name.to_string());
        }
        let (prefix, local) = name.split_once(':')?;
        self.namespace(prefix).map(|ns| format!("{}{}", ns, local))
    }

    /// Render a named node, abbreviated when possible
    pub fn render_named_node(&self, node: NamedNodeRef<'_>) -> String {
        self.compact(node.as_str())
            .unwrap_or_else(|| format!("<{}>", node.as_str()))
    }

    /// Render a literal in Turtle form with an abbreviated datatype
    pub fn render_literal(&self, literal: LiteralRef<'_>) -> String {
        let value = format!("\"{}\"", escape_literal(literal.value()));
        if let Some(language) = literal.language() {
            format!("{}@{}", value, language)
        } else {
            format!("{}^^{}", value, self.render_named_node(literal.datatype()))
        }
    }

    pub fn render_subject(&self, subject: SubjectRef<'_>) -> String {
        match subject {
            SubjectRef::NamedNode(node) => self.render_named_node(node),
            other => other.to_string(),
        }
    }

    pub fn render_term(&self, term: TermRef<'_>) -> String {
        match term {
            TermRef::NamedNode(node) => self.render_named_node(node),
            TermRef::Literal(literal) => self.render_literal(literal),
            other => other.to_string(),
        }
    }
}

impl Default for PrefixMap {
    fn default() -> Self {
        Self::standard(DEFAULT_BASE, &mapping_namespace(DEFAULT_BASE))
    }
}

/// Mapping namespace derived from a base namespace
pub fn mapping_namespace(base: &str) -> String {
    format!("{}mapping/", base)
}

fn is_plain_local_name(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Escape a string for embedding in a quoted literal
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Upper-case the first character
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether an IRI lives under a well-known vocabulary root
pub fn is_known_vocabulary(iri: &str, extra: &[String]) -> bool {
    KNOWN_VOCABULARIES.iter().any(|root| iri.starts_with(root))
        || extra.iter().any(|root| iri.starts_with(root.as_str()))
}
