//! Mapping configuration model
//!
//! A [`MappingDocument`] is the configuration as read from JSON: every field
//! is optional so that validation can report everything that is wrong with
//! it at once. A [`MappingConfiguration`] is the checked form the generator
//! and the executor work on, with parsed templates and absolute IRIs.

use super::template::{Template, TemplateError};
use oxrdf::{Literal, NamedNode};
use rdflift_core::namespace::{RDFS_NS, RDF_NS, RR_NS, XSD_NS};
use rdflift_core::{Diagnostic, DiagnosticCode, Location, PrefixMap, SerializeError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Errors raised while loading, generating or executing a mapping
#[derive(Debug, thiserror::Error)]
pub enum MappingConfigError {
    #[error("Failed to read mapping configuration: {0}")]
    IoError(String),

    #[error("Failed to parse mapping configuration: {0}")]
    ParseError(String),

    #[error("Invalid mapping configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("Triples map '{triples_map}' references unknown parent triples map '{parent}'")]
    UnresolvedParent { triples_map: String, parent: String },

    #[error("Table '{0}' has a composite primary key")]
    CompositeKey(String),

    #[error("Table '{0}' has no columns")]
    NoColumns(String),

    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),

    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

// ---------------------------------------------------------------------------
// Raw document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triples_maps: Option<Vec<TriplesMapDocument>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriplesMapDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_table: Option<LogicalTableDocument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_map: Option<SubjectMapDocument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate_object_maps: Option<Vec<PredicateObjectMapDocument>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalTableDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_query: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectMapDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredicateObjectMapDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_map: Option<ObjectMapDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMapDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_triples_map: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_condition: Option<JoinConditionDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinConditionDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// One problem found in a mapping document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub code: DiagnosticCode,
    pub triples_map: Option<String>,

    /// Predicate-object map position
    pub index: Option<usize>,

    pub message: String,
}

impl ConfigIssue {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code, self.message.clone());
        if let Some(id) = &self.triples_map {
            let mut location = Location::triples_map(id);
            if let Some(index) = self.index {
                location = location.with_index(index);
            }
            diag = diag.with_location(location);
        }
        diag
    }
}

/// Result of checking a mapping document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigValidation {
    pub valid: bool,
    pub errors: Vec<String>,

    #[serde(skip)]
    pub issues: Vec<ConfigIssue>,
}

impl ConfigValidation {
    fn from_issues(issues: Vec<ConfigIssue>) -> Self {
        Self {
            valid: issues.is_empty(),
            errors: issues.iter().map(|i| i.message.clone()).collect(),
            issues,
        }
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.issues.iter().map(ConfigIssue::to_diagnostic).collect()
    }
}

impl MappingDocument {
    pub fn from_json(json: &str) -> Result<Self, MappingConfigError> {
        serde_json::from_str(json).map_err(|e| MappingConfigError::ParseError(e.to_string()))
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self, MappingConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MappingConfigError::IoError(e.to_string()))?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check the document, collecting every problem
    pub fn validate(&self) -> ConfigValidation {
        let (issues, _) = Checker::new().check(self);
        ConfigValidation::from_issues(issues)
    }

    /// Checked configuration, or every problem found
    pub fn to_configuration(&self) -> Result<MappingConfiguration, MappingConfigError> {
        let (issues, maps) = Checker::new().check(self);
        if issues.is_empty() {
            Ok(MappingConfiguration {
                triples_maps: maps,
            })
        } else {
            Err(MappingConfigError::Invalid(
                issues.into_iter().map(|i| i.message).collect(),
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Checked configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingConfiguration {
    pub triples_maps: Vec<TriplesMap>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplesMap {
    pub id: String,
    pub logical_table: LogicalTable,
    pub subject_map: SubjectMap,
    pub predicate_object_maps: Vec<PredicateObjectMap>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalTable {
    Table(String),
    Query(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectTerm {
    Template(Template),
    Column(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectMap {
    pub term: SubjectTerm,
    pub classes: Vec<NamedNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateObjectMap {
    pub predicate: NamedNode,
    pub object_map: ObjectMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectMap {
    /// Literal from a column; at most one of `datatype` and `language`
    Column {
        column: String,
        datatype: Option<NamedNode>,
        language: Option<String>,
    },
    /// IRI built from a template
    Template(Template),
    /// Fixed literal
    Constant(String),
    /// Subject of another triples map
    Reference {
        parent: String,
        join: Option<JoinCondition>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCondition {
    pub child: String,
    pub parent: String,
}

impl LogicalTable {
    pub fn table_name(&self) -> Option<&str> {
        match self {
            Self::Table(name) => Some(name),
            Self::Query(_) => None,
        }
    }
}

impl TriplesMap {
    pub fn new(id: impl Into<String>, logical_table: LogicalTable, subject_map: SubjectMap) -> Self {
        Self {
            id: id.into(),
            logical_table,
            subject_map,
            predicate_object_maps: Vec::new(),
        }
    }

    pub fn with_predicate_object_map(mut self, predicate: NamedNode, object_map: ObjectMap) -> Self {
        self.predicate_object_maps.push(PredicateObjectMap {
            predicate,
            object_map,
        });
        self
    }

    /// Parent triples maps this map refers to
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.predicate_object_maps
            .iter()
            .filter_map(|pom| match &pom.object_map {
                ObjectMap::Reference { parent, .. } => Some(parent.as_str()),
                _ => None,
            })
    }

    pub fn to_document(&self) -> TriplesMapDocument {
        let logical_table = match &self.logical_table {
            LogicalTable::Table(name) => LogicalTableDocument {
                table_name: Some(name.clone()),
                sql_query: None,
            },
            LogicalTable::Query(query) => LogicalTableDocument {
                table_name: None,
                sql_query: Some(query.clone()),
            },
        };

        let mut subject_map = SubjectMapDocument {
            classes: self
                .subject_map
                .classes
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            ..SubjectMapDocument::default()
        };
        match &self.subject_map.term {
            SubjectTerm::Template(t) => subject_map.template = Some(t.as_str().to_string()),
            SubjectTerm::Column(c) => subject_map.column = Some(c.clone()),
        }

        let predicate_object_maps = self
            .predicate_object_maps
            .iter()
            .map(|pom| PredicateObjectMapDocument {
                predicate: Some(pom.predicate.as_str().to_string()),
                object_map: Some(object_map_document(&pom.object_map)),
            })
            .collect();

        TriplesMapDocument {
            id: Some(self.id.clone()),
            logical_table: Some(logical_table),
            subject_map: Some(subject_map),
            predicate_object_maps: Some(predicate_object_maps),
        }
    }
}

fn object_map_document(object_map: &ObjectMap) -> ObjectMapDocument {
    let mut doc = ObjectMapDocument::default();
    match object_map {
        ObjectMap::Column {
            column,
            datatype,
            language,
        } => {
            doc.column = Some(column.clone());
            doc.datatype = datatype.as_ref().map(|d| d.as_str().to_string());
            doc.language = language.clone();
        }
        ObjectMap::Template(t) => doc.template = Some(t.as_str().to_string()),
        ObjectMap::Constant(value) => doc.constant = Some(value.clone()),
        ObjectMap::Reference { parent, join } => {
            doc.parent_triples_map = Some(parent.clone());
            doc.join_condition = join.as_ref().map(|j| JoinConditionDocument {
                child: Some(j.child.clone()),
                parent: Some(j.parent.clone()),
            });
        }
    }
    doc
}

impl MappingConfiguration {
    pub fn new(triples_maps: Vec<TriplesMap>) -> Self {
        Self { triples_maps }
    }

    /// Load and check a JSON mapping configuration
    pub fn from_json(json: &str) -> Result<Self, MappingConfigError> {
        MappingDocument::from_json(json)?.to_configuration()
    }

    pub fn find(&self, id: &str) -> Option<&TriplesMap> {
        self.triples_maps.iter().find(|tm| tm.id == id)
    }

    /// Tables named by table-based logical tables
    pub fn table_names(&self) -> Vec<&str> {
        self.triples_maps
            .iter()
            .filter_map(|tm| tm.logical_table.table_name())
            .collect()
    }

    /// First parent reference that resolves neither here nor in `linked`
    pub fn check_parents(&self, linked: &[&MappingConfiguration]) -> Result<(), MappingConfigError> {
        let known: HashSet<&str> = self
            .triples_maps
            .iter()
            .chain(linked.iter().flat_map(|c| c.triples_maps.iter()))
            .map(|tm| tm.id.as_str())
            .collect();

        for tm in &self.triples_maps {
            if let Some(parent) = tm.parents().find(|p| !known.contains(p)) {
                return Err(MappingConfigError::UnresolvedParent {
                    triples_map: tm.id.clone(),
                    parent: parent.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn to_document(&self) -> MappingDocument {
        MappingDocument {
            triples_maps: Some(self.triples_maps.iter().map(TriplesMap::to_document).collect()),
        }
    }
}

// ---------------------------------------------------------------------------
// Checking
// ---------------------------------------------------------------------------

struct Checker {
    issues: Vec<ConfigIssue>,
    vocabularies: PrefixMap,
}

/// Where an issue was found
#[derive(Clone, Copy)]
struct At<'a> {
    id: Option<&'a str>,
    position: usize,
    index: Option<usize>,
}

impl At<'_> {
    fn label(&self) -> String {
        let map = match self.id {
            Some(id) => format!("TriplesMap '{}'", id),
            None => format!("TriplesMap #{}", self.position),
        };
        match self.index {
            Some(i) => format!("{} predicateObjectMap {}", map, i),
            None => map,
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl Checker {
    fn new() -> Self {
        Self {
            issues: Vec::new(),
            vocabularies: PrefixMap::empty()
                .with("rr", RR_NS)
                .with("rdf", RDF_NS)
                .with("rdfs", RDFS_NS)
                .with("xsd", XSD_NS),
        }
    }

    fn report(&mut self, code: DiagnosticCode, at: At<'_>, message: impl std::fmt::Display) {
        self.issues.push(ConfigIssue {
            code,
            triples_map: at.id.map(str::to_string),
            index: at.index,
            message: format!("{}: {}", at.label(), message),
        });
    }

    /// Absolute IRI, expanding the vocabulary prefixes `rr`, `rdf`, `rdfs` and `xsd`
    fn iri(&self, value: &str) -> Option<NamedNode> {
        let expanded = self
            .vocabularies
            .expand(value)
            .unwrap_or_else(|| value.to_string());
        NamedNode::new(expanded).ok()
    }

    fn check(mut self, doc: &MappingDocument) -> (Vec<ConfigIssue>, Vec<TriplesMap>) {
        let mut maps = Vec::new();
        let Some(documents) = doc.triples_maps.as_ref().filter(|m| !m.is_empty()) else {
            self.issues.push(ConfigIssue {
                code: DiagnosticCode::R2rmlNoTriplesMaps,
                triples_map: None,
                index: None,
                message: "Mapping configuration has no triples maps".to_string(),
            });
            return (self.issues, maps);
        };

        let mut seen = HashSet::new();
        for (position, tm) in documents.iter().enumerate() {
            let id = present(&tm.id);
            let at = At {
                id,
                position,
                index: None,
            };

            match id {
                None => self.report(DiagnosticCode::R2rmlMissingId, at, "id is missing"),
                Some(id) if !seen.insert(id) => {
                    self.report(DiagnosticCode::R2rmlDuplicateId, at, "duplicate id")
                }
                Some(_) => {}
            }

            let logical_table = self.logical_table(tm.logical_table.as_ref(), at);
            let subject_map = self.subject_map(tm.subject_map.as_ref(), at);

            let mut predicate_object_maps = Some(Vec::new());
            match tm.predicate_object_maps.as_deref() {
                None | Some([]) => {
                    self.report(
                        DiagnosticCode::R2rmlNoPredicateObjectMaps,
                        at,
                        "predicateObjectMaps is missing or empty",
                    );
                    predicate_object_maps = None;
                }
                Some(poms) => {
                    for (index, pom) in poms.iter().enumerate() {
                        let at = At {
                            index: Some(index),
                            ..at
                        };
                        match self.predicate_object_map(pom, at) {
                            Some(checked) => {
                                if let Some(list) = predicate_object_maps.as_mut() {
                                    list.push(checked);
                                }
                            }
                            None => predicate_object_maps = None,
                        }
                    }
                }
            }

            if let (Some(id), Some(logical_table), Some(subject_map), Some(predicate_object_maps)) =
                (id, logical_table, subject_map, predicate_object_maps)
            {
                maps.push(TriplesMap {
                    id: id.to_string(),
                    logical_table,
                    subject_map,
                    predicate_object_maps,
                });
            }
        }

        (self.issues, maps)
    }

    fn logical_table(&mut self, doc: Option<&LogicalTableDocument>, at: At<'_>) -> Option<LogicalTable> {
        let Some(doc) = doc else {
            self.report(DiagnosticCode::R2rmlLogicalTable, at, "logicalTable is missing");
            return None;
        };
        match (present(&doc.table_name), present(&doc.sql_query)) {
            (Some(table), None) => Some(LogicalTable::Table(table.to_string())),
            (None, Some(query)) => Some(LogicalTable::Query(query.to_string())),
            (None, None) => {
                self.report(
                    DiagnosticCode::R2rmlLogicalTable,
                    at,
                    "logicalTable needs a tableName or a sqlQuery",
                );
                None
            }
            (Some(_), Some(_)) => {
                self.report(
                    DiagnosticCode::R2rmlLogicalTable,
                    at,
                    "logicalTable sets both tableName and sqlQuery",
                );
                None
            }
        }
    }

    fn subject_map(&mut self, doc: Option<&SubjectMapDocument>, at: At<'_>) -> Option<SubjectMap> {
        let Some(doc) = doc else {
            self.report(DiagnosticCode::R2rmlSubjectMap, at, "subjectMap is missing");
            return None;
        };

        let term = match (present(&doc.template), present(&doc.column)) {
            (Some(template), None) => self
                .template(template, at, "subjectMap")
                .map(SubjectTerm::Template),
            (None, Some(column)) => Some(SubjectTerm::Column(column.to_string())),
            (None, None) => {
                self.report(
                    DiagnosticCode::R2rmlSubjectMap,
                    at,
                    "subjectMap needs a template or a column",
                );
                None
            }
            (Some(_), Some(_)) => {
                self.report(
                    DiagnosticCode::R2rmlSubjectMap,
                    at,
                    "subjectMap sets both template and column",
                );
                None
            }
        };

        let mut classes = Vec::new();
        let mut classes_ok = true;
        for class in &doc.classes {
            match self.iri(class) {
                Some(iri) => classes.push(iri),
                None => {
                    classes_ok = false;
                    self.report(
                        DiagnosticCode::R2rmlSubjectMap,
                        at,
                        format!("class '{}' is not an absolute IRI", class),
                    );
                }
            }
        }

        let term = term?;
        classes_ok.then_some(SubjectMap { term, classes })
    }

    fn template(&mut self, source: &str, at: At<'_>, owner: &str) -> Option<Template> {
        Template::parse(source)
            .map_err(|e: TemplateError| {
                self.report(
                    DiagnosticCode::R2rmlTemplateSyntax,
                    at,
                    format!("{} template '{}': {}", owner, source, e),
                )
            })
            .ok()
    }

    fn predicate_object_map(
        &mut self,
        doc: &PredicateObjectMapDocument,
        at: At<'_>,
    ) -> Option<PredicateObjectMap> {
        let predicate = match present(&doc.predicate) {
            None => {
                self.report(DiagnosticCode::R2rmlMissingPredicate, at, "predicate is missing");
                None
            }
            Some(p) => {
                let iri = self.iri(p);
                if iri.is_none() {
                    self.report(
                        DiagnosticCode::R2rmlMissingPredicate,
                        at,
                        format!("predicate '{}' is not an absolute IRI", p),
                    );
                }
                iri
            }
        };

        let object_map = match &doc.object_map {
            None => {
                self.report(DiagnosticCode::R2rmlObjectMap, at, "objectMap is missing");
                None
            }
            Some(om) => self.object_map(om, at),
        };

        Some(PredicateObjectMap {
            predicate: predicate?,
            object_map: object_map?,
        })
    }

    fn object_issue(&mut self, at: At<'_>, message: String) {
        self.report(DiagnosticCode::R2rmlObjectMap, at, message);
    }

    fn object_map(&mut self, doc: &ObjectMapDocument, at: At<'_>) -> Option<ObjectMap> {
        let kinds: Vec<&str> = [
            ("column", doc.column.is_some()),
            ("template", doc.template.is_some()),
            ("constant", doc.constant.is_some()),
            ("parentTriplesMap", doc.parent_triples_map.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect();

        let before = self.issues.len();

        if kinds.len() != 1 {
            let mut message =
                "objectMap must set exactly one of column, template, constant or parentTriplesMap"
                    .to_string();
            if kinds.len() > 1 {
                message.push_str(&format!(" (found: {})", kinds.join(", ")));
            }
            self.object_issue(at, message);
            return None;
        }

        let kind = kinds[0];
        if kind != "column" && (doc.datatype.is_some() || doc.language.is_some()) {
            self.object_issue(at, "datatype and language only apply to column object maps".to_string());
        }
        if kind != "parentTriplesMap" && doc.join_condition.is_some() {
            self.object_issue(at, "joinCondition requires parentTriplesMap".to_string());
        }

        let object_map = match kind {
            "column" => {
                let column = doc.column.clone().unwrap_or_default();
                if column.trim().is_empty() {
                    self.object_issue(at, "column name is empty".to_string());
                }
                if doc.datatype.is_some() && doc.language.is_some() {
                    self.object_issue(at, "datatype and language are mutually exclusive".to_string());
                }
                let datatype = match doc.datatype.as_deref() {
                    Some(d) => {
                        let iri = self.iri(d);
                        if iri.is_none() {
                            self.object_issue(at, format!("datatype '{}' is not an absolute IRI", d));
                        }
                        iri
                    }
                    None => None,
                };
                if let Some(language) = doc.language.as_deref() {
                    if Literal::new_language_tagged_literal("", language).is_err() {
                        self.object_issue(at, format!("language '{}' is not a valid language tag", language));
                    }
                }
                ObjectMap::Column {
                    column,
                    datatype,
                    language: doc.language.clone(),
                }
            }
            "template" => {
                let source = doc.template.as_deref().unwrap_or_default();
                ObjectMap::Template(self.template(source, at, "objectMap")?)
            }
            "constant" => ObjectMap::Constant(doc.constant.clone().unwrap_or_default()),
            _ => {
                let parent = doc.parent_triples_map.clone().unwrap_or_default();
                if parent.trim().is_empty() {
                    self.object_issue(at, "parentTriplesMap is empty".to_string());
                }
                let join = match &doc.join_condition {
                    None => None,
                    Some(j) => match (present(&j.child), present(&j.parent)) {
                        (Some(child), Some(parent)) => Some(JoinCondition {
                            child: child.to_string(),
                            parent: parent.to_string(),
                        }),
                        _ => {
                            self.object_issue(at, "joinCondition needs both child and parent".to_string());
                            None
                        }
                    },
                };
                ObjectMap::Reference { parent, join }
            }
        };

        (self.issues.len() == before).then_some(object_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_json() -> &'static str {
        r#"{
          "triplesMaps": [{
            "id": "TriplesMap_users",
            "logicalTable": { "tableName": "users" },
            "subjectMap": { "template": "http://ex.org/users/{id}", "classes": ["http://ex.org/Users"] },
            "predicateObjectMaps": [
              { "predicate": "http://ex.org/email", "objectMap": { "column": "email", "datatype": "xsd:string" } },
              { "predicate": "http://ex.org/dept", "objectMap": {
                  "parentTriplesMap": "TriplesMap_departments",
                  "joinCondition": { "child": "dept_id", "parent": "id" } } }
            ]
          }]
        }"#
    }

    #[test]
    fn valid_document_converts() {
        let doc = MappingDocument::from_json(valid_json()).unwrap();
        let validation = doc.validate();
        assert!(validation.valid, "{:?}", validation.errors);

        let config = doc.to_configuration().unwrap();
        let tm = &config.triples_maps[0];
        assert_eq!(tm.logical_table, LogicalTable::Table("users".to_string()));
        assert_eq!(
            tm.predicate_object_maps[0].object_map,
            ObjectMap::Column {
                column: "email".to_string(),
                datatype: Some(NamedNode::new_unchecked(
                    "http://www.w3.org/2001/XMLSchema#string"
                )),
                language: None,
            }
        );
        assert_eq!(tm.parents().collect::<Vec<_>>(), vec!["TriplesMap_departments"]);
    }

    #[test]
    fn missing_predicate_object_maps_is_one_error() {
        let doc = MappingDocument::from_json(
            r#"{ "triplesMaps": [{
                "id": "TriplesMap_users",
                "logicalTable": { "tableName": "users" },
                "subjectMap": { "template": "http://ex.org/users/{id}" }
            }] }"#,
        )
        .unwrap();

        let validation = doc.validate();
        assert!(!validation.valid);
        assert_eq!(validation.errors.len(), 1);
        assert!(validation.errors[0].contains("TriplesMap_users"));
        assert_eq!(
            validation.issues[0].code,
            DiagnosticCode::R2rmlNoPredicateObjectMaps
        );
    }

    #[test]
    fn empty_document() {
        let validation = MappingDocument::default().validate();
        assert_eq!(validation.errors, vec!["Mapping configuration has no triples maps"]);
    }

    #[test]
    fn reports_every_problem() {
        let doc = MappingDocument::from_json(
            r#"{ "triplesMaps": [
                { "id": "a",
                  "logicalTable": { "tableName": "t", "sqlQuery": "SELECT 1" },
                  "subjectMap": { "template": "http://ex.org/{id" },
                  "predicateObjectMaps": [
                    { "objectMap": { "column": "x", "constant": "y" } },
                    { "predicate": "http://ex.org/p", "objectMap": { "column": "x", "datatype": "xsd:int", "language": "en" } }
                  ] },
                { "id": "a", "logicalTable": { "tableName": "t" },
                  "subjectMap": { "column": "iri" },
                  "predicateObjectMaps": [ { "predicate": "http://ex.org/p", "objectMap": { "constant": "c" } } ] },
                { "logicalTable": { "tableName": "t" } }
            ] }"#,
        )
        .unwrap();

        let validation = doc.validate();
        let codes: Vec<DiagnosticCode> = validation.issues.iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![
                DiagnosticCode::R2rmlLogicalTable,
                DiagnosticCode::R2rmlTemplateSyntax,
                DiagnosticCode::R2rmlMissingPredicate,
                DiagnosticCode::R2rmlObjectMap,
                DiagnosticCode::R2rmlObjectMap,
                DiagnosticCode::R2rmlDuplicateId,
                DiagnosticCode::R2rmlMissingId,
                DiagnosticCode::R2rmlSubjectMap,
                DiagnosticCode::R2rmlNoPredicateObjectMaps,
            ]
        );
        assert!(validation.errors[3].contains("found: column, constant"));
        assert!(validation.errors[6].starts_with("TriplesMap #2"));
        assert!(doc.to_configuration().is_err());
    }

    #[test]
    fn language_tag_is_checked() {
        let doc = MappingDocument::from_json(
            r#"{ "triplesMaps": [{ "id": "m", "logicalTable": { "tableName": "t" },
                "subjectMap": { "template": "http://ex.org/{id}" },
                "predicateObjectMaps": [ { "predicate": "http://ex.org/p",
                   "objectMap": { "column": "c", "language": "not a tag" } } ] }] }"#,
        )
        .unwrap();
        let validation = doc.validate();
        assert_eq!(validation.errors.len(), 1);
        assert!(validation.errors[0].contains("predicateObjectMap 0"));
    }

    #[test]
    fn document_round_trip() {
        let config = MappingConfiguration::from_json(valid_json()).unwrap();
        let again = config.to_document().to_configuration().unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn unresolved_parents() {
        let config = MappingConfiguration::from_json(valid_json()).unwrap();
        let err = config.check_parents(&[]).unwrap_err();
        assert!(matches!(
            err,
            MappingConfigError::UnresolvedParent { ref parent, .. } if parent == "TriplesMap_departments"
        ));

        let departments = MappingConfiguration::from_json(
            r#"{ "triplesMaps": [{ "id": "TriplesMap_departments",
                "logicalTable": { "tableName": "departments" },
                "subjectMap": { "template": "http://ex.org/departments/{id}" },
                "predicateObjectMaps": [ { "predicate": "http://ex.org/name", "objectMap": { "column": "name" } } ] }] }"#,
        )
        .unwrap();
        assert!(config.check_parents(&[&departments]).is_ok());
    }
}
