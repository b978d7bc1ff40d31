//! Individual quality checks
//!
//! Every check reads a [`GraphProfile`] and appends findings and metrics to
//! the report it is given.

use indexmap::{IndexMap, IndexSet};
use oxrdf::vocab::rdf;
use oxrdf::{NamedNodeRef, SubjectRef, TermRef};
use rdflift_core::namespace::{is_known_vocabulary, XSD_NS};
use rdflift_core::{DiagnosticCode, SchemaSnapshot, TripleSet, ValidationReport};
use regex::Regex;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::LazyLock;

use crate::mapping::MappingConfiguration;

/// `scheme://rest`
static URI_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://.+").expect("valid URI regex"));

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("valid integer regex"));

const BOOLEAN_VALUES: &[&str] = &["true", "false", "0", "1"];

const SUSPICIOUS_CHARS: &[char] = &['<', '>', '{', '}', '|', '\\', '^', '`'];

/// XSD datatypes accepted without a warning
pub const STANDARD_DATATYPES: &[&str] = &[
    "string", "integer", "decimal", "float", "double", "boolean", "date", "dateTime", "time",
    "gYear", "gMonth", "gDay",
];

/// Completeness below this percentage is a warning
pub const COMPLETENESS_THRESHOLD: f64 = 90.0;

/// Subjects-to-triples ratio below this is a warning
pub const DIVERSITY_THRESHOLD: f64 = 0.1;

const EXAMPLES: usize = 3;

/// Counts gathered in one pass over a graph
pub struct GraphProfile<'a> {
    graph: &'a TripleSet,
    subjects: IndexSet<SubjectRef<'a>>,
    predicates: HashSet<NamedNodeRef<'a>>,
    objects: HashSet<TermRef<'a>>,
    literals: usize,
    references: usize,
}

impl<'a> GraphProfile<'a> {
    pub fn new(graph: &'a TripleSet) -> Self {
        let mut profile = Self {
            graph,
            subjects: IndexSet::new(),
            predicates: HashSet::new(),
            objects: HashSet::new(),
            literals: 0,
            references: 0,
        };
        for quad in graph.iter() {
            profile.subjects.insert(quad.subject);
            profile.predicates.insert(quad.predicate);
            profile.objects.insert(quad.object);
            match quad.object {
                TermRef::Literal(_) => profile.literals += 1,
                TermRef::NamedNode(_) => profile.references += 1,
                _ => {}
            }
        }
        profile
    }

    pub fn total(&self) -> usize {
        self.graph.len()
    }

    pub fn unique_subjects(&self) -> usize {
        self.subjects.len()
    }

    /// Fill the graph-shape metrics
    pub fn record_metrics(&self, report: &mut ValidationReport) {
        let total = self.total();
        let metrics = &mut report.metrics;
        metrics.total_triples = total;
        metrics.unique_subjects = self.subjects.len();
        metrics.unique_predicates = self.predicates.len();
        metrics.unique_objects = self
            .objects
            .iter()
            .filter(|o| matches!(o, TermRef::NamedNode(_)))
            .count();

        if !self.subjects.is_empty() {
            metrics.information_density = total as f64 / self.subjects.len() as f64;
        }
        if total > 0 {
            metrics.literal_percentage = percentage(self.literals, total);
            metrics.reference_percentage = percentage(self.references, total);
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64 * 100.0
}

/// First few items, comma separated
fn examples<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .take(EXAMPLES)
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn structure(profile: &GraphProfile<'_>, report: &mut ValidationReport) {
    let total = profile.total();
    if total == 0 {
        report.add_error(DiagnosticCode::NoData, "The graph contains no triples");
        return;
    }

    let ratio = profile.unique_subjects() as f64 / total as f64;
    if ratio < DIVERSITY_THRESHOLD {
        report.add_warning(
            DiagnosticCode::LowDiversity,
            format!(
                "Low subject diversity: {} distinct subjects for {} triples ({:.1}%)",
                profile.unique_subjects(),
                total,
                ratio * 100.0
            ),
        );
    }
    report.add_passed(
        DiagnosticCode::Structure,
        format!("Graph structure: {} distinct subjects", profile.unique_subjects()),
    );
}

pub fn uris(profile: &GraphProfile<'_>, report: &mut ValidationReport) {
    let mut seen = IndexSet::new();
    for quad in profile.graph.iter() {
        if let SubjectRef::NamedNode(node) = quad.subject {
            seen.insert(node.as_str());
        }
        if let TermRef::NamedNode(node) = quad.object {
            seen.insert(node.as_str());
        }
    }

    let invalid: Vec<&str> = seen
        .iter()
        .copied()
        .filter(|iri| !URI_SHAPE.is_match(iri))
        .collect();
    let suspicious: Vec<&str> = seen
        .iter()
        .copied()
        .filter(|iri| iri.chars().any(|c| c.is_whitespace() || SUSPICIOUS_CHARS.contains(&c)))
        .collect();

    if !invalid.is_empty() {
        report.add_error(
            DiagnosticCode::InvalidUri,
            format!("{} invalid URIs. Examples: {}", invalid.len(), examples(&invalid)),
        );
    }
    if !suspicious.is_empty() {
        report.add_warning(
            DiagnosticCode::SuspiciousUri,
            format!(
                "{} URIs contain suspicious characters. Examples: {}",
                suspicious.len(),
                examples(&suspicious)
            ),
        );
    }
    if invalid.is_empty() && suspicious.is_empty() {
        report.add_passed(
            DiagnosticCode::UriValidation,
            format!("All {} URIs are well formed", seen.len()),
        );
    }
}

pub fn referential_integrity(
    profile: &GraphProfile<'_>,
    extra_vocabularies: &[String],
    report: &mut ValidationReport,
) {
    let defined: HashSet<&str> = profile
        .subjects
        .iter()
        .filter_map(|s| match s {
            SubjectRef::NamedNode(node) => Some(node.as_str()),
            _ => None,
        })
        .collect();

    let mut referenced = IndexSet::new();
    for quad in profile.graph.iter() {
        if let TermRef::NamedNode(node) = quad.object {
            if !is_known_vocabulary(node.as_str(), extra_vocabularies) {
                referenced.insert(node.as_str());
            }
        }
    }
    let broken: Vec<&str> = referenced
        .iter()
        .copied()
        .filter(|iri| !defined.contains(iri))
        .collect();

    report.metrics.defined_resources = defined.len();
    report.metrics.external_references = referenced.len();
    report.metrics.broken_references = broken.len();

    if broken.is_empty() {
        report.add_passed(
            DiagnosticCode::ReferentialIntegrity,
            format!("All {} references resolve", referenced.len()),
        );
    } else {
        report.add_warning(
            DiagnosticCode::BrokenReference,
            format!(
                "{} references to undefined resources. Examples: {}",
                broken.len(),
                examples(&broken)
            ),
        );
    }
}

pub fn datatypes(profile: &GraphProfile<'_>, report: &mut ValidationReport) {
    let mut unknown_count = 0;
    let mut unknown = IndexSet::new();
    let mut mismatches = 0;

    for quad in profile.graph.iter() {
        let TermRef::Literal(literal) = quad.object else {
            continue;
        };
        let Some(local) = literal.datatype().as_str().strip_prefix(XSD_NS) else {
            continue;
        };
        let value = literal.value();
        if !STANDARD_DATATYPES.contains(&local) {
            unknown_count += 1;
            unknown.insert(format!("xsd:{}", local));
            continue;
        }
        let mismatch = match local {
            "integer" => !INTEGER.is_match(value),
            "boolean" => !BOOLEAN_VALUES.contains(&value),
            _ => false,
        };
        if mismatch {
            mismatches += 1;
            report.add_warning(
                DiagnosticCode::DatatypeMismatch,
                format!("\"{}\" is not a valid xsd:{} value", value, local),
            );
        }
    }

    if unknown_count > 0 {
        report.add_warning(
            DiagnosticCode::UnknownDatatype,
            format!(
                "{} literals use non-standard XSD datatypes: {}",
                unknown_count,
                examples(&unknown)
            ),
        );
    }
    if unknown_count == 0 && mismatches == 0 {
        report.add_passed(DiagnosticCode::Datatypes, "Literal datatypes are valid");
    }
}

#[derive(Default)]
struct SubjectShape<'a> {
    predicates: HashSet<NamedNodeRef<'a>>,
    repeats: bool,
    typed: bool,
}

pub fn consistency(profile: &GraphProfile<'_>, report: &mut ValidationReport) {
    let mut shapes: IndexMap<SubjectRef<'_>, SubjectShape<'_>> = IndexMap::new();
    for quad in profile.graph.iter() {
        let shape = shapes.entry(quad.subject).or_default();
        if !shape.predicates.insert(quad.predicate) {
            shape.repeats = true;
        }
        if quad.predicate == rdf::TYPE {
            shape.typed = true;
        }
    }

    let repeating: Vec<String> = shapes
        .iter()
        .filter(|(_, s)| s.repeats)
        .map(|(subject, _)| subject.to_string())
        .collect();
    let untyped: Vec<String> = shapes
        .iter()
        .filter(|(_, s)| !s.typed)
        .map(|(subject, _)| subject.to_string())
        .collect();

    if !repeating.is_empty() {
        report.add_warning(
            DiagnosticCode::DuplicateProperties,
            format!(
                "{} subjects repeat a property. Examples: {}",
                repeating.len(),
                examples(&repeating)
            ),
        );
    }
    if !untyped.is_empty() {
        report.add_warning(
            DiagnosticCode::MissingType,
            format!(
                "{} subjects have no rdf:type. Examples: {}",
                untyped.len(),
                examples(&untyped)
            ),
        );
    }
    if repeating.is_empty() && untyped.is_empty() {
        report.add_passed(
            DiagnosticCode::Consistency,
            "Every subject is typed and uses each property once",
        );
    }
}

/// Rows the schema says should appear, restricted to mapped tables when the
/// mapping names any table of the schema; unknown row counts add nothing
pub fn expected_resources(schema: &SchemaSnapshot, mapping: Option<&MappingConfiguration>) -> u64 {
    let mapped: Vec<&str> = mapping.map(|m| m.table_names()).unwrap_or_default();
    let restrict = mapped.iter().any(|t| schema.find_table(t).is_some());

    schema
        .tables
        .iter()
        .filter(|t| !restrict || mapped.contains(&t.name.as_str()))
        .filter_map(|t| t.row_count)
        .sum()
}

pub fn completeness(
    profile: &GraphProfile<'_>,
    schema: &SchemaSnapshot,
    mapping: Option<&MappingConfiguration>,
    report: &mut ValidationReport,
) {
    let expected = expected_resources(schema, mapping);
    let found = profile.unique_subjects();
    let completeness = if expected == 0 {
        100.0
    } else {
        // one decimal, as reported
        (found as f64 / expected as f64 * 1000.0).round() / 10.0
    };

    report.metrics.expected_resources = Some(expected);
    report.metrics.completeness = Some(completeness);

    let message = format!(
        "Completeness {:.1}%: {} resources found for {} expected rows",
        completeness, found, expected
    );
    if completeness < COMPLETENESS_THRESHOLD {
        report.add_warning(DiagnosticCode::LowCompleteness, message);
    } else {
        report.add_passed(DiagnosticCode::Completeness, message);
    }
}
