//! RDF quality validation
//!
//! The full pipeline runs, in order: syntax, structure, URIs, referential
//! integrity, datatypes, consistency and (with a schema) completeness, then
//! fills the metrics and the score. A syntax failure ends the run with a
//! score of 0. Each call builds a fresh report.

pub mod checks;

use crate::mapping::MappingConfiguration;
use checks::GraphProfile;
use rdflift_core::{
    syntax, Config, DiagnosticCode, RdfFormat, SchemaSnapshot, TripleSet, ValidationReport,
};
use std::time::Instant;

/// Scores RDF text or graphs
#[derive(Debug, Clone, Default)]
pub struct QualityValidator {
    /// Namespace roots besides the W3C and xmlns.com ones whose IRIs are not
    /// expected to be defined locally
    extra_vocabularies: Vec<String>,
}

impl QualityValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            extra_vocabularies: config.validation.extra_vocabularies.clone(),
        }
    }

    pub fn with_vocabulary(mut self, root: impl Into<String>) -> Self {
        self.extra_vocabularies.push(root.into());
        self
    }

    /// Full validation of serialized RDF
    pub fn validate(
        &self,
        text: &str,
        format: RdfFormat,
        mapping: Option<&MappingConfiguration>,
        schema: Option<&SchemaSnapshot>,
    ) -> ValidationReport {
        let started = Instant::now();
        let (graph, mut report) = match parse(text, format) {
            Ok(parsed) => parsed,
            Err(failed) => return finish(failed, started),
        };
        self.run(&graph, mapping, schema, &mut report);
        finish(report, started)
    }

    /// Full validation of an in-memory graph, without the syntax step
    pub fn validate_graph(
        &self,
        graph: &TripleSet,
        mapping: Option<&MappingConfiguration>,
        schema: Option<&SchemaSnapshot>,
    ) -> ValidationReport {
        let started = Instant::now();
        let mut report = ValidationReport::new();
        self.run(graph, mapping, schema, &mut report);
        finish(report, started)
    }

    /// Syntax and structure only
    pub fn validate_quick(&self, text: &str, format: RdfFormat) -> ValidationReport {
        let started = Instant::now();
        let (graph, mut report) = match parse(text, format) {
            Ok(parsed) => parsed,
            Err(failed) => return finish(failed, started),
        };
        let profile = GraphProfile::new(&graph);
        checks::structure(&profile, &mut report);
        profile.record_metrics(&mut report);
        finish(report, started)
    }

    /// Syntax and completeness only
    pub fn check_completeness(
        &self,
        text: &str,
        format: RdfFormat,
        schema: &SchemaSnapshot,
        mapping: Option<&MappingConfiguration>,
    ) -> ValidationReport {
        let started = Instant::now();
        let (graph, mut report) = match parse(text, format) {
            Ok(parsed) => parsed,
            Err(failed) => return finish(failed, started),
        };
        let profile = GraphProfile::new(&graph);
        checks::completeness(&profile, schema, mapping, &mut report);
        profile.record_metrics(&mut report);
        finish(report, started)
    }

    fn run(
        &self,
        graph: &TripleSet,
        mapping: Option<&MappingConfiguration>,
        schema: Option<&SchemaSnapshot>,
        report: &mut ValidationReport,
    ) {
        let profile = GraphProfile::new(graph);
        checks::structure(&profile, report);
        checks::uris(&profile, report);
        checks::referential_integrity(&profile, &self.extra_vocabularies, report);
        checks::datatypes(&profile, report);
        checks::consistency(&profile, report);
        if let Some(schema) = schema {
            checks::completeness(&profile, schema, mapping, report);
        }
        profile.record_metrics(report);
    }
}

/// Parsed graph and a report carrying the passed syntax check, or the
/// terminal syntax failure report
fn parse(text: &str, format: RdfFormat) -> Result<(TripleSet, ValidationReport), ValidationReport> {
    match syntax::parse(text, format) {
        Ok(graph) => {
            let mut report = ValidationReport::new();
            report.add_passed(
                DiagnosticCode::Syntax,
                format!("Valid {} syntax: {} triples parsed", format.name(), graph.len()),
            );
            Ok((graph, report))
        }
        Err(e) => {
            tracing::debug!("syntax check failed: {}", e);
            Err(ValidationReport::syntax_failure(format!("Syntax error: {}", e.message)))
        }
    }
}

fn finish(mut report: ValidationReport, started: Instant) -> ValidationReport {
    report.metrics.validation_time = started.elapsed().as_secs_f64();
    tracing::info!(
        score = report.score,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validation finished"
    );
    report
}
