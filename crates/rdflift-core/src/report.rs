//! Quality report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use crate::diagnostic::{Diagnostic, DiagnosticCode, Severity};
use serde::{Deserialize, Serialize};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// One entry of the passed, warnings or errors list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub code: DiagnosticCode,
    pub message: String,
}

impl Finding {
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Numeric measurements gathered by a validation run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub total_triples: usize,
    pub unique_subjects: usize,
    pub unique_predicates: usize,
    pub unique_objects: usize,
    pub defined_resources: usize,
    pub external_references: usize,
    pub broken_references: usize,

    /// Rows the schema says should be represented
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_resources: Option<u64>,

    /// Found subjects as a percentage of expected rows (not clamped)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completeness: Option<f64>,

    /// Triples per distinct subject
    pub information_density: f64,

    /// Share of triples whose object is a literal, in percent
    pub literal_percentage: f64,

    /// Share of triples whose object is a named node, in percent
    pub reference_percentage: f64,

    /// Wall time of the run in seconds
    pub validation_time: f64,
}

/// Maximum bonus granted for passed checks
pub const MAX_PASSED_BONUS: i64 = 20;

/// Score in `[0, 100]`: 100, minus 15 per error, minus 5 per warning,
/// plus 2 per passed check up to [`MAX_PASSED_BONUS`]
pub fn quality_score(errors: usize, warnings: usize, passed: usize) -> u8 {
    let penalty = 15 * errors as i64 + 5 * warnings as i64;
    let bonus = (2 * passed as i64).min(MAX_PASSED_BONUS);
    (100 - penalty + bonus).clamp(0, 100) as u8
}

/// RDF quality report (quality-report.json v1)
///
/// Built fresh for every validation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// No errors were recorded
    pub valid: bool,

    /// Quality score, 0-100
    pub score: u8,

    pub passed: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub errors: Vec<Finding>,

    pub metrics: QualityMetrics,
}

impl ValidationReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            valid: true,
            score: quality_score(0, 0, 0),
            passed: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            metrics: QualityMetrics::default(),
        }
    }

    pub fn add_passed(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.passed.push(Finding::new(code, message));
        self.refresh();
    }

    pub fn add_warning(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.warnings.push(Finding::new(code, message));
        self.refresh();
    }

    pub fn add_error(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.errors.push(Finding::new(code, message));
        self.refresh();
    }

    /// Terminal syntax failure: one error, score 0
    pub fn syntax_failure(message: impl Into<String>) -> Self {
        let mut report = Self::new();
        report.add_error(DiagnosticCode::Syntax, message);
        report.score = 0;
        report
    }

    fn refresh(&mut self) {
        self.valid = self.errors.is_empty();
        self.score = quality_score(self.errors.len(), self.warnings.len(), self.passed.len());
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether a finding with `code` was recorded in any list
    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.passed
            .iter()
            .chain(&self.warnings)
            .chain(&self.errors)
            .any(|f| f.code == code)
    }

    /// Flatten into severity-tagged diagnostics (passed checks become info)
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let tagged = |findings: &[Finding], severity: Severity| {
            findings
                .iter()
                .map(|f| Diagnostic::new(f.code, severity, f.message.clone()))
                .collect::<Vec<_>>()
        };

        let mut diagnostics = tagged(&self.errors, Severity::Error);
        diagnostics.extend(tagged(&self.warnings, Severity::Warn));
        diagnostics.extend(tagged(&self.passed, Severity::Info));
        diagnostics
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report() {
        let report = ValidationReport::new();
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert!(report.valid);
        assert_eq!(report.score, 100);
    }

    #[test]
    fn score_formula() {
        assert_eq!(quality_score(0, 0, 7), 100);
        assert_eq!(quality_score(1, 2, 5), 85);
        assert_eq!(quality_score(0, 3, 4), 93);
        assert_eq!(quality_score(8, 0, 0), 0);
        assert_eq!(quality_score(2, 0, 20), 90);
    }

    #[test]
    fn score_is_non_increasing_in_errors_and_warnings() {
        for passed in 0..12 {
            for errors in 0..8 {
                for warnings in 0..12 {
                    let base = quality_score(errors, warnings, passed);
                    assert!(quality_score(errors + 1, warnings, passed) <= base);
                    assert!(quality_score(errors, warnings + 1, passed) <= base);
                }
            }
        }
    }

    #[test]
    fn findings_update_validity_and_score() {
        let mut report = ValidationReport::new();
        report.add_passed(DiagnosticCode::Syntax, "ok");
        report.add_warning(DiagnosticCode::MissingType, "1 subject without rdf:type");
        assert!(report.valid);
        assert_eq!(report.score, 97);

        report.add_error(DiagnosticCode::InvalidUri, "bad");
        assert!(!report.valid);
        assert!(report.has_errors());
        assert_eq!(report.score, 82);
        assert!(report.has_code(DiagnosticCode::MissingType));
        assert_eq!(report.diagnostics()[0].severity, Severity::Error);
    }

    #[test]
    fn syntax_failure_scores_zero() {
        let report = ValidationReport::syntax_failure("unexpected end of file");
        assert_eq!(report.score, 0);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].code, DiagnosticCode::Syntax);
    }

    #[test]
    fn report_serialization() {
        let mut report = ValidationReport::new();
        report.metrics.completeness = Some(90.0);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"totalTriples\""));
        assert!(json.contains("\"completeness\": 90.0"));
        assert!(!json.contains("expectedResources"));
    }
}
