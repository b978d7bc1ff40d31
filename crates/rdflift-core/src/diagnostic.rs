//! Diagnostic codes and error reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // RDF quality checks (1xxx)
    /// RDF text parsed (passed) or failed to parse (error)
    Syntax,

    /// Triple structure analysed
    Structure,

    /// The graph contains no triples
    NoData,

    /// Very few distinct subjects compared to the number of triples
    LowDiversity,

    /// All named nodes have an absolute IRI shape
    UriValidation,

    /// Named nodes without a `scheme://` shape
    InvalidUri,

    /// Named nodes carrying unescaped reserved characters
    SuspiciousUri,

    /// Every local reference resolves to a described subject
    ReferentialIntegrity,

    /// Object references that never appear as a subject
    BrokenReference,

    /// All XSD datatypes known and lexically consistent
    Datatypes,

    /// XSD datatype outside the supported set
    UnknownDatatype,

    /// Literal value does not fit its declared datatype
    DatatypeMismatch,

    /// No duplicate properties and every subject typed
    Consistency,

    /// A subject repeats the same predicate
    DuplicateProperties,

    /// A subject has no rdf:type
    MissingType,

    /// Graph covers the expected rows
    Completeness,

    /// Graph covers less than 90% of the expected rows
    LowCompleteness,

    // Direct mapping (2xxx)
    /// Table has no primary key, its rows are not mapped
    DmNoPrimaryKey,

    /// Table has a composite primary key, its rows are not mapped
    DmCompositeKey,

    /// A table scan or a row failed and was skipped
    DmRowProcessing,

    /// Table excluded by configuration
    DmTableSkipped,

    // Mapping configuration (3xxx)
    /// Configuration has no triples maps
    R2rmlNoTriplesMaps,

    /// Triples map without an id
    R2rmlMissingId,

    /// Two triples maps share an id
    R2rmlDuplicateId,

    /// Logical table missing or ambiguous
    R2rmlLogicalTable,

    /// Subject map missing or ambiguous
    R2rmlSubjectMap,

    /// Triples map without predicate-object maps
    R2rmlNoPredicateObjectMaps,

    /// Predicate-object map without a predicate
    R2rmlMissingPredicate,

    /// Object map missing or ambiguous
    R2rmlObjectMap,

    /// Template placeholder grammar violation
    R2rmlTemplateSyntax,

    /// Parent triples map reference does not resolve
    R2rmlUnresolvedParent,

    /// Template placeholder names a column the row does not have
    R2rmlUnresolvedPlaceholder,

    /// SQL query logical tables are not executed
    R2rmlQueryUnsupported,

    /// Logical table rows could not be read
    R2rmlScanFailed,

    /// A generated term is not a valid IRI or literal, the row was skipped
    R2rmlInvalidTerm,

    // General warnings (9xxx)
    /// General informational message
    Info,

    /// General warning message
    Warning,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Syntax => "SYNTAX",
            Self::Structure => "STRUCTURE",
            Self::NoData => "NO_DATA",
            Self::LowDiversity => "LOW_DIVERSITY",
            Self::UriValidation => "URI_VALIDATION",
            Self::InvalidUri => "INVALID_URI",
            Self::SuspiciousUri => "SUSPICIOUS_URI",
            Self::ReferentialIntegrity => "REFERENTIAL_INTEGRITY",
            Self::BrokenReference => "BROKEN_REFERENCE",
            Self::Datatypes => "DATATYPES",
            Self::UnknownDatatype => "UNKNOWN_DATATYPE",
            Self::DatatypeMismatch => "DATATYPE_MISMATCH",
            Self::Consistency => "CONSISTENCY",
            Self::DuplicateProperties => "DUPLICATE_PROPERTIES",
            Self::MissingType => "MISSING_TYPE",
            Self::Completeness => "COMPLETENESS",
            Self::LowCompleteness => "LOW_COMPLETENESS",
            Self::DmNoPrimaryKey => "DM_NO_PRIMARY_KEY",
            Self::DmCompositeKey => "DM_COMPOSITE_KEY",
            Self::DmRowProcessing => "DM_ROW_PROCESSING",
            Self::DmTableSkipped => "DM_TABLE_SKIPPED",
            Self::R2rmlNoTriplesMaps => "R2RML_NO_TRIPLES_MAPS",
            Self::R2rmlMissingId => "R2RML_MISSING_ID",
            Self::R2rmlDuplicateId => "R2RML_DUPLICATE_ID",
            Self::R2rmlLogicalTable => "R2RML_LOGICAL_TABLE",
            Self::R2rmlSubjectMap => "R2RML_SUBJECT_MAP",
            Self::R2rmlNoPredicateObjectMaps => "R2RML_NO_PREDICATE_OBJECT_MAPS",
            Self::R2rmlMissingPredicate => "R2RML_MISSING_PREDICATE",
            Self::R2rmlObjectMap => "R2RML_OBJECT_MAP",
            Self::R2rmlTemplateSyntax => "R2RML_TEMPLATE_SYNTAX",
            Self::R2rmlUnresolvedParent => "R2RML_UNRESOLVED_PARENT",
            Self::R2rmlUnresolvedPlaceholder => "R2RML_UNRESOLVED_PLACEHOLDER",
            Self::R2rmlQueryUnsupported => "R2RML_QUERY_UNSUPPORTED",
            Self::R2rmlScanFailed => "R2RML_SCAN_FAILED",
            Self::R2rmlInvalidTerm => "R2RML_INVALID_TERM",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - should be reviewed but not blocking
    Warn,

    /// Error - blocking issue that should fail CI
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where in a schema or mapping a diagnostic applies
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Table name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Triples map id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triples_map: Option<String>,

    /// Position inside the table or map (row number, predicate-object map index)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl Location {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            ..Self::default()
        }
    }

    pub fn triples_map(id: impl Into<String>) -> Self {
        Self {
            triples_map: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(table) = &self.table {
            parts.push(format!("table {}", table));
        }
        if let Some(id) = &self.triples_map {
            parts.push(format!("triples map {}", id));
        }
        if let Some(index) = self.index {
            parts.push(format!("#{}", index));
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Schema or mapping location (best-effort)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
        }
    }

    pub fn warn(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warn, message)
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, message)
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_stability() {
        // Ensure codes are stable strings
        assert_eq!(DiagnosticCode::LowCompleteness.as_str(), "LOW_COMPLETENESS");
        assert_eq!(DiagnosticCode::UriValidation.as_str(), "URI_VALIDATION");
        assert_eq!(DiagnosticCode::DmCompositeKey.as_str(), "DM_COMPOSITE_KEY");
    }

    #[test]
    fn serde_name_matches_as_str() {
        for code in [
            DiagnosticCode::Syntax,
            DiagnosticCode::BrokenReference,
            DiagnosticCode::DatatypeMismatch,
            DiagnosticCode::DmNoPrimaryKey,
            DiagnosticCode::R2rmlNoPredicateObjectMaps,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::warn(DiagnosticCode::DmNoPrimaryKey, "Table 'logs' has no primary key")
            .with_location(Location::table("logs"));

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("DM_NO_PRIMARY_KEY"));
        assert!(json.contains("warn"));
        assert!(json.contains("\"table\":\"logs\""));
        assert!(!json.contains("triples_map"));
    }

    #[test]
    fn location_display() {
        let loc = Location::triples_map("TriplesMap_users").with_index(2);
        assert_eq!(loc.to_string(), "triples map TriplesMap_users #2");
    }
}
