//! Configuration schema (rdflift.toml)

use crate::namespace::{self, DEFAULT_BASE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default per-table row cap for mapping runs
pub const DEFAULT_ROW_LIMIT: usize = 1000;

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database type (postgres)
    #[serde(rename = "type")]
    pub database_type: String,

    /// Database schema to read tables from
    #[serde(default = "default_db_schema")]
    pub schema: String,

    /// Connection settings (database-specific)
    #[serde(flatten)]
    pub settings: HashMap<String, String>,
}

fn default_db_schema() -> String {
    "public".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_type: "postgres".to_string(),
            schema: default_db_schema(),
            settings: HashMap::new(),
        }
    }
}

/// Direct mapping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectMappingConfig {
    /// Maximum rows read per table
    #[serde(default = "default_row_limit")]
    pub row_limit: usize,

    /// Tables left out of the mapping (glob patterns)
    #[serde(default)]
    pub skip_tables: Vec<String>,
}

fn default_row_limit() -> usize {
    DEFAULT_ROW_LIMIT
}

impl Default for DirectMappingConfig {
    fn default() -> Self {
        Self {
            row_limit: DEFAULT_ROW_LIMIT,
            skip_tables: Vec::new(),
        }
    }
}

impl DirectMappingConfig {
    /// Check if a table should be skipped
    pub fn is_table_skipped(&self, table: &str) -> bool {
        self.skip_tables.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, table)
            } else {
                pattern == table
            }
        })
    }
}

/// Quality validation settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Additional namespace roots treated as known vocabularies
    #[serde(default)]
    pub extra_vocabularies: Vec<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Namespace for generated classes, instances and properties
    #[serde(default = "default_base_namespace")]
    pub base_namespace: String,

    /// Namespace for generated mapping nodes (defaults to `<base>mapping/`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_namespace: Option<String>,

    /// Output RDF format name
    #[serde(default = "default_rdf_format")]
    pub rdf_format: String,

    #[serde(default)]
    pub direct_mapping: DirectMappingConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    /// Database connection configuration
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: std::path::PathBuf,
}

fn default_base_namespace() -> String {
    DEFAULT_BASE.to_string()
}

fn default_rdf_format() -> String {
    "turtle".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_namespace: default_base_namespace(),
            mapping_namespace: None,
            rdf_format: default_rdf_format(),
            direct_mapping: DirectMappingConfig::default(),
            validation: ValidationConfig::default(),
            database: None,
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Effective mapping namespace
    pub fn mapping_namespace(&self) -> String {
        self.mapping_namespace
            .clone()
            .unwrap_or_else(|| namespace::mapping_namespace(&self.base_namespace))
    }

    fn check(&self) -> Result<(), ConfigError> {
        let namespaces = std::iter::once(&self.base_namespace).chain(self.mapping_namespace.as_ref());
        for ns in namespaces {
            if !ns.contains("://") || !(ns.ends_with('/') || ns.ends_with('#')) {
                return Err(ConfigError::InvalidNamespace(ns.clone()));
            }
        }
        if self.direct_mapping.row_limit == 0 {
            return Err(ConfigError::ParseError(
                "direct_mapping.row_limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Simple glob matching (supports a single `*`)
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }

    if let Some(star_pos) = pattern.find('*') {
        let prefix = &pattern[..star_pos];
        let suffix = &pattern[star_pos + 1..];

        text.len() >= prefix.len() + suffix.len() && text.starts_with(prefix) && text.ends_with(suffix)
    } else {
        pattern == text
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Namespace '{0}' must be an absolute IRI ending in '/' or '#'")]
    InvalidNamespace(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.base_namespace, "http://example.org/");
        assert_eq!(config.mapping_namespace(), "http://example.org/mapping/");
        assert_eq!(config.direct_mapping.row_limit, 1000);
    }

    #[test]
    fn parse_full_config() {
        let config = Config::from_toml(
            r#"
            base_namespace = "http://ex.org/"
            rdf_format = "ntriples"

            [direct_mapping]
            row_limit = 50
            skip_tables = ["audit_*", "schema_migrations"]

            [validation]
            extra_vocabularies = ["http://schema.org/"]

            [database]
            type = "postgres"
            schema = "sales"
            host = "localhost"
            port = "5432"
            "#,
        )
        .unwrap();

        assert_eq!(config.mapping_namespace(), "http://ex.org/mapping/");
        assert_eq!(config.direct_mapping.row_limit, 50);
        assert!(config.direct_mapping.is_table_skipped("audit_log"));
        assert!(config.direct_mapping.is_table_skipped("schema_migrations"));
        assert!(!config.direct_mapping.is_table_skipped("users"));

        let db = config.database.unwrap();
        assert_eq!(db.schema, "sales");
        assert_eq!(db.settings.get("host").map(String::as_str), Some("localhost"));
    }

    #[test]
    fn rejects_relative_namespace() {
        let err = Config::from_toml("base_namespace = \"example\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNamespace(_)));
    }

    #[test]
    fn rejects_zero_row_limit() {
        let err = Config::from_toml("[direct_mapping]\nrow_limit = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rdflift.toml");

        let mut config = Config::default();
        config.base_namespace = "http://data.example.com/".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.base_namespace, config.base_namespace);
        assert_eq!(loaded.project_root, dir.path());
    }

    #[test]
    fn glob_matching() {
        assert!(glob_match("*", "anything"));
        assert!(glob_match("tmp_*", "tmp_users"));
        assert!(glob_match("*_archive", "orders_archive"));
        assert!(!glob_match("tmp_*", "users"));
        assert!(!glob_match("ab*ba", "aba"));
    }
}
