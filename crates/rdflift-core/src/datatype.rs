//! SQL type to XSD datatype coercion

use oxrdf::vocab::xsd;
use oxrdf::NamedNodeRef;
use serde::{Deserialize, Serialize};

/// XSD datatypes produced for relational values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum XsdType {
    String,
    Integer,
    Decimal,
    Float,
    Double,
    Boolean,
    Date,
    DateTime,
    Time,
}

impl XsdType {
    /// Map a SQL data type to its XSD datatype
    ///
    /// Precision suffixes (`numeric(10,2)`, `varchar(64)`) are ignored.
    /// Unknown types fall back to `xsd:string`.
    pub fn from_sql_type(sql_type: &str) -> Self {
        let base_type = sql_type
            .split('(')
            .next()
            .unwrap_or(sql_type)
            .trim()
            .to_lowercase();

        match base_type.as_str() {
            // Integer types
            "smallint" | "int2" => Self::Integer,
            "integer" | "int" | "int4" => Self::Integer,
            "bigint" | "int8" => Self::Integer,
            "serial" | "serial4" => Self::Integer,
            "bigserial" | "serial8" => Self::Integer,
            "smallserial" | "serial2" => Self::Integer,

            // Exact numerics
            "numeric" | "decimal" => Self::Decimal,

            // Floating point types
            "real" | "float4" => Self::Float,
            "double precision" | "float8" | "float" => Self::Double,

            // String types
            "character varying" | "varchar" => Self::String,
            "character" | "char" | "bpchar" => Self::String,
            "text" => Self::String,

            "boolean" | "bool" => Self::Boolean,

            // Date/Time types
            "date" => Self::Date,
            "timestamp without time zone" | "timestamp" => Self::DateTime,
            "timestamp with time zone" | "timestamptz" => Self::DateTime,
            "time without time zone" | "time" => Self::Time,
            "time with time zone" | "timetz" => Self::Time,

            _ => Self::String,
        }
    }

    /// The datatype IRI
    pub fn iri(self) -> NamedNodeRef<'static> {
        match self {
            Self::String => xsd::STRING,
            Self::Integer => xsd::INTEGER,
            Self::Decimal => xsd::DECIMAL,
            Self::Float => xsd::FLOAT,
            Self::Double => xsd::DOUBLE,
            Self::Boolean => xsd::BOOLEAN,
            Self::Date => xsd::DATE,
            Self::DateTime => xsd::DATE_TIME,
            Self::Time => xsd::TIME,
        }
    }

    /// Local name inside the XSD namespace
    pub fn local_name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::Time => "time",
        }
    }
}

impl std::fmt::Display for XsdType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "xsd:{}", self.local_name())
    }
}
