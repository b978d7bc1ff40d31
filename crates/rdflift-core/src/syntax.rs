//! Parser and serializer boundary for RDF text
//!
//! Parsing is strict: any syntax error rejects the whole document.

use crate::graph::TripleSet;
use crate::namespace::PrefixMap;
use oxrdf::vocab::rdf;
use oxrdf::SubjectRef;
use oxrdfio::{RdfFormat, RdfParser, RdfSerializer};

/// Unparsable RDF text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {format} input: {message}")]
pub struct RdfSyntaxError {
    pub format: String,
    pub message: String,
}

/// Serialization failures
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("{format} cannot represent named graphs; use N-Quads or TriG")]
    NamedGraphsUnsupported { format: String },

    #[error("Invalid prefix {prefix}: {message}")]
    InvalidPrefix { prefix: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serializer produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors of a parse-then-serialize conversion
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] RdfSyntaxError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

/// Resolve a user-supplied format name or file extension
pub fn parse_format(name: &str) -> Option<RdfFormat> {
    match name.to_ascii_lowercase().as_str() {
        "turtle" | "ttl" => Some(RdfFormat::Turtle),
        "ntriples" | "n-triples" | "nt" => Some(RdfFormat::NTriples),
        "nquads" | "n-quads" | "nq" => Some(RdfFormat::NQuads),
        "trig" => Some(RdfFormat::TriG),
        "rdfxml" | "rdf/xml" | "rdf" | "xml" => Some(RdfFormat::RdfXml),
        "n3" => Some(RdfFormat::N3),
        other => RdfFormat::from_extension(other).or_else(|| RdfFormat::from_media_type(other)),
    }
}

/// Parse RDF text into a triple set
pub fn parse(text: &str, format: RdfFormat) -> Result<TripleSet, RdfSyntaxError> {
    parse_with_base(text, format, None)
}

/// Parse RDF text, resolving relative IRIs against `base`
pub fn parse_with_base(
    text: &str,
    format: RdfFormat,
    base: Option<&str>,
) -> Result<TripleSet, RdfSyntaxError> {
    let syntax_error = |message: String| RdfSyntaxError {
        format: format.name().to_string(),
        message,
    };

    let mut parser = RdfParser::from_format(format);
    if let Some(base) = base {
        parser = parser
            .with_base_iri(base)
            .map_err(|e| syntax_error(format!("invalid base IRI {}: {}", base, e)))?;
    }

    let mut triples = TripleSet::new();
    for quad in parser.for_reader(text.as_bytes()) {
        let quad = quad.map_err(|e| syntax_error(e.to_string()))?;
        triples.insert_quad(quad);
    }
    Ok(triples)
}

/// Serialize a triple set, declaring `prefixes` where the format supports them
pub fn serialize(
    triples: &TripleSet,
    format: RdfFormat,
    prefixes: &PrefixMap,
) -> Result<String, SerializeError> {
    if !format.supports_datasets() && triples.has_named_graphs() {
        return Err(SerializeError::NamedGraphsUnsupported {
            format: format.name().to_string(),
        });
    }

    let mut serializer = RdfSerializer::from_format(format);
    for (prefix, namespace) in prefixes.iter() {
        serializer = serializer
            .with_prefix(prefix, namespace)
            .map_err(|e| SerializeError::InvalidPrefix {
                prefix: prefix.to_string(),
                message: e.to_string(),
            })?;
    }

    let mut writer = serializer.for_writer(Vec::new());
    for quad in triples.iter() {
        writer.serialize_quad(quad)?;
    }
    let bytes = writer.finish()?;
    Ok(String::from_utf8(bytes)?)
}

/// Turtle text abbreviated through [`PrefixMap::compact`]
///
/// Unlike [`serialize`], nested namespaces such as a mapping namespace under
/// the base namespace resolve to the longest match. Consecutive statements
/// about one subject share a block.
pub fn to_turtle(triples: &TripleSet, prefixes: &PrefixMap) -> Result<String, SerializeError> {
    if triples.has_named_graphs() {
        return Err(SerializeError::NamedGraphsUnsupported {
            format: RdfFormat::Turtle.name().to_string(),
        });
    }

    let mut out = String::new();
    for (prefix, namespace) in prefixes.iter() {
        out.push_str(&format!("@prefix {}: <{}> .\n", prefix, namespace));
    }

    let mut current: Option<SubjectRef<'_>> = None;
    for quad in triples.iter() {
        let predicate = if quad.predicate == rdf::TYPE {
            "a".to_string()
        } else {
            prefixes.render_named_node(quad.predicate)
        };
        let object = prefixes.render_term(quad.object);

        if current == Some(quad.subject) {
            out.push_str(&format!(" ;\n    {} {}", predicate, object));
            continue;
        }
        if current.is_some() {
            out.push_str(" .\n");
        }
        out.push_str(&format!(
            "\n{} {} {}",
            prefixes.render_subject(quad.subject),
            predicate,
            object
        ));
        current = Some(quad.subject);
    }
    if current.is_some() {
        out.push_str(" .\n");
    }
    Ok(out)
}

/// Result of a format conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub text: String,
    pub triples: usize,
}

/// Parse `text` in one format and write it in another
pub fn convert(
    text: &str,
    from: RdfFormat,
    to: RdfFormat,
    prefixes: &PrefixMap,
) -> Result<Converted, ConvertError> {
    let triples = parse(text, from)?;
    let text = serialize(&triples, to, prefixes)?;
    Ok(Converted {
        text,
        triples: triples.len(),
    })
}
