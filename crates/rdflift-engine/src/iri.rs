//! IRI construction for tables, rows and columns

use oxrdf::{IriParseError, NamedNode};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rdflift_core::namespace::capitalize;

/// Everything outside the RFC 3986 unreserved set is escaped
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode one identifier or value for use inside an IRI
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// `<base><Table>`
pub fn class_iri(base: &str, table: &str) -> Result<NamedNode, IriParseError> {
    NamedNode::new(format!("{}{}", base, encode_component(&capitalize(table))))
}

/// `<base><table>/<key>`
pub fn instance_iri(base: &str, table: &str, key: &str) -> Result<NamedNode, IriParseError> {
    NamedNode::new(format!(
        "{}{}/{}",
        base,
        encode_component(table),
        encode_component(key)
    ))
}

/// `<base><table>#<column>`
pub fn property_iri(base: &str, table: &str, column: &str) -> Result<NamedNode, IriParseError> {
    NamedNode::new(format!(
        "{}{}#{}",
        base,
        encode_component(table),
        encode_component(column)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://ex.org/";

    #[test]
    fn plain_identifiers_are_untouched() {
        assert_eq!(class_iri(BASE, "users").unwrap().as_str(), "http://ex.org/Users");
        assert_eq!(
            instance_iri(BASE, "users", "1").unwrap().as_str(),
            "http://ex.org/users/1"
        );
        assert_eq!(
            property_iri(BASE, "users", "email").unwrap().as_str(),
            "http://ex.org/users#email"
        );
    }

    #[test]
    fn reserved_characters_are_encoded() {
        assert_eq!(encode_component("a b/c#d"), "a%20b%2Fc%23d");
        assert_eq!(encode_component("ñandú"), "%C3%B1and%C3%BA");
        assert_eq!(
            instance_iri(BASE, "order items", "A/7").unwrap().as_str(),
            "http://ex.org/order%20items/A%2F7"
        );
    }

    #[test]
    fn relative_base_is_rejected() {
        assert!(instance_iri("no-scheme/", "users", "1").is_err());
    }
}
