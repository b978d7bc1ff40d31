//! In-memory triple set
//!
//! Set semantics with first-insertion order, so serializing the same set
//! twice produces identical text.

use indexmap::IndexSet;
use oxrdf::{GraphName, Literal, NamedNode, Quad, QuadRef, Subject, Term, Triple};

/// An ordered set of RDF statements
///
/// Statements are stored as quads; triples built by the engines live in the
/// default graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleSet {
    quads: IndexSet<Quad>,
}

impl TripleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple into the default graph; returns false for a duplicate
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.quads.insert(triple.in_graph(GraphName::DefaultGraph))
    }

    /// Insert a statement keeping its graph name
    pub fn insert_quad(&mut self, quad: Quad) -> bool {
        self.quads.insert(quad)
    }

    /// Convenience for `(subject, predicate, object)` in the default graph
    pub fn add(
        &mut self,
        subject: impl Into<Subject>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
    ) -> bool {
        self.insert(Triple::new(subject, predicate, object))
    }

    /// Add a literal-valued triple
    pub fn add_literal(
        &mut self,
        subject: impl Into<Subject>,
        predicate: impl Into<NamedNode>,
        literal: Literal,
    ) -> bool {
        self.add(subject, predicate, literal)
    }

    /// Move every statement of `other` into this set
    pub fn extend(&mut self, other: TripleSet) {
        self.quads.extend(other.quads);
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.quads
            .contains(&triple.clone().in_graph(GraphName::DefaultGraph))
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Iterate statements in insertion order
    pub fn iter(&self) -> impl Iterator<Item = QuadRef<'_>> {
        self.quads.iter().map(Quad::as_ref)
    }

    /// Whether any statement lives outside the default graph
    pub fn has_named_graphs(&self) -> bool {
        self.quads.iter().any(|q| !q.graph_name.is_default_graph())
    }
}

impl FromIterator<Triple> for TripleSet {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut set = Self::new();
        for triple in iter {
            set.insert(triple);
        }
        set
    }
}

impl FromIterator<Quad> for TripleSet {
    fn from_iter<I: IntoIterator<Item = Quad>>(iter: I) -> Self {
        Self {
            quads: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TripleSet {
    type Item = Quad;
    type IntoIter = indexmap::set::IntoIter<Quad>;

    fn into_iter(self) -> Self::IntoIter {
        self.quads.into_iter()
    }
}
