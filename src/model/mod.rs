//! Minimal RDF value types used by the composite graph core
//!
//! Only what the store and graph layers need: IRIs, plain literals, and
//! triples with a total order so set-backed storage works. Full identifier
//! validation and datatype handling live outside this crate.

use crate::{OntographError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An IRI-identified node
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NamedNode {
    iri: String,
}

impl NamedNode {
    /// Create a named node, rejecting strings with no IRI scheme
    pub fn new(iri: impl Into<String>) -> Result<Self> {
        let iri = iri.into();
        if !iri.contains(':') {
            return Err(OntographError::Model(format!(
                "IRI has no scheme: {iri}"
            )));
        }
        Ok(NamedNode { iri })
    }

    /// Create a named node without validation
    pub fn new_unchecked(iri: impl Into<String>) -> Self {
        NamedNode { iri: iri.into() }
    }

    /// The IRI as a string slice
    pub fn as_str(&self) -> &str {
        &self.iri
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

/// A plain literal value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    value: String,
}

impl Literal {
    pub fn new(value: impl Into<String>) -> Self {
        Literal {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.value)
    }
}

/// Object position of a triple
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Object {
    NamedNode(NamedNode),
    Literal(Literal),
}

impl From<NamedNode> for Object {
    fn from(node: NamedNode) -> Self {
        Object::NamedNode(node)
    }
}

impl From<Literal> for Object {
    fn from(literal: Literal) -> Self {
        Object::Literal(literal)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::NamedNode(n) => n.fmt(f),
            Object::Literal(l) => l.fmt(f),
        }
    }
}

/// An RDF triple
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    subject: NamedNode,
    predicate: NamedNode,
    object: Object,
}

impl Triple {
    pub fn new(subject: NamedNode, predicate: NamedNode, object: impl Into<Object>) -> Self {
        Triple {
            subject,
            predicate,
            object: object.into(),
        }
    }

    /// Build a triple from three IRI strings
    pub fn from_iris(subject: &str, predicate: &str, object: &str) -> Result<Self> {
        Ok(Triple::new(
            NamedNode::new(subject)?,
            NamedNode::new(predicate)?,
            NamedNode::new(object)?,
        ))
    }

    pub fn subject(&self) -> &NamedNode {
        &self.subject
    }

    pub fn predicate(&self) -> &NamedNode {
        &self.predicate
    }

    pub fn object(&self) -> &Object {
        &self.object
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_node_validation() {
        assert!(NamedNode::new("http://example.org/a").is_ok());
        assert!(NamedNode::new("no-scheme").is_err());

        let unchecked = NamedNode::new_unchecked("anything");
        assert_eq!(unchecked.as_str(), "anything");
    }

    #[test]
    fn test_triple_ordering_is_total() {
        let a = Triple::from_iris("urn:s", "urn:p", "urn:a").unwrap();
        let b = Triple::from_iris("urn:s", "urn:p", "urn:b").unwrap();
        assert!(a < b);
        assert_eq!(a.clone().max(b.clone()), b);
    }

    #[test]
    fn test_object_conversions() {
        let node_obj: Object = NamedNode::new_unchecked("urn:o").into();
        assert!(matches!(node_obj, Object::NamedNode(_)));

        let lit_obj: Object = Literal::new("hello").into();
        assert!(matches!(lit_obj, Object::Literal(_)));
    }
}
