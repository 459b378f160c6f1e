//! Common RDF and OWL vocabulary terms

use crate::model::NamedNode;
use std::sync::LazyLock;

/// RDF vocabulary namespace
pub mod rdf {
    use super::*;

    /// The RDF namespace IRI
    pub const NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type predicate
    pub static TYPE: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new_unchecked(format!("{}type", NAMESPACE)));
}

/// OWL vocabulary namespace
pub mod owl {
    use super::*;

    /// The OWL namespace IRI
    pub const NAMESPACE: &str = "http://www.w3.org/2002/07/owl#";

    /// owl:Ontology class
    pub static ONTOLOGY: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new_unchecked(format!("{}Ontology", NAMESPACE)));

    /// owl:imports predicate
    pub static IMPORTS: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new_unchecked(format!("{}imports", NAMESPACE)));

    /// owl:Class class
    pub static CLASS: LazyLock<NamedNode> =
        LazyLock::new(|| NamedNode::new_unchecked(format!("{}Class", NAMESPACE)));
}
