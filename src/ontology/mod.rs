//! Ontology knowledge base: value objects, the axiom store contract and its
//! in-memory implementation, asserted traversal, the entailment collaborator
//! and the revision-gated cache in front of it, plus the authoring and query
//! surfaces wired together by [`OntologyService`].

pub mod authoring;
pub mod cache;
pub mod closure;
pub mod entities;
pub mod memory;
pub mod query;
pub mod reasoner;
pub mod repositories;
pub mod revision;
pub mod service;
pub mod value_objects;

pub use authoring::Authoring;
pub use cache::DerivedViewCache;
pub use closure::AssertedClosure;
pub use entities::{
    Axiom, ClassAssertion, ClassExpression, DataPropertyAssertion, Entity, EntityKind,
    ObjectPropertyAssertion, SubClassOf,
};
pub use memory::{InMemoryOntologyStore, OntologyDocument};
pub use query::{QueryDispatcher, QueryMode};
pub use reasoner::{DerivedView, NativeReasoner, Reasoner, ReasonerError};
pub use repositories::{AxiomStore, MutableAxiomStore};
pub use revision::RevisionCounter;
pub use service::{OntologyService, StoreHandle};
pub use value_objects::{Iri, IriError, Literal, Scope};
