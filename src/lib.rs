#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
//! ## Ontoview
//!
//! Asserted and inferred membership and hierarchy queries over an in-memory
//! ontology, with a derived entailment view that is rebuilt only after the
//! knowledge base has changed.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use ontoview::{
//!     config::InferenceSettings,
//!     ontology::{Axiom, InMemoryOntologyStore, Iri, NativeReasoner, QueryMode, Scope},
//!     OntologyService,
//! };
//!
//! let iri = |s: &str| Iri::new(format!("https://example.org/{s}")).unwrap();
//! let store = InMemoryOntologyStore::new(iri("onto"));
//! let service = OntologyService::new(
//!     Arc::new(store),
//!     Some(Arc::new(NativeReasoner::new(InferenceSettings::default()))),
//! );
//! service.add_axiom(Axiom::sub_class_of(iri("Disease"), iri("ModelElement")));
//! service.create_individual(&iri("Disease"), &iri("T1DM")).unwrap();
//!
//! let inferred = service
//!     .is_instance_of(&iri("T1DM"), &iri("ModelElement"), Scope::Local, QueryMode::InferredAll)
//!     .unwrap();
//! assert!(inferred);
//! ```

pub use self::errors::Error;

pub mod config;
pub mod errors;
pub mod logger;
pub mod ontology;

pub use ontology::OntologyService;

/// Application results options list
pub type Result<T, E = Error> = std::result::Result<T, E>;
