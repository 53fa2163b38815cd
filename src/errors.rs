//! Crate-wide error type.

use crate::ontology::{
    reasoner::ReasonerError,
    value_objects::{Iri, IriError, Scope},
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("class `{class}` is not part of the {scope} signature")]
    MissingClass { class: Iri, scope: Scope },

    #[error("individual `{individual}` is not part of the {scope} signature")]
    MissingIndividual { individual: Iri, scope: Scope },

    #[error("object property `{property}` is not part of the {scope} signature")]
    MissingObjectProperty { property: Iri, scope: Scope },

    #[error("data property `{property}` is not part of the {scope} signature")]
    MissingDataProperty { property: Iri, scope: Scope },

    #[error("ontology `{ontology}` is not known to the store")]
    MissingOntology { ontology: Iri },

    #[error("inferred queries require a configured reasoner")]
    NoReasoner,

    #[error(transparent)]
    Reasoner(#[from] ReasonerError),

    #[error(transparent)]
    Iri(#[from] IriError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub(crate) fn missing_class(class: &Iri, scope: Scope) -> Self {
        Self::MissingClass {
            class: class.clone(),
            scope,
        }
    }

    pub(crate) fn missing_individual(individual: &Iri, scope: Scope) -> Self {
        Self::MissingIndividual {
            individual: individual.clone(),
            scope,
        }
    }

    pub(crate) fn missing_object_property(property: &Iri, scope: Scope) -> Self {
        Self::MissingObjectProperty {
            property: property.clone(),
            scope,
        }
    }

    pub(crate) fn missing_data_property(property: &Iri, scope: Scope) -> Self {
        Self::MissingDataProperty {
            property: property.clone(),
            scope,
        }
    }
}
