//! Idempotent mutations of the local ontology.
//!
//! Every existence check runs against the imports closure before anything is
//! written, so a failing call leaves both the store and the revision untouched.
//! A successful write and its revision bump happen in one step.

use tracing::debug;

use super::{
    entities::{Axiom, Entity},
    repositories::MutableAxiomStore,
    revision::RevisionCounter,
    value_objects::{Iri, Literal, Scope},
};
use crate::{Error, Result};

const CHECK_SCOPE: Scope = Scope::ImportsClosure;

/// Create, assert and retract operations over a [`MutableAxiomStore`].
///
/// `Ok(false)` means the requested state already held and nothing changed.
#[derive(Clone, Copy)]
pub struct Authoring<'a> {
    store: &'a dyn MutableAxiomStore,
    revision: &'a RevisionCounter,
}

impl<'a> Authoring<'a> {
    #[must_use]
    pub fn new(store: &'a dyn MutableAxiomStore, revision: &'a RevisionCounter) -> Self {
        Self { store, revision }
    }

    /// Declares `individual` and types it as `class`.
    ///
    /// Returns `Ok(false)` without writing when the individual is already
    /// part of the closure signature, whatever its current types are.
    /// Otherwise the declaration and the class assertion are each written
    /// unless already stored locally, and `Ok(true)` reports that at least
    /// one of them was.
    ///
    /// # Errors
    ///
    /// [`Error::MissingClass`] when `class` is unknown.
    pub fn create_individual(&self, class: &Iri, individual: &Iri) -> Result<bool> {
        if self.store.has_individual(individual, CHECK_SCOPE) {
            return Ok(false);
        }
        self.require_class(class)?;

        let declared = self.add_local_once(Axiom::declaration(Entity::individual(
            individual.clone(),
        )));
        let typed = self.add_local_once(Axiom::class_assertion(class.clone(), individual.clone()));
        Ok(declared || typed)
    }

    /// # Errors
    ///
    /// [`Error::MissingIndividual`] or [`Error::MissingClass`] for unknown
    /// entities.
    pub fn assert_type(&self, individual: &Iri, class: &Iri) -> Result<bool> {
        self.require_individual(individual)?;
        self.require_class(class)?;
        Ok(self.add_if_absent(Axiom::class_assertion(class.clone(), individual.clone())))
    }

    /// # Errors
    ///
    /// [`Error::MissingIndividual`] for an unknown subject or object and
    /// [`Error::MissingObjectProperty`] for an unknown property.
    pub fn assert_object_property(&self, subject: &Iri, property: &Iri, object: &Iri) -> Result<bool> {
        self.require_individual(subject)?;
        self.require_object_property(property)?;
        self.require_individual(object)?;
        Ok(self.add_if_absent(Axiom::object_property_assertion(
            property.clone(),
            subject.clone(),
            object.clone(),
        )))
    }

    /// # Errors
    ///
    /// [`Error::MissingIndividual`] or [`Error::MissingDataProperty`] for
    /// unknown entities.
    pub fn assert_data_property(&self, subject: &Iri, property: &Iri, value: Literal) -> Result<bool> {
        self.require_individual(subject)?;
        self.require_data_property(property)?;
        Ok(self.add_if_absent(Axiom::data_property_assertion(
            property.clone(),
            subject.clone(),
            value,
        )))
    }

    /// Removes a local class assertion. Assertions only reachable through
    /// imports are left alone and reported as `false`.
    pub fn retract_type(&self, individual: &Iri, class: &Iri) -> bool {
        self.remove_local(&Axiom::class_assertion(class.clone(), individual.clone()))
    }

    pub fn retract_object_property(&self, subject: &Iri, property: &Iri, object: &Iri) -> bool {
        self.remove_local(&Axiom::object_property_assertion(
            property.clone(),
            subject.clone(),
            object.clone(),
        ))
    }

    pub fn retract_data_property(&self, subject: &Iri, property: &Iri, value: &Literal) -> bool {
        self.remove_local(&Axiom::data_property_assertion(
            property.clone(),
            subject.clone(),
            value.clone(),
        ))
    }

    /// Declares a class unless it is already part of the closure signature.
    pub fn declare_class(&self, class: &Iri) -> bool {
        self.declare(Entity::class(class.clone()))
    }

    pub fn declare_object_property(&self, property: &Iri) -> bool {
        self.declare(Entity::object_property(property.clone()))
    }

    pub fn declare_data_property(&self, property: &Iri) -> bool {
        self.declare(Entity::data_property(property.clone()))
    }

    /// # Errors
    ///
    /// [`Error::MissingClass`] when either class is unknown.
    pub fn assert_sub_class_of(&self, sub: &Iri, sup: &Iri) -> Result<bool> {
        self.require_class(sub)?;
        self.require_class(sup)?;
        Ok(self.add_if_absent(Axiom::sub_class_of(sub.clone(), sup.clone())))
    }

    pub fn retract_sub_class_of(&self, sub: &Iri, sup: &Iri) -> bool {
        self.remove_local(&Axiom::sub_class_of(sub.clone(), sup.clone()))
    }

    /// Imports `ontology` into the root. Returns `Ok(false)` when it is
    /// already part of the imports closure.
    ///
    /// # Errors
    ///
    /// [`Error::MissingOntology`] when the store holds no such document.
    pub fn add_import(&self, ontology: &Iri) -> Result<bool> {
        if !self.store.knows_ontology(ontology) {
            return Err(Error::MissingOntology {
                ontology: ontology.clone(),
            });
        }
        if self.store.is_imported(ontology) || !self.store.add_import(ontology) {
            return Ok(false);
        }
        let revision = self.revision.bump();
        debug!(revision, ontology = %ontology, "import_added");
        Ok(true)
    }

    /// Writes `axiom` to the local ontology as is, without any existence
    /// checks. Meant for seeding vocabulary and hierarchy; returns `false`
    /// when the local ontology already holds it.
    pub fn add_axiom(&self, axiom: Axiom) -> bool {
        self.add_local(axiom)
    }

    /// Writes every axiom in `axioms` and returns how many were new.
    pub fn add_axioms(&self, axioms: impl IntoIterator<Item = Axiom>) -> usize {
        axioms
            .into_iter()
            .map(|axiom| self.add_local(axiom))
            .filter(|added| *added)
            .count()
    }

    fn declare(&self, entity: Entity) -> bool {
        if self.store.contains_entity(&entity, CHECK_SCOPE) {
            return false;
        }
        self.add_local(Axiom::declaration(entity))
    }

    /// Adds `axiom` unless the imports closure already holds it.
    fn add_if_absent(&self, axiom: Axiom) -> bool {
        if self.store.contains_axiom(&axiom, CHECK_SCOPE) {
            return false;
        }
        self.add_local(axiom)
    }

    /// Adds `axiom` unless the local ontology already holds it.
    fn add_local_once(&self, axiom: Axiom) -> bool {
        if self.store.contains_axiom(&axiom, Scope::Local) {
            return false;
        }
        self.add_local(axiom)
    }

    fn add_local(&self, axiom: Axiom) -> bool {
        if !self.store.add_axiom(axiom.clone()) {
            return false;
        }
        let revision = self.revision.bump();
        debug!(revision, axiom = %axiom, "axiom_added");
        true
    }

    fn remove_local(&self, axiom: &Axiom) -> bool {
        if !self.store.remove_axiom(axiom) {
            return false;
        }
        let revision = self.revision.bump();
        debug!(revision, axiom = %axiom, "axiom_removed");
        true
    }

    fn require_class(&self, class: &Iri) -> Result<()> {
        if self.store.has_class(class, CHECK_SCOPE) {
            Ok(())
        } else {
            Err(Error::missing_class(class, CHECK_SCOPE))
        }
    }

    fn require_individual(&self, individual: &Iri) -> Result<()> {
        if self.store.has_individual(individual, CHECK_SCOPE) {
            Ok(())
        } else {
            Err(Error::missing_individual(individual, CHECK_SCOPE))
        }
    }

    fn require_object_property(&self, property: &Iri) -> Result<()> {
        if self.store.has_object_property(property, CHECK_SCOPE) {
            Ok(())
        } else {
            Err(Error::missing_object_property(property, CHECK_SCOPE))
        }
    }

    fn require_data_property(&self, property: &Iri) -> Result<()> {
        if self.store.has_data_property(property, CHECK_SCOPE) {
            Ok(())
        } else {
            Err(Error::missing_data_property(property, CHECK_SCOPE))
        }
    }
}
