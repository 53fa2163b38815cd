use std::collections::BTreeSet;

use super::entities::{
    Axiom, ClassAssertion, DataPropertyAssertion, Entity, ObjectPropertyAssertion, SubClassOf,
};
use super::value_objects::{Iri, Scope};

/// Read side of the axiom store collaborator.
///
/// Reads are scope-parameterised and total: an entity that is not part of the
/// requested scope simply produces no axioms. Writes live on
/// [`MutableAxiomStore`], so a handle of this type cannot change the
/// knowledge base behind the revision counter.
pub trait AxiomStore: Send + Sync {
    /// Identifier of the root ontology.
    fn ontology_iri(&self) -> Iri;

    /// Returns a snapshot of every axiom visible in `scope`.
    fn axioms(&self, scope: Scope) -> Vec<Axiom>;

    /// Returns whether `axiom` is stored in `scope`.
    fn contains_axiom(&self, axiom: &Axiom, scope: Scope) -> bool;

    /// Returns whether `entity` is declared or referenced in `scope`.
    fn contains_entity(&self, entity: &Entity, scope: Scope) -> bool;

    /// Returns whether the store holds a document for `ontology`.
    fn knows_ontology(&self, ontology: &Iri) -> bool;

    /// Returns whether `ontology` is part of the root's imports closure.
    fn is_imported(&self, ontology: &Iri) -> bool;

    fn has_class(&self, class: &Iri, scope: Scope) -> bool {
        self.contains_entity(&Entity::class(class.clone()), scope)
    }

    fn has_individual(&self, individual: &Iri, scope: Scope) -> bool {
        self.contains_entity(&Entity::individual(individual.clone()), scope)
    }

    fn has_object_property(&self, property: &Iri, scope: Scope) -> bool {
        self.contains_entity(&Entity::object_property(property.clone()), scope)
    }

    fn has_data_property(&self, property: &Iri, scope: Scope) -> bool {
        self.contains_entity(&Entity::data_property(property.clone()), scope)
    }

    /// `SubClassOf` axioms whose subclass is the named class `class`.
    fn sub_class_axioms_for_subclass(&self, class: &Iri, scope: Scope) -> Vec<SubClassOf> {
        self.axioms(scope)
            .into_iter()
            .filter_map(|axiom| match axiom {
                Axiom::SubClassOf(sub_class_of) if sub_class_of.sub.as_named() == Some(class) => {
                    Some(sub_class_of)
                }
                _ => None,
            })
            .collect()
    }

    /// `SubClassOf` axioms whose superclass is the named class `class`.
    fn sub_class_axioms_for_superclass(&self, class: &Iri, scope: Scope) -> Vec<SubClassOf> {
        self.axioms(scope)
            .into_iter()
            .filter_map(|axiom| match axiom {
                Axiom::SubClassOf(sub_class_of) if sub_class_of.sup.as_named() == Some(class) => {
                    Some(sub_class_of)
                }
                _ => None,
            })
            .collect()
    }

    /// Class assertions naming `individual`, anonymous class expressions included.
    fn class_assertions_for_individual(
        &self,
        individual: &Iri,
        scope: Scope,
    ) -> Vec<ClassAssertion> {
        self.axioms(scope)
            .into_iter()
            .filter_map(|axiom| match axiom {
                Axiom::ClassAssertion(assertion) if &assertion.individual == individual => {
                    Some(assertion)
                }
                _ => None,
            })
            .collect()
    }

    /// Class assertions on exactly the named class `class`.
    fn class_assertions_for_class(&self, class: &Iri, scope: Scope) -> Vec<ClassAssertion> {
        self.axioms(scope)
            .into_iter()
            .filter_map(|axiom| match axiom {
                Axiom::ClassAssertion(assertion) if assertion.class.as_named() == Some(class) => {
                    Some(assertion)
                }
                _ => None,
            })
            .collect()
    }

    fn object_property_assertions_for_subject(
        &self,
        subject: &Iri,
        scope: Scope,
    ) -> Vec<ObjectPropertyAssertion> {
        self.axioms(scope)
            .into_iter()
            .filter_map(|axiom| match axiom {
                Axiom::ObjectPropertyAssertion(assertion) if &assertion.subject == subject => {
                    Some(assertion)
                }
                _ => None,
            })
            .collect()
    }

    fn data_property_assertions_for_subject(
        &self,
        subject: &Iri,
        scope: Scope,
    ) -> Vec<DataPropertyAssertion> {
        self.axioms(scope)
            .into_iter()
            .filter_map(|axiom| match axiom {
                Axiom::DataPropertyAssertion(assertion) if &assertion.subject == subject => {
                    Some(assertion)
                }
                _ => None,
            })
            .collect()
    }

    /// Every named individual declared or referenced in `scope`.
    fn individuals_in_signature(&self, scope: Scope) -> BTreeSet<Iri> {
        let mut signature = BTreeSet::new();
        for axiom in self.axioms(scope) {
            axiom.collect_signature(&mut signature);
        }
        signature
            .into_iter()
            .filter(|entity| entity.kind() == super::entities::EntityKind::NamedIndividual)
            .map(|entity| entity.iri().clone())
            .collect()
    }
}

/// Write side of the axiom store. Writes always target the local (root)
/// ontology and never touch a revision counter; callers that serve derived
/// views go through [`super::Authoring`], which bumps after every change.
///
/// Implementors provide interior mutability so one handle can be shared
/// between query and mutation paths.
pub trait MutableAxiomStore: AxiomStore {
    /// Adds `axiom` to the root ontology. Returns `false` if it was already
    /// stored there.
    fn add_axiom(&self, axiom: Axiom) -> bool;

    /// Removes `axiom` from the root ontology. Axioms only reachable through
    /// imports are never touched.
    fn remove_axiom(&self, axiom: &Axiom) -> bool;

    /// Adds a direct import of `ontology` to the root. Returns `false` if the
    /// root already imports it directly, the ontology is unknown or it is the
    /// root itself.
    fn add_import(&self, ontology: &Iri) -> bool;

    /// This store seen through its read-only contract.
    fn reader(&self) -> &dyn AxiomStore;
}
