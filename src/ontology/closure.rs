//! Asserted-only traversal of the class hierarchy.
//!
//! Nothing here consults an entailment engine: answers are computed from the
//! stored `ClassAssertion` and named `SubClassOf` axioms of the requested
//! scope. Anonymous class expressions are skipped everywhere.

use std::collections::{BTreeSet, VecDeque};

use super::{
    entities::Axiom,
    repositories::AxiomStore,
    value_objects::{Iri, Literal, Scope},
};

/// Computes asserted types, instances and class hierarchies over an
/// [`AxiomStore`].
#[derive(Clone, Copy)]
pub struct AssertedClosure<'a> {
    store: &'a dyn AxiomStore,
}

impl<'a> AssertedClosure<'a> {
    #[must_use]
    pub fn new(store: &'a dyn AxiomStore) -> Self {
        Self { store }
    }

    /// Named classes of the class assertions naming `individual`.
    #[must_use]
    pub fn direct_types(&self, individual: &Iri, scope: Scope) -> BTreeSet<Iri> {
        self.store
            .class_assertions_for_individual(individual, scope)
            .into_iter()
            .filter_map(|assertion| assertion.class.as_named().cloned())
            .collect()
    }

    /// Direct types of `individual` together with every asserted ancestor.
    ///
    /// The result set doubles as the visited set of the breadth-first walk, so
    /// a cyclic hierarchy is traversed once and terminates.
    #[must_use]
    pub fn types_with_superclasses(&self, individual: &Iri, scope: Scope) -> BTreeSet<Iri> {
        let mut result = self.direct_types(individual, scope);
        let mut queue: VecDeque<Iri> = result.iter().cloned().collect();
        while let Some(current) = queue.pop_front() {
            for axiom in self.store.sub_class_axioms_for_subclass(&current, scope) {
                let Some(parent) = axiom.sup.as_named() else {
                    continue;
                };
                if result.insert(parent.clone()) {
                    queue.push_back(parent.clone());
                }
            }
        }
        result
    }

    /// Individuals asserted to be instances of `class`.
    ///
    /// With `direct_only` only assertions on exactly `class` count; otherwise
    /// every individual of the scope whose asserted closure contains `class`
    /// is returned. The latter walks the hierarchy once per individual and is
    /// the most expensive asserted read.
    #[must_use]
    pub fn instances_of_class(&self, class: &Iri, scope: Scope, direct_only: bool) -> BTreeSet<Iri> {
        let mut result: BTreeSet<Iri> = self
            .store
            .class_assertions_for_class(class, scope)
            .into_iter()
            .map(|assertion| assertion.individual)
            .collect();
        if direct_only {
            return result;
        }

        for individual in self.store.individuals_in_signature(scope) {
            if result.contains(&individual) {
                continue;
            }
            if self
                .types_with_superclasses(&individual, scope)
                .contains(class)
            {
                result.insert(individual);
            }
        }
        result
    }

    /// Asserted superclasses of `class`, excluding `class` itself.
    #[must_use]
    pub fn super_classes(&self, class: &Iri, scope: Scope, direct: bool) -> BTreeSet<Iri> {
        self.walk(class, direct, |current| {
            self.store
                .sub_class_axioms_for_subclass(current, scope)
                .into_iter()
                .filter_map(|axiom| axiom.sup.as_named().cloned())
                .collect()
        })
    }

    /// Asserted subclasses of `class`, excluding `class` itself.
    #[must_use]
    pub fn sub_classes(&self, class: &Iri, scope: Scope, direct: bool) -> BTreeSet<Iri> {
        self.walk(class, direct, |current| {
            self.store
                .sub_class_axioms_for_superclass(current, scope)
                .into_iter()
                .filter_map(|axiom| axiom.sub.as_named().cloned())
                .collect()
        })
    }

    /// Objects of `property` assertions whose subject is `individual`.
    #[must_use]
    pub fn object_property_values(
        &self,
        individual: &Iri,
        property: &Iri,
        scope: Scope,
    ) -> BTreeSet<Iri> {
        self.store
            .object_property_assertions_for_subject(individual, scope)
            .into_iter()
            .filter(|assertion| &assertion.property == property)
            .map(|assertion| assertion.object)
            .collect()
    }

    /// Literal values of `property` assertions whose subject is `individual`.
    #[must_use]
    pub fn data_property_values(
        &self,
        individual: &Iri,
        property: &Iri,
        scope: Scope,
    ) -> BTreeSet<Literal> {
        self.store
            .data_property_assertions_for_subject(individual, scope)
            .into_iter()
            .filter(|assertion| &assertion.property == property)
            .map(|assertion| assertion.value)
            .collect()
    }

    /// Returns whether a class assertion for exactly `(class, individual)` is
    /// stored in `scope`.
    #[must_use]
    pub fn is_asserted(&self, individual: &Iri, class: &Iri, scope: Scope) -> bool {
        self.store.contains_axiom(
            &Axiom::class_assertion(class.clone(), individual.clone()),
            scope,
        )
    }

    fn walk<F>(&self, start: &Iri, direct: bool, neighbours: F) -> BTreeSet<Iri>
    where
        F: Fn(&Iri) -> Vec<Iri>,
    {
        if direct {
            let mut told: BTreeSet<Iri> = neighbours(start).into_iter().collect();
            told.remove(start);
            return told;
        }

        let mut visited = BTreeSet::from([start.clone()]);
        let mut queue = VecDeque::from([start.clone()]);
        while let Some(current) = queue.pop_front() {
            for next in neighbours(&current) {
                if visited.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
        visited.remove(start);
        visited
    }
}
