//! Tri-modal membership and hierarchy queries.

use std::{collections::BTreeSet, fmt::Display};

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{
    cache::DerivedViewCache,
    closure::AssertedClosure,
    entities::{Entity, EntityKind},
    reasoner::{DerivedView, ReasonerError},
    repositories::AxiomStore,
    value_objects::{Iri, Scope},
};
use crate::{Error, Result};

/// How a query is answered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Stored axioms only, no entailment.
    Asserted,
    /// Entailed facts, most specific answers only.
    InferredDirect,
    /// Every entailed fact.
    InferredAll,
}

impl QueryMode {
    /// The `direct` flag handed to the derived view, or `None` for asserted
    /// queries. This is the only place the three modes are told apart.
    #[must_use]
    pub const fn inferred_direct(self) -> Option<bool> {
        match self {
            Self::Asserted => None,
            Self::InferredDirect => Some(true),
            Self::InferredAll => Some(false),
        }
    }
}

impl Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Asserted => "asserted",
            Self::InferredDirect => "inferred (direct)",
            Self::InferredAll => "inferred (all)",
        })
    }
}

/// Routes each query to [`AssertedClosure`] or to the cached derived view.
#[derive(Clone, Copy)]
pub struct QueryDispatcher<'a> {
    store: &'a dyn AxiomStore,
    views: Option<&'a DerivedViewCache>,
}

impl<'a> QueryDispatcher<'a> {
    #[must_use]
    pub fn new(store: &'a dyn AxiomStore, views: Option<&'a DerivedViewCache>) -> Self {
        Self { store, views }
    }

    /// Returns whether `individual` is an instance of `class`.
    ///
    /// Either entity missing from `scope` yields `Ok(false)` in every mode.
    /// In asserted mode only a class assertion on exactly `class` counts;
    /// membership through an asserted superclass is an inferred fact.
    ///
    /// # Errors
    ///
    /// [`Error::NoReasoner`] for inferred modes without an engine, or the
    /// engine's failure.
    pub fn is_instance_of(
        &self,
        individual: &Iri,
        class: &Iri,
        scope: Scope,
        mode: QueryMode,
    ) -> Result<bool> {
        if !self.store.has_individual(individual, scope) || !self.store.has_class(class, scope) {
            trace!(individual = %individual, class = %class, %scope, "instance_check_outside_scope");
            return Ok(false);
        }
        match mode.inferred_direct() {
            None => Ok(AssertedClosure::new(self.store).is_asserted(individual, class, scope)),
            Some(direct) => self.inferred(|view| {
                Ok(view.types(individual, direct)?.contains(class))
            }),
        }
    }

    /// Individuals that are instances of `class`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::is_instance_of`].
    pub fn instances_of_class(&self, class: &Iri, scope: Scope, mode: QueryMode) -> Result<BTreeSet<Iri>> {
        match mode.inferred_direct() {
            None => Ok(AssertedClosure::new(self.store).instances_of_class(class, scope, true)),
            Some(direct) => {
                let found = self.inferred(|view| view.instances(class, direct))?;
                Ok(self.in_signature(found, EntityKind::NamedIndividual, scope))
            }
        }
    }

    /// Classes `individual` belongs to. Asserted mode returns the directly
    /// asserted named classes.
    ///
    /// # Errors
    ///
    /// Same as [`Self::is_instance_of`].
    pub fn types(&self, individual: &Iri, scope: Scope, mode: QueryMode) -> Result<BTreeSet<Iri>> {
        match mode.inferred_direct() {
            None => Ok(AssertedClosure::new(self.store).direct_types(individual, scope)),
            Some(direct) => self.inferred_classes(scope, |view| view.types(individual, direct)),
        }
    }

    /// # Errors
    ///
    /// Same as [`Self::is_instance_of`].
    pub fn super_classes(&self, class: &Iri, scope: Scope, mode: QueryMode) -> Result<BTreeSet<Iri>> {
        match mode.inferred_direct() {
            None => Ok(AssertedClosure::new(self.store).super_classes(class, scope, false)),
            Some(direct) => self.inferred_classes(scope, |view| view.super_classes(class, direct)),
        }
    }

    /// # Errors
    ///
    /// Same as [`Self::is_instance_of`].
    pub fn sub_classes(&self, class: &Iri, scope: Scope, mode: QueryMode) -> Result<BTreeSet<Iri>> {
        match mode.inferred_direct() {
            None => Ok(AssertedClosure::new(self.store).sub_classes(class, scope, false)),
            Some(direct) => self.inferred_classes(scope, |view| view.sub_classes(class, direct)),
        }
    }

    /// Asserted types of `individual`, optionally with every asserted
    /// superclass.
    #[must_use]
    pub fn asserted_types(&self, individual: &Iri, include_superclasses: bool, scope: Scope) -> BTreeSet<Iri> {
        let closure = AssertedClosure::new(self.store);
        if include_superclasses {
            closure.types_with_superclasses(individual, scope)
        } else {
            closure.direct_types(individual, scope)
        }
    }

    /// Asserted instances of `class`, optionally including instances of its
    /// asserted subclasses.
    #[must_use]
    pub fn asserted_instances(&self, class: &Iri, include_subclasses: bool, scope: Scope) -> BTreeSet<Iri> {
        AssertedClosure::new(self.store).instances_of_class(class, scope, !include_subclasses)
    }

    fn inferred<T, F>(&self, read: F) -> Result<T>
    where
        F: FnOnce(&dyn DerivedView) -> Result<T, ReasonerError>,
    {
        let views = self.views.ok_or(Error::NoReasoner)?;
        views.with_view(self.store, read)
    }

    fn inferred_classes<F>(&self, scope: Scope, read: F) -> Result<BTreeSet<Iri>>
    where
        F: FnOnce(&dyn DerivedView) -> Result<BTreeSet<Iri>, ReasonerError>,
    {
        let found = self.inferred(read)?;
        Ok(self.in_signature(found, EntityKind::Class, scope))
    }

    /// Drops answers naming entities outside `scope`. The derived view always
    /// reasons over the whole imports closure. `owl:Thing` is kept.
    fn in_signature(&self, found: BTreeSet<Iri>, kind: EntityKind, scope: Scope) -> BTreeSet<Iri> {
        if scope == Scope::ImportsClosure {
            return found;
        }
        found
            .into_iter()
            .filter(|iri| {
                (kind == EntityKind::Class && iri.is_owl_thing())
                    || self
                        .store
                        .contains_entity(&Entity::new(kind, iri.clone()), scope)
            })
            .collect()
    }
}
