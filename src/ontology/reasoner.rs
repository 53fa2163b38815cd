//! Entailment collaborator contract and the bundled native engine.
//!
//! A [`Reasoner`] turns a store snapshot into a [`DerivedView`] able to answer
//! type, instance and hierarchy questions with a `direct` flag. Views are
//! exclusively owned by the derived view cache, which decides when to build,
//! precompute and dispose them.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use thiserror::Error;
use tracing::debug;

use super::{
    entities::{Axiom, ClassExpression, EntityKind},
    repositories::AxiomStore,
    value_objects::{Iri, Scope},
};
use crate::config::InferenceSettings;

/// Failures reported by an entailment engine.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReasonerError {
    /// An individual is an instance of a class and of its complement.
    #[error("inconsistent knowledge base: `{individual}` is an instance of `{class}` and of its complement")]
    Inconsistent { individual: Iri, class: Iri },
    /// A query was issued before [`DerivedView::precompute`].
    #[error("derived view queried before precomputation")]
    NotPrecomputed,
    /// A query was issued after [`DerivedView::dispose`].
    #[error("derived view queried after disposal")]
    Disposed,
    /// Engine specific failure.
    #[error("entailment engine failure: {0}")]
    Backend(String),
}

/// Entailment answers over a fixed snapshot of the knowledge base.
pub trait DerivedView: Send {
    /// Eagerly materialises every derived fact.
    fn precompute(&mut self) -> Result<(), ReasonerError>;

    /// Classes `individual` is an instance of.
    fn types(&self, individual: &Iri, direct: bool) -> Result<BTreeSet<Iri>, ReasonerError>;

    /// Individuals that are instances of `class`.
    fn instances(&self, class: &Iri, direct: bool) -> Result<BTreeSet<Iri>, ReasonerError>;

    /// Classes subsuming `class`, excluding `class` itself.
    fn super_classes(&self, class: &Iri, direct: bool) -> Result<BTreeSet<Iri>, ReasonerError>;

    /// Classes subsumed by `class`, excluding `class` itself.
    fn sub_classes(&self, class: &Iri, direct: bool) -> Result<BTreeSet<Iri>, ReasonerError>;

    /// Releases the resources held by the view.
    fn dispose(&mut self);
}

/// Factory of [`DerivedView`]s.
pub trait Reasoner: Send + Sync {
    /// Short engine name used in log output.
    fn name(&self) -> &str;

    /// Builds a view bound to the current contents of `store`.
    fn create_view(&self, store: &dyn AxiomStore) -> Result<Box<dyn DerivedView>, ReasonerError>;
}

/// Rule-based engine covering a small OWL RL subset: class hierarchy closure
/// (scm-sco, scm-int), type propagation (cax-sco, cls-int1, cls-int2),
/// existential restrictions on the subclass side (cls-svf1), `owl:Thing` as
/// the top class and complement clashes (cls-com).
#[derive(Clone, Debug, Default)]
pub struct NativeReasoner {
    settings: InferenceSettings,
}

impl NativeReasoner {
    #[must_use]
    pub fn new(settings: InferenceSettings) -> Self {
        Self { settings }
    }
}

impl Reasoner for NativeReasoner {
    fn name(&self) -> &str {
        "native"
    }

    fn create_view(&self, store: &dyn AxiomStore) -> Result<Box<dyn DerivedView>, ReasonerError> {
        Ok(Box::new(NativeView {
            settings: self.settings.clone(),
            axioms: store.axioms(Scope::ImportsClosure),
            state: ViewState::Pending,
        }))
    }
}

enum ViewState {
    Pending,
    Ready(Materialization),
    Disposed,
}

struct NativeView {
    settings: InferenceSettings,
    axioms: Vec<Axiom>,
    state: ViewState,
}

impl NativeView {
    fn materialized(&self) -> Result<&Materialization, ReasonerError> {
        match &self.state {
            ViewState::Ready(materialization) => Ok(materialization),
            ViewState::Pending => Err(ReasonerError::NotPrecomputed),
            ViewState::Disposed => Err(ReasonerError::Disposed),
        }
    }
}

impl DerivedView for NativeView {
    fn precompute(&mut self) -> Result<(), ReasonerError> {
        match self.state {
            ViewState::Ready(_) => return Ok(()),
            ViewState::Disposed => return Err(ReasonerError::Disposed),
            ViewState::Pending => {}
        }
        let materialization = Materialization::compute(&self.axioms, &self.settings)?;
        debug!(
            classes = materialization.ancestors.len(),
            individuals = materialization.types.len(),
            "native_view_materialized"
        );
        self.state = ViewState::Ready(materialization);
        Ok(())
    }

    fn types(&self, individual: &Iri, direct: bool) -> Result<BTreeSet<Iri>, ReasonerError> {
        let materialization = self.materialized()?;
        let Some(types) = materialization.types.get(individual) else {
            return Ok(BTreeSet::new());
        };
        Ok(if direct {
            materialization.most_specific(types)
        } else {
            types.clone()
        })
    }

    fn instances(&self, class: &Iri, direct: bool) -> Result<BTreeSet<Iri>, ReasonerError> {
        let materialization = self.materialized()?;
        let mut result = BTreeSet::new();
        for (individual, types) in &materialization.types {
            let member = if direct {
                materialization.most_specific(types).contains(class)
            } else {
                types.contains(class)
            };
            if member {
                result.insert(individual.clone());
            }
        }
        Ok(result)
    }

    fn super_classes(&self, class: &Iri, direct: bool) -> Result<BTreeSet<Iri>, ReasonerError> {
        let materialization = self.materialized()?;
        let mut supers = materialization
            .ancestors
            .get(class)
            .cloned()
            .unwrap_or_default();
        supers.retain(|candidate| !materialization.equivalent(candidate, class));
        Ok(if direct {
            materialization.most_specific(&supers)
        } else {
            supers
        })
    }

    fn sub_classes(&self, class: &Iri, direct: bool) -> Result<BTreeSet<Iri>, ReasonerError> {
        let materialization = self.materialized()?;
        let subs: BTreeSet<Iri> = materialization
            .ancestors
            .iter()
            .filter(|(candidate, ancestors)| {
                ancestors.contains(class) && !materialization.equivalent(candidate, class)
            })
            .map(|(candidate, _)| candidate.clone())
            .collect();
        Ok(if direct {
            materialization.most_general(&subs)
        } else {
            subs
        })
    }

    fn dispose(&mut self) {
        self.axioms = Vec::new();
        self.state = ViewState::Disposed;
    }
}

/// Premise of a type propagation rule whose subclass side is anonymous.
enum Premise {
    /// `ObjectIntersectionOf(C1 .. Cn)` of named classes.
    AllOf(BTreeSet<Iri>),
    /// `ObjectSomeValuesFrom(p, F)` with a named (or conjunctive named) filler.
    SomeValuesFrom {
        property: Iri,
        filler: BTreeSet<Iri>,
    },
}

struct TypeRule {
    premise: Premise,
    conclusions: BTreeSet<Iri>,
}

#[derive(Debug, Default)]
struct Materialization {
    /// Reflexive transitive superclasses of every named class.
    ancestors: BTreeMap<Iri, BTreeSet<Iri>>,
    /// Every type of every named individual.
    types: BTreeMap<Iri, BTreeSet<Iri>>,
}

impl Materialization {
    fn compute(axioms: &[Axiom], settings: &InferenceSettings) -> Result<Self, ReasonerError> {
        let top = Iri::owl_thing();
        let mut signature = BTreeSet::new();
        for axiom in axioms {
            axiom.collect_signature(&mut signature);
        }

        let mut told: BTreeMap<Iri, BTreeSet<Iri>> = BTreeMap::new();
        let mut types: BTreeMap<Iri, BTreeSet<Iri>> = BTreeMap::new();
        for entity in &signature {
            match entity.kind() {
                EntityKind::Class => {
                    told.entry(entity.iri().clone()).or_default();
                }
                EntityKind::NamedIndividual => {
                    types.entry(entity.iri().clone()).or_default();
                }
                _ => {}
            }
        }
        if settings.top_class {
            told.entry(top.clone()).or_default();
        }

        let mut rules = Vec::new();
        let mut disjoint: BTreeMap<Iri, BTreeSet<Iri>> = BTreeMap::new();
        let mut forbidden: BTreeMap<Iri, BTreeSet<Iri>> = BTreeMap::new();
        let mut links: Vec<(&Iri, &Iri, &Iri)> = Vec::new();

        for axiom in axioms {
            match axiom {
                Axiom::SubClassOf(sub_class_of) => {
                    let conclusions = named_conjuncts(&sub_class_of.sup);
                    for complement in complemented_conjuncts(&sub_class_of.sup) {
                        if let Some(sub) = sub_class_of.sub.as_named() {
                            disjoint.entry(sub.clone()).or_default().insert(complement);
                        }
                    }
                    match &sub_class_of.sub {
                        ClassExpression::Named(sub) => {
                            told.entry(sub.clone()).or_default().extend(conclusions);
                        }
                        ClassExpression::ObjectIntersectionOf(_) => {
                            if let Some(operands) = fully_named(&sub_class_of.sub) {
                                rules.push(TypeRule {
                                    premise: Premise::AllOf(operands),
                                    conclusions,
                                });
                            }
                        }
                        ClassExpression::ObjectSomeValuesFrom { property, filler }
                            if settings.existential_restrictions =>
                        {
                            let filler = if filler.as_named().is_some_and(Iri::is_owl_thing) {
                                Some(BTreeSet::new())
                            } else {
                                fully_named(filler)
                            };
                            if let Some(filler) = filler {
                                rules.push(TypeRule {
                                    premise: Premise::SomeValuesFrom {
                                        property: property.clone(),
                                        filler,
                                    },
                                    conclusions,
                                });
                            }
                        }
                        _ => {}
                    }
                }
                Axiom::ClassAssertion(assertion) => {
                    types
                        .entry(assertion.individual.clone())
                        .or_default()
                        .extend(named_conjuncts(&assertion.class));
                    for complement in complemented_conjuncts(&assertion.class) {
                        forbidden
                            .entry(assertion.individual.clone())
                            .or_default()
                            .insert(complement);
                    }
                }
                Axiom::ObjectPropertyAssertion(assertion) => {
                    links.push((&assertion.property, &assertion.subject, &assertion.object));
                }
                Axiom::Declaration(_) | Axiom::DataPropertyAssertion(_) => {}
            }
        }

        let mut ancestors = BTreeMap::new();
        for class in told.keys() {
            let mut reached = BTreeSet::from([class.clone()]);
            let mut queue = VecDeque::from([class.clone()]);
            while let Some(current) = queue.pop_front() {
                let Some(parents) = told.get(&current) else {
                    continue;
                };
                for parent in parents {
                    if reached.insert(parent.clone()) {
                        queue.push_back(parent.clone());
                    }
                }
            }
            if settings.top_class {
                reached.insert(top.clone());
            }
            ancestors.insert(class.clone(), reached);
        }

        let mut materialization = Self { ancestors, types };
        materialization.saturate(&rules, &links, settings);
        if settings.top_class {
            for types in materialization.types.values_mut() {
                types.insert(top.clone());
            }
        }
        if settings.complement_checks {
            materialization.check_complements(&disjoint, &forbidden)?;
        }
        Ok(materialization)
    }

    /// Applies cax-sco and the anonymous-subclass rules until no individual
    /// gains a type.
    fn saturate(
        &mut self,
        rules: &[TypeRule],
        links: &[(&Iri, &Iri, &Iri)],
        settings: &InferenceSettings,
    ) {
        let mut changed = true;
        while changed {
            changed = false;

            for types in self.types.values_mut() {
                let inherited: Vec<Iri> = types
                    .iter()
                    .filter_map(|class| self.ancestors.get(class))
                    .flatten()
                    .cloned()
                    .collect();
                for class in inherited {
                    changed |= types.insert(class);
                }
            }

            let mut derived: Vec<(Iri, Iri)> = Vec::new();
            for rule in rules {
                match &rule.premise {
                    Premise::AllOf(operands) => {
                        for (individual, types) in &self.types {
                            if operands.is_subset(types) {
                                derived.extend(
                                    rule.conclusions
                                        .iter()
                                        .map(|class| (individual.clone(), class.clone())),
                                );
                            }
                        }
                    }
                    Premise::SomeValuesFrom { property, filler } => {
                        for (_, subject, object) in
                            links.iter().filter(|(via, _, _)| *via == property)
                        {
                            let satisfied = self
                                .types
                                .get(*object)
                                .is_some_and(|types| filler.is_subset(types));
                            if satisfied {
                                derived.extend(
                                    rule.conclusions
                                        .iter()
                                        .map(|class| ((*subject).clone(), class.clone())),
                                );
                            }
                        }
                    }
                }
            }

            for (individual, class) in derived {
                if !self.ancestors.contains_key(&class) {
                    let mut reached = BTreeSet::from([class.clone()]);
                    if settings.top_class {
                        reached.insert(Iri::owl_thing());
                    }
                    self.ancestors.insert(class.clone(), reached);
                }
                changed |= self.types.entry(individual).or_default().insert(class);
            }
        }
    }

    fn check_complements(
        &self,
        disjoint: &BTreeMap<Iri, BTreeSet<Iri>>,
        forbidden: &BTreeMap<Iri, BTreeSet<Iri>>,
    ) -> Result<(), ReasonerError> {
        for (individual, types) in &self.types {
            let excluded = types
                .iter()
                .filter_map(|class| disjoint.get(class))
                .flatten()
                .chain(forbidden.get(individual).into_iter().flatten());
            for class in excluded {
                if types.contains(class) {
                    return Err(ReasonerError::Inconsistent {
                        individual: individual.clone(),
                        class: class.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// `a` is strictly more specific than `b`.
    /// `a` and `b` are each other's ancestors, which a subclass cycle or
    /// `a == b` gives.
    fn equivalent(&self, a: &Iri, b: &Iri) -> bool {
        a == b
            || (self.ancestors.get(a).is_some_and(|ancestors| ancestors.contains(b))
                && self.ancestors.get(b).is_some_and(|ancestors| ancestors.contains(a)))
    }

    fn strictly_below(&self, a: &Iri, b: &Iri) -> bool {
        let a_under_b = self
            .ancestors
            .get(a)
            .is_some_and(|ancestors| ancestors.contains(b));
        let b_under_a = self
            .ancestors
            .get(b)
            .is_some_and(|ancestors| ancestors.contains(a));
        a_under_b && !b_under_a
    }

    fn most_specific(&self, classes: &BTreeSet<Iri>) -> BTreeSet<Iri> {
        classes
            .iter()
            .filter(|candidate| {
                !classes
                    .iter()
                    .any(|other| self.strictly_below(other, candidate))
            })
            .cloned()
            .collect()
    }

    fn most_general(&self, classes: &BTreeSet<Iri>) -> BTreeSet<Iri> {
        classes
            .iter()
            .filter(|candidate| {
                !classes
                    .iter()
                    .any(|other| self.strictly_below(candidate, other))
            })
            .cloned()
            .collect()
    }
}

/// Named classes implied by membership in `expression`.
fn named_conjuncts(expression: &ClassExpression) -> BTreeSet<Iri> {
    let mut result = BTreeSet::new();
    collect_named_conjuncts(expression, &mut result);
    result
}

fn collect_named_conjuncts(expression: &ClassExpression, into: &mut BTreeSet<Iri>) {
    match expression {
        ClassExpression::Named(iri) => {
            into.insert(iri.clone());
        }
        ClassExpression::ObjectIntersectionOf(operands) => {
            for operand in operands {
                collect_named_conjuncts(operand, into);
            }
        }
        _ => {}
    }
}

/// Named classes whose complement is implied by membership in `expression`.
fn complemented_conjuncts(expression: &ClassExpression) -> BTreeSet<Iri> {
    match expression {
        ClassExpression::ObjectComplementOf(operand) => {
            operand.as_named().cloned().into_iter().collect()
        }
        ClassExpression::ObjectIntersectionOf(operands) => operands
            .iter()
            .flat_map(complemented_conjuncts)
            .collect(),
        _ => BTreeSet::new(),
    }
}

/// Operands of an expression built only from named classes and intersections.
fn fully_named(expression: &ClassExpression) -> Option<BTreeSet<Iri>> {
    match expression {
        ClassExpression::Named(iri) => Some(BTreeSet::from([iri.clone()])),
        ClassExpression::ObjectIntersectionOf(operands) => {
            let mut result = BTreeSet::new();
            for operand in operands {
                result.extend(fully_named(operand)?);
            }
            Some(result)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{NativeReasoner, Reasoner, ReasonerError};
    use crate::{
        config::InferenceSettings,
        ontology::{
            entities::{Axiom, ClassExpression},
            memory::InMemoryOntologyStore,
            repositories::MutableAxiomStore,
            value_objects::Iri,
        },
    };

    fn iri(text: &str) -> Iri {
        Iri::new(format!("https://example.org/{text}")).expect("valid iri")
    }

    fn store(axioms: Vec<Axiom>) -> InMemoryOntologyStore {
        let store = InMemoryOntologyStore::new(iri("onto"));
        for axiom in axioms {
            store.add_axiom(axiom);
        }
        store
    }

    fn without_top() -> InferenceSettings {
        InferenceSettings {
            top_class: false,
            ..InferenceSettings::default()
        }
    }

    #[test]
    fn queries_require_precomputation() {
        let store = store(vec![Axiom::class_assertion(iri("Disease"), iri("t1dm"))]);
        let mut view = NativeReasoner::default()
            .create_view(&store)
            .expect("view");
        assert_eq!(
            view.types(&iri("t1dm"), false),
            Err(ReasonerError::NotPrecomputed)
        );
        view.precompute().expect("precompute");
        assert!(view
            .types(&iri("t1dm"), false)
            .expect("types")
            .contains(&iri("Disease")));
        view.dispose();
        assert_eq!(view.types(&iri("t1dm"), false), Err(ReasonerError::Disposed));
    }

    #[test]
    fn hierarchy_answers_leave_out_equivalent_classes() {
        let store = store(vec![
            Axiom::sub_class_of(iri("A"), iri("B")),
            Axiom::sub_class_of(iri("B"), iri("A")),
            Axiom::sub_class_of(iri("C"), iri("A")),
        ]);
        let mut view = NativeReasoner::new(without_top())
            .create_view(&store)
            .expect("view");
        view.precompute().expect("precompute");

        for direct in [true, false] {
            assert_eq!(
                view.sub_classes(&iri("A"), direct).expect("sub classes"),
                BTreeSet::from([iri("C")])
            );
            assert!(view
                .super_classes(&iri("A"), direct)
                .expect("super classes")
                .is_empty());
        }
        assert_eq!(
            view.super_classes(&iri("C"), true).expect("super classes"),
            BTreeSet::from([iri("A"), iri("B")])
        );
    }

    #[test]
    fn direct_answers_are_most_specific() {
        let store = store(vec![
            Axiom::sub_class_of(iri("Disease"), iri("ModelElement")),
            Axiom::sub_class_of(iri("Diabetes"), iri("Disease")),
            Axiom::class_assertion(iri("Diabetes"), iri("t1dm")),
            Axiom::class_assertion(iri("Disease"), iri("t1dm")),
        ]);
        let mut view = NativeReasoner::default()
            .create_view(&store)
            .expect("view");
        view.precompute().expect("precompute");

        assert_eq!(
            view.types(&iri("t1dm"), true).expect("types"),
            BTreeSet::from([iri("Diabetes")])
        );
        assert_eq!(
            view.types(&iri("t1dm"), false).expect("types"),
            BTreeSet::from([
                iri("Diabetes"),
                iri("Disease"),
                iri("ModelElement"),
                Iri::owl_thing()
            ])
        );
        assert!(view
            .instances(&iri("Disease"), true)
            .expect("instances")
            .is_empty());
        assert_eq!(
            view.super_classes(&iri("Diabetes"), true).expect("supers"),
            BTreeSet::from([iri("Disease")])
        );
        assert_eq!(
            view.sub_classes(&iri("ModelElement"), true).expect("subs"),
            BTreeSet::from([iri("Disease")])
        );
        assert_eq!(
            view.sub_classes(&Iri::owl_thing(), true).expect("subs"),
            BTreeSet::from([iri("ModelElement")])
        );
    }

    #[test]
    fn existential_restrictions_classify_subjects() {
        let store = store(vec![
            Axiom::sub_class_of(
                ClassExpression::some_values_from(iri("hasSymptom"), iri("Hyperglycemia").into()),
                iri("MetabolicCondition"),
            ),
            Axiom::object_property_assertion(iri("hasSymptom"), iri("t1dm"), iri("high_glucose")),
            Axiom::class_assertion(iri("Hyperglycemia"), iri("high_glucose")),
        ]);
        let mut view = NativeReasoner::new(without_top())
            .create_view(&store)
            .expect("view");
        view.precompute().expect("precompute");
        assert_eq!(
            view.types(&iri("t1dm"), false).expect("types"),
            BTreeSet::from([iri("MetabolicCondition")])
        );

        let mut disabled = NativeReasoner::new(InferenceSettings {
            existential_restrictions: false,
            ..without_top()
        })
        .create_view(&store)
        .expect("view");
        disabled.precompute().expect("precompute");
        assert!(disabled.types(&iri("t1dm"), false).expect("types").is_empty());
    }

    #[test]
    fn intersections_propagate_in_both_directions() {
        let store = store(vec![
            Axiom::sub_class_of(
                ClassExpression::ObjectIntersectionOf(vec![
                    iri("Disease").into(),
                    iri("Chronic").into(),
                ]),
                iri("LongTermCondition"),
            ),
            Axiom::class_assertion(
                ClassExpression::ObjectIntersectionOf(vec![
                    iri("Disease").into(),
                    iri("Chronic").into(),
                ]),
                iri("t1dm"),
            ),
        ]);
        let mut view = NativeReasoner::new(without_top())
            .create_view(&store)
            .expect("view");
        view.precompute().expect("precompute");
        assert_eq!(
            view.types(&iri("t1dm"), false).expect("types"),
            BTreeSet::from([iri("Chronic"), iri("Disease"), iri("LongTermCondition")])
        );
    }

    #[test]
    fn complement_clash_fails_precomputation() {
        let store = store(vec![
            Axiom::sub_class_of(
                iri("Viral"),
                ClassExpression::complement_of(iri("Autoimmune").into()),
            ),
            Axiom::sub_class_of(iri("Type1Diabetes"), iri("Autoimmune")),
            Axiom::class_assertion(iri("Viral"), iri("case")),
            Axiom::class_assertion(iri("Type1Diabetes"), iri("case")),
        ]);
        let mut view = NativeReasoner::default()
            .create_view(&store)
            .expect("view");
        assert_eq!(
            view.precompute(),
            Err(ReasonerError::Inconsistent {
                individual: iri("case"),
                class: iri("Autoimmune"),
            })
        );
    }

    #[test]
    fn asserted_complement_clashes_with_inferred_type() {
        let store = store(vec![
            Axiom::sub_class_of(iri("Disease"), iri("ModelElement")),
            Axiom::class_assertion(iri("Disease"), iri("t1dm")),
            Axiom::class_assertion(
                ClassExpression::complement_of(iri("ModelElement").into()),
                iri("t1dm"),
            ),
        ]);
        let mut view = NativeReasoner::default()
            .create_view(&store)
            .expect("view");
        assert!(matches!(
            view.precompute(),
            Err(ReasonerError::Inconsistent { .. })
        ));
    }

    #[test]
    fn view_is_bound_to_the_snapshot_it_was_built_from() {
        let store = store(vec![Axiom::class_assertion(iri("Disease"), iri("t1dm"))]);
        let mut view = NativeReasoner::new(without_top())
            .create_view(&store)
            .expect("view");
        store.add_axiom(Axiom::class_assertion(iri("Disease"), iri("t2dm")));
        view.precompute().expect("precompute");
        assert_eq!(
            view.instances(&iri("Disease"), false).expect("instances"),
            BTreeSet::from([iri("t1dm")])
        );
    }
}
