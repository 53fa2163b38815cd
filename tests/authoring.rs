use std::sync::Arc;

use ontoview::{
    ontology::{Axiom, Entity, InMemoryOntologyStore, Iri, Literal, MutableAxiomStore, Scope},
    OntologyService,
};
use proptest::prelude::*;

const CLASSES: [&str; 3] = ["Disease", "Symptom", "Drug"];
const INDIVIDUALS: [&str; 4] = ["t1dm", "t2dm", "thirst", "insulin"];

fn iri(text: &str) -> Iri {
    Iri::new(format!("https://example.org/{text}")).expect("valid iri")
}

/// A service whose root ontology declares the class and property vocabulary.
fn seeded_service() -> OntologyService {
    let store = InMemoryOntologyStore::new(iri("onto"));
    for class in CLASSES {
        store.add_axiom(Axiom::declaration(Entity::class(iri(class))));
    }
    store.add_axiom(Axiom::declaration(Entity::object_property(iri("hasSymptom"))));
    store.add_axiom(Axiom::declaration(Entity::data_property(iri("code"))));
    OntologyService::new(Arc::new(store), None)
}

#[derive(Clone, Debug)]
enum Op {
    Create(usize, usize),
    AssertType(usize, usize),
    RetractType(usize, usize),
    AssertLink(usize, usize),
    RetractLink(usize, usize),
    AssertCode(usize, u8),
    RetractCode(usize, u8),
}

fn op() -> impl Strategy<Value = Op> {
    let class = 0..CLASSES.len() + 1;
    let individual = 0..INDIVIDUALS.len();
    prop_oneof![
        (class.clone(), individual.clone()).prop_map(|(c, i)| Op::Create(c, i)),
        (class.clone(), individual.clone()).prop_map(|(c, i)| Op::AssertType(c, i)),
        (class, individual.clone()).prop_map(|(c, i)| Op::RetractType(c, i)),
        (individual.clone(), individual.clone()).prop_map(|(s, o)| Op::AssertLink(s, o)),
        (individual.clone(), individual.clone()).prop_map(|(s, o)| Op::RetractLink(s, o)),
        (individual.clone(), 0u8..3).prop_map(|(s, v)| Op::AssertCode(s, v)),
        (individual, 0u8..3).prop_map(|(s, v)| Op::RetractCode(s, v)),
    ]
}

/// Index `CLASSES.len()` stands for a class nobody declared.
fn class(index: usize) -> Iri {
    CLASSES.get(index).map_or_else(|| iri("Undeclared"), |name| iri(name))
}

fn individual(index: usize) -> Iri {
    iri(INDIVIDUALS[index])
}

/// Applies `op` and reports whether it claims to have changed the store.
fn apply(service: &OntologyService, op: &Op) -> bool {
    match *op {
        Op::Create(c, i) => service
            .create_individual(&class(c), &individual(i))
            .unwrap_or(false),
        Op::AssertType(c, i) => service
            .assert_type(&individual(i), &class(c))
            .unwrap_or(false),
        Op::RetractType(c, i) => service.retract_type(&individual(i), &class(c)),
        Op::AssertLink(s, o) => service
            .assert_object_property(&individual(s), &iri("hasSymptom"), &individual(o))
            .unwrap_or(false),
        Op::RetractLink(s, o) => {
            service.retract_object_property(&individual(s), &iri("hasSymptom"), &individual(o))
        }
        Op::AssertCode(s, v) => service
            .assert_data_property(&individual(s), &iri("code"), Literal::string(format!("E1{v}")))
            .unwrap_or(false),
        Op::RetractCode(s, v) => service.retract_data_property(
            &individual(s),
            &iri("code"),
            &Literal::string(format!("E1{v}")),
        ),
    }
}

proptest! {
    #[test]
    fn create_individual_twice_reports_true_then_false(c in 0..CLASSES.len(), other in 0..CLASSES.len(), i in 0..INDIVIDUALS.len()) {
        let service = seeded_service();
        prop_assert!(service.create_individual(&class(c), &individual(i)).expect("first"));
        prop_assert!(!service.create_individual(&class(c), &individual(i)).expect("second"));
        let types = service.asserted_types(&individual(i), false, Scope::Local);
        prop_assert!(!service.create_individual(&class(other), &individual(i)).expect("third"));
        prop_assert_eq!(service.asserted_types(&individual(i), false, Scope::Local), types);
    }

    #[test]
    fn revision_moves_exactly_when_state_changes(ops in proptest::collection::vec(op(), 1..40)) {
        let service = seeded_service();
        let store = service.store();
        for op in &ops {
            let before_revision = service.revision();
            let before_axioms = store.axioms(Scope::Local);
            let changed = apply(&service, op);
            let after_axioms = store.axioms(Scope::Local);
            if changed {
                prop_assert!(service.revision() > before_revision, "{:?} reported a change without a bump", op);
                prop_assert_ne!(before_axioms, after_axioms);
            } else {
                prop_assert_eq!(service.revision(), before_revision, "{:?} bumped without a change", op);
                prop_assert_eq!(before_axioms, after_axioms);
            }
        }
    }
}

#[test]
fn repeated_assertions_and_retractions_are_no_ops() {
    let service = seeded_service();
    service
        .create_individual(&iri("Disease"), &iri("t1dm"))
        .expect("t1dm");
    service
        .create_individual(&iri("Symptom"), &iri("thirst"))
        .expect("thirst");

    assert!(service
        .assert_object_property(&iri("t1dm"), &iri("hasSymptom"), &iri("thirst"))
        .expect("link"));
    assert!(!service
        .assert_object_property(&iri("t1dm"), &iri("hasSymptom"), &iri("thirst"))
        .expect("link again"));
    assert!(service.retract_object_property(&iri("t1dm"), &iri("hasSymptom"), &iri("thirst")));
    assert!(!service.retract_object_property(&iri("t1dm"), &iri("hasSymptom"), &iri("thirst")));

    assert!(service.assert_type(&iri("t1dm"), &iri("Symptom")).expect("type"));
    assert!(!service.assert_type(&iri("t1dm"), &iri("Symptom")).expect("type again"));
    assert!(service.retract_type(&iri("t1dm"), &iri("Symptom")));
    assert!(!service.retract_type(&iri("t1dm"), &iri("Symptom")));
}

#[test]
fn failed_calls_leave_the_knowledge_base_untouched() {
    let service = seeded_service();
    let store = service.store();
    let before = store.axioms(Scope::Local);

    assert!(matches!(
        service.create_individual(&iri("Undeclared"), &iri("t1dm")),
        Err(ontoview::Error::MissingClass { .. })
    ));
    assert!(matches!(
        service.assert_type(&iri("t1dm"), &iri("Disease")),
        Err(ontoview::Error::MissingIndividual { .. })
    ));
    assert!(matches!(
        service.assert_sub_class_of(&iri("Disease"), &iri("Undeclared")),
        Err(ontoview::Error::MissingClass { .. })
    ));

    assert_eq!(store.axioms(Scope::Local), before);
    assert_eq!(service.revision(), 0);
}

#[test]
fn typed_literals_differ_from_plain_strings() {
    let service = seeded_service();
    service
        .create_individual(&iri("Disease"), &iri("t1dm"))
        .expect("create");
    let integer = Iri::new("http://www.w3.org/2001/XMLSchema#integer").expect("xsd:integer");
    let typed = Literal::typed("42", integer);
    assert_ne!(typed, Literal::string("42"));

    assert!(service
        .assert_data_property(&iri("t1dm"), &iri("code"), typed.clone())
        .expect("typed"));
    assert!(service
        .assert_data_property(&iri("t1dm"), &iri("code"), Literal::string("42"))
        .expect("plain"));
    assert!(service.retract_data_property(&iri("t1dm"), &iri("code"), &Literal::string("42")));
    assert!(service.store().contains_axiom(
        &Axiom::data_property_assertion(iri("code"), iri("t1dm"), typed),
        Scope::Local
    ));
}
