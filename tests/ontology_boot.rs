use std::{
    collections::BTreeSet,
    fs,
    time::{SystemTime, UNIX_EPOCH},
};

use ontoview::{
    config::Config,
    ontology::{Iri, QueryMode, Scope},
    OntologyService,
};

const CONFIG: &str = r"
logger:
  enable: false
ontology:
  iri: https://example.org/clinical
  imports:
    - https://example.org/upper
reasoner:
  backend: native
";

fn iri(text: &str) -> Iri {
    Iri::new(format!("https://example.org/{text}")).expect("valid iri")
}

fn service() -> OntologyService {
    let config = Config::from_yaml_str(CONFIG).expect("config");
    OntologyService::from_config(&config).expect("service")
}

#[test]
fn service_from_config_wires_store_imports_and_reasoner() {
    let service = service();
    let store = service.store();
    assert_eq!(store.ontology_iri(), iri("clinical"));
    assert!(store.is_imported(&iri("upper")));
    assert_eq!(service.reasoner_name(), Some("native"));
    assert_eq!(service.revision(), 0);
    assert!(!service.add_import(&iri("upper")).expect("already imported"));
}

#[test]
fn root_and_repeated_imports_are_skipped_at_boot() {
    let config = Config::from_yaml_str(
        r"
ontology:
  iri: https://example.org/clinical
  imports:
    - https://example.org/clinical
    - https://example.org/upper
    - https://example.org/upper
",
    )
    .expect("config");
    let service = OntologyService::from_config(&config).expect("service");
    let store = service.store();
    assert!(store.is_imported(&iri("upper")));
    assert!(!service.add_import(&iri("clinical")).expect("root is never an import"));
    assert_eq!(service.revision(), 0);
}

#[test]
fn service_without_reasoner_section_only_answers_asserted_queries() {
    let config = Config::from_yaml_str("ontology:\n  iri: https://example.org/clinical\n")
        .expect("config");
    let service = OntologyService::from_config(&config).expect("service");
    assert!(service.views().is_none());
    assert!(service.declare_class(&iri("Disease")));
    service
        .create_individual(&iri("Disease"), &iri("T1DM"))
        .expect("create");
    assert!(service
        .is_instance_of(&iri("T1DM"), &iri("Disease"), Scope::Local, QueryMode::Asserted)
        .expect("asserted"));
    assert!(matches!(
        service.is_instance_of(&iri("T1DM"), &iri("Disease"), Scope::Local, QueryMode::InferredAll),
        Err(ontoview::Error::NoReasoner)
    ));
}

#[test]
fn config_is_loaded_from_file() {
    let identifier = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("ontoview-{identifier}.yaml"));
    fs::write(&path, CONFIG).expect("config file");

    let config = Config::from_file(&path).expect("config from file");
    assert_eq!(config.ontology.iri, iri("clinical"));
    assert!(config.reasoner.is_some());

    fs::remove_file(&path).expect("cleanup");
    assert!(matches!(
        Config::from_file(&path),
        Err(ontoview::Error::Io(_))
    ));
}

#[test]
fn disease_model_element_scenario() {
    let service = service();
    assert!(service.declare_class(&iri("Disease")));
    assert!(service.declare_class(&iri("ModelElement")));
    assert!(service
        .assert_sub_class_of(&iri("Disease"), &iri("ModelElement"))
        .expect("sub class"));
    assert!(service
        .create_individual(&iri("Disease"), &iri("T1DM"))
        .expect("create"));

    assert_eq!(
        service.asserted_types(&iri("T1DM"), true, Scope::Local),
        BTreeSet::from([iri("Disease"), iri("ModelElement")])
    );
    assert_eq!(
        service.asserted_types(&iri("T1DM"), false, Scope::Local),
        BTreeSet::from([iri("Disease")])
    );
    assert!(!service
        .is_instance_of(&iri("T1DM"), &iri("ModelElement"), Scope::Local, QueryMode::Asserted)
        .expect("asserted"));
    assert!(service
        .is_instance_of(&iri("T1DM"), &iri("ModelElement"), Scope::Local, QueryMode::InferredAll)
        .expect("inferred"));
    assert!(!service
        .is_instance_of(
            &iri("T1DM"),
            &iri("ModelElement"),
            Scope::Local,
            QueryMode::InferredDirect
        )
        .expect("inferred direct"));

    assert!(service.retract_type(&iri("T1DM"), &iri("Disease")));
    assert!(!service
        .is_instance_of(&iri("T1DM"), &iri("ModelElement"), Scope::Local, QueryMode::InferredAll)
        .expect("inferred after retraction"));
}
