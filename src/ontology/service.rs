use std::{collections::BTreeSet, sync::Arc};

use tracing::{info, warn};

use crate::{
    config::{Config, ReasonerBackend, StoreBackend},
    ontology::{
        authoring::Authoring,
        cache::DerivedViewCache,
        memory::{InMemoryOntologyStore, OntologyDocument},
        query::{QueryDispatcher, QueryMode},
        reasoner::{NativeReasoner, Reasoner},
        entities::Axiom,
        repositories::{AxiomStore, MutableAxiomStore},
        revision::RevisionCounter,
        value_objects::{Iri, Literal, Scope},
    },
    Result,
};

/// Type alias simplifying store trait object usage inside the service.
pub type StoreHandle = dyn MutableAxiomStore + 'static;

/// High level ontology service wiring the axiom store, the revision counter
/// and the optional derived view cache together.
///
/// Clones share all three, so a mutation made through one clone invalidates
/// the derived view seen by every other.
#[derive(Clone)]
pub struct OntologyService {
    store: Arc<StoreHandle>,
    revision: Arc<RevisionCounter>,
    views: Option<Arc<DerivedViewCache>>,
}

impl OntologyService {
    /// Creates a new [`OntologyService`] over `store`. Without a reasoner only
    /// asserted queries are available.
    pub fn new(store: Arc<StoreHandle>, reasoner: Option<Arc<dyn Reasoner>>) -> Self {
        let revision = Arc::new(RevisionCounter::new());
        let views = reasoner
            .map(|reasoner| Arc::new(DerivedViewCache::new(reasoner, Arc::clone(&revision))));
        Self {
            store,
            revision,
            views,
        }
    }

    /// Builds a service instance from configuration settings.
    ///
    /// Every configured import is registered as an empty document and
    /// imported into the root before the service is handed out. Boot imports
    /// happen before any view exists and leave the revision at zero.
    ///
    /// An import naming the root ontology or repeating an earlier entry is
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Currently infallible for the in-memory backend; kept fallible for
    /// backends that load documents.
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = &config.ontology;
        let store = match settings.backend {
            StoreBackend::InMemory => InMemoryOntologyStore::new(settings.iri.clone()),
        };
        let mut imported = 0;
        for import in &settings.imports {
            if !store.insert_document(OntologyDocument::new(import.clone()))
                || !store.add_import(import)
            {
                warn!(ontology = %import, root = %settings.iri, "configured_import_skipped");
                continue;
            }
            imported += 1;
        }

        let reasoner = config.reasoner.as_ref().map(|reasoner| match reasoner.backend {
            ReasonerBackend::Native => {
                Arc::new(NativeReasoner::new(reasoner.inference.clone())) as Arc<dyn Reasoner>
            }
        });

        let service = Self::new(Arc::new(store), reasoner);
        info!(
            ontology = %settings.iri,
            imports = imported,
            reasoner = service.reasoner_name().unwrap_or("none"),
            "ontology_service_ready"
        );
        Ok(service)
    }

    /// Read-only access to the knowledge base. Writes go through the
    /// service so that every change bumps the revision.
    pub fn store(&self) -> &dyn AxiomStore {
        self.store.reader()
    }

    /// Current revision of the knowledge base.
    pub fn revision(&self) -> u64 {
        self.revision.current()
    }

    /// The derived view cache, when a reasoner is configured.
    pub fn views(&self) -> Option<&DerivedViewCache> {
        self.views.as_deref()
    }

    /// Name of the configured entailment engine.
    pub fn reasoner_name(&self) -> Option<&str> {
        self.views.as_ref().map(|views| views.reasoner_name())
    }

    /// Releases the cached derived view, if any. The next inferred query
    /// rebuilds it.
    pub fn dispose(&self) {
        if let Some(views) = &self.views {
            views.dispose();
        }
    }

    fn authoring(&self) -> Authoring<'_> {
        Authoring::new(self.store.as_ref(), &self.revision)
    }

    fn queries(&self) -> QueryDispatcher<'_> {
        QueryDispatcher::new(self.store.reader(), self.views())
    }

    /// Writes `axiom` to the local ontology without existence checks, for
    /// seeding vocabulary and hierarchy. Bumps the revision when it was new.
    pub fn add_axiom(&self, axiom: Axiom) -> bool {
        self.authoring().add_axiom(axiom)
    }

    /// Bulk form of [`Self::add_axiom`]; returns how many axioms were new.
    pub fn add_axioms(&self, axioms: impl IntoIterator<Item = Axiom>) -> usize {
        self.authoring().add_axioms(axioms)
    }

    pub fn create_individual(&self, class: &Iri, individual: &Iri) -> Result<bool> {
        self.authoring().create_individual(class, individual)
    }

    pub fn assert_type(&self, individual: &Iri, class: &Iri) -> Result<bool> {
        self.authoring().assert_type(individual, class)
    }

    pub fn assert_object_property(&self, subject: &Iri, property: &Iri, object: &Iri) -> Result<bool> {
        self.authoring().assert_object_property(subject, property, object)
    }

    pub fn assert_data_property(&self, subject: &Iri, property: &Iri, value: Literal) -> Result<bool> {
        self.authoring().assert_data_property(subject, property, value)
    }

    pub fn retract_type(&self, individual: &Iri, class: &Iri) -> bool {
        self.authoring().retract_type(individual, class)
    }

    pub fn retract_object_property(&self, subject: &Iri, property: &Iri, object: &Iri) -> bool {
        self.authoring().retract_object_property(subject, property, object)
    }

    pub fn retract_data_property(&self, subject: &Iri, property: &Iri, value: &Literal) -> bool {
        self.authoring().retract_data_property(subject, property, value)
    }

    pub fn declare_class(&self, class: &Iri) -> bool {
        self.authoring().declare_class(class)
    }

    pub fn declare_object_property(&self, property: &Iri) -> bool {
        self.authoring().declare_object_property(property)
    }

    pub fn declare_data_property(&self, property: &Iri) -> bool {
        self.authoring().declare_data_property(property)
    }

    pub fn assert_sub_class_of(&self, sub: &Iri, sup: &Iri) -> Result<bool> {
        self.authoring().assert_sub_class_of(sub, sup)
    }

    pub fn retract_sub_class_of(&self, sub: &Iri, sup: &Iri) -> bool {
        self.authoring().retract_sub_class_of(sub, sup)
    }

    pub fn add_import(&self, ontology: &Iri) -> Result<bool> {
        self.authoring().add_import(ontology)
    }

    pub fn is_instance_of(&self, individual: &Iri, class: &Iri, scope: Scope, mode: QueryMode) -> Result<bool> {
        self.queries().is_instance_of(individual, class, scope, mode)
    }

    pub fn instances_of_class(&self, class: &Iri, scope: Scope, mode: QueryMode) -> Result<BTreeSet<Iri>> {
        self.queries().instances_of_class(class, scope, mode)
    }

    pub fn types(&self, individual: &Iri, scope: Scope, mode: QueryMode) -> Result<BTreeSet<Iri>> {
        self.queries().types(individual, scope, mode)
    }

    pub fn super_classes(&self, class: &Iri, scope: Scope, mode: QueryMode) -> Result<BTreeSet<Iri>> {
        self.queries().super_classes(class, scope, mode)
    }

    pub fn sub_classes(&self, class: &Iri, scope: Scope, mode: QueryMode) -> Result<BTreeSet<Iri>> {
        self.queries().sub_classes(class, scope, mode)
    }

    pub fn asserted_types(&self, individual: &Iri, include_superclasses: bool, scope: Scope) -> BTreeSet<Iri> {
        self.queries().asserted_types(individual, include_superclasses, scope)
    }

    pub fn asserted_instances(&self, class: &Iri, include_subclasses: bool, scope: Scope) -> BTreeSet<Iri> {
        self.queries().asserted_instances(class, include_subclasses, scope)
    }
}

impl std::fmt::Debug for OntologyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OntologyService")
            .field("ontology", &self.store.ontology_iri())
            .field("revision", &self.revision())
            .field("views", &self.views)
            .finish()
    }
}
