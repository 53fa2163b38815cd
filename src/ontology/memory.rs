use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use super::{
    entities::{Axiom, Entity},
    repositories::{AxiomStore, MutableAxiomStore},
    value_objects::{Iri, Scope},
};

/// A single ontology document: its axioms, its direct imports and a
/// reference-counted signature index kept in sync with the axioms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OntologyDocument {
    iri: Iri,
    axioms: BTreeSet<Axiom>,
    imports: BTreeSet<Iri>,
    signature: BTreeMap<Entity, usize>,
}

impl OntologyDocument {
    #[must_use]
    pub fn new(iri: Iri) -> Self {
        Self {
            iri,
            axioms: BTreeSet::new(),
            imports: BTreeSet::new(),
            signature: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_axiom(mut self, axiom: Axiom) -> Self {
        self.insert(axiom);
        self
    }

    #[must_use]
    pub fn with_axioms(mut self, axioms: impl IntoIterator<Item = Axiom>) -> Self {
        for axiom in axioms {
            self.insert(axiom);
        }
        self
    }

    #[must_use]
    pub fn with_import(mut self, ontology: Iri) -> Self {
        self.imports.insert(ontology);
        self
    }

    #[must_use]
    pub fn iri(&self) -> &Iri {
        &self.iri
    }

    #[must_use]
    pub fn axioms(&self) -> &BTreeSet<Axiom> {
        &self.axioms
    }

    #[must_use]
    pub fn imports(&self) -> &BTreeSet<Iri> {
        &self.imports
    }

    fn insert(&mut self, axiom: Axiom) -> bool {
        let mut mentioned = BTreeSet::new();
        axiom.collect_signature(&mut mentioned);
        if !self.axioms.insert(axiom) {
            return false;
        }
        for entity in mentioned {
            *self.signature.entry(entity).or_insert(0) += 1;
        }
        true
    }

    fn remove(&mut self, axiom: &Axiom) -> bool {
        if !self.axioms.remove(axiom) {
            return false;
        }
        let mut mentioned = BTreeSet::new();
        axiom.collect_signature(&mut mentioned);
        for entity in mentioned {
            if let Some(count) = self.signature.get_mut(&entity) {
                *count -= 1;
                if *count == 0 {
                    self.signature.remove(&entity);
                }
            }
        }
        true
    }

    fn mentions(&self, entity: &Entity) -> bool {
        self.signature.contains_key(entity)
    }
}

#[derive(Debug)]
struct Documents {
    root: Iri,
    by_iri: BTreeMap<Iri, OntologyDocument>,
}

impl Documents {
    /// Documents visible from the root in `scope`, root first. Imports are
    /// followed breadth first and each document is visited once, so import
    /// cycles terminate.
    fn in_scope(&self, scope: Scope) -> Vec<&OntologyDocument> {
        let Some(root) = self.by_iri.get(&self.root) else {
            return Vec::new();
        };
        if scope == Scope::Local {
            return vec![root];
        }

        let mut visited = BTreeSet::from([root.iri.clone()]);
        let mut queue = VecDeque::from([root]);
        let mut result = Vec::new();
        while let Some(document) = queue.pop_front() {
            result.push(document);
            for import in &document.imports {
                if !visited.insert(import.clone()) {
                    continue;
                }
                // Imports of documents the store never received resolve to nothing.
                if let Some(imported) = self.by_iri.get(import) {
                    queue.push_back(imported);
                }
            }
        }
        result
    }

    fn root_mut(&mut self) -> &mut OntologyDocument {
        let root = self.root.clone();
        self.by_iri
            .entry(root.clone())
            .or_insert_with(|| OntologyDocument::new(root))
    }
}

/// In-memory [`AxiomStore`] holding a root ontology and any number of
/// importable documents.
#[derive(Debug)]
pub struct InMemoryOntologyStore {
    documents: RwLock<Documents>,
}

impl InMemoryOntologyStore {
    /// Creates a store whose root ontology is empty.
    #[must_use]
    pub fn new(root: Iri) -> Self {
        Self::from_root(OntologyDocument::new(root))
    }

    /// Creates a store around an already populated root document.
    #[must_use]
    pub fn from_root(root: OntologyDocument) -> Self {
        let iri = root.iri.clone();
        Self {
            documents: RwLock::new(Documents {
                root: iri.clone(),
                by_iri: BTreeMap::from([(iri, root)]),
            }),
        }
    }

    /// Registers a document that the root (or another document) may import.
    ///
    /// Returns `false` without replacing anything if a document with the same
    /// IRI is already registered.
    pub fn insert_document(&self, document: OntologyDocument) -> bool {
        let mut guard = self.write();
        if guard.by_iri.contains_key(&document.iri) {
            return false;
        }
        guard.by_iri.insert(document.iri.clone(), document);
        true
    }

    /// Returns a copy of the registered document, if any.
    #[must_use]
    pub fn document(&self, ontology: &Iri) -> Option<OntologyDocument> {
        self.read().by_iri.get(ontology).cloned()
    }

    fn read(&self) -> RwLockReadGuard<'_, Documents> {
        self.documents
            .read()
            .expect("in-memory ontology store poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Documents> {
        self.documents
            .write()
            .expect("in-memory ontology store poisoned")
    }
}

impl AxiomStore for InMemoryOntologyStore {
    fn ontology_iri(&self) -> Iri {
        self.read().root.clone()
    }

    fn axioms(&self, scope: Scope) -> Vec<Axiom> {
        let guard = self.read();
        let documents = guard.in_scope(scope);
        if documents.len() == 1 {
            return documents[0].axioms.iter().cloned().collect();
        }
        documents
            .into_iter()
            .flat_map(|document| document.axioms.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn contains_axiom(&self, axiom: &Axiom, scope: Scope) -> bool {
        self.read()
            .in_scope(scope)
            .into_iter()
            .any(|document| document.axioms.contains(axiom))
    }

    fn contains_entity(&self, entity: &Entity, scope: Scope) -> bool {
        self.read()
            .in_scope(scope)
            .into_iter()
            .any(|document| document.mentions(entity))
    }

    fn knows_ontology(&self, ontology: &Iri) -> bool {
        self.read().by_iri.contains_key(ontology)
    }

    fn is_imported(&self, ontology: &Iri) -> bool {
        self.read()
            .in_scope(Scope::ImportsClosure)
            .into_iter()
            .any(|document| &document.iri == ontology)
    }

}

impl MutableAxiomStore for InMemoryOntologyStore {
    fn add_axiom(&self, axiom: Axiom) -> bool {
        self.write().root_mut().insert(axiom)
    }

    fn remove_axiom(&self, axiom: &Axiom) -> bool {
        self.write().root_mut().remove(axiom)
    }

    fn add_import(&self, ontology: &Iri) -> bool {
        let mut guard = self.write();
        if !guard.by_iri.contains_key(ontology) || &guard.root == ontology {
            return false;
        }
        guard.root_mut().imports.insert(ontology.clone())
    }

    fn reader(&self) -> &dyn AxiomStore {
        self
    }
}
