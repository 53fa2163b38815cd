use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use super::value_objects::{Iri, Literal};

/// Classifies the role an IRI plays in the ontology signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Class,
    NamedIndividual,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
}

impl EntityKind {
    fn keyword(self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::NamedIndividual => "NamedIndividual",
            Self::ObjectProperty => "ObjectProperty",
            Self::DataProperty => "DataProperty",
            Self::AnnotationProperty => "AnnotationProperty",
        }
    }
}

/// A typed, named entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    kind: EntityKind,
    iri: Iri,
}

impl Entity {
    #[must_use]
    pub fn new(kind: EntityKind, iri: Iri) -> Self {
        Self { kind, iri }
    }

    #[must_use]
    pub fn class(iri: Iri) -> Self {
        Self::new(EntityKind::Class, iri)
    }

    #[must_use]
    pub fn individual(iri: Iri) -> Self {
        Self::new(EntityKind::NamedIndividual, iri)
    }

    #[must_use]
    pub fn object_property(iri: Iri) -> Self {
        Self::new(EntityKind::ObjectProperty, iri)
    }

    #[must_use]
    pub fn data_property(iri: Iri) -> Self {
        Self::new(EntityKind::DataProperty, iri)
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    #[must_use]
    pub fn iri(&self) -> &Iri {
        &self.iri
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}(<{}>)", self.kind.keyword(), self.iri)
    }
}

/// Class expressions appearing in class assertions and subclass axioms.
///
/// Only [`ClassExpression::Named`] takes part in asserted traversal and query
/// answering. The anonymous forms are stored as-is so that an entailment
/// engine can interpret them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassExpression {
    Named(Iri),
    ObjectSomeValuesFrom {
        property: Iri,
        filler: Box<ClassExpression>,
    },
    ObjectAllValuesFrom {
        property: Iri,
        filler: Box<ClassExpression>,
    },
    ObjectIntersectionOf(Vec<ClassExpression>),
    ObjectUnionOf(Vec<ClassExpression>),
    ObjectComplementOf(Box<ClassExpression>),
}

impl ClassExpression {
    #[must_use]
    pub fn named(iri: Iri) -> Self {
        Self::Named(iri)
    }

    #[must_use]
    pub fn some_values_from(property: Iri, filler: ClassExpression) -> Self {
        Self::ObjectSomeValuesFrom {
            property,
            filler: Box::new(filler),
        }
    }

    #[must_use]
    pub fn complement_of(operand: ClassExpression) -> Self {
        Self::ObjectComplementOf(Box::new(operand))
    }

    /// Returns the class IRI when the expression is a named class.
    #[must_use]
    pub fn as_named(&self) -> Option<&Iri> {
        match self {
            Self::Named(iri) => Some(iri),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        !matches!(self, Self::Named(_))
    }

    /// Collects every named entity mentioned by the expression, nested
    /// operands included.
    pub fn collect_signature(&self, into: &mut BTreeSet<Entity>) {
        match self {
            Self::Named(iri) => {
                into.insert(Entity::class(iri.clone()));
            }
            Self::ObjectSomeValuesFrom { property, filler }
            | Self::ObjectAllValuesFrom { property, filler } => {
                into.insert(Entity::object_property(property.clone()));
                filler.collect_signature(into);
            }
            Self::ObjectIntersectionOf(operands) | Self::ObjectUnionOf(operands) => {
                for operand in operands {
                    operand.collect_signature(into);
                }
            }
            Self::ObjectComplementOf(operand) => operand.collect_signature(into),
        }
    }
}

impl From<Iri> for ClassExpression {
    fn from(iri: Iri) -> Self {
        Self::Named(iri)
    }
}

impl Display for ClassExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        fn list(f: &mut Formatter<'_>, name: &str, operands: &[ClassExpression]) -> fmt::Result {
            write!(f, "{name}(")?;
            for (index, operand) in operands.iter().enumerate() {
                if index > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{operand}")?;
            }
            f.write_str(")")
        }

        match self {
            Self::Named(iri) => write!(f, "<{iri}>"),
            Self::ObjectSomeValuesFrom { property, filler } => {
                write!(f, "ObjectSomeValuesFrom(<{property}> {filler})")
            }
            Self::ObjectAllValuesFrom { property, filler } => {
                write!(f, "ObjectAllValuesFrom(<{property}> {filler})")
            }
            Self::ObjectIntersectionOf(operands) => list(f, "ObjectIntersectionOf", operands),
            Self::ObjectUnionOf(operands) => list(f, "ObjectUnionOf", operands),
            Self::ObjectComplementOf(operand) => write!(f, "ObjectComplementOf({operand})"),
        }
    }
}

/// `ClassAssertion(class individual)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassAssertion {
    pub class: ClassExpression,
    pub individual: Iri,
}

/// `ObjectPropertyAssertion(property subject object)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPropertyAssertion {
    pub property: Iri,
    pub subject: Iri,
    pub object: Iri,
}

/// `DataPropertyAssertion(property subject value)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataPropertyAssertion {
    pub property: Iri,
    pub subject: Iri,
    pub value: Literal,
}

/// `SubClassOf(sub sup)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubClassOf {
    pub sub: ClassExpression,
    pub sup: ClassExpression,
}

/// Immutable fact stored in an ontology.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axiom {
    Declaration(Entity),
    ClassAssertion(ClassAssertion),
    ObjectPropertyAssertion(ObjectPropertyAssertion),
    DataPropertyAssertion(DataPropertyAssertion),
    SubClassOf(SubClassOf),
}

impl Axiom {
    #[must_use]
    pub fn declaration(entity: Entity) -> Self {
        Self::Declaration(entity)
    }

    #[must_use]
    pub fn class_assertion(class: impl Into<ClassExpression>, individual: Iri) -> Self {
        Self::ClassAssertion(ClassAssertion {
            class: class.into(),
            individual,
        })
    }

    #[must_use]
    pub fn object_property_assertion(property: Iri, subject: Iri, object: Iri) -> Self {
        Self::ObjectPropertyAssertion(ObjectPropertyAssertion {
            property,
            subject,
            object,
        })
    }

    #[must_use]
    pub fn data_property_assertion(property: Iri, subject: Iri, value: Literal) -> Self {
        Self::DataPropertyAssertion(DataPropertyAssertion {
            property,
            subject,
            value,
        })
    }

    #[must_use]
    pub fn sub_class_of(sub: impl Into<ClassExpression>, sup: impl Into<ClassExpression>) -> Self {
        Self::SubClassOf(SubClassOf {
            sub: sub.into(),
            sup: sup.into(),
        })
    }

    /// Collects the entities this axiom mentions, each with the role it plays.
    pub fn collect_signature(&self, into: &mut BTreeSet<Entity>) {
        match self {
            Self::Declaration(entity) => {
                into.insert(entity.clone());
            }
            Self::ClassAssertion(ClassAssertion { class, individual }) => {
                class.collect_signature(into);
                into.insert(Entity::individual(individual.clone()));
            }
            Self::ObjectPropertyAssertion(assertion) => {
                into.insert(Entity::object_property(assertion.property.clone()));
                into.insert(Entity::individual(assertion.subject.clone()));
                into.insert(Entity::individual(assertion.object.clone()));
            }
            Self::DataPropertyAssertion(assertion) => {
                into.insert(Entity::data_property(assertion.property.clone()));
                into.insert(Entity::individual(assertion.subject.clone()));
            }
            Self::SubClassOf(SubClassOf { sub, sup }) => {
                sub.collect_signature(into);
                sup.collect_signature(into);
            }
        }
    }

    /// Returns whether `entity` occurs in this axiom in its role.
    #[must_use]
    pub fn mentions(&self, entity: &Entity) -> bool {
        let mut signature = BTreeSet::new();
        self.collect_signature(&mut signature);
        signature.contains(entity)
    }
}

impl Display for Axiom {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declaration(entity) => write!(f, "Declaration({entity})"),
            Self::ClassAssertion(ClassAssertion { class, individual }) => {
                write!(f, "ClassAssertion({class} <{individual}>)")
            }
            Self::ObjectPropertyAssertion(ObjectPropertyAssertion {
                property,
                subject,
                object,
            }) => write!(
                f,
                "ObjectPropertyAssertion(<{property}> <{subject}> <{object}>)"
            ),
            Self::DataPropertyAssertion(DataPropertyAssertion {
                property,
                subject,
                value,
            }) => write!(f, "DataPropertyAssertion(<{property}> <{subject}> {value})"),
            Self::SubClassOf(SubClassOf { sub, sup }) => write!(f, "SubClassOf({sub} {sup})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{Axiom, ClassExpression, Entity};
    use crate::ontology::value_objects::{Iri, Literal};

    fn iri(text: &str) -> Iri {
        Iri::new(text).expect("valid iri")
    }

    #[test]
    fn class_assertion_signature_assigns_roles() {
        let axiom = Axiom::class_assertion(iri("https://example.org/Disease"), iri("https://example.org/t1dm"));
        let mut signature = BTreeSet::new();
        axiom.collect_signature(&mut signature);
        assert_eq!(
            signature,
            BTreeSet::from([
                Entity::class(iri("https://example.org/Disease")),
                Entity::individual(iri("https://example.org/t1dm")),
            ])
        );
        assert!(!axiom.mentions(&Entity::class(iri("https://example.org/t1dm"))));
    }

    #[test]
    fn anonymous_expressions_contribute_nested_signature() {
        let restriction = ClassExpression::some_values_from(
            iri("https://example.org/hasPart"),
            ClassExpression::named(iri("https://example.org/Cell")),
        );
        assert!(restriction.is_anonymous());
        assert_eq!(restriction.as_named(), None);

        let axiom = Axiom::sub_class_of(restriction, iri("https://example.org/Tissue"));
        assert!(axiom.mentions(&Entity::object_property(iri("https://example.org/hasPart"))));
        assert!(axiom.mentions(&Entity::class(iri("https://example.org/Cell"))));
        assert!(axiom.mentions(&Entity::class(iri("https://example.org/Tissue"))));
    }

    #[test]
    fn axioms_render_in_functional_syntax() {
        let axiom = Axiom::data_property_assertion(
            iri("https://example.org/label"),
            iri("https://example.org/t1dm"),
            Literal::lang_string("diabetes", "en"),
        );
        assert_eq!(
            axiom.to_string(),
            "DataPropertyAssertion(<https://example.org/label> <https://example.org/t1dm> \"diabetes\"@en)"
        );

        let axiom = Axiom::sub_class_of(
            iri("https://example.org/A"),
            ClassExpression::ObjectIntersectionOf(vec![
                ClassExpression::named(iri("https://example.org/B")),
                ClassExpression::complement_of(ClassExpression::named(iri("https://example.org/C"))),
            ]),
        );
        assert_eq!(
            axiom.to_string(),
            "SubClassOf(<https://example.org/A> ObjectIntersectionOf(<https://example.org/B> ObjectComplementOf(<https://example.org/C>)))"
        );
    }
}
