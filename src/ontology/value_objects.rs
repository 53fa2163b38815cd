use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use oxrdf::{vocab::xsd, NamedNode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known IRI of the top class.
pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";

/// Value object ensuring that supplied text represents a valid IRI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iri {
    value: String,
}

impl Iri {
    /// Validates and constructs a new [`Iri`] value object.
    ///
    /// Malformed identifiers are rejected so that every entity and axiom in a
    /// store uses canonical identifiers.
    pub fn new(value: impl Into<String>) -> Result<Self, IriError> {
        let value = value.into();
        NamedNode::new(value.as_str()).map_err(|_| IriError::Invalid {
            value: value.clone(),
        })?;
        Ok(Self { value })
    }

    /// The `owl:Thing` IRI.
    #[must_use]
    pub fn owl_thing() -> Self {
        Self {
            value: OWL_THING.to_owned(),
        }
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn is_owl_thing(&self) -> bool {
        self.value == OWL_THING
    }
}

impl Display for Iri {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Iri {
    type Err = IriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl TryFrom<String> for Iri {
    type Error = IriError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Iri> for String {
    fn from(iri: Iri) -> Self {
        iri.value
    }
}

/// Errors produced when validating an [`Iri`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IriError {
    /// The provided text could not be parsed as an IRI.
    #[error("invalid IRI: {value}")]
    Invalid { value: String },
}

/// Literal value carried by data property assertions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    lexical: String,
    datatype: Iri,
    language: Option<String>,
}

impl Literal {
    /// Creates an `xsd:string` literal.
    #[must_use]
    pub fn string(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Iri {
                value: xsd::STRING.as_str().to_owned(),
            },
            language: None,
        }
    }

    /// Creates a literal with an explicit datatype.
    #[must_use]
    pub fn typed(lexical: impl Into<String>, datatype: Iri) -> Self {
        Self {
            lexical: lexical.into(),
            datatype,
            language: None,
        }
    }

    /// Creates a language tagged string. Tags compare case-insensitively, so
    /// they are stored lowercased.
    #[must_use]
    pub fn lang_string(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Iri {
                value: oxrdf::vocab::rdf::LANG_STRING.as_str().to_owned(),
            },
            language: Some(language.into().to_ascii_lowercase()),
        }
    }

    #[must_use]
    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    #[must_use]
    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.lexical.replace('"', "\\\""))?;
        match &self.language {
            Some(language) => write!(f, "@{language}"),
            None => write!(f, "^^<{}>", self.datatype),
        }
    }
}

/// Portion of the knowledge base a read or existence check looks at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Only the axioms stored in the root ontology.
    Local,
    /// The root ontology plus every transitively imported ontology.
    ImportsClosure,
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::ImportsClosure => f.write_str("imports closure"),
        }
    }
}
