//! YAML configuration.
//!
//! ```yaml
//! logger:
//!   enable: true
//!   level: debug
//!   format: compact
//! ontology:
//!   iri: https://example.org/onto
//!   imports:
//!     - https://example.org/upper
//! reasoner:
//!   backend: native
//!   inference:
//!     existential_restrictions: true
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{ontology::value_objects::Iri, Result};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logger: Logger,
    pub ontology: OntologySettings,
    /// Entailment engine. Inferred queries are unavailable when absent.
    #[serde(default)]
    pub reasoner: Option<ReasonerSettings>,
}

impl Config {
    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Yaml`] when the document is malformed or an IRI
    /// in it is invalid.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logger {
    /// Enable log output.
    #[serde(default = "default_true")]
    pub enable: bool,

    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    /// Full `EnvFilter` directive replacing the level, e.g.
    /// `ontoview=trace,warn`.
    pub override_filter: Option<String>,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            enable: true,
            level: LogLevel::default(),
            format: LogFormat::default(),
            override_filter: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OntologySettings {
    /// IRI of the root (local) ontology.
    pub iri: Iri,

    #[serde(default)]
    pub backend: StoreBackend,

    /// Ontologies registered as empty documents and imported into the root.
    #[serde(default)]
    pub imports: Vec<Iri>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    InMemory,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReasonerSettings {
    #[serde(default)]
    pub backend: ReasonerBackend,

    #[serde(default)]
    pub inference: InferenceSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonerBackend {
    #[default]
    Native,
}

/// Rule groups of the native entailment engine. The class hierarchy and type
/// propagation rules cannot be switched off.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InferenceSettings {
    /// Classify subjects of `ObjectSomeValuesFrom` restrictions.
    #[serde(default = "default_true")]
    pub existential_restrictions: bool,
    /// Place every class and individual under `owl:Thing`.
    #[serde(default = "default_true")]
    pub top_class: bool,
    /// Fail precomputation on complement clashes.
    #[serde(default = "default_true")]
    pub complement_checks: bool,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            existential_restrictions: true,
            top_class: true,
            complement_checks: true,
        }
    }
}

const fn default_true() -> bool {
    true
}
