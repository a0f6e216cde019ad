//! Requirement module - the records extracted from an SRS document

use crate::modal::ModalVerb;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON object exactly as the model produced it
pub type JsonObject = serde_json::Map<String, Value>;

/// Where in the source document a requirement was found
///
/// Both fields are null when the model could not tell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSource {
    /// Page number, if known
    #[serde(default)]
    pub page: Option<u64>,

    /// Character index into the extracted text, if known
    #[serde(default)]
    pub start_index: Option<u64>,
}

/// A single requirement
///
/// Functional and non-functional requirements share this shape; they are told
/// apart only by the list they appear in. Missing fields fall back to their
/// defaults so a partially conforming model answer still parses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Title as it appears in the source document
    #[serde(default)]
    pub title: String,

    /// Requirement text
    #[serde(default)]
    pub description: String,

    /// Source location
    #[serde(default)]
    pub source: RequirementSource,
}

impl Requirement {
    /// Create a requirement with an unknown source location
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            source: RequirementSource::default(),
        }
    }

    /// Modal verb used by the description, if any
    pub fn modal_verb(&self) -> Option<ModalVerb> {
        ModalVerb::detect(&self.description)
    }
}

/// Which list a requirement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementKind {
    /// Describes system behavior
    Functional,

    /// Describes a quality attribute
    NonFunctional,
}

impl RequirementKind {
    /// Both kinds, in document order
    pub const ALL: [RequirementKind; 2] = [RequirementKind::Functional, RequirementKind::NonFunctional];

    /// Key of the list in the model's JSON object
    pub fn key(&self) -> &'static str {
        match self {
            RequirementKind::Functional => "functional",
            RequirementKind::NonFunctional => "non_functional",
        }
    }

    /// File the list is persisted to
    pub fn file_name(&self) -> &'static str {
        match self {
            RequirementKind::Functional => "functional_requirements.json",
            RequirementKind::NonFunctional => "non_functional_requirements.json",
        }
    }
}

/// The functional and non-functional requirement lists of one document
///
/// Both keys are always serialized; a key missing on input reads as an
/// empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Functional requirements, in document order
    #[serde(default)]
    pub functional: Vec<Requirement>,

    /// Non-functional requirements, in document order
    #[serde(default)]
    pub non_functional: Vec<Requirement>,
}

impl ExtractionResult {
    /// Build a typed result from the model's JSON object
    ///
    /// An absent or null list becomes empty. A list that is present but not
    /// an array of requirement objects is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use reqsift_domain::ExtractionResult;
    ///
    /// let value = serde_json::json!({ "functional": [] });
    /// let result = ExtractionResult::from_object(value.as_object().unwrap()).unwrap();
    /// assert!(result.non_functional.is_empty());
    /// ```
    pub fn from_object(object: &JsonObject) -> Result<Self, serde_json::Error> {
        Ok(Self {
            functional: requirements_under(object, RequirementKind::Functional)?,
            non_functional: requirements_under(object, RequirementKind::NonFunctional)?,
        })
    }

    /// Requirements of the given kind
    pub fn of_kind(&self, kind: RequirementKind) -> &[Requirement] {
        match kind {
            RequirementKind::Functional => &self.functional,
            RequirementKind::NonFunctional => &self.non_functional,
        }
    }

    /// Total number of requirements across both lists
    pub fn len(&self) -> usize {
        self.functional.len() + self.non_functional.len()
    }

    /// True when both lists are empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of non-functional descriptions that use a modal verb
    pub fn non_functional_with_modal(&self) -> usize {
        self.non_functional
            .iter()
            .filter(|r| r.modal_verb().is_some())
            .count()
    }
}

fn requirements_under(
    object: &JsonObject,
    kind: RequirementKind,
) -> Result<Vec<Requirement>, serde_json::Error> {
    match object.get(kind.key()) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => Vec::<Requirement>::deserialize(value),
    }
}
