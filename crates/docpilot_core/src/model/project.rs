//! Project domain model.
//!
//! # Responsibility
//! - Define the project record and its document type.
//! - Validate creation input before any row is written.
//!
//! # Invariants
//! - `owner_id` never changes after creation.
//! - `sections` is always sorted by `(order_index, id)` when produced by core.

use crate::model::section::Section;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Opaque identity of an authenticated user, resolved upstream.
pub type UserId = Uuid;

/// Stable identifier of a project.
pub type ProjectId = Uuid;

/// Target document format of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    /// Word-processing document (`.docx`).
    Docx,
    /// Slide deck (`.pptx`).
    Pptx,
}

impl DocType {
    /// Wire/storage name (`docx|pptx`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pptx => "pptx",
        }
    }

    /// File extension used for exported artifacts, without the dot.
    pub fn file_extension(self) -> &'static str {
        self.as_str()
    }

    /// Media type of exported artifacts.
    pub fn media_type(self) -> &'static str {
        match self {
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
        }
    }
}

impl Display for DocType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "docx" => Ok(Self::Docx),
            "pptx" => Ok(Self::Pptx),
            other => Err(ValidationError::UnknownDocType(other.to_string())),
        }
    }
}

/// Malformed creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Project title is blank after trim.
    BlankProjectTitle,
    /// No section titles were declared.
    EmptySectionList,
    /// Declared section title at `index` is blank after trim.
    BlankSectionTitle { index: usize },
    /// Document type is not `docx` or `pptx`.
    UnknownDocType(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankProjectTitle => write!(f, "project title must not be blank"),
            Self::EmptySectionList => write!(f, "at least one section title is required"),
            Self::BlankSectionTitle { index } => {
                write!(f, "section title at position {index} must not be blank")
            }
            Self::UnknownDocType(value) => {
                write!(f, "unknown document type `{value}`; expected docx|pptx")
            }
        }
    }
}

impl Error for ValidationError {}

/// Project record with its sections in export order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub owner_id: UserId,
    pub title: String,
    pub doc_type: DocType,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub sections: Vec<Section>,
}

impl Project {
    /// Creates a project with a generated id and no sections.
    pub fn new(owner_id: UserId, title: impl Into<String>, doc_type: DocType) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            doc_type,
            created_at: now_epoch_ms(),
            sections: Vec::new(),
        }
    }

    /// Returns the list projection of this project.
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title.clone(),
            doc_type: self.doc_type,
            created_at: self.created_at,
        }
    }

    /// Returns whether `user_id` owns this project.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// List read model, without section contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub owner_id: UserId,
    pub title: String,
    pub doc_type: DocType,
    pub created_at: i64,
}

/// Validates project creation input.
///
/// Blank checks ignore surrounding whitespace, but the project title and
/// section titles are kept verbatim.
pub fn validate_new_project(
    title: &str,
    section_titles: &[String],
) -> Result<String, ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::BlankProjectTitle);
    }
    if section_titles.is_empty() {
        return Err(ValidationError::EmptySectionList);
    }
    if let Some(index) = section_titles
        .iter()
        .position(|value| value.trim().is_empty())
    {
        return Err(ValidationError::BlankSectionTitle { index });
    }
    Ok(title.to_string())
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}
