//! Service-level error taxonomy.

use crate::export::ExportError;
use crate::generation::GenerationError;
use crate::model::project::{ProjectId, ValidationError};
use crate::repo::project_repo::RepoError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Resource addressed by a failed lookup or ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Project,
    Section,
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => f.write_str("project"),
            Self::Section => f.write_str("section"),
        }
    }
}

/// Caller-facing failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    Generation,
    Validation,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Generation => "generation",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

/// Errors from project/section use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// No resource with this id exists.
    NotFound { resource: ResourceKind, id: Uuid },
    /// Caller does not own the resource. Carries no id or content.
    Unauthorized { resource: ResourceKind },
    /// Text generation failed; nothing was written.
    Generation(GenerationError),
    /// Generation failed during batch creation; the project and sections
    /// before `failed_index` stay persisted.
    PartialProject {
        project_id: ProjectId,
        failed_index: usize,
        source: GenerationError,
    },
    /// Malformed input.
    Validation(ValidationError),
    /// Export package could not be written.
    Export(ExportError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but read-back did not find the row.
    InconsistentState(&'static str),
}

impl ServiceError {
    /// Maps this error onto its caller-facing category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Generation(_) | Self::PartialProject { .. } => ErrorKind::Generation,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Export(_) | Self::Repo(_) | Self::InconsistentState(_) => ErrorKind::Internal,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Unauthorized { resource } => {
                write!(f, "not authorized to access this {resource}")
            }
            Self::Generation(err) => write!(f, "{err}"),
            Self::PartialProject {
                project_id,
                failed_index,
                source,
            } => write!(
                f,
                "project {project_id} partially created: section {failed_index} failed: {source}"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Generation(err) => Some(err),
            Self::PartialProject { source, .. } => Some(source),
            Self::Validation(err) => Some(err),
            Self::Export(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ProjectNotFound(id) => Self::NotFound {
                resource: ResourceKind::Project,
                id,
            },
            RepoError::SectionNotFound(id) => Self::NotFound {
                resource: ResourceKind::Section,
                id,
            },
            other => Self::Repo(other),
        }
    }
}

impl From<GenerationError> for ServiceError {
    fn from(value: GenerationError) -> Self {
        Self::Generation(value)
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ExportError> for ServiceError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}
