//! Core domain logic for DocPilot.
//! This crate is the single source of truth for ownership, ordering and
//! section lifecycle invariants.

pub mod config;
pub mod db;
pub mod export;
pub mod generation;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, reset_db, DbError, DbResult};
pub use export::{ExportError, ExportedDocument};
pub use generation::groq::{GroqClient, GroqConfig};
pub use generation::{GenerationError, TextGenerator};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::project::{
    DocType, Project, ProjectId, ProjectSummary, UserId, ValidationError,
};
pub use model::section::{PreviewContent, Section, SectionId, SectionUpdate};
pub use repo::project_repo::{ProjectRepository, RepoError, RepoResult, SqliteProjectRepository};
pub use repo::section_repo::{SectionReader, SectionRepository, SqliteSectionRepository};
pub use service::error::{ErrorKind, ResourceKind, ServiceError};
pub use service::project_service::ProjectService;
pub use service::section_service::SectionService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
