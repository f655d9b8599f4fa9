//! Use-case API consumed by the HTTP layer.
//!
//! # Responsibility
//! - Expose project assembly, section lifecycle and export as
//!   use-case-level calls.
//! - Translate `ServiceError` into a stable, serializable envelope.
//!
//! # Invariants
//! - Calls never panic; failures become `ok=false` envelopes.
//! - `error_kind` is one of `not_found|unauthorized|generation|validation|internal`.
//! - Unauthorized envelopes never carry ids, content or owner of the target.

use docpilot_core::db::open_db;
use docpilot_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ConfigError, CoreConfig, DocType, ErrorKind, PreviewContent, Project, ProjectId,
    ProjectService, ProjectSummary, RepoError, Section, SectionId, SectionService,
    SectionUpdate, ServiceError, SqliteProjectRepository, SqliteSectionRepository,
    TextGenerator, UserId,
};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared generator handle injected at process start.
pub type SharedGenerator = Arc<dyn TextGenerator + Send + Sync>;

type Projects<'conn> =
    ProjectService<SqliteProjectRepository<'conn>, SqliteSectionRepository<'conn>, SharedGenerator>;
type Sections<'conn> = SectionService<SqliteSectionRepository<'conn>, SharedGenerator>;

/// Minimal health-check API.
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
/// Repeating the call with the same `level + log_dir` is a no-op.
pub fn init_logging(level: &str, log_dir: &str) -> String {
    match init_logging_inner(level, log_dir) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Identity already verified by the upstream auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

impl AuthenticatedUser {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Response envelope returned by every API call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    /// Failure category; `None` on success.
    pub error_kind: Option<ErrorKind>,
    /// Human-readable diagnostics; empty on success.
    pub message: String,
    pub payload: Option<T>,
}

impl<T> ApiResponse<T> {
    fn success(payload: T) -> Self {
        Self {
            ok: true,
            error_kind: None,
            message: String::new(),
            payload: Some(payload),
        }
    }

    fn failure(operation: &'static str, err: &ServiceError) -> Self {
        let kind = err.kind();
        warn!(
            "event=api_call module=api status=error operation={} error_kind={}",
            operation,
            kind.as_str()
        );
        Self {
            ok: false,
            error_kind: Some(kind),
            message: format!("{operation} failed: {err}"),
            payload: None,
        }
    }

    fn from_result(operation: &'static str, result: Result<T, ServiceError>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(err) => Self::failure(operation, &err),
        }
    }
}

/// Exported file as handed to the download response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPayload {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Partial section edit as received from the HTTP layer.
///
/// Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SectionPatch {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl From<SectionPatch> for SectionUpdate {
    fn from(value: SectionPatch) -> Self {
        SectionUpdate {
            content: value.content,
            notes: value.notes,
            feedback: value.feedback,
        }
    }
}

/// Use-case facade bound to one database file and one generator.
///
/// Each call opens its own connection, so a `DocpilotApi` can be shared
/// across request handlers.
#[derive(Clone)]
pub struct DocpilotApi {
    db_path: PathBuf,
    generator: SharedGenerator,
}

impl DocpilotApi {
    pub fn new(db_path: impl Into<PathBuf>, generator: SharedGenerator) -> Self {
        Self {
            db_path: db_path.into(),
            generator,
        }
    }

    /// Builds the API with the Groq backend described by `config`.
    pub fn from_config(config: &CoreConfig) -> Result<Self, ConfigError> {
        let client = config.groq_client()?;
        Ok(Self::new(config.db_path.clone(), Arc::new(client)))
    }

    /// Creates a project and generates its sections.
    ///
    /// `doc_type` accepts `docx|pptx`, case-insensitive.
    pub fn create_project(
        &self,
        user: &AuthenticatedUser,
        title: &str,
        doc_type: &str,
        section_titles: &[String],
    ) -> ApiResponse<Project> {
        let result = doc_type
            .parse::<DocType>()
            .map_err(ServiceError::from)
            .and_then(|doc_type| {
                self.with_projects(|service| {
                    service.create_project(user.user_id, title, doc_type, section_titles)
                })
            });
        ApiResponse::from_result("create_project", result)
    }

    pub fn get_project(
        &self,
        user: &AuthenticatedUser,
        project_id: ProjectId,
    ) -> ApiResponse<Project> {
        ApiResponse::from_result(
            "get_project",
            self.with_projects(|service| service.get_project(user.user_id, project_id)),
        )
    }

    pub fn list_owned_projects(&self, user: &AuthenticatedUser) -> ApiResponse<Vec<ProjectSummary>> {
        ApiResponse::from_result(
            "list_owned_projects",
            self.with_projects(|service| service.list_owned_projects(user.user_id)),
        )
    }

    /// Returns a refinement candidate without storing it.
    pub fn preview_refine(
        &self,
        user: &AuthenticatedUser,
        section_id: SectionId,
        instruction: &str,
    ) -> ApiResponse<PreviewContent> {
        ApiResponse::from_result(
            "preview_refine",
            self.with_sections(|service| {
                service.preview_refine(user.user_id, section_id, instruction)
            }),
        )
    }

    /// Applies a partial edit; committing a preview is a content-only patch.
    pub fn update_section(
        &self,
        user: &AuthenticatedUser,
        section_id: SectionId,
        patch: SectionPatch,
    ) -> ApiResponse<Section> {
        ApiResponse::from_result(
            "update_section",
            self.with_sections(|service| {
                service.update_section(user.user_id, section_id, patch.into())
            }),
        )
    }

    pub fn export_document(
        &self,
        user: &AuthenticatedUser,
        project_id: ProjectId,
    ) -> ApiResponse<ExportPayload> {
        let result = self
            .with_projects(|service| service.export_document(user.user_id, project_id))
            .map(|document| ExportPayload {
                file_name: document.file_name,
                media_type: document.media_type.to_string(),
                bytes: document.bytes,
            });
        ApiResponse::from_result("export_document", result)
    }

    pub fn delete_project(&self, user: &AuthenticatedUser, project_id: ProjectId) -> ApiResponse<()> {
        ApiResponse::from_result(
            "delete_project",
            self.with_projects(|service| service.delete_project(user.user_id, project_id)),
        )
    }

    fn with_projects<T>(
        &self,
        f: impl FnOnce(&Projects<'_>) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let conn = open_db(&self.db_path).map_err(RepoError::from)?;
        let service = ProjectService::new(
            SqliteProjectRepository::try_new(&conn)?,
            SqliteSectionRepository::try_new(&conn)?,
            Arc::clone(&self.generator),
        );
        f(&service)
    }

    fn with_sections<T>(
        &self,
        f: impl FnOnce(&Sections<'_>) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let conn = open_db(&self.db_path).map_err(RepoError::from)?;
        let service = SectionService::new(
            SqliteSectionRepository::try_new(&conn)?,
            Arc::clone(&self.generator),
        );
        f(&service)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ping, ApiResponse, AuthenticatedUser, DocpilotApi,
        SectionPatch,
    };
    use docpilot_core::db::open_db;
    use docpilot_core::{ErrorKind, GenerationError, TextGenerator};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    struct CountingGenerator {
        calls: AtomicUsize,
        fail: bool,
    }

    impl TextGenerator for CountingGenerator {
        fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(GenerationError::RateLimited {
                    retry_after_secs: None,
                });
            }
            Ok(format!("Generated {call}"))
        }
    }

    fn api(dir: &tempfile::TempDir, fail: bool) -> DocpilotApi {
        DocpilotApi::new(
            dir.path().join("api.db"),
            Arc::new(CountingGenerator {
                calls: AtomicUsize::new(0),
                fail,
            }),
        )
    }

    fn titles(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_relative_log_dir() {
        assert!(!init_logging("info", "tmp/logs").is_empty());
        assert!(!init_logging("verbose", "/tmp/docpilot-logs").is_empty());
    }

    #[test]
    fn create_get_and_list_round_through_envelopes() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir, false);
        let user = AuthenticatedUser::new(Uuid::new_v4());

        let created = api.create_project(&user, "Q3 Plan", "DOCX", &titles(&["Goals", "Budget"]));
        assert!(created.ok, "{}", created.message);
        let project = created.payload.unwrap();
        assert_eq!(project.sections.len(), 2);

        let fetched = api.get_project(&user, project.id);
        assert_eq!(fetched.payload.unwrap(), project);

        let listed = api.list_owned_projects(&user).payload.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, project.id);
    }

    #[test]
    fn unknown_doc_type_is_a_validation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir, false);
        let user = AuthenticatedUser::new(Uuid::new_v4());

        let response = api.create_project(&user, "Deck", "xlsx", &titles(&["A"]));
        assert!(!response.ok);
        assert_eq!(response.error_kind, Some(ErrorKind::Validation));
        assert!(response.payload.is_none());
    }

    #[test]
    fn preview_then_patch_commits_content() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir, false);
        let user = AuthenticatedUser::new(Uuid::new_v4());
        let project = api
            .create_project(&user, "Plan", "pptx", &titles(&["Intro"]))
            .payload
            .unwrap();
        let section_id = project.sections[0].id;
        let annotations = SectionPatch {
            notes: Some("ask finance".to_string()),
            feedback: Some("too long".to_string()),
            ..SectionPatch::default()
        };
        assert!(api.update_section(&user, section_id, annotations).ok);

        let preview = api.preview_refine(&user, section_id, "shorter").payload.unwrap();
        assert_eq!(preview.content, "Generated 2");
        let unchanged = api.get_project(&user, project.id).payload.unwrap();
        assert_eq!(unchanged.sections[0].content, "Generated 1");

        let patch = SectionPatch {
            content: Some(preview.content.clone()),
            ..SectionPatch::default()
        };
        let updated = api.update_section(&user, section_id, patch).payload.unwrap();
        assert_eq!(updated.content, "Generated 2");
        assert_eq!(updated.notes, "ask finance");
        assert_eq!(updated.feedback, "too long");

        let conn = open_db(dir.path().join("api.db")).unwrap();
        let (content, notes, feedback): (String, String, String) = conn
            .query_row(
                "SELECT content, notes, feedback FROM sections WHERE uuid = ?1",
                [section_id.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(content, "Generated 2");
        assert_eq!(notes, "ask finance");
        assert_eq!(feedback, "too long");
    }

    #[test]
    fn non_owner_gets_unauthorized_envelope_without_ids() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir, false);
        let owner = AuthenticatedUser::new(Uuid::new_v4());
        let stranger = AuthenticatedUser::new(Uuid::new_v4());
        let project = api
            .create_project(&owner, "Secret", "docx", &titles(&["Plan"]))
            .payload
            .unwrap();

        let response = api.get_project(&stranger, project.id);
        assert!(!response.ok);
        assert_eq!(response.error_kind, Some(ErrorKind::Unauthorized));
        assert!(!response.message.contains(&project.id.to_string()));
        assert!(!response.message.contains("Generated"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error_kind"], "unauthorized");
        assert_eq!(json["payload"], serde_json::Value::Null);

        let deleted = api.delete_project(&stranger, project.id);
        assert_eq!(deleted.error_kind, Some(ErrorKind::Unauthorized));
        assert!(api.get_project(&owner, project.id).ok);
    }

    #[test]
    fn generation_failure_reports_generation_kind() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir, true);
        let user = AuthenticatedUser::new(Uuid::new_v4());

        let response: ApiResponse<_> = api.create_project(&user, "Plan", "docx", &titles(&["A"]));
        assert_eq!(response.error_kind, Some(ErrorKind::Generation));
        assert!(response.message.contains("partially created"));
    }

    #[test]
    fn export_returns_named_document_and_delete_removes_project() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir, false);
        let user = AuthenticatedUser::new(Uuid::new_v4());
        let project = api
            .create_project(&user, "Board Deck", "pptx", &titles(&["Summary"]))
            .payload
            .unwrap();

        let exported = api.export_document(&user, project.id).payload.unwrap();
        assert_eq!(exported.file_name, "Board_Deck.pptx");
        assert!(exported.media_type.ends_with("presentationml.presentation"));
        assert_eq!(&exported.bytes[..2], b"PK");

        assert!(api.delete_project(&user, project.id).ok);
        let missing = api.get_project(&user, project.id);
        assert_eq!(missing.error_kind, Some(ErrorKind::NotFound));
    }
}
