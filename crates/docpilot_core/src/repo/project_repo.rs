//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/list/delete over the `projects` table.
//! - Load a project together with its sections in canonical order.
//!
//! # Invariants
//! - Deleting a project cascades to its sections through the foreign key.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::project::{DocType, Project, ProjectId, ProjectSummary, UserId};
use crate::repo::section_repo::{SectionReader, SqliteSectionRepository};
use crate::repo::{ensure_table_ready, parse_uuid};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PROJECT_SELECT_SQL: &str = "SELECT
    uuid,
    owner_uuid,
    title,
    doc_type,
    created_at
FROM projects";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by project and section persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    ProjectNotFound(ProjectId),
    SectionNotFound(uuid::Uuid),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::SectionNotFound(id) => write!(f, "section not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is not migrated: missing table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "connection is not migrated: missing column `{table}.{column}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for project records.
pub trait ProjectRepository {
    /// Inserts the project row only; sections are written separately.
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    /// Loads one project with all of its sections.
    fn load_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// Lists summaries owned by `owner_id`, newest first.
    fn list_projects_by_owner(&self, owner_id: UserId) -> RepoResult<Vec<ProjectSummary>>;
    /// Returns the owning user without loading section contents.
    fn find_project_owner(&self, id: ProjectId) -> RepoResult<Option<UserId>>;
    /// Deletes the project and, by cascade, its sections.
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "projects",
            &["uuid", "owner_uuid", "title", "doc_type", "created_at"],
        )?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        self.conn.execute(
            "INSERT INTO projects (uuid, owner_uuid, title, doc_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                project.id.to_string(),
                project.owner_id.to_string(),
                project.title.as_str(),
                project.doc_type.as_str(),
                project.created_at,
            ],
        )?;
        Ok(project.id)
    }

    fn load_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let summary = parse_project_row(row)?;
        let sections = SqliteSectionRepository::try_new(self.conn)?.list_sections(summary.id)?;
        Ok(Some(Project {
            id: summary.id,
            owner_id: summary.owner_id,
            title: summary.title,
            doc_type: summary.doc_type,
            created_at: summary.created_at,
            sections,
        }))
    }

    fn list_projects_by_owner(&self, owner_id: UserId) -> RepoResult<Vec<ProjectSummary>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL}
             WHERE owner_uuid = ?1
             ORDER BY created_at DESC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([owner_id.to_string()])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn find_project_owner(&self, id: ProjectId) -> RepoResult<Option<UserId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT owner_uuid FROM projects WHERE uuid = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => {
                let owner: String = row.get(0)?;
                Ok(Some(parse_uuid(&owner, "projects.owner_uuid")?))
            }
            None => Ok(None),
        }
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::ProjectNotFound(id));
        }
        Ok(())
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<ProjectSummary> {
    let uuid: String = row.get("uuid")?;
    let owner: String = row.get("owner_uuid")?;
    let doc_type: String = row.get("doc_type")?;
    let doc_type = doc_type.parse::<DocType>().map_err(|_| {
        RepoError::InvalidData(format!("invalid doc_type `{doc_type}` in projects.doc_type"))
    })?;

    Ok(ProjectSummary {
        id: parse_uuid(&uuid, "projects.uuid")?,
        owner_id: parse_uuid(&owner, "projects.owner_uuid")?,
        title: row.get("title")?,
        doc_type,
        created_at: row.get("created_at")?,
    })
}
