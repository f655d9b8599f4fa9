//! Section repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide section reads (`SectionReader`) separately from writes
//!   (`SectionRepository`) so preview paths can hold a read-only view.
//! - Resolve a section's owning user through its parent project.
//!
//! # Invariants
//! - `update_section_fields` changes only the fields present in the update,
//!   in one statement.
//! - `title`, `order_index` and `project_uuid` are never updated.

use crate::model::project::{ProjectId, UserId};
use crate::model::section::{sort_sections, Section, SectionId, SectionUpdate};
use crate::repo::project_repo::{RepoError, RepoResult};
use crate::repo::{ensure_table_ready, parse_uuid};
use rusqlite::{params, Connection, Row};

const SECTION_SELECT_SQL: &str = "SELECT
    uuid,
    project_uuid,
    title,
    content,
    order_index,
    notes,
    feedback
FROM sections";

/// Read-only section access.
pub trait SectionReader {
    fn get_section(&self, id: SectionId) -> RepoResult<Option<Section>>;
    /// Lists sections of a project in canonical order.
    fn list_sections(&self, project_id: ProjectId) -> RepoResult<Vec<Section>>;
    /// Resolves the parent project's owner; `None` when the section is unknown.
    fn find_section_owner(&self, id: SectionId) -> RepoResult<Option<UserId>>;
}

/// Section writes on top of reads.
pub trait SectionRepository: SectionReader {
    fn create_section(&self, section: &Section) -> RepoResult<SectionId>;
    /// Applies present fields of `update`; fails with `SectionNotFound`
    /// when no row matches.
    fn update_section_fields(&self, id: SectionId, update: &SectionUpdate) -> RepoResult<()>;
}

/// SQLite-backed section repository.
pub struct SqliteSectionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSectionRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "sections",
            &[
                "uuid",
                "project_uuid",
                "title",
                "content",
                "order_index",
                "notes",
                "feedback",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl SectionReader for SqliteSectionRepository<'_> {
    fn get_section(&self, id: SectionId) -> RepoResult<Option<Section>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SECTION_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_section_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_sections(&self, project_id: ProjectId) -> RepoResult<Vec<Section>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SECTION_SELECT_SQL}
             WHERE project_uuid = ?1
             ORDER BY order_index ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([project_id.to_string()])?;
        let mut sections = Vec::new();
        while let Some(row) = rows.next()? {
            sections.push(parse_section_row(row)?);
        }
        // SQL orders uuids as text; re-sort so ties follow `Uuid` ordering.
        sort_sections(&mut sections);
        Ok(sections)
    }

    fn find_section_owner(&self, id: SectionId) -> RepoResult<Option<UserId>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.owner_uuid
             FROM sections s
             INNER JOIN projects p ON p.uuid = s.project_uuid
             WHERE s.uuid = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => {
                let owner: String = row.get(0)?;
                Ok(Some(parse_uuid(&owner, "projects.owner_uuid")?))
            }
            None => Ok(None),
        }
    }
}

impl SectionRepository for SqliteSectionRepository<'_> {
    fn create_section(&self, section: &Section) -> RepoResult<SectionId> {
        self.conn.execute(
            "INSERT INTO sections (
                uuid,
                project_uuid,
                title,
                content,
                order_index,
                notes,
                feedback
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                section.id.to_string(),
                section.project_id.to_string(),
                section.title.as_str(),
                section.content.as_str(),
                section.order_index,
                section.notes.as_str(),
                section.feedback.as_str(),
            ],
        )?;
        Ok(section.id)
    }

    fn update_section_fields(&self, id: SectionId, update: &SectionUpdate) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE sections
             SET
                content = COALESCE(?2, content),
                notes = COALESCE(?3, notes),
                feedback = COALESCE(?4, feedback),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                id.to_string(),
                update.content.as_deref(),
                update.notes.as_deref(),
                update.feedback.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::SectionNotFound(id));
        }
        Ok(())
    }
}

fn parse_section_row(row: &Row<'_>) -> RepoResult<Section> {
    let uuid: String = row.get("uuid")?;
    let project_uuid: String = row.get("project_uuid")?;
    Ok(Section {
        id: parse_uuid(&uuid, "sections.uuid")?,
        project_id: parse_uuid(&project_uuid, "sections.project_uuid")?,
        title: row.get("title")?,
        content: row.get("content")?,
        order_index: row.get("order_index")?,
        notes: row.get("notes")?,
        feedback: row.get("feedback")?,
    })
}
