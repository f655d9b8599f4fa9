//! Section lifecycle use-case service.
//!
//! # Responsibility
//! - Generate initial section text.
//! - Produce refinement previews without touching storage.
//! - Apply content/notes/feedback updates after an ownership check.
//!
//! # Invariants
//! - `preview_refine` only ever sees a `SectionReader`; no write path is
//!   reachable from it.
//! - Committed content is stored exactly as passed (no trim, no history).
//! - `notes` and `feedback` updates never touch `content`.

use crate::generation::prompts::{refine_prompt, section_prompt};
use crate::generation::{generate_text, GenerationError, TextGenerator};
use crate::model::project::UserId;
use crate::model::section::{PreviewContent, Section, SectionId, SectionUpdate};
use crate::repo::section_repo::{SectionReader, SectionRepository};
use crate::service::error::{ResourceKind, ServiceError};
use log::{info, warn};
use std::time::Instant;

/// Section lifecycle facade over a section repository and a generator.
pub struct SectionService<S: SectionRepository, G: TextGenerator> {
    repo: S,
    generator: G,
}

impl<S: SectionRepository, G: TextGenerator> SectionService<S, G> {
    pub fn new(repo: S, generator: G) -> Self {
        Self { repo, generator }
    }

    /// Generates the initial body for one section header.
    ///
    /// Generation failures are returned to the caller unchanged.
    pub fn generate_initial(
        &self,
        document_title: &str,
        section_header: &str,
    ) -> Result<String, GenerationError> {
        generate_initial(&self.generator, document_title, section_header)
    }

    /// Reads one section owned by `user_id`.
    pub fn get_section(&self, user_id: UserId, section_id: SectionId) -> Result<Section, ServiceError> {
        authorize_section(&self.repo, user_id, section_id)?;
        load_section(&self.repo, section_id)
    }

    /// Returns a candidate rewrite of the section's committed content.
    ///
    /// Nothing is stored; apply the result with [`Self::commit`] or drop it.
    pub fn preview_refine(
        &self,
        user_id: UserId,
        section_id: SectionId,
        instruction: &str,
    ) -> Result<PreviewContent, ServiceError> {
        preview_refine(&self.repo, &self.generator, user_id, section_id, instruction)
    }

    /// Overwrites the section content unconditionally.
    pub fn commit(
        &self,
        user_id: UserId,
        section_id: SectionId,
        new_content: impl Into<String>,
    ) -> Result<Section, ServiceError> {
        self.update_section(user_id, section_id, SectionUpdate::content(new_content))
    }

    /// Overwrites the section notes.
    pub fn set_notes(
        &self,
        user_id: UserId,
        section_id: SectionId,
        notes: impl Into<String>,
    ) -> Result<Section, ServiceError> {
        self.update_section(user_id, section_id, SectionUpdate::notes(notes))
    }

    /// Overwrites the section feedback.
    pub fn set_feedback(
        &self,
        user_id: UserId,
        section_id: SectionId,
        feedback: impl Into<String>,
    ) -> Result<Section, ServiceError> {
        self.update_section(user_id, section_id, SectionUpdate::feedback(feedback))
    }

    /// Applies every present field of `update` and returns the stored row.
    ///
    /// An empty update still checks ownership and returns the current row.
    pub fn update_section(
        &self,
        user_id: UserId,
        section_id: SectionId,
        update: SectionUpdate,
    ) -> Result<Section, ServiceError> {
        authorize_section(&self.repo, user_id, section_id)?;

        if !update.is_empty() {
            self.repo.update_section_fields(section_id, &update)?;
            info!(
                "event=section_update module=service status=ok section_id={} content={} notes={} feedback={}",
                section_id,
                update.content.is_some(),
                update.notes.is_some(),
                update.feedback.is_some()
            );
        }

        load_section(&self.repo, section_id)
    }
}

/// Generates initial section text from the document title and header.
pub fn generate_initial<G: TextGenerator + ?Sized>(
    generator: &G,
    document_title: &str,
    section_header: &str,
) -> Result<String, GenerationError> {
    generate_text(generator, &section_prompt(document_title, section_header))
}

/// Read-only refinement preview.
///
/// Takes only a [`SectionReader`], so this function cannot write.
pub fn preview_refine<R: SectionReader + ?Sized, G: TextGenerator + ?Sized>(
    reader: &R,
    generator: &G,
    user_id: UserId,
    section_id: SectionId,
    instruction: &str,
) -> Result<PreviewContent, ServiceError> {
    let started_at = Instant::now();
    authorize_section(reader, user_id, section_id)?;
    let section = load_section(reader, section_id)?;

    let content = generate_text(generator, &refine_prompt(&section.content, instruction))
        .map_err(|err| {
            warn!(
                "event=section_preview module=service status=error section_id={} error_code={}",
                section_id,
                err.code()
            );
            err
        })?;

    info!(
        "event=section_preview module=service status=ok section_id={} duration_ms={}",
        section_id,
        started_at.elapsed().as_millis()
    );
    Ok(PreviewContent {
        section_id,
        content,
    })
}

/// Verifies that `user_id` owns the project holding `section_id`.
///
/// Unknown sections fail with `NotFound` before ownership is compared.
pub(crate) fn authorize_section<R: SectionReader + ?Sized>(
    reader: &R,
    user_id: UserId,
    section_id: SectionId,
) -> Result<(), ServiceError> {
    match reader.find_section_owner(section_id)? {
        None => Err(ServiceError::NotFound {
            resource: ResourceKind::Section,
            id: section_id,
        }),
        Some(owner) if owner != user_id => {
            warn!(
                "event=authorization_denied module=service status=error resource=section section_id={}",
                section_id
            );
            Err(ServiceError::Unauthorized {
                resource: ResourceKind::Section,
            })
        }
        Some(_) => Ok(()),
    }
}

fn load_section<R: SectionReader + ?Sized>(
    reader: &R,
    section_id: SectionId,
) -> Result<Section, ServiceError> {
    reader
        .get_section(section_id)?
        .ok_or(ServiceError::InconsistentState(
            "authorized section missing in read-back",
        ))
}
