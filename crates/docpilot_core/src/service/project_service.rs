//! Project assembly use-case service.
//!
//! # Responsibility
//! - Create a project and generate its sections in declared order.
//! - Provide owner-checked project reads, deletion and export.
//!
//! # Invariants
//! - Section `order_index` equals the position in the declared title list.
//! - A generation failure mid-batch leaves earlier rows in place and is
//!   reported as `ServiceError::PartialProject`.
//! - Existence is checked before ownership; section contents are loaded only
//!   after ownership passes.

use crate::export::{self, ExportedDocument};
use crate::generation::TextGenerator;
use crate::model::project::{
    validate_new_project, DocType, Project, ProjectId, ProjectSummary, UserId,
};
use crate::model::section::Section;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::section_repo::SectionRepository;
use crate::service::error::{ResourceKind, ServiceError};
use crate::service::section_service::generate_initial;
use log::{error, info, warn};
use std::time::Instant;

/// Project assembly facade.
pub struct ProjectService<P: ProjectRepository, S: SectionRepository, G: TextGenerator> {
    projects: P,
    sections: S,
    generator: G,
}

impl<P: ProjectRepository, S: SectionRepository, G: TextGenerator> ProjectService<P, S, G> {
    pub fn new(projects: P, sections: S, generator: G) -> Self {
        Self {
            projects,
            sections,
            generator,
        }
    }

    /// Creates a project owned by `owner_id` and generates one section per
    /// declared title, sequentially and in order.
    ///
    /// # Errors
    /// - `Validation` before anything is written.
    /// - `PartialProject` when a generation call fails; rows written so far
    ///   are kept.
    pub fn create_project(
        &self,
        owner_id: UserId,
        title: &str,
        doc_type: DocType,
        section_titles: &[String],
    ) -> Result<Project, ServiceError> {
        let started_at = Instant::now();
        let title = validate_new_project(title, section_titles)?;

        let mut project = Project::new(owner_id, title, doc_type);
        self.projects.create_project(&project)?;
        info!(
            "event=project_create module=service status=start project_id={} doc_type={} sections={}",
            project.id,
            doc_type,
            section_titles.len()
        );

        for (index, header) in section_titles.iter().enumerate() {
            let content = generate_initial(&self.generator, &project.title, header).map_err(
                |source| {
                    error!(
                        "event=project_create module=service status=error project_id={} failed_index={} error_code={}",
                        project.id,
                        index,
                        source.code()
                    );
                    ServiceError::PartialProject {
                        project_id: project.id,
                        failed_index: index,
                        source,
                    }
                },
            )?;

            let section = Section::new(project.id, header.as_str(), content, index as i64);
            self.sections.create_section(&section)?;
            project.sections.push(section);
        }

        info!(
            "event=project_create module=service status=ok project_id={} sections={} duration_ms={}",
            project.id,
            project.sections.len(),
            started_at.elapsed().as_millis()
        );
        Ok(project)
    }

    /// Lists projects owned by `user_id`, newest first.
    pub fn list_owned_projects(&self, user_id: UserId) -> Result<Vec<ProjectSummary>, ServiceError> {
        Ok(self.projects.list_projects_by_owner(user_id)?)
    }

    /// Loads one project with its ordered sections.
    pub fn get_project(&self, user_id: UserId, project_id: ProjectId) -> Result<Project, ServiceError> {
        self.authorize_project(user_id, project_id)?;
        self.projects
            .load_project(project_id)?
            .ok_or(ServiceError::NotFound {
                resource: ResourceKind::Project,
                id: project_id,
            })
    }

    /// Deletes one project and its sections.
    pub fn delete_project(&self, user_id: UserId, project_id: ProjectId) -> Result<(), ServiceError> {
        self.authorize_project(user_id, project_id)?;
        self.projects.delete_project(project_id)?;
        info!(
            "event=project_delete module=service status=ok project_id={}",
            project_id
        );
        Ok(())
    }

    /// Renders the current section snapshot into the project's format.
    pub fn export_document(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> Result<ExportedDocument, ServiceError> {
        let project = self.get_project(user_id, project_id)?;
        Ok(export::export(&project)?)
    }

    fn authorize_project(&self, user_id: UserId, project_id: ProjectId) -> Result<(), ServiceError> {
        match self.projects.find_project_owner(project_id)? {
            None => Err(ServiceError::NotFound {
                resource: ResourceKind::Project,
                id: project_id,
            }),
            Some(owner) if owner != user_id => {
                warn!(
                    "event=authorization_denied module=service status=error resource=project project_id={}",
                    project_id
                );
                Err(ServiceError::Unauthorized {
                    resource: ResourceKind::Project,
                })
            }
            Some(_) => Ok(()),
        }
    }
}
