mod common;

use common::{titles, ScriptedGenerator};
use docpilot_core::db::open_db_in_memory;
use docpilot_core::{
    DocType, ErrorKind, GenerationError, ProjectRepository, ProjectService, ResourceKind,
    SectionReader, ServiceError, SqliteProjectRepository, SqliteSectionRepository,
    ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

type Service<'a> = ProjectService<
    SqliteProjectRepository<'a>,
    SqliteSectionRepository<'a>,
    &'a ScriptedGenerator,
>;

fn project_service<'a>(conn: &'a Connection, generator: &'a ScriptedGenerator) -> Service<'a> {
    ProjectService::new(
        SqliteProjectRepository::try_new(conn).unwrap(),
        SqliteSectionRepository::try_new(conn).unwrap(),
        generator,
    )
}

#[test]
fn create_project_generates_sections_in_declared_order() {
    let conn = open_db_in_memory().unwrap();
    let generator = ScriptedGenerator::new("Body");
    let service = project_service(&conn, &generator);
    let owner = Uuid::new_v4();

    let project = service
        .create_project(
            owner,
            "  Launch Plan ",
            DocType::Pptx,
            &titles(&["Goals", "Risks", "Timeline"]),
        )
        .unwrap();

    assert_eq!(project.title, "  Launch Plan ");
    assert_eq!(project.owner_id, owner);
    assert_eq!(project.doc_type, DocType::Pptx);
    let indexes: Vec<i64> = project.sections.iter().map(|s| s.order_index).collect();
    assert_eq!(indexes, vec![0, 1, 2]);
    let contents: Vec<&str> = project.sections.iter().map(|s| s.content.as_str()).collect();
    assert_eq!(contents, vec!["Body 1", "Body 2", "Body 3"]);
    assert!(project
        .sections
        .iter()
        .all(|s| s.notes.is_empty() && s.feedback.is_empty()));

    let prompts = generator.prompts();
    assert!(prompts[0].contains("'Goals'"));
    assert!(prompts[2].contains("'Timeline'"));
    assert!(prompts.iter().all(|prompt| prompt.contains("'  Launch Plan '")));

    let stored = service.get_project(owner, project.id).unwrap();
    assert_eq!(stored, project);
}

#[test]
fn duplicate_section_titles_are_kept() {
    let conn = open_db_in_memory().unwrap();
    let generator = ScriptedGenerator::new("Body");
    let service = project_service(&conn, &generator);

    let project = service
        .create_project(
            Uuid::new_v4(),
            "Repeat",
            DocType::Docx,
            &titles(&["Notes", "Notes"]),
        )
        .unwrap();

    assert_eq!(project.sections.len(), 2);
    assert_ne!(project.sections[0].id, project.sections[1].id);
}

#[test]
fn invalid_input_is_rejected_before_any_write_or_generation() {
    let conn = open_db_in_memory().unwrap();
    let generator = ScriptedGenerator::new("Body");
    let service = project_service(&conn, &generator);
    let owner = Uuid::new_v4();

    let err = service
        .create_project(owner, "Empty", DocType::Docx, &[])
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::EmptySectionList)
    ));
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = service
        .create_project(owner, "   ", DocType::Docx, &titles(&["A"]))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::BlankProjectTitle)
    ));

    let err = service
        .create_project(owner, "Gaps", DocType::Docx, &titles(&["A", " "]))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::BlankSectionTitle { index: 1 })
    ));

    assert_eq!(generator.calls(), 0);
    assert!(service.list_owned_projects(owner).unwrap().is_empty());
}

#[test]
fn generation_failure_keeps_partial_project_visible() {
    let conn = open_db_in_memory().unwrap();
    let generator = ScriptedGenerator::failing_on("Body", 2);
    let service = project_service(&conn, &generator);
    let owner = Uuid::new_v4();

    let err = service
        .create_project(owner, "Half", DocType::Docx, &titles(&["A", "B", "C"]))
        .unwrap_err();

    let project_id = match err {
        ServiceError::PartialProject {
            project_id,
            failed_index,
            source,
        } => {
            assert_eq!(failed_index, 1);
            assert_eq!(source, GenerationError::Timeout { after_secs: 60 });
            project_id
        }
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(generator.calls(), 2);

    let stored = service.get_project(owner, project_id).unwrap();
    let headings: Vec<&str> = stored.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(headings, vec!["A"]);
    assert_eq!(service.list_owned_projects(owner).unwrap().len(), 1);
}

#[test]
fn list_owned_projects_only_returns_callers_projects() {
    let conn = open_db_in_memory().unwrap();
    let generator = ScriptedGenerator::new("Body");
    let service = project_service(&conn, &generator);
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let mine = service
        .create_project(alice, "Mine", DocType::Docx, &titles(&["A"]))
        .unwrap();
    service
        .create_project(bob, "Theirs", DocType::Pptx, &titles(&["B"]))
        .unwrap();

    let listed = service.list_owned_projects(alice).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);
    assert_eq!(listed[0].title, "Mine");
    assert!(service
        .list_owned_projects(Uuid::new_v4())
        .unwrap()
        .is_empty());
}

#[test]
fn get_project_checks_existence_then_ownership() {
    let conn = open_db_in_memory().unwrap();
    let generator = ScriptedGenerator::new("Body");
    let service = project_service(&conn, &generator);
    let owner = Uuid::new_v4();
    let project = service
        .create_project(owner, "Private", DocType::Docx, &titles(&["A"]))
        .unwrap();

    let err = service.get_project(Uuid::new_v4(), project.id).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Unauthorized {
            resource: ResourceKind::Project
        }
    ));
    assert!(!err.to_string().contains(&project.id.to_string()));

    let missing = Uuid::new_v4();
    let err = service.get_project(owner, missing).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            resource: ResourceKind::Project,
            id
        } if id == missing
    ));
}

#[test]
fn delete_project_removes_sections_and_rejects_non_owner() {
    let conn = open_db_in_memory().unwrap();
    let generator = ScriptedGenerator::new("Body");
    let service = project_service(&conn, &generator);
    let owner = Uuid::new_v4();
    let project = service
        .create_project(owner, "Temp", DocType::Docx, &titles(&["A", "B"]))
        .unwrap();

    let err = service
        .delete_project(Uuid::new_v4(), project.id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    service.delete_project(owner, project.id).unwrap();

    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let sections = SqliteSectionRepository::try_new(&conn).unwrap();
    assert!(projects.load_project(project.id).unwrap().is_none());
    assert!(sections.list_sections(project.id).unwrap().is_empty());
    assert_eq!(
        service.get_project(owner, project.id).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}
