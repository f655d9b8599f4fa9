mod common;

use common::{entry_names, read_entry};
use docpilot_core::export::{export, outline};
use docpilot_core::{DocType, Project, Section};
use uuid::Uuid;

fn project_with_reversed_sections(doc_type: DocType) -> Project {
    let mut project = Project::new(Uuid::new_v4(), "Q3 Plan", doc_type);
    let mut second = Section::new(project.id, "B", "Beta body", 1);
    second.notes = "secret-note-marker".to_string();
    let mut first = Section::new(project.id, "A", "Alpha line one\nAlpha line two", 0);
    first.feedback = "secret-feedback-marker".to_string();
    project.sections = vec![second, first];
    project
}

fn all_entries_text(bytes: &[u8]) -> String {
    entry_names(bytes)
        .iter()
        .map(|name| read_entry(bytes, name))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn outline_follows_order_index_not_input_order() {
    let project = project_with_reversed_sections(DocType::Docx);
    let outline = outline(&project);
    let headings: Vec<&str> = outline
        .entries
        .iter()
        .map(|entry| entry.heading.as_str())
        .collect();
    assert_eq!(headings, vec!["A", "B"]);
    assert_eq!(outline.title, "Q3 Plan");
}

#[test]
fn docx_export_orders_sections_and_omits_annotations() {
    let project = project_with_reversed_sections(DocType::Docx);
    let document = export(&project).unwrap();

    assert_eq!(document.file_name, "Q3_Plan.docx");
    assert_eq!(
        document.media_type,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );

    let names = entry_names(&document.bytes);
    assert!(names.iter().any(|name| name == "[Content_Types].xml"));
    assert!(names.iter().any(|name| name == "word/document.xml"));

    let body = read_entry(&document.bytes, "word/document.xml");
    let a = body.find(">A<").unwrap();
    let alpha_two = body.find(">Alpha line two<").unwrap();
    let b = body.find(">B<").unwrap();
    assert!(a < alpha_two && alpha_two < b);
    assert!(body.contains(">Q3 Plan<"));

    let everything = all_entries_text(&document.bytes);
    assert!(!everything.contains("secret-note-marker"));
    assert!(!everything.contains("secret-feedback-marker"));
}

#[test]
fn pptx_export_has_one_slide_per_section_in_order() {
    let project = project_with_reversed_sections(DocType::Pptx);
    let document = export(&project).unwrap();

    assert_eq!(document.file_name, "Q3_Plan.pptx");
    let slides: Vec<String> = entry_names(&document.bytes)
        .into_iter()
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .collect();
    assert_eq!(slides.len(), 2);

    let first = read_entry(&document.bytes, "ppt/slides/slide1.xml");
    let second = read_entry(&document.bytes, "ppt/slides/slide2.xml");
    assert!(first.contains("<a:t>A</a:t>"));
    assert!(first.contains("<a:t>Alpha line one</a:t>"));
    assert!(second.contains("<a:t>B</a:t>"));

    let everything = all_entries_text(&document.bytes);
    assert!(!everything.contains("secret-note-marker"));
    assert!(!everything.contains("secret-feedback-marker"));
}

#[test]
fn repeated_export_is_byte_identical() {
    for doc_type in [DocType::Docx, DocType::Pptx] {
        let project = project_with_reversed_sections(doc_type);
        let first = export(&project).unwrap();
        let second = export(&project).unwrap();
        assert_eq!(first.bytes, second.bytes);
    }
}

#[test]
fn export_of_empty_project_still_produces_a_package() {
    let project = Project::new(Uuid::new_v4(), "Blank", DocType::Pptx);
    let document = export(&project).unwrap();
    let names = entry_names(&document.bytes);
    assert!(names.iter().any(|name| name == "ppt/presentation.xml"));
    assert!(!names.iter().any(|name| name.starts_with("ppt/slides/")));
}
