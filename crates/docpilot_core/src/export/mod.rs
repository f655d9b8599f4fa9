//! Document export: renders a project's ordered sections into an OOXML
//! artifact.
//!
//! # Responsibility
//! - Derive the canonical outline (ordered heading/body pairs) of a project.
//! - Render the outline as `.docx` or `.pptx` bytes based on `DocType`.
//!
//! # Invariants
//! - Sections are ordered by `(order_index, id)` regardless of input order.
//! - `notes` and `feedback` never reach the outline, hence never the output.
//! - Output bytes are a pure function of project title, doc type and outline.

mod docx;
mod package;
mod pptx;

use crate::model::project::{DocType, Project};
use crate::model::section::{export_order, Section};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

static FILE_NAME_UNSAFE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid file name regex"));

const FALLBACK_FILE_STEM: &str = "document";

/// Error raised while writing an export package.
#[derive(Debug)]
pub enum ExportError {
    Zip(zip::result::ZipError),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zip(err) => write!(f, "failed to write document package: {err}"),
            Self::Io(err) => write!(f, "failed to write document part: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Zip(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Zip(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// One exported entry: a heading with its body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub heading: String,
    pub body: String,
}

impl OutlineEntry {
    /// Non-blank body lines, each rendered as its own paragraph.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.body
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .collect()
    }
}

/// Format-independent structure of an exported document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentOutline {
    pub title: String,
    pub doc_type: DocType,
    pub entries: Vec<OutlineEntry>,
}

/// Binary export result handed to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Builds the ordered outline of `project`.
pub fn outline(project: &Project) -> DocumentOutline {
    let mut ordered: Vec<&Section> = project.sections.iter().collect();
    ordered.sort_by(|left, right| export_order(left, right));

    DocumentOutline {
        title: project.title.clone(),
        doc_type: project.doc_type,
        entries: ordered
            .into_iter()
            .map(|section| OutlineEntry {
                heading: section.title.clone(),
                body: section.content.clone(),
            })
            .collect(),
    }
}

/// Renders `project` into its document format.
///
/// Each non-blank content line becomes one paragraph with trailing
/// whitespace removed, so blank lines are not carried into the file.
///
/// # Side effects
/// - Emits one `document_export` log event with sizes only.
pub fn export(project: &Project) -> Result<ExportedDocument, ExportError> {
    let started_at = Instant::now();
    let outline = outline(project);
    let bytes = match outline.doc_type {
        DocType::Docx => docx::render(&outline)?,
        DocType::Pptx => pptx::render(&outline)?,
    };

    info!(
        "event=document_export module=export status=ok project_id={} doc_type={} entries={} bytes={} duration_ms={}",
        project.id,
        outline.doc_type,
        outline.entries.len(),
        bytes.len(),
        started_at.elapsed().as_millis()
    );

    Ok(ExportedDocument {
        file_name: export_file_name(&project.title, project.doc_type),
        media_type: project.doc_type.media_type(),
        bytes,
    })
}

/// File name derived from the project title, safe for download headers.
pub fn export_file_name(title: &str, doc_type: DocType) -> String {
    let collapsed = FILE_NAME_UNSAFE_RE.replace_all(title.trim(), "_");
    let stem = collapsed.trim_matches(|c| c == '_' || c == '.');
    let stem = if stem.is_empty() {
        FALLBACK_FILE_STEM
    } else {
        stem
    };
    format!("{stem}.{}", doc_type.file_extension())
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, OutlineEntry};
    use crate::model::project::DocType;

    #[test]
    fn file_name_collapses_unsafe_runs() {
        assert_eq!(export_file_name("Q3 Plan: 2025", DocType::Docx), "Q3_Plan_2025.docx");
        assert_eq!(export_file_name("  ", DocType::Pptx), "document.pptx");
        assert_eq!(export_file_name("../etc", DocType::Pptx), "etc.pptx");
    }

    #[test]
    fn paragraphs_skip_blank_lines() {
        let entry = OutlineEntry {
            heading: "h".to_string(),
            body: "first  \n\n   \nsecond\r\n".to_string(),
        };
        assert_eq!(entry.paragraphs(), vec!["first", "second"]);
    }
}
