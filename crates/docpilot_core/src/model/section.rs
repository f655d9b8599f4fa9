//! Section domain model.
//!
//! # Responsibility
//! - Define the section record and its partial-update shape.
//! - Define the canonical export/read order of sections.
//!
//! # Invariants
//! - `title` is immutable after creation.
//! - `notes` and `feedback` never influence `content` or export output.
//! - `order_index` is assigned once at creation and never renumbered.

use crate::model::project::ProjectId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// Stable identifier of a section.
pub type SectionId = Uuid;

/// One titled block of a project document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    /// Back-reference used for authorization lookups only.
    pub project_id: ProjectId,
    pub title: String,
    /// Last committed text.
    pub content: String,
    pub order_index: i64,
    pub notes: String,
    pub feedback: String,
}

impl Section {
    /// Creates a section with a generated id and empty annotations.
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        content: impl Into<String>,
        order_index: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            title: title.into(),
            content: content.into(),
            order_index,
            notes: String::new(),
            feedback: String::new(),
        }
    }
}

/// Candidate replacement text returned by a refinement request.
///
/// Never persisted. Callers apply it with a content update or drop it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewContent {
    pub section_id: SectionId,
    pub content: String,
}

/// Partial section update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionUpdate {
    pub content: Option<String>,
    pub notes: Option<String>,
    pub feedback: Option<String>,
}

impl SectionUpdate {
    /// Update that only replaces content.
    pub fn content(value: impl Into<String>) -> Self {
        Self {
            content: Some(value.into()),
            ..Self::default()
        }
    }

    /// Update that only replaces notes.
    pub fn notes(value: impl Into<String>) -> Self {
        Self {
            notes: Some(value.into()),
            ..Self::default()
        }
    }

    /// Update that only replaces feedback.
    pub fn feedback(value: impl Into<String>) -> Self {
        Self {
            feedback: Some(value.into()),
            ..Self::default()
        }
    }

    /// Returns whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.notes.is_none() && self.feedback.is_none()
    }
}

/// Canonical ordering: `order_index` ascending, then section id.
pub fn export_order(left: &Section, right: &Section) -> Ordering {
    left.order_index
        .cmp(&right.order_index)
        .then_with(|| left.id.cmp(&right.id))
}

/// Sorts sections into canonical order in place.
pub fn sort_sections(sections: &mut [Section]) {
    sections.sort_by(export_order);
}
