//! Domain model for projects and their sections.
//!
//! # Responsibility
//! - Define canonical records used by services, repositories and exporters.
//! - Own input validation for project creation.
//!
//! # Invariants
//! - Every project and section is identified by a stable UUID.
//! - Section order is a derived view over `order_index`, never a stored list.

pub mod project;
pub mod section;
