//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and generator calls into use-case level APIs.
//! - Enforce project ownership before any preview, read or write.
//!
//! # Invariants
//! - Ownership is resolved before generator calls and before writes.
//! - Services never read backend configuration from the environment.

pub mod error;
pub mod project_service;
pub mod section_service;
