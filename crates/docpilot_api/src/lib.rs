//! Caller-facing API for the HTTP/auth layer.
//!
//! The transport layer authenticates the caller, then hands an
//! [`AuthenticatedUser`] to [`DocpilotApi`]. Every call returns an
//! [`ApiResponse`] envelope; no call panics or returns a bare error.

pub mod api;

pub use api::{
    core_version, init_logging, ping, ApiResponse, AuthenticatedUser, DocpilotApi, ExportPayload,
    SectionPatch,
};
