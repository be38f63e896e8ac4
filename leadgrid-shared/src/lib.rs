//! # LeadGrid Shared Library
//!
//! This crate contains the domain types and pure access logic shared by the
//! LeadGrid client binaries.
//!
//! ## Module Organization
//!
//! - `models`: Lead, viewer, status catalog, and audit entry types
//! - `visibility`: Role-based visibility predicate over leads

pub mod models;
pub mod visibility;

/// Current version of the LeadGrid shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
