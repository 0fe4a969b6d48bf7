//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Enforce authentication and author-only access before storage is touched.

pub mod auth_service;
pub mod note_service;
