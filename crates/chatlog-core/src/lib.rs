//! Business logic and repository trait definitions for Chatlog.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements, plus the conversation pipeline: normalization,
//! validation, query construction, and the service that ties them together.
//! It depends only on `chatlog-types` -- never on `chatlog-infra` or any
//! database/IO crate.

pub mod conversation;
pub mod repository;
