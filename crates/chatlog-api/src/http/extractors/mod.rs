//! Request extractors for conversation endpoints.

pub mod json;
pub mod query;
