//! HTTP/REST API layer for Chatlog.
//!
//! Axum-based REST API served at the root and under the legacy `/api`
//! prefix, with the `{success, message, data, errors, pagination}` envelope
//! and open CORS.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
