//! Shared domain types for Chatlog.
//!
//! This crate contains the domain types used across the Chatlog service:
//! conversation records, media types, statistics, pagination metadata,
//! service configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod pagination;
pub mod stats;
