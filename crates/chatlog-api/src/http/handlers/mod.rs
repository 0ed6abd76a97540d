//! REST API handler modules.

pub mod conversation;
pub mod health;
pub mod stats;
