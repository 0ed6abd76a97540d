//! Conversation logging pipeline.
//!
//! Write path: [`normalize`] -> [`validate`] -> repository save.
//! Read path: [`validate`] -> [`query`] -> repository query -> [`crate::repository::Page`].
//! [`service::ConversationService`] wires both paths to a repository.

pub mod normalize;
pub mod query;
pub mod service;
pub mod time;
pub mod validate;
