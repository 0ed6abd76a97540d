//! Infrastructure layer for Chatlog.
//!
//! Contains the SQLite implementation of the repository trait defined in
//! `chatlog-core` and the configuration loader.

pub mod config;
pub mod sqlite;
