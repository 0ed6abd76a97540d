//! Observability setup for Chatlog.

pub mod tracing_setup;
