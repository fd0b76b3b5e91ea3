//! Mnemo core — shared types, session state, configuration, and utilities.
//!
//! This crate contains:
//! - **types**: chat messages, tool calls/definitions, completion wire types
//! - **session**: per-session conversation history and run id
//! - **config**: JSON config schema and loader with env overrides
//! - **utils**: path and string helpers

pub mod config;
pub mod session;
pub mod types;
pub mod utils;

pub use session::SessionState;
