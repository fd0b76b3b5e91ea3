//! Mnemo agent — the turn loop and its supporting pieces.
//!
//! This crate contains:
//! - **schema**: tool catalog → completion-service definitions
//! - **parser**: structured / pseudo-call / final-answer classification
//! - **dispatch**: tool execution with run-id injection and normalization
//! - **turn**: the per-turn state machine
//! - **context**: system prompt construction

pub mod context;
pub mod dispatch;
pub mod parser;
pub mod schema;
pub mod turn;

pub use dispatch::ToolDispatcher;
pub use parser::{Reply, ParseError};
pub use schema::to_tool_definitions;
pub use turn::{TurnInterrupt, TurnRunner};
