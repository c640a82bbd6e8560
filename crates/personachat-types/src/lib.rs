//! Shared domain types for PersonaChat.
//!
//! This crate contains the core domain types used across the PersonaChat crates:
//! Bot, chat Message and ChatStatus, ShareToken, LLM request/stream types,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod bot;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod share;
