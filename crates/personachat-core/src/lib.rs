//! Business logic and port trait definitions for PersonaChat.
//!
//! This crate defines the share codec, the streaming chat session state
//! machine, and the "ports" (storage and model service traits) that the
//! infrastructure layer implements. It depends only on `personachat-types` --
//! never on `personachat-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod service;
pub mod share;
pub mod storage;
