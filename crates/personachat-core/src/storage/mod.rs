//! Storage abstractions for PersonaChat.
//!
//! Defines the key-value substrate trait and the "my bots" collection built
//! on top of it. Substrate implementations live in personachat-infra.

pub mod bot_store;
pub mod kv_store;
