//! Chat sessions for PersonaChat.
//!
//! `session` holds the synchronous transcript state machine; `exchange`
//! drives one request/stream cycle against a model provider.

pub mod exchange;
pub mod session;
