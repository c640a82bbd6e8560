//! Interactive CLI chat with a shared bot.
//!
//! Streams replies as they arrive, with a typing spinner, a welcome banner
//! and slash commands. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
