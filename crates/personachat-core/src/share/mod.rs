//! Shareable bot state.
//!
//! A bot travels between users inside a link: [`codec`] turns a bot into a
//! URL-safe token and back, [`link`] wraps the token into a share URL and
//! pulls it out again.

pub mod codec;
pub mod link;
