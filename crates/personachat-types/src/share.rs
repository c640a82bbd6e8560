//! Share token type for PersonaChat.
//!
//! A share token is the only persistence mechanism for shared bots: the whole
//! bot definition travels inside it, so no server is involved.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Query key under which a share link carries its token.
pub const SHARE_QUERY_KEY: &str = "data";

/// Hash route of the chat view in a share link.
pub const SHARE_ROUTE: &str = "/#/chat/share";

/// Opaque, URL-safe encoding of a bot definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareToken(pub String);

impl ShareToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ShareToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ShareToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
