//! Bot share codec.
//!
//! Encoding is layered:
//! 1. The bot is reduced to a minimal record `{"n", "p", "a", "i"}`
//!    (name, persona, avatar URL, id) -- nothing derivable is carried.
//! 2. The record is serialized to compact JSON.
//! 3. The JSON bytes are encoded as unpadded base64url, whose alphabet
//!    (`A-Z a-z 0-9 - _`) is valid unescaped in a URL query value.
//!
//! Decoding reverses both layers. Any failure surfaces as a [`DecodeError`];
//! a partially populated bot is never returned.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use personachat_types::bot::{Bot, BotId};
use personachat_types::error::DecodeError;
use personachat_types::share::ShareToken;

/// Outgoing wire form of a shared bot, borrowed from the bot being shared.
#[derive(Debug, Serialize)]
struct ShareRecord<'a> {
    #[serde(rename = "n")]
    name: &'a str,
    #[serde(rename = "p")]
    persona: &'a str,
    #[serde(rename = "a")]
    avatar_url: &'a str,
    #[serde(rename = "i")]
    id: &'a str,
}

/// Incoming wire form of a shared bot. Every field is optional here so that
/// a missing field can be reported by name instead of as a generic parse error.
#[derive(Debug, Deserialize)]
struct SharePayload {
    #[serde(rename = "n")]
    name: Option<String>,
    #[serde(rename = "p")]
    persona: Option<String>,
    #[serde(rename = "a")]
    avatar_url: Option<String>,
    #[serde(rename = "i")]
    id: Option<String>,
}

/// Encode a bot into a share token.
///
/// Deterministic: the same name, persona, avatar and id always produce the
/// same token. `created_at` is not carried.
pub fn encode(bot: &Bot) -> ShareToken {
    let record = ShareRecord {
        name: &bot.name,
        persona: &bot.persona,
        avatar_url: &bot.avatar_url,
        id: bot.id.as_str(),
    };
    // A struct of plain strings always serializes.
    let json = serde_json::to_vec(&record).unwrap_or_default();
    ShareToken(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a share token into a fresh bot.
///
/// The result always has a new `created_at`. If the token carries no id
/// (or a blank one), a new id is generated.
pub fn decode(token: &ShareToken) -> Result<Bot, DecodeError> {
    // Tolerate copy/paste whitespace and padded encoders.
    let raw = token.as_str().trim().trim_end_matches('=');
    if raw.is_empty() {
        return Err(DecodeError::Empty);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(raw)
        .map_err(|e| DecodeError::Encoding(e.to_string()))?;

    let payload: SharePayload =
        serde_json::from_slice(&bytes).map_err(|e| DecodeError::Payload(e.to_string()))?;

    let name = payload.name.ok_or(DecodeError::MissingField("n"))?;
    let persona = payload.persona.ok_or(DecodeError::MissingField("p"))?;
    let avatar_url = payload.avatar_url.ok_or(DecodeError::MissingField("a"))?;

    let id = match payload.id {
        Some(id) if !id.trim().is_empty() => BotId(id),
        _ => BotId::new(),
    };

    Ok(Bot {
        id,
        name,
        persona,
        avatar_url,
        created_at: Utc::now(),
    })
}
