//! Share links.
//!
//! A share link is `{origin}/#/chat/share?data={token}`: a hash route whose
//! query carries the token under the fixed `data` key. The token alphabet
//! needs no escaping, so the link is built by plain concatenation.

use tracing::warn;
use url::Url;
use url::form_urlencoded;

use personachat_types::bot::Bot;
use personachat_types::error::DecodeError;
use personachat_types::share::{SHARE_QUERY_KEY, SHARE_ROUTE, ShareToken};

use super::codec;

/// Build a share link for a token under the given origin.
pub fn build_share_link(base_url: &str, token: &ShareToken) -> String {
    format!(
        "{}{}?{}={}",
        base_url.trim_end_matches('/'),
        SHARE_ROUTE,
        SHARE_QUERY_KEY,
        token
    )
}

/// Encode a bot and build its share link in one step.
pub fn share_link_for(base_url: &str, bot: &Bot) -> String {
    build_share_link(base_url, &codec::encode(bot))
}

/// Pull the share token out of user input.
///
/// Accepts, in order:
/// - a full URL with `data` in its query string,
/// - a full URL with `data` in the query part of its fragment (hash routes),
/// - a bare query such as `?data=...` or `data=...`,
/// - a bare token.
pub fn extract_token(input: &str) -> Result<ShareToken, DecodeError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DecodeError::Empty);
    }

    if let Ok(url) = Url::parse(input) {
        if let Some(token) = find_token(url.query().unwrap_or_default()) {
            return Ok(token);
        }
        if let Some((_, query)) = url.fragment().and_then(|f| f.split_once('?')) {
            if let Some(token) = find_token(query) {
                return Ok(token);
            }
        }
        return Err(DecodeError::MissingField(SHARE_QUERY_KEY));
    }

    if let Some((_, query)) = input.rsplit_once('?') {
        return find_token(query).ok_or(DecodeError::MissingField(SHARE_QUERY_KEY));
    }
    if input.contains('=') && input.contains(SHARE_QUERY_KEY) {
        if let Some(token) = find_token(input) {
            return Ok(token);
        }
    }

    Ok(ShareToken(input.to_string()))
}

/// Resolve a share link (or bare token) into a bot.
///
/// Callers should treat an error as "do not enter a session": show an alert
/// and fall back to a safe default view.
pub fn open_shared_bot(input: &str) -> Result<Bot, DecodeError> {
    let token = extract_token(input).inspect_err(|e| {
        warn!(error = %e, "share link carries no token");
    })?;
    codec::decode(&token).inspect_err(|e| {
        warn!(error = %e, "failed to decode shared bot");
    })
}

fn find_token(query: &str) -> Option<ShareToken> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key == SHARE_QUERY_KEY && !value.is_empty())
        .map(|(_, value)| ShareToken(value.into_owned()))
}
