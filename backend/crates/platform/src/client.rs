//! Client request helpers
//!
//! Common functions for reading client-supplied values out of HTTP headers.

use axum::http::{HeaderMap, header};

/// Maximum User-Agent length kept on a session record
pub const MAX_USER_AGENT_LENGTH: usize = 512;

/// Extract the User-Agent header, if present and readable
///
/// Over-long values are truncated to [`MAX_USER_AGENT_LENGTH`] bytes
/// (on a char boundary) before they reach storage.
pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::USER_AGENT)?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }

    let mut end = raw.len().min(MAX_USER_AGENT_LENGTH);
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    Some(raw[..end].to_string())
}

/// Extract a bearer token from the Authorization header
///
/// Returns `None` when the header is absent, not UTF-8, uses another
/// scheme, or carries an empty token.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
