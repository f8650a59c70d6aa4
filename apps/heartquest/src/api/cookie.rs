//! # Session Cookie
//!
//! The visitor's `SessionId` travels in a single `HttpOnly` cookie.
//! Malformed cookie values are treated as absent.

use axum::http::{HeaderMap, HeaderValue, header};
use heartquest_core::SessionId;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "heartquest_session";

/// Extract the session from the request's `Cookie` headers.
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| SessionId::parse(value.trim()).ok())
}

/// `Set-Cookie` value binding the visitor to `session`.
pub fn session_cookie(session: &SessionId, secure: bool) -> Option<HeaderValue> {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE,
        session.as_str()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

// =============================================================================
// TESTS
// =============================================================================
