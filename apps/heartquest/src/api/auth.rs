//! # Authentication Module
//!
//! API key check for the operator routes under `/admin`.
//!
//! ## Configuration
//!
//! The key comes from `Settings::api_key` (`HEARTQUEST_API_KEY`). When no
//! key is configured, every `/admin` request is rejected.
//!
//! ## Usage
//!
//! ```text
//! Authorization: Bearer <your-api-key>
//! ```

use super::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

/// Compare two keys in constant time over the longer of the two lengths.
fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    let max_len = provided.len().max(expected.len());
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided.len()].copy_from_slice(provided);
    padded_expected[..expected.len()].copy_from_slice(expected);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided.len() == expected.len()
}

/// Operator authentication middleware.
///
/// Requires `Authorization: Bearer <key>` (or the raw key) matching the
/// configured API key.
pub async fn api_key_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let Some(expected) = state.settings.api_key.as_deref() else {
        tracing::warn!(
            event = "auth_failure",
            reason = "admin_disabled",
            "Admin request rejected: no API key configured"
        );
        return Err((StatusCode::UNAUTHORIZED, "Unauthorized"));
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(header_value) => {
            let provided = header_value.strip_prefix("Bearer ").unwrap_or(header_value);
            if keys_match(provided.as_bytes(), expected.as_bytes()) {
                Ok(next.run(request).await)
            } else {
                tracing::warn!(
                    event = "auth_failure",
                    reason = "invalid_api_key",
                    "Authentication failed: invalid API key"
                );
                Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
            }
        }
        None => {
            tracing::warn!(
                event = "auth_failure",
                reason = "missing_authorization_header",
                "Missing Authorization header"
            );
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_keys_match() {
        assert!(keys_match(b"s3cret", b"s3cret"));
    }

    #[test]
    fn prefixes_and_extensions_do_not_match() {
        assert!(!keys_match(b"s3cre", b"s3cret"));
        assert!(!keys_match(b"s3cret\0", b"s3cret"));
        assert!(!keys_match(b"", b"s3cret"));
    }
}
