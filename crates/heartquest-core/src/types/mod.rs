//! # Core Type Definitions
//!
//! This module contains the shared types for the HeartQuest core:
//! - Session identifiers (`SessionId`)
//! - Error types (`QuestError`)
//!
//! Gating outcomes (admission, verdicts) are NOT errors and live in the
//! `engine` module.

use crate::primitives::{MAX_SESSION_ID_LENGTH, SESSION_TOKEN_BYTES};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// SESSION IDENTIFIER
// =============================================================================

/// Opaque identifier for one visitor session.
///
/// Only characters from the base64url alphabet are accepted, so an id can
/// travel in a cookie or URL segment without escaping.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random session identifier.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; SESSION_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Parse an identifier received from the outside world.
    pub fn parse(raw: &str) -> Result<Self, QuestError> {
        let well_formed = !raw.is_empty()
            && raw.len() <= MAX_SESSION_ID_LENGTH
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

        if well_formed {
            Ok(Self(raw.to_string()))
        } else {
            Err(QuestError::InvalidSessionId)
        }
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the HeartQuest system.
///
/// - Wrong answers and locked stages are decisions, not errors
/// - An unknown session is a fresh session, not an error
/// - The CORE should never panic; all errors must be recoverable
#[derive(Debug, Error)]
pub enum QuestError {
    /// A session identifier was empty, too long, or contained illegal characters.
    #[error("Invalid session identifier")]
    InvalidSessionId,

    /// A stage name did not match any known stage.
    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    /// Bitwise operands were malformed or out of range.
    #[error("Invalid operands: {0}")]
    InvalidOperands(String),

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_parse_back() {
        let id = SessionId::generate();
        let parsed = SessionId::parse(id.as_str()).expect("generated id must be valid");
        assert_eq!(parsed, id);
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn rejects_empty_and_oversized() {
        assert!(matches!(
            SessionId::parse(""),
            Err(QuestError::InvalidSessionId)
        ));
        let long = "a".repeat(MAX_SESSION_ID_LENGTH + 1);
        assert!(SessionId::parse(&long).is_err());
        let max = "a".repeat(MAX_SESSION_ID_LENGTH);
        assert!(SessionId::parse(&max).is_ok());
    }

    #[test]
    fn rejects_cookie_breaking_characters() {
        for raw in ["abc;def", "abc def", "abc=def", "ünï"] {
            assert!(SessionId::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn error_display() {
        let err = QuestError::UnknownStage("maze".to_string());
        assert_eq!(err.to_string(), "Unknown stage: maze");
    }
}
