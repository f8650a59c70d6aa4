//! # Stages
//!
//! The fixed, linear order of puzzle stages.
//!
//! ## Stage Definitions
//!
//! | # | Stage | Slug | Kind | Rule |
//! |---|-------|------|------|------|
//! | 1 | Bitwise | `bitwise` | Answer | `a XOR b` for the operands shown |
//! | 2 | Base64 | `base64` | Answer | plaintext of the binary message |
//! | 3 | Ascii | `ascii` | Display | any submission completes it |
//! | 4 | ApiConnect | `api-connect` | Display | terminal, idempotent |
//!
//! The order is closed. Admission checks are index based: a stage is open
//! when every stage before it in [`StageId::ALL`] is complete.

use crate::primitives::STAGE_COUNT;
use crate::types::QuestError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// STAGE ENUM
// =============================================================================

/// A puzzle stage, ordered by position in the quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageId {
    /// Stage 1: XOR two small integers.
    Bitwise,
    /// Stage 2: read a binary-encoded message.
    Base64,
    /// Stage 3: admire the ASCII heart.
    Ascii,
    /// Stage 4: the last gate before the reward.
    ApiConnect,
}

/// Whether a stage checks its answer or completes on any submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// The submission is validated against the puzzle rule.
    Answer,
    /// Display-only; submitting marks the stage complete.
    Display,
}

impl StageId {
    /// Every stage, in quest order.
    pub const ALL: [StageId; STAGE_COUNT] = [
        StageId::Bitwise,
        StageId::Base64,
        StageId::Ascii,
        StageId::ApiConnect,
    ];

    /// The stage every journey begins with.
    #[must_use]
    pub const fn first() -> Self {
        StageId::Bitwise
    }

    /// Zero-based position in the quest order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stage at the given position, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Get the next stage, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index().saturating_add(1))
    }

    /// Get the previous stage, if any.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Stages that must be complete before this one opens.
    #[must_use]
    pub fn predecessors(self) -> &'static [StageId] {
        &Self::ALL[..self.index()]
    }

    /// Check if this stage is the last one before the reward.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, StageId::ApiConnect)
    }

    /// Get the stage name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            StageId::Bitwise => "Bitwise XOR",
            StageId::Base64 => "Binary Message",
            StageId::Ascii => "ASCII Heart",
            StageId::ApiConnect => "API Connect",
        }
    }

    /// URL segment for this stage.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            StageId::Bitwise => "bitwise",
            StageId::Base64 => "base64",
            StageId::Ascii => "ascii",
            StageId::ApiConnect => "api-connect",
        }
    }

    #[must_use]
    pub fn kind(self) -> StageKind {
        match self {
            StageId::Bitwise | StageId::Base64 => StageKind::Answer,
            StageId::Ascii | StageId::ApiConnect => StageKind::Display,
        }
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for StageId {
    type Err = QuestError;

    /// Accepts the slug or the variant name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bitwise" => Ok(StageId::Bitwise),
            "base64" | "binary" => Ok(StageId::Base64),
            "ascii" => Ok(StageId::Ascii),
            "api-connect" | "api_connect" | "apiconnect" => Ok(StageId::ApiConnect),
            _ => Err(QuestError::UnknownStage(s.to_string())),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
