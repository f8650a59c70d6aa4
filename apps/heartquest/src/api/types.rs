//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use heartquest_core::{
    Advance, IncorrectReason, ProgressRecord, PuzzleChallenge, StageId, StageKind,
    primitives::STAGE_COUNT,
};
use serde::{Deserialize, Serialize};

/// Where locked pages send the visitor.
pub const START_PATH: &str = "/";

/// Shown once the last stage is complete.
pub const REWARD_MESSAGE: &str = "You found every piece of my heart. I love you.";

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// CHALLENGE JSON
// =============================================================================

/// JSON form of a puzzle challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChallengeJson {
    Bitwise { a: u32, b: u32 },
    Binary { message: String },
    Ascii { art: String },
    ApiConnect,
}

impl From<&PuzzleChallenge> for ChallengeJson {
    fn from(challenge: &PuzzleChallenge) -> Self {
        match challenge {
            PuzzleChallenge::Bitwise(c) => ChallengeJson::Bitwise { a: c.a, b: c.b },
            PuzzleChallenge::Binary { message } => ChallengeJson::Binary {
                message: (*message).to_string(),
            },
            PuzzleChallenge::Ascii { art } => ChallengeJson::Ascii {
                art: (*art).to_string(),
            },
            PuzzleChallenge::ApiConnect => ChallengeJson::ApiConnect,
        }
    }
}

// =============================================================================
// PROGRESS RESPONSE
// =============================================================================

/// Completion flag for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFlag {
    pub stage: String,
    pub completed: bool,
}

/// Progress summary, counted in heart pieces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub journey_started: bool,
    pub stages: Vec<StageFlag>,
    pub completed_count: usize,
    pub total: usize,
    /// e.g. `"2/4 pieces"`
    pub pieces: String,
    pub reward_unlocked: bool,
    pub next_stage: Option<String>,
}

impl From<&ProgressRecord> for ProgressResponse {
    fn from(record: &ProgressRecord) -> Self {
        let reward_unlocked = record.journey_started() && record.all_completed();
        Self {
            journey_started: record.journey_started(),
            stages: StageId::ALL
                .into_iter()
                .map(|stage| StageFlag {
                    stage: stage.slug().to_string(),
                    completed: record.is_completed(stage),
                })
                .collect(),
            completed_count: record.completed_count(),
            total: STAGE_COUNT,
            pieces: record.pieces_label(),
            reward_unlocked,
            next_stage: record
                .journey_started()
                .then(|| record.next_stage())
                .flatten()
                .map(|s| s.slug().to_string()),
        }
    }
}

// =============================================================================
// STAGE RESPONSE
// =============================================================================

/// Response to viewing a stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResponse {
    pub allowed: bool,
    pub stage: String,
    pub challenge: Option<ChallengeJson>,
    pub redirect: Option<String>,
}

impl StageResponse {
    pub fn allowed(stage: StageId, challenge: &PuzzleChallenge) -> Self {
        Self {
            allowed: true,
            stage: stage.slug().to_string(),
            challenge: Some(challenge.into()),
            redirect: None,
        }
    }

    pub fn denied(stage: StageId) -> Self {
        Self {
            allowed: false,
            stage: stage.slug().to_string(),
            challenge: None,
            redirect: Some(START_PATH.to_string()),
        }
    }
}

// =============================================================================
// SUBMIT REQUEST/RESPONSE
// =============================================================================

/// Answer submission. Display stages accept an empty body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub answer: Option<String>,
}

/// Response to an answer submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub correct: bool,
    pub stage: String,
    /// Slug of the stage that opened, if any.
    pub next_stage: Option<String>,
    pub reward_unlocked: bool,
    pub reason: Option<IncorrectReason>,
    pub error: Option<String>,
    /// The stage presented again after a wrong answer.
    pub challenge: Option<ChallengeJson>,
    pub redirect: Option<String>,
    pub progress: ProgressResponse,
}

impl SubmitResponse {
    pub fn correct(stage: StageId, advance: Advance, record: &ProgressRecord) -> Self {
        let (next_stage, reward_unlocked) = match advance {
            Advance::Stage(next) => (Some(next.slug().to_string()), false),
            Advance::Reward => (None, true),
        };
        Self {
            correct: true,
            stage: stage.slug().to_string(),
            next_stage,
            reward_unlocked,
            reason: None,
            error: None,
            challenge: None,
            redirect: None,
            progress: record.into(),
        }
    }

    pub fn incorrect(
        stage: StageId,
        reason: IncorrectReason,
        challenge: Option<&PuzzleChallenge>,
        record: &ProgressRecord,
    ) -> Self {
        Self {
            correct: false,
            stage: stage.slug().to_string(),
            next_stage: None,
            reward_unlocked: false,
            reason: Some(reason),
            error: Some(reason.message().to_string()),
            challenge: challenge.map(Into::into),
            redirect: None,
            progress: record.into(),
        }
    }

    pub fn denied(stage: StageId, record: &ProgressRecord) -> Self {
        Self {
            correct: false,
            stage: stage.slug().to_string(),
            next_stage: None,
            reward_unlocked: false,
            reason: None,
            error: Some("This stage is locked.".to_string()),
            challenge: None,
            redirect: Some(START_PATH.to_string()),
            progress: record.into(),
        }
    }
}

// =============================================================================
// REWARD RESPONSE
// =============================================================================

/// Response to viewing the reward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardResponse {
    pub allowed: bool,
    pub message: Option<String>,
    pub pieces: String,
    pub redirect: Option<String>,
}

impl RewardResponse {
    pub fn allowed(record: &ProgressRecord) -> Self {
        Self {
            allowed: true,
            message: Some(REWARD_MESSAGE.to_string()),
            pieces: record.pieces_label(),
            redirect: None,
        }
    }

    pub fn denied(record: &ProgressRecord) -> Self {
        Self {
            allowed: false,
            message: None,
            pieces: record.pieces_label(),
            redirect: Some(START_PATH.to_string()),
        }
    }
}

// =============================================================================
// STAGE CATALOGUE
// =============================================================================

/// One entry of the stage catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageInfo {
    /// 1-based position in the quest.
    pub order: usize,
    pub slug: String,
    pub name: String,
    pub kind: StageKind,
}

impl From<StageId> for StageInfo {
    fn from(stage: StageId) -> Self {
        Self {
            order: stage.index() + 1,
            slug: stage.slug().to_string(),
            name: stage.name().to_string(),
            kind: stage.kind(),
        }
    }
}

/// The full, ordered stage catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagesResponse {
    pub stages: Vec<StageInfo>,
}

impl Default for StagesResponse {
    fn default() -> Self {
        Self {
            stages: StageId::ALL.into_iter().map(StageInfo::from).collect(),
        }
    }
}

// =============================================================================
// ADMIN & ERRORS
// =============================================================================

/// Response to an operator reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminResetResponse {
    pub success: bool,
    /// `false` if the session was unknown (nothing was stored for it).
    pub existed: bool,
    pub progress: ProgressResponse,
}

/// Generic error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
