//! # heartquest-core
//!
//! The progress state machine for HeartQuest - THE LOGIC.
//!
//! A visitor walks a fixed, linear sequence of puzzle stages. Stage *N+1*
//! only opens once stage *N* is solved, and the reward only opens once every
//! stage is solved. This crate owns:
//! - the closed stage order (`stage` module)
//! - the per-session progress record (`progress` module)
//! - puzzle generation and answer checks (`puzzle` module)
//! - the stateless admission/transition rules (`engine` module)
//! - session-scoped storage with per-key serialization (`store` module)
//! - the facade exposing the external operations (`quest` module)
//!
//! ## Architectural Constraints
//!
//! - The engine is pure: a record goes in, a record and a decision come out
//! - Gating decisions are values (`Admission`, `Verdict`), never errors
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod engine;
pub mod primitives;
pub mod progress;
pub mod puzzle;
pub mod quest;
pub mod stage;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{QuestError, SessionId};

// =============================================================================
// RE-EXPORTS: State Machine
// =============================================================================

pub use engine::{Admission, Advance, QuestEngine, Verdict};
pub use progress::{Phase, ProgressRecord};
pub use puzzle::{BitwiseChallenge, IncorrectReason, PuzzleChallenge};
pub use stage::{StageId, StageKind};

// =============================================================================
// RE-EXPORTS: Sessions
// =============================================================================

pub use quest::{Quest, RewardAccess, SubmitOutcome};
pub use store::{MemoryStore, ProgressStore, SessionSlot};
