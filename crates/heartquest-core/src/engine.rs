//! # Quest Engine
//!
//! Stateless gatekeeping and validation.
//!
//! Every function here is a pure function of a `ProgressRecord`, a
//! `StageId` and (for submissions) the answer plus the operands that were
//! shown. Storage is the caller's concern; see the `quest` module.
//!
//! ## Rules
//!
//! - A stage is enterable iff the journey has started and every earlier stage
//!   is complete. The same rule gates viewing and submitting.
//! - A correct submission sets the stage's flag and reports what comes next.
//! - A wrong submission leaves the record unchanged.
//! - The reward is visible iff the journey has started and all stages are
//!   complete.

use crate::primitives::MAX_ANSWER_LENGTH;
use crate::progress::ProgressRecord;
use crate::puzzle::{
    BitwiseChallenge, IncorrectReason, PuzzleChallenge, check_binary, check_bitwise,
};
use crate::stage::StageId;
use rand::Rng;
use serde::{Deserialize, Serialize};

// =============================================================================
// DECISIONS
// =============================================================================

/// Outcome of asking to enter a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The stage is open; show this challenge.
    Allowed(PuzzleChallenge),
    /// The stage is locked; the caller should send the visitor to the start.
    Denied,
}

impl Admission {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed(_))
    }

    #[must_use]
    pub fn challenge(&self) -> Option<&PuzzleChallenge> {
        match self {
            Admission::Allowed(challenge) => Some(challenge),
            Admission::Denied => None,
        }
    }
}

/// Where a correct submission leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advance {
    /// The next stage is now open.
    Stage(StageId),
    /// The last stage is complete; the reward is open.
    Reward,
}

/// Outcome of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The stage is locked for this record. Nothing was checked.
    Denied,
    /// Accepted; the stage is (or already was) complete.
    Correct(Advance),
    /// Rejected; the record is unchanged.
    Incorrect(IncorrectReason),
}

impl Verdict {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct(_))
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Quest Engine - Pure functions deciding admission and transitions.
pub struct QuestEngine;

impl QuestEngine {
    /// Check whether `stage` may be viewed or submitted to.
    #[must_use]
    pub fn can_enter(record: &ProgressRecord, stage: StageId) -> bool {
        record.journey_started()
            && stage
                .predecessors()
                .iter()
                .all(|earlier| record.is_completed(*earlier))
    }

    /// Check whether the final reward may be viewed.
    #[must_use]
    pub fn can_view_reward(record: &ProgressRecord) -> bool {
        record.journey_started() && record.all_completed()
    }

    /// Build the challenge shown when `stage` is presented.
    ///
    /// Draws fresh Bitwise operands on every call.
    pub fn present<R: Rng + ?Sized>(stage: StageId, rng: &mut R) -> PuzzleChallenge {
        match stage {
            StageId::Bitwise => PuzzleChallenge::Bitwise(BitwiseChallenge::generate(rng)),
            StageId::Base64 => PuzzleChallenge::binary(),
            StageId::Ascii => PuzzleChallenge::ascii(),
            StageId::ApiConnect => PuzzleChallenge::ApiConnect,
        }
    }

    /// Decide whether `stage` may be entered and, if so, what it shows.
    pub fn enter<R: Rng + ?Sized>(
        record: &ProgressRecord,
        stage: StageId,
        rng: &mut R,
    ) -> Admission {
        if Self::can_enter(record, stage) {
            Admission::Allowed(Self::present(stage, rng))
        } else {
            Admission::Denied
        }
    }

    /// Check an answer against the rule of `stage`.
    ///
    /// `pending` is the Bitwise challenge that was shown; other stages
    /// ignore it. Display-only stages accept anything, whatever its length.
    pub fn validate(
        stage: StageId,
        answer: Option<&str>,
        pending: Option<&BitwiseChallenge>,
    ) -> Result<(), IncorrectReason> {
        match stage {
            StageId::Ascii | StageId::ApiConnect => Ok(()),
            _ if answer.is_some_and(|a| a.len() > MAX_ANSWER_LENGTH) => {
                Err(IncorrectReason::TooLong)
            }
            StageId::Bitwise => check_bitwise(answer, pending),
            StageId::Base64 => check_binary(answer),
        }
    }

    /// What opens after `stage` is completed.
    #[must_use]
    pub fn advance_from(stage: StageId) -> Advance {
        match stage.next() {
            Some(next) => Advance::Stage(next),
            None => Advance::Reward,
        }
    }

    /// Apply a submission to a record.
    ///
    /// Returns the record to store and the verdict. The returned record
    /// equals the input unless the verdict is `Correct` on a stage that was
    /// not yet complete.
    pub fn submit(
        record: &ProgressRecord,
        stage: StageId,
        answer: Option<&str>,
        pending: Option<&BitwiseChallenge>,
    ) -> (ProgressRecord, Verdict) {
        if !Self::can_enter(record, stage) {
            return (record.clone(), Verdict::Denied);
        }

        match Self::validate(stage, answer, pending) {
            Ok(()) => {
                let mut next = record.clone();
                // predecessors were checked by can_enter
                let completed = next.mark_completed(stage);
                debug_assert!(completed);
                (next, Verdict::Correct(Self::advance_from(stage)))
            }
            Err(reason) => (record.clone(), Verdict::Incorrect(reason)),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
