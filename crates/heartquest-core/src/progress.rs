//! # Progress Record
//!
//! The small per-session record the whole quest is gated on.
//!
//! Completion flags are monotonic: once a stage is complete it stays complete
//! until the record is reset. [`ProgressRecord::mark_completed`] refuses any
//! flag whose predecessors are not all set.

use crate::primitives::STAGE_COUNT;
use crate::stage::StageId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// PHASE
// =============================================================================

/// Where a visitor stands in the quest, derived from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// `StartJourney` has not been called since the last reset.
    NotStarted,
    /// Journey started; `next` is the first stage still open.
    InProgress { next: StageId },
    /// Every stage is complete and the reward is unlocked.
    Rewarded,
}

// =============================================================================
// PROGRESS RECORD
// =============================================================================

/// One visitor's progress through the quest.
///
/// `Default` is the record of a brand-new session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    journey_started: bool,
    /// Completed stages. BTreeSet keeps them in quest order.
    completed: BTreeSet<StageId>,
}

impl ProgressRecord {
    /// Create a fresh record: not started, nothing completed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a record from raw flags.
    ///
    /// Does NOT enforce stage order. Meant for records handed back by an
    /// external representation; the engine never trusts them beyond what
    /// `QuestEngine::can_enter` checks.
    #[must_use]
    pub fn from_flags(journey_started: bool, completed: impl IntoIterator<Item = StageId>) -> Self {
        Self {
            journey_started,
            completed: completed.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn journey_started(&self) -> bool {
        self.journey_started
    }

    /// Mark the journey as started. Completion flags are untouched.
    pub fn start(&mut self) {
        self.journey_started = true;
    }

    /// Return to the brand-new state.
    pub fn reset(&mut self) {
        self.journey_started = false;
        self.completed.clear();
    }

    #[must_use]
    pub fn is_completed(&self, stage: StageId) -> bool {
        self.completed.contains(&stage)
    }

    /// Completed stages in quest order.
    pub fn completed_stages(&self) -> impl Iterator<Item = StageId> + '_ {
        self.completed.iter().copied()
    }

    /// Set the completion flag for `stage`.
    ///
    /// Returns `true` if the stage is complete after the call (including when
    /// it already was). Returns `false`, leaving the record untouched, when
    /// the journey has not started or a predecessor is still open.
    pub fn mark_completed(&mut self, stage: StageId) -> bool {
        if !self.journey_started {
            return false;
        }
        if !stage.predecessors().iter().all(|s| self.is_completed(*s)) {
            return false;
        }
        self.completed.insert(stage);
        true
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    #[must_use]
    pub fn all_completed(&self) -> bool {
        StageId::ALL.iter().all(|s| self.is_completed(*s))
    }

    /// First stage in quest order that is not complete.
    #[must_use]
    pub fn next_stage(&self) -> Option<StageId> {
        StageId::ALL.into_iter().find(|s| !self.is_completed(*s))
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if !self.journey_started {
            return Phase::NotStarted;
        }
        match self.next_stage() {
            Some(next) => Phase::InProgress { next },
            None => Phase::Rewarded,
        }
    }

    /// Progress as "pieces of the heart", e.g. `"2/4 pieces"`.
    #[must_use]
    pub fn pieces_label(&self) -> String {
        format!("{}/{} pieces", self.completed_count(), STAGE_COUNT)
    }
}

// =============================================================================
// TESTS
// =============================================================================
