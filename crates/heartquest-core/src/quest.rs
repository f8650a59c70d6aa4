//! # Quest Facade
//!
//! The operations the request-handling layer calls.
//!
//! Each operation is exactly one store access, so every decision is made
//! and written back while the session's slot is held.
//!
//! Only `start_journey` creates a session. Every other operation decides an
//! unknown session against a fresh record and stores nothing for it.

use crate::engine::{Admission, QuestEngine, Verdict};
use crate::progress::ProgressRecord;
use crate::puzzle::PuzzleChallenge;
use crate::stage::StageId;
use crate::store::{MemoryStore, ProgressStore};
use crate::types::SessionId;
use rand::Rng;

/// Outcome of asking to view the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardAccess {
    Allowed,
    Denied,
}

/// Everything a caller needs after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub verdict: Verdict,
    /// The record as stored after the submission.
    pub record: ProgressRecord,
    /// A re-issued challenge after an incorrect answer.
    pub challenge: Option<PuzzleChallenge>,
    /// `true` if this submission flipped the stage's flag.
    pub newly_completed: bool,
}

/// A `ProgressStore` bound to the quest rules.
#[derive(Debug, Default)]
pub struct Quest<S = MemoryStore> {
    store: S,
}

impl<S: ProgressStore> Quest<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reset the session, then mark the journey as started.
    pub fn start_journey(&self, session: &SessionId) -> ProgressRecord {
        self.store.update(session, |slot| {
            slot.clear();
            slot.record.start();
            slot.record.clone()
        })
    }

    /// Ask to view `stage`. An allowed Bitwise entry remembers the operands
    /// it shows so the answer can be checked against them later.
    pub fn enter_stage(&self, session: &SessionId, stage: StageId) -> Admission {
        self.enter_stage_with(session, stage, &mut rand::thread_rng())
    }

    pub fn enter_stage_with<R: Rng + ?Sized>(
        &self,
        session: &SessionId,
        stage: StageId,
        rng: &mut R,
    ) -> Admission {
        let entered = self.store.update_existing(session, |slot| {
            let admission = QuestEngine::enter(&slot.record, stage, &mut *rng);
            if let Admission::Allowed(PuzzleChallenge::Bitwise(challenge)) = &admission {
                slot.pending = Some(*challenge);
            }
            admission
        });
        entered.unwrap_or_else(|| QuestEngine::enter(&ProgressRecord::default(), stage, rng))
    }

    /// Submit an answer to `stage`.
    ///
    /// After an incorrect answer the stage is presented again; for Bitwise
    /// that means new operands, which replace the pending ones.
    pub fn submit_answer(
        &self,
        session: &SessionId,
        stage: StageId,
        answer: Option<&str>,
    ) -> SubmitOutcome {
        self.submit_answer_with(session, stage, answer, &mut rand::thread_rng())
    }

    pub fn submit_answer_with<R: Rng + ?Sized>(
        &self,
        session: &SessionId,
        stage: StageId,
        answer: Option<&str>,
        rng: &mut R,
    ) -> SubmitOutcome {
        let submitted = self.store.update_existing(session, |slot| {
            let was_completed = slot.record.is_completed(stage);
            let (record, verdict) =
                QuestEngine::submit(&slot.record, stage, answer, slot.pending.as_ref());

            let challenge = match verdict {
                Verdict::Incorrect(_) => {
                    let fresh = QuestEngine::present(stage, &mut *rng);
                    if let PuzzleChallenge::Bitwise(operands) = &fresh {
                        slot.pending = Some(*operands);
                    }
                    Some(fresh)
                }
                Verdict::Correct(_) | Verdict::Denied => None,
            };

            slot.record = record.clone();
            SubmitOutcome {
                verdict,
                newly_completed: !was_completed && record.is_completed(stage),
                record,
                challenge,
            }
        });

        submitted.unwrap_or_else(|| {
            // a fresh record never admits a submission
            let (record, verdict) =
                QuestEngine::submit(&ProgressRecord::default(), stage, answer, None);
            SubmitOutcome {
                verdict,
                record,
                challenge: None,
                newly_completed: false,
            }
        })
    }

    /// Ask to view the final reward.
    pub fn view_reward(&self, session: &SessionId) -> RewardAccess {
        if QuestEngine::can_view_reward(&self.store.get(session)) {
            RewardAccess::Allowed
        } else {
            RewardAccess::Denied
        }
    }

    /// Return the session to a brand-new record. Returns `true` if the
    /// session existed; an unknown session is already brand-new.
    pub fn reset_progress(&self, session: &SessionId) -> bool {
        self.store.reset(session)
    }

    /// Whether `session` is live in the store.
    pub fn has_session(&self, session: &SessionId) -> bool {
        self.store.contains(session)
    }

    /// Read the session's record without changing it.
    pub fn progress(&self, session: &SessionId) -> ProgressRecord {
        self.store.get(session)
    }

    /// Forget the session entirely.
    pub fn end_session(&self, session: &SessionId) -> bool {
        self.store.remove(session)
    }
}

// =============================================================================
// TESTS
// =============================================================================
