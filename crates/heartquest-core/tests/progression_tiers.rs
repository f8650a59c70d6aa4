//! # Progression Tier Tests (P0-P3)
//!
//! If ANY tier fails, the quest is NOT safely gated.
//!
//! ## Tiers
//! - P0: Admission
//! - P1: Puzzle Validation
//! - P2: Transitions & Idempotence
//! - P3: Full Journeys Through the Facade

use heartquest_core::{
    Admission, Advance, IncorrectReason, MemoryStore, ProgressRecord, PuzzleChallenge, Quest,
    QuestEngine, RewardAccess, SessionId, StageId, Verdict,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn session(name: &str) -> SessionId {
    SessionId::parse(name).expect("valid session id")
}

// =============================================================================
// TIER P0: ADMISSION
// =============================================================================

mod p0_admission {
    use super::*;

    /// P0.1: Nothing is enterable before the journey starts.
    #[test]
    fn nothing_opens_before_start() {
        let record = ProgressRecord::from_flags(false, StageId::ALL);
        for stage in StageId::ALL {
            assert!(!QuestEngine::can_enter(&record, stage), "{stage} opened");
        }
    }

    /// P0.2: Each stage opens exactly when its predecessor is complete.
    #[test]
    fn stages_open_one_at_a_time() {
        let mut record = ProgressRecord::new();
        record.start();

        for (i, stage) in StageId::ALL.iter().enumerate() {
            for later in &StageId::ALL[i + 1..] {
                assert!(!QuestEngine::can_enter(&record, *later));
            }
            assert!(QuestEngine::can_enter(&record, *stage));
            assert!(record.mark_completed(*stage));
        }
    }

    /// P0.3: Viewing and submitting share one admission rule.
    #[test]
    fn view_and_submit_agree() {
        let mut rng = StdRng::seed_from_u64(0);
        let record = ProgressRecord::from_flags(true, [StageId::Bitwise]);

        for stage in StageId::ALL {
            let viewable = QuestEngine::enter(&record, stage, &mut rng).is_allowed();
            let (_, verdict) = QuestEngine::submit(&record, stage, Some("i love you"), None);
            assert_eq!(viewable, verdict != Verdict::Denied, "{stage}");
        }
    }

    /// P0.4: The reward needs every stage.
    #[test]
    fn reward_needs_everything() {
        let partial = ProgressRecord::from_flags(
            true,
            [StageId::Bitwise, StageId::Base64, StageId::Ascii],
        );
        assert!(!QuestEngine::can_view_reward(&partial));

        let full = ProgressRecord::from_flags(true, StageId::ALL);
        assert!(QuestEngine::can_view_reward(&full));
    }
}

// =============================================================================
// TIER P1: PUZZLE VALIDATION
// =============================================================================

mod p1_validation {
    use super::*;

    /// P1.1: Base64 plaintext is compared case-insensitively after trimming.
    #[test]
    fn binary_phrase() {
        assert_eq!(
            QuestEngine::validate(StageId::Base64, Some("i love you"), None),
            Ok(())
        );
        assert_eq!(
            QuestEngine::validate(StageId::Base64, Some(" I Love You "), None),
            Ok(())
        );
        assert_eq!(
            QuestEngine::validate(StageId::Base64, Some("I love you!"), None),
            Err(IncorrectReason::WrongAnswer)
        );
    }

    /// P1.2: Missing input is incorrect, never a failure.
    #[test]
    fn missing_answers() {
        assert_eq!(
            QuestEngine::validate(StageId::Base64, None, None),
            Err(IncorrectReason::MissingAnswer)
        );
        assert_eq!(
            QuestEngine::validate(StageId::Bitwise, Some(""), None),
            Err(IncorrectReason::MissingAnswer)
        );
    }

    /// P1.3: Every presented Bitwise challenge is solved by its own XOR.
    #[test]
    fn presented_bitwise_solvable() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let PuzzleChallenge::Bitwise(shown) = QuestEngine::present(StageId::Bitwise, &mut rng)
            else {
                unreachable!("bitwise stage must present operands");
            };
            let answer = (shown.a ^ shown.b).to_string();
            assert_eq!(
                QuestEngine::validate(StageId::Bitwise, Some(&answer), Some(&shown)),
                Ok(())
            );
        }
    }
}

// =============================================================================
// TIER P2: TRANSITIONS & IDEMPOTENCE
// =============================================================================

mod p2_transitions {
    use super::*;

    /// P2.1: Each stage reports its successor; the last reports the reward.
    #[test]
    fn advance_chain() {
        assert_eq!(
            QuestEngine::advance_from(StageId::Bitwise),
            Advance::Stage(StageId::Base64)
        );
        assert_eq!(
            QuestEngine::advance_from(StageId::Base64),
            Advance::Stage(StageId::Ascii)
        );
        assert_eq!(
            QuestEngine::advance_from(StageId::Ascii),
            Advance::Stage(StageId::ApiConnect)
        );
        assert_eq!(
            QuestEngine::advance_from(StageId::ApiConnect),
            Advance::Reward
        );
    }

    /// P2.2: Correct answers on completed stages change nothing.
    #[test]
    fn completed_stage_resubmission() {
        let record = ProgressRecord::from_flags(true, [StageId::Bitwise, StageId::Base64]);
        let (after, verdict) =
            QuestEngine::submit(&record, StageId::Base64, Some("I love you"), None);
        assert_eq!(verdict, Verdict::Correct(Advance::Stage(StageId::Ascii)));
        assert_eq!(after, record);
    }

    /// P2.3: Wrong answers never change the record.
    #[test]
    fn wrong_answer_is_inert() {
        let record = ProgressRecord::from_flags(true, [StageId::Bitwise]);
        let (after, verdict) = QuestEngine::submit(&record, StageId::Base64, Some("nope"), None);
        assert!(matches!(verdict, Verdict::Incorrect(_)));
        assert_eq!(after, record);
    }
}

// =============================================================================
// TIER P3: FULL JOURNEYS
// =============================================================================

mod p3_journeys {
    use super::*;

    fn solve_bitwise(quest: &Quest<MemoryStore>, id: &SessionId) -> Verdict {
        let admission = quest.enter_stage(id, StageId::Bitwise);
        let Some(PuzzleChallenge::Bitwise(shown)) = admission.challenge() else {
            return Verdict::Denied;
        };
        let answer = shown.expected().to_string();
        quest.submit_answer(id, StageId::Bitwise, Some(&answer)).verdict
    }

    /// P3.1: Fresh session → start → Bitwise solved → Base64 next.
    #[test]
    fn first_stage_scenario() {
        let quest = Quest::new(MemoryStore::new());
        let id = session("first-stage");

        quest.start_journey(&id);
        assert_eq!(
            solve_bitwise(&quest, &id),
            Verdict::Correct(Advance::Stage(StageId::Base64))
        );

        let record = quest.progress(&id);
        assert!(record.is_completed(StageId::Bitwise));
        for stage in &StageId::ALL[1..] {
            assert!(!record.is_completed(*stage));
        }
    }

    /// P3.2: Without StartJourney the first stage is denied.
    #[test]
    fn unstarted_is_denied() {
        let quest = Quest::new(MemoryStore::new());
        let id = session("never-started");
        assert_eq!(quest.enter_stage(&id, StageId::Bitwise), Admission::Denied);
        assert_eq!(
            quest.submit_answer(&id, StageId::Bitwise, Some("1")).verdict,
            Verdict::Denied
        );
    }

    /// P3.3: All four stages → reward; reset → reward denied again.
    #[test]
    fn full_journey_then_reset() {
        let quest = Quest::new(MemoryStore::new());
        let id = session("full-journey");

        quest.start_journey(&id);
        assert!(solve_bitwise(&quest, &id).is_correct());
        assert!(quest.enter_stage(&id, StageId::Base64).is_allowed());
        assert!(
            quest
                .submit_answer(&id, StageId::Base64, Some("i love you"))
                .verdict
                .is_correct()
        );
        assert!(quest.submit_answer(&id, StageId::Ascii, None).verdict.is_correct());
        assert_eq!(
            quest.submit_answer(&id, StageId::ApiConnect, None).verdict,
            Verdict::Correct(Advance::Reward)
        );

        assert_eq!(quest.view_reward(&id), RewardAccess::Allowed);
        quest.reset_progress(&id);
        assert_eq!(quest.view_reward(&id), RewardAccess::Denied);
        assert_eq!(quest.progress(&id), ProgressRecord::default());
    }

    /// P3.4: Sessions never see each other's progress.
    #[test]
    fn sessions_are_independent() {
        let quest = Quest::new(MemoryStore::new());
        let alice = session("alice");
        let bob = session("bob");

        quest.start_journey(&alice);
        assert!(solve_bitwise(&quest, &alice).is_correct());

        assert!(!quest.progress(&bob).journey_started());
        assert_eq!(quest.enter_stage(&bob, StageId::Base64), Admission::Denied);
    }

    /// P3.5: Parallel double-submits on one session lose no progress.
    #[test]
    fn racing_submissions_keep_progress() {
        let quest = std::sync::Arc::new(Quest::new(MemoryStore::new()));
        let id = session("double-submit");
        quest.start_journey(&id);
        assert!(solve_bitwise(&quest, &id).is_correct());

        let workers: Vec<_> = (0..16)
            .map(|i| {
                let quest = std::sync::Arc::clone(&quest);
                let id = id.clone();
                std::thread::spawn(move || {
                    let answer = if i % 2 == 0 { "I love you" } else { "wrong" };
                    quest.submit_answer(&id, StageId::Base64, Some(answer)).verdict
                })
            })
            .collect();

        let correct = workers
            .into_iter()
            .map(|w| w.join().expect("worker panicked"))
            .filter(Verdict::is_correct)
            .count();

        assert_eq!(correct, 8);
        let record = quest.progress(&id);
        assert!(record.is_completed(StageId::Bitwise));
        assert!(record.is_completed(StageId::Base64));
    }
}
