//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use heartquest::api::{
    ChallengeJson, HealthResponse, ProgressResponse, RewardResponse, StageInfo, StageResponse,
    StagesResponse, SubmitRequest, SubmitResponse,
};
use heartquest_core::{
    Advance, BitwiseChallenge, IncorrectReason, ProgressRecord, PuzzleChallenge, StageId,
    StageKind,
};
use serde_json::Value;

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_deserialization() {
    let json = r#"{"status":"healthy","version":"1.0.0"}"#;
    let health: HealthResponse = serde_json::from_str(json).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, "1.0.0");
}

// =============================================================================
// CHALLENGE TESTS
// =============================================================================

#[test]
fn test_challenge_json_is_tagged_by_kind() {
    let challenge = PuzzleChallenge::Bitwise(BitwiseChallenge::new(12, 10).unwrap());
    let value = serde_json::to_value(ChallengeJson::from(&challenge)).unwrap();
    assert_eq!(value["kind"], "bitwise");
    assert_eq!(value["a"], 12);
    assert_eq!(value["b"], 10);

    let value = serde_json::to_value(ChallengeJson::from(&PuzzleChallenge::ApiConnect)).unwrap();
    assert_eq!(value, serde_json::json!({ "kind": "api_connect" }));
}

#[test]
fn test_binary_challenge_carries_message() {
    let json = ChallengeJson::from(&PuzzleChallenge::binary());
    let ChallengeJson::Binary { message } = json else {
        panic!("expected binary challenge");
    };
    assert!(message.starts_with("01001001 "));
}

#[test]
fn test_core_challenge_serializes_like_json_form() {
    let challenge = PuzzleChallenge::ascii();
    let core = serde_json::to_value(&challenge).unwrap();
    let api = serde_json::to_value(ChallengeJson::from(&challenge)).unwrap();
    assert_eq!(core, api);
}

// =============================================================================
// PROGRESS TESTS
// =============================================================================

#[test]
fn test_progress_from_partial_record() {
    let record = ProgressRecord::from_flags(true, [StageId::Bitwise, StageId::Base64]);
    let progress = ProgressResponse::from(&record);

    assert!(progress.journey_started);
    assert_eq!(progress.completed_count, 2);
    assert_eq!(progress.pieces, "2/4 pieces");
    assert_eq!(progress.next_stage.as_deref(), Some("ascii"));
    assert!(!progress.reward_unlocked);
    let flags: Vec<bool> = progress.stages.iter().map(|f| f.completed).collect();
    assert_eq!(flags, [true, true, false, false]);
}

#[test]
fn test_progress_complete_record_unlocks_reward() {
    let progress = ProgressResponse::from(&ProgressRecord::from_flags(true, StageId::ALL));
    assert!(progress.reward_unlocked);
    assert!(progress.next_stage.is_none());
}

// =============================================================================
// STAGE & SUBMIT TESTS
// =============================================================================

#[test]
fn test_denied_stage_redirects_to_start() {
    let json = serde_json::to_value(StageResponse::denied(StageId::Ascii)).unwrap();
    assert_eq!(json["allowed"], false);
    assert_eq!(json["stage"], "ascii");
    assert_eq!(json["redirect"], "/");
    assert_eq!(json["challenge"], Value::Null);
}

#[test]
fn test_submit_request_answer_is_optional() {
    let empty: SubmitRequest = serde_json::from_str("{}").unwrap();
    assert!(empty.answer.is_none());
    let given: SubmitRequest = serde_json::from_str(r#"{"answer":"I love you"}"#).unwrap();
    assert_eq!(given.answer.as_deref(), Some("I love you"));
}

#[test]
fn test_submit_response_correct_terminal() {
    let record = ProgressRecord::from_flags(true, StageId::ALL);
    let response = SubmitResponse::correct(StageId::ApiConnect, Advance::Reward, &record);
    assert!(response.correct);
    assert!(response.reward_unlocked);
    assert!(response.next_stage.is_none());
}

#[test]
fn test_submit_response_incorrect_roundtrip() {
    let record = ProgressRecord::from_flags(true, [StageId::Bitwise]);
    let response = SubmitResponse::incorrect(
        StageId::Base64,
        IncorrectReason::WrongAnswer,
        Some(&PuzzleChallenge::binary()),
        &record,
    );
    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("\"reason\":\"wrong_answer\""));

    let back: SubmitResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(back.reason, Some(IncorrectReason::WrongAnswer));
    assert_eq!(back.error.as_deref(), Some("Incorrect answer! Try again."));
    assert_eq!(back.progress.pieces, "1/4 pieces");
}

// =============================================================================
// REWARD & CATALOGUE TESTS
// =============================================================================

#[test]
fn test_reward_denied_has_no_message() {
    let response = RewardResponse::denied(&ProgressRecord::default());
    assert!(!response.allowed);
    assert!(response.message.is_none());
    assert_eq!(response.redirect.as_deref(), Some("/"));
}

#[test]
fn test_stage_info_kinds() {
    let catalogue = StagesResponse::default();
    let kinds: Vec<StageKind> = catalogue.stages.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        [
            StageKind::Answer,
            StageKind::Answer,
            StageKind::Display,
            StageKind::Display
        ]
    );

    let json = serde_json::to_value(StageInfo::from(StageId::ApiConnect)).unwrap();
    assert_eq!(json["slug"], "api-connect");
    assert_eq!(json["kind"], "display");
    assert_eq!(json["order"], 4);
}
