//! # API Endpoint Handlers
//!
//! Every handler resolves the visitor from the session cookie, asks the
//! quest facade for a decision and maps it to a status code:
//!
//! | Decision | Status |
//! |----------|--------|
//! | allowed / correct | 200 |
//! | denied | 403 with `redirect: "/"` |
//! | incorrect | 422 with a fresh challenge |
//! | unknown stage | 404 |
//!
//! Session tokens are never logged.

use super::{
    AppState,
    cookie::{session_cookie, session_from_headers},
    types::{
        AdminResetResponse, ErrorResponse, HealthResponse, ProgressResponse, RewardResponse,
        StageResponse, StagesResponse, SubmitRequest, SubmitResponse,
    },
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use heartquest_core::{
    Admission, ProgressRecord, ProgressStore, QuestEngine, SessionId, StageId, Verdict,
};

/// Parse a `{stage}` path segment, or build the 404 response.
fn parse_stage(raw: &str) -> Result<StageId, Response> {
    raw.parse::<StageId>().map_err(|e| {
        (StatusCode::NOT_FOUND, Json(ErrorResponse::new(e.to_string()))).into_response()
    })
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// JOURNEY HANDLERS
// =============================================================================

/// Start (or restart) the journey.
///
/// A cookie is only honoured if it names a live session; any other value
/// gets a freshly minted id, so clients cannot choose their own.
pub async fn start_journey_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = session_from_headers(&headers)
        .filter(|session| state.quest.has_session(session))
        .unwrap_or_else(SessionId::generate);
    let record = state.quest.start_journey(&session);
    tracing::info!(event = "journey_started", "Journey started");

    let mut response = (StatusCode::OK, Json(ProgressResponse::from(&record))).into_response();
    if let Some(cookie) = session_cookie(&session, state.settings.secure_cookie) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

/// Reset the caller's progress to a fresh record.
pub async fn reset_journey_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(session) = session_from_headers(&headers)
        && state.quest.reset_progress(&session)
    {
        tracing::info!(event = "session_reset", source = "visitor", "Progress reset");
    }
    (
        StatusCode::OK,
        Json(ProgressResponse::from(&ProgressRecord::default())),
    )
}

/// Progress summary for the caller.
pub async fn progress_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let record = session_from_headers(&headers)
        .map(|session| state.quest.progress(&session))
        .unwrap_or_default();
    (StatusCode::OK, Json(ProgressResponse::from(&record)))
}

// =============================================================================
// STAGE HANDLERS
// =============================================================================

/// View a stage.
pub async fn stage_view_handler(
    State(state): State<AppState>,
    Path(raw_stage): Path<String>,
    headers: HeaderMap,
) -> Response {
    let stage = match parse_stage(&raw_stage) {
        Ok(stage) => stage,
        Err(response) => return response,
    };

    let admission = match session_from_headers(&headers) {
        Some(session) => state.quest.enter_stage(&session, stage),
        None => Admission::Denied,
    };

    match admission {
        Admission::Allowed(challenge) => (
            StatusCode::OK,
            Json(StageResponse::allowed(stage, &challenge)),
        )
            .into_response(),
        Admission::Denied => {
            tracing::info!(event = "access_denied", stage = %stage, "Locked stage requested");
            (StatusCode::FORBIDDEN, Json(StageResponse::denied(stage))).into_response()
        }
    }
}

/// Submit an answer to a stage.
///
/// A missing or malformed body counts as an empty answer.
pub async fn stage_submit_handler(
    State(state): State<AppState>,
    Path(raw_stage): Path<String>,
    headers: HeaderMap,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Response {
    let stage = match parse_stage(&raw_stage) {
        Ok(stage) => stage,
        Err(response) => return response,
    };

    let Some(session) = session_from_headers(&headers) else {
        tracing::info!(event = "access_denied", stage = %stage, "Submission without session");
        return (
            StatusCode::FORBIDDEN,
            Json(SubmitResponse::denied(stage, &ProgressRecord::default())),
        )
            .into_response();
    };

    let request = body.map(|Json(request)| request).unwrap_or_default();
    let outcome = state
        .quest
        .submit_answer(&session, stage, request.answer.as_deref());

    match outcome.verdict {
        Verdict::Correct(advance) => {
            if outcome.newly_completed {
                state.metrics.record_completion(stage);
                tracing::info!(
                    event = "stage_completed",
                    stage = %stage,
                    pieces = %outcome.record.pieces_label(),
                    "Stage completed"
                );
            }
            (
                StatusCode::OK,
                Json(SubmitResponse::correct(stage, advance, &outcome.record)),
            )
                .into_response()
        }
        Verdict::Incorrect(reason) => {
            state.metrics.record_rejection();
            tracing::info!(
                event = "answer_rejected",
                stage = %stage,
                reason = ?reason,
                "Incorrect answer"
            );
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(SubmitResponse::incorrect(
                    stage,
                    reason,
                    outcome.challenge.as_ref(),
                    &outcome.record,
                )),
            )
                .into_response()
        }
        Verdict::Denied => {
            tracing::info!(event = "access_denied", stage = %stage, "Submission to locked stage");
            (
                StatusCode::FORBIDDEN,
                Json(SubmitResponse::denied(stage, &outcome.record)),
            )
                .into_response()
        }
    }
}

// =============================================================================
// REWARD HANDLER
// =============================================================================

/// View the final reward.
pub async fn reward_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(session) = session_from_headers(&headers) else {
        return (
            StatusCode::FORBIDDEN,
            Json(RewardResponse::denied(&ProgressRecord::default())),
        )
            .into_response();
    };

    // decision and body come from the same snapshot
    let record = state.quest.progress(&session);
    if QuestEngine::can_view_reward(&record) {
        state.metrics.record_reward();
        tracing::info!(event = "reward_viewed", "Reward viewed");
        (StatusCode::OK, Json(RewardResponse::allowed(&record))).into_response()
    } else {
        tracing::info!(event = "access_denied", stage = "reward", "Reward locked");
        (StatusCode::FORBIDDEN, Json(RewardResponse::denied(&record))).into_response()
    }
}

// =============================================================================
// CATALOGUE & METRICS
// =============================================================================

/// The ordered stage catalogue.
pub async fn stages_handler() -> impl IntoResponse {
    Json(StagesResponse::default())
}

/// Prometheus metrics.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(state.quest.store().len()),
    )
}

// =============================================================================
// ADMIN HANDLERS
// =============================================================================

/// Reset any session by id. Guarded by the API key middleware.
pub async fn admin_reset_handler(
    State(state): State<AppState>,
    Path(raw_session): Path<String>,
) -> Response {
    let Ok(session) = SessionId::parse(&raw_session) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid session identifier")),
        )
            .into_response();
    };

    let existed = state.quest.reset_progress(&session);
    tracing::info!(
        event = "session_reset",
        source = "operator",
        existed,
        "Progress reset by operator"
    );

    (
        StatusCode::OK,
        Json(AdminResetResponse {
            success: true,
            existed,
            progress: ProgressResponse::from(&ProgressRecord::default()),
        }),
    )
        .into_response()
}
