//! # HeartQuest HTTP API Module
//!
//! This module implements the HTTP JSON API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /journey/start` - Start the journey (mints the session cookie)
//! - `POST /journey/reset` - Reset the caller's progress
//! - `GET /progress` - Progress summary in heart pieces
//! - `GET /quest/{stage}` - View a stage (403 when locked)
//! - `POST /quest/{stage}` - Submit an answer
//! - `GET /reward` - View the reward (403 until every stage is done)
//! - `GET /stages` - Stage catalogue
//! - `POST /admin/sessions/{id}/reset` - Operator reset (API key)
//! - `GET /metrics` - Prometheus metrics
//!
//! Security knobs (CORS, rate limit, API key) come from [`Settings`].

mod auth;
mod cookie;
mod handlers;
mod metrics;
mod middleware;
mod types;

// Re-exports for integration tests (via `heartquest::api::*`)
pub use cookie::SESSION_COOKIE;
pub use metrics::QuestMetrics;
pub use types::{
    AdminResetResponse, ChallengeJson, ErrorResponse, HealthResponse, ProgressResponse,
    RewardResponse, StageFlag, StageInfo, StageResponse, StagesResponse, SubmitRequest,
    SubmitResponse,
};

use crate::config::Settings;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use heartquest_core::{MemoryStore, ProgressStore, Quest, QuestError};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Request body limit (64 KiB).
const MAX_BODY_BYTES: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    pub quest: Arc<Quest<MemoryStore>>,
    pub settings: Arc<Settings>,
    pub metrics: Arc<QuestMetrics>,
}

impl AppState {
    /// Create state with an empty session store.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            quest: Arc::new(Quest::new(MemoryStore::new())),
            settings: Arc::new(settings),
            metrics: Arc::new(QuestMetrics::new()),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from `Settings::cors_origins`.
///
/// - `"*"`: allows all origins
/// - unset: localhost only
/// - otherwise: comma-separated list of allowed origins
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (HEARTQUEST_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                restricted_cors(allowed)
            }
        }
        None => build_localhost_cors(),
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();
    restricted_cors(origins)
}

/// Cookies must flow, so credentials are allowed for explicit origins.
fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
/// 5. Authentication - `/admin` routes only
pub fn create_router(state: AppState) -> Router {
    let settings = Arc::clone(&state.settings);
    let cors = build_cors_layer(settings.cors_origins.as_deref());

    if settings.api_key.is_some() {
        tracing::info!("API key authentication enabled for /admin");
    } else {
        tracing::warn!("No API key configured: /admin routes will reject every request");
    }

    let admin = Router::new()
        .route(
            "/admin/sessions/{id}/reset",
            post(handlers::admin_reset_handler),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::api_key_auth_middleware,
        ));

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/journey/start", post(handlers::start_journey_handler))
        .route("/journey/reset", post(handlers::reset_journey_handler))
        .route("/progress", get(handlers::progress_handler))
        .route(
            "/quest/{stage}",
            get(handlers::stage_view_handler).post(handlers::stage_submit_handler),
        )
        .route("/reward", get(handlers::reward_handler))
        .route("/stages", get(handlers::stages_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .merge(admin);

    match middleware::create_rate_limiter(settings.rate_limit) {
        Some(limiter) => {
            tracing::info!("Rate limiting enabled: {} requests/second", settings.rate_limit);
            router = router.layer(axum_middleware::from_fn_with_state(
                limiter,
                middleware::rate_limit_middleware,
            ));
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SESSION REAPER
// =============================================================================

/// Periodically drop sessions idle for longer than `idle`.
pub fn spawn_session_reaper(
    quest: Arc<Quest<MemoryStore>>,
    idle: Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let purged = quest.store().purge_idle(idle);
            if purged > 0 {
                tracing::info!(
                    event = "sessions_purged",
                    purged,
                    remaining = quest.store().len(),
                    "Purged idle sessions"
                );
            }
        }
    })
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Start the HTTP server and the session reaper.
pub async fn run_server(settings: Settings) -> Result<(), QuestError> {
    let addr = settings.addr();
    let state = AppState::new(settings);
    let reaper = spawn_session_reaper(
        Arc::clone(&state.quest),
        state.settings.session_idle(),
        state.settings.reaper_interval(),
    );
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| QuestError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("HeartQuest HTTP server listening on {}", addr);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| QuestError::IoError(format!("Server error: {}", e)));

    reaper.abort();
    served
}
