//! HTTP routes of the review server.
//!
//! Plan mode exposes content, approve, deny and save. Annotate mode swaps
//! approve for the feedback routes. Anything else, including a known path
//! with the wrong method, falls back to the SPA shell.

use crate::decision::{Decision, DecisionGate};
use crate::paths::{validate_save_path, AllowedPaths};
use crate::server::activity::ActivityClock;
use crate::server::protocol::{Ack, ContentResponse, FeedbackRequest, SaveRequest, SaveResponse};
use crate::server::save::{self, SaveError};
use crate::server::shell::{security_headers, serve_shell};
use crate::session::{ReviewMode, ReviewSession};
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{Json, Response};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Shared by every handler.
pub struct AppState {
    pub session: ReviewSession,
    pub gate: DecisionGate,
    pub allowed_save_paths: AllowedPaths,
    pub activity: ActivityClock,
}

impl AppState {
    pub fn new(session: ReviewSession, allowed_save_paths: AllowedPaths) -> Self {
        Self {
            session,
            gate: DecisionGate::new(),
            allowed_save_paths,
            activity: ActivityClock::new(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/api/content", get(content).fallback(serve_shell))
        .route("/api/plan", get(content).fallback(serve_shell))
        .route("/api/deny", post(deny).fallback(serve_shell))
        .route("/api/save", post(save_note).fallback(serve_shell));

    app = match state.session.mode {
        ReviewMode::PlanReview => {
            app.route("/api/approve", post(approve).fallback(serve_shell))
        }
        ReviewMode::Annotate => app
            .route("/api/feedback", post(deny).fallback(serve_shell))
            .route("/api/send-annotations", post(deny).fallback(serve_shell)),
    };

    let mut app = app
        .fallback(serve_shell)
        .layer(middleware::from_fn_with_state(state.clone(), track_activity))
        .layer(TraceLayer::new_for_http());

    for (name, value) in security_headers() {
        app = app.layer(SetResponseHeaderLayer::overriding(name, value));
    }

    app.with_state(state)
}

async fn track_activity(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    state.activity.touch();
    next.run(request).await
}

async fn content(State(state): State<Arc<AppState>>) -> Json<ContentResponse> {
    Json(ContentResponse::from(&state.session))
}

async fn approve(State(state): State<Arc<AppState>>) -> Json<Ack> {
    if state.gate.resolve(Decision::approve()) {
        tracing::info!("Plan approved");
    } else {
        tracing::debug!("Decision already made, ignoring approve");
    }
    Json(Ack::ok())
}

/// Deny (plan mode) or send feedback (annotate mode). A body that is not
/// valid JSON still resolves, with the mode's default feedback.
async fn deny(State(state): State<Arc<AppState>>, body: Bytes) -> Json<Ack> {
    let feedback = serde_json::from_slice::<FeedbackRequest>(&body)
        .ok()
        .and_then(|request| request.feedback_text())
        .unwrap_or_else(|| state.session.mode.default_feedback().to_string());

    if state.gate.resolve(Decision::deny(feedback)) {
        tracing::info!("Changes requested");
    } else {
        tracing::debug!("Decision already made, ignoring feedback");
    }
    Json(Ack::ok())
}

/// Save a note. Never touches the decision.
async fn save_note(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, Json<SaveResponse>) {
    let request: SaveRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("Invalid save payload: {e}");
            return bad_request("Invalid JSON payload");
        }
    };

    let Some(raw_path) = request.path.as_deref().map(str::trim).filter(|p| !p.is_empty()) else {
        return bad_request("Field 'path' is required");
    };

    let target = match validate_save_path(raw_path, &state.allowed_save_paths) {
        Ok(target) => target,
        Err(rejection) => {
            tracing::warn!("Rejected save path: {rejection}");
            return bad_request(rejection.to_string());
        }
    };

    let content = request.content.as_deref().unwrap_or_default();
    match save::write_note(&target, content, &state.allowed_save_paths).await {
        Ok(written) => {
            tracing::info!("Saved note to {}", written.display());
            (StatusCode::OK, Json(SaveResponse::saved(&written)))
        }
        Err(SaveError::Rejected(rejection)) => bad_request(rejection.to_string()),
        Err(e) => {
            tracing::error!("Save failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SaveResponse::failed(e.to_string())),
            )
        }
    }
}

fn bad_request(error: impl Into<String>) -> (StatusCode, Json<SaveResponse>) {
    (StatusCode::BAD_REQUEST, Json(SaveResponse::failed(error)))
}
