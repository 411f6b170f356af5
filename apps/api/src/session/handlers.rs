use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::report::MatchReport;
use crate::models::identity::Identity;
use crate::models::profile::UserProfile;
use crate::session::machine::{ApplyOutcome, SessionView};
use crate::session::store::{load_profile, save_profile, Category};
use crate::session::SwipeSession;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DecideRequest {
    pub like: bool,
}

#[derive(Deserialize)]
pub struct ApplyRequest {
    pub job_id: String,
}

#[derive(Serialize)]
pub struct ApplyResponse {
    pub outcome: ApplyOutcome,
    pub view: SessionView,
}

async fn started_session(
    state: &AppState,
    identity: &Identity,
) -> Result<Arc<SwipeSession>, AppError> {
    state
        .sessions
        .get(identity)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No session started for '{identity}'")))
}

// ────────────────────────────────────────────────────────────────────────────
// Profiles
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/profiles/:identity
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    let identity = Identity::new(&raw);
    load_profile(state.store.as_ref(), &identity)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No profile saved for '{identity}'")))
}

/// PUT /api/v1/profiles/:identity
pub async fn handle_put_profile(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<UserProfile>, AppError> {
    let identity = Identity::new(&raw);
    save_profile(state.store.as_ref(), &identity, &profile).await?;
    Ok(Json(profile))
}

/// DELETE /api/v1/profiles/:identity
pub async fn handle_delete_profile(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<StatusCode, AppError> {
    let identity = Identity::new(&raw);
    state.store.clear(&identity, Category::Profile).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Sessions
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:identity/start
pub async fn handle_start(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Json<SessionView> {
    let session = state.sessions.get_or_create(&Identity::new(&raw)).await;
    Json(session.start().await)
}

/// GET /api/v1/sessions/:identity
pub async fn handle_view(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let session = started_session(&state, &Identity::new(&raw)).await?;
    Ok(Json(session.current().await))
}

/// POST /api/v1/sessions/:identity/decide
pub async fn handle_decide(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Json(req): Json<DecideRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = started_session(&state, &Identity::new(&raw)).await?;
    Ok(Json(session.decide(req.like).await))
}

/// POST /api/v1/sessions/:identity/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Json(req): Json<ApplyRequest>,
) -> Result<Json<ApplyResponse>, AppError> {
    let job_id = req.job_id.trim();
    if job_id.is_empty() {
        return Err(AppError::Validation("job_id must not be empty".to_string()));
    }
    let session = started_session(&state, &Identity::new(&raw)).await?;
    let outcome = session.apply_to(job_id).await;
    Ok(Json(ApplyResponse {
        outcome,
        view: session.view().await,
    }))
}

/// POST /api/v1/sessions/:identity/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let session = started_session(&state, &Identity::new(&raw)).await?;
    Ok(Json(session.reset().await))
}

async fn build_session_report(state: &AppState, raw: &str) -> Result<MatchReport, AppError> {
    let identity = Identity::new(raw);
    let session = started_session(state, &identity).await?;
    let profile = load_profile(state.store.as_ref(), &identity)
        .await?
        .unwrap_or_default();
    Ok(session.report(&profile, state.scorer.as_ref()).await)
}

/// GET /api/v1/sessions/:identity/report
pub async fn handle_report(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<MatchReport>, AppError> {
    Ok(Json(build_session_report(&state, &raw).await?))
}

/// GET /api/v1/sessions/:identity/report/text
///
/// Plain-text export, the same content the share/copy action produces.
pub async fn handle_report_text(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<String, AppError> {
    Ok(build_session_report(&state, &raw).await?.to_text())
}
