use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::api::{
    state::AppState,
    types::{ApiError, AppendRequest, CreatedSession, HealthResponse},
};
use crate::engine::AnalysisSnapshot;
use crate::session::SessionView;

type ApiResult<T> = std::result::Result<T, ApiError>;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.uptime_seconds(),
        open_sessions: state.store.len(),
    })
}

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<CreatedSession>)> {
    let view = state.store.create()?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedSession {
            id: view.id,
            snapshot: view.snapshot,
        }),
    ))
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    Ok(Json(state.store.view(id)?))
}

/// POST /api/sessions/:id/outcomes
pub async fn append_outcome(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AppendRequest>,
) -> ApiResult<Json<AnalysisSnapshot>> {
    Ok(Json(state.store.append(id, &req.symbol)?))
}

/// POST /api/sessions/:id/undo
pub async fn undo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AnalysisSnapshot>> {
    Ok(Json(state.store.undo(id)?))
}

/// POST /api/sessions/:id/clear
pub async fn clear(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AnalysisSnapshot>> {
    Ok(Json(state.store.clear(id)?))
}

/// DELETE /api/sessions/:id
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.store.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}
