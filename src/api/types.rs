use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::AnalysisSnapshot;
use crate::error::CadenceError;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AppendRequest {
    pub symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedSession {
    pub id: Uuid,
    pub snapshot: AnalysisSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub open_sessions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// ============================================================================
// Error mapping
// ============================================================================

/// `CadenceError` as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub CadenceError);

impl From<CadenceError> for ApiError {
    fn from(err: CadenceError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CadenceError::InvalidSymbol(_) => StatusCode::BAD_REQUEST,
            CadenceError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            CadenceError::SessionLimitReached { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            tracing::debug!(error = %self.0, status = status.as_u16(), "request rejected");
        } else {
            tracing::warn!(error = %self.0, status = status.as_u16(), "request failed");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
