use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};
use serde::Deserialize;

use crate::auth::AdminSession;
use crate::AppState;

/// Hard delete of any record in a mutable collection. The confirmation
/// dialog is the dashboard's concern; the caller re-syncs the affected
/// region and the stats panel afterwards.
pub async fn delete_item(
    Path((collection, id)): Path<(String, String)>,
    State(state): State<AppState>,
    _session: AdminSession,
) -> impl IntoResponse {
    match state.intake.delete_item(&collection, &id).await {
        Ok(()) => AxumJson(serde_json::json!({ "status": "deleted", "id": id })).into_response(),
        Err(e) => super::intake_error_response("delete item", e),
    }
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Patch only the status field (testimony approval path).
pub async fn update_status(
    Path((collection, id)): Path<(String, String)>,
    State(state): State<AppState>,
    _session: AdminSession,
    Json(req): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    match state.intake.update_status(&collection, &id, &req.status).await {
        Ok(()) => AxumJson(serde_json::json!({ "status": "updated", "id": id })).into_response(),
        Err(e) => super::intake_error_response("update status", e),
    }
}

pub async fn stats(State(state): State<AppState>, _session: AdminSession) -> impl IntoResponse {
    match state.sync.stats().await {
        Ok(stats) => AxumJson(stats).into_response(),
        Err(e) => {
            tracing::error!("Stats query error: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Store Error").into_response()
        }
    }
}
