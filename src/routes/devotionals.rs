use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};
use serde::Deserialize;

use crate::auth::AdminSession;
use crate::intake::DevotionalForm;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateDevotionalRequest {
    pub date: String,
    pub title: String,
    pub scripture: String,
    pub content: String,
}

pub async fn create_devotional(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(req): Json<CreateDevotionalRequest>,
) -> impl IntoResponse {
    let form = DevotionalForm {
        date: req.date,
        title: req.title,
        scripture: req.scripture,
        content: req.content,
    };
    match state.intake.submit_devotional(form).await {
        Ok(id) => (
            StatusCode::CREATED,
            AxumJson(serde_json::json!({ "status": "created", "id": id })),
        )
            .into_response(),
        Err(e) => super::intake_error_response("create devotional", e),
    }
}
