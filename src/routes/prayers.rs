use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};
use serde::Deserialize;

use crate::intake::PrayerForm;
use crate::AppState;

#[derive(Deserialize)]
pub struct PrayerSubmission {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub request: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

pub async fn submit_prayer(
    State(state): State<AppState>,
    Json(req): Json<PrayerSubmission>,
) -> impl IntoResponse {
    let form = PrayerForm {
        name: req.name,
        phone: req.phone,
        request: req.request,
        kind: req.kind,
    };
    match state.intake.submit_prayer(form).await {
        Ok(id) => (
            StatusCode::CREATED,
            AxumJson(serde_json::json!({ "status": "created", "id": id })),
        )
            .into_response(),
        Err(e) => super::intake_error_response("submit prayer", e),
    }
}
