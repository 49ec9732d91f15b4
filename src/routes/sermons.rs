use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};
use serde::Deserialize;

use crate::auth::AdminSession;
use crate::intake::SermonForm;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSermonRequest {
    pub title: String,
    pub preacher: String,
    /// YYYY-MM-DD as entered on the publish form.
    pub date: String,
    #[serde(default)]
    pub youtube_link: String,
    #[serde(default)]
    pub mixlr_link: String,
}

pub async fn create_sermon(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(req): Json<CreateSermonRequest>,
) -> impl IntoResponse {
    let form = SermonForm {
        title: req.title,
        preacher: req.preacher,
        date: req.date,
        youtube_link: req.youtube_link,
        mixlr_link: req.mixlr_link,
    };
    match state.intake.submit_sermon(form).await {
        Ok(id) => (
            StatusCode::CREATED,
            AxumJson(serde_json::json!({ "status": "created", "id": id })),
        )
            .into_response(),
        Err(e) => super::intake_error_response("create sermon", e),
    }
}
