use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};

use crate::intake::TestimonyForm;
use crate::AppState;

/// Public testimony submission with an optional photo. Records always enter
/// as pending; only an admin approval makes them publicly visible.
pub async fn submit_testimony(
    State(state): State<AppState>,
    multipart: Multipart,
) -> impl IntoResponse {
    let (mut fields, image) = match super::collect_multipart(multipart, "image").await {
        Ok(parts) => parts,
        Err(e) => return super::bad_multipart(e),
    };

    let form = TestimonyForm {
        name: fields.remove("name").unwrap_or_default(),
        content: fields.remove("content").unwrap_or_default(),
        image,
    };
    match state.intake.submit_testimony(form).await {
        Ok(id) => (
            StatusCode::CREATED,
            AxumJson(serde_json::json!({ "status": "created", "id": id })),
        )
            .into_response(),
        Err(e) => super::intake_error_response("submit testimony", e),
    }
}
