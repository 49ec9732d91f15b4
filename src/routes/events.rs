use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};

use crate::auth::AdminSession;
use crate::intake::EventForm;
use crate::AppState;

/// Event creation carries an optional flyer image, so the form arrives as
/// multipart. The image is uploaded to the media host before the record is
/// written; a failed upload aborts the whole submission.
pub async fn create_event(
    State(state): State<AppState>,
    _session: AdminSession,
    multipart: Multipart,
) -> impl IntoResponse {
    let (mut fields, image) = match super::collect_multipart(multipart, "image").await {
        Ok(parts) => parts,
        Err(e) => return super::bad_multipart(e),
    };

    let form = EventForm {
        title: fields.remove("title").unwrap_or_default(),
        date: fields.remove("date").unwrap_or_default(),
        description: fields.remove("description").unwrap_or_default(),
        image,
    };
    match state.intake.submit_event(form).await {
        Ok(id) => (
            StatusCode::CREATED,
            AxumJson(serde_json::json!({ "status": "created", "id": id })),
        )
            .into_response(),
        Err(e) => super::intake_error_response("create event", e),
    }
}
