use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};

use crate::auth::AdminSession;
use crate::models::{GivingSettings, GIVING_DOC_ID, SETTINGS};
use crate::AppState;

/// Read the singleton giving-details document. Absent document means a
/// blank form, not an error.
pub async fn load_giving(
    State(state): State<AppState>,
    _session: AdminSession,
) -> impl IntoResponse {
    match state.store.get(SETTINGS, GIVING_DOC_ID).await {
        Ok(Some(doc)) => match doc.parse::<GivingSettings>() {
            Ok(settings) => AxumJson(settings).into_response(),
            Err(e) => {
                tracing::error!("Giving settings parse error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Store Error").into_response()
            }
        },
        Ok(None) => AxumJson(GivingSettings::default()).into_response(),
        Err(e) => {
            tracing::error!("Giving settings load error: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Store Error").into_response()
        }
    }
}

/// Upsert the giving details under the fixed settings key. No history is
/// kept.
pub async fn save_giving(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(settings): Json<GivingSettings>,
) -> impl IntoResponse {
    let record = match serde_json::to_value(&settings) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("Giving settings encode error: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Store Error").into_response();
        }
    };
    match state.store.set(SETTINGS, GIVING_DOC_ID, record).await {
        Ok(()) => AxumJson(serde_json::json!({ "status": "saved" })).into_response(),
        Err(e) => {
            tracing::error!("Giving settings save error: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Store Error").into_response()
        }
    }
}
