use std::collections::HashMap;

use axum::{
    extract::multipart::{Multipart, MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::intake::{FormFile, IntakeError};

pub mod admin;
pub mod devotionals;
pub mod events;
pub mod pages;
pub mod prayers;
pub mod sermons;
pub mod settings;
pub mod testimonies;

/// Map an intake failure onto the write-path error contract: validation is
/// the caller's fault, a rejected upload is an upstream failure, anything
/// else is a store failure. All are logged here.
pub(crate) fn intake_error_response(operation: &str, err: IntakeError) -> Response {
    match err {
        IntakeError::MissingField(field) => {
            (StatusCode::BAD_REQUEST, format!("{} is required", field)).into_response()
        }
        IntakeError::UnknownCollection(name) => {
            (StatusCode::NOT_FOUND, format!("unknown collection: {}", name)).into_response()
        }
        IntakeError::Upload(e) => {
            tracing::error!("{} upload error: {:#}", operation, e);
            (StatusCode::BAD_GATEWAY, "Image upload failed").into_response()
        }
        IntakeError::Store(e) => {
            tracing::error!("{} store error: {:#}", operation, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Store Error").into_response()
        }
    }
}

/// Drain a multipart form into its text fields plus at most one file under
/// `file_field`. An empty file part counts as "no file selected".
pub(crate) async fn collect_multipart(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<(HashMap<String, String>, Option<FormFile>), MultipartError> {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == file_field {
            let file_name = field
                .file_name()
                .unwrap_or("upload")
                .to_string();
            let bytes = field.bytes().await?;
            if !bytes.is_empty() {
                file = Some((file_name, bytes.to_vec()));
            }
        } else {
            fields.insert(name, field.text().await?);
        }
    }

    Ok((fields, file))
}

pub(crate) fn bad_multipart(err: MultipartError) -> Response {
    tracing::error!("Multipart read error: {}", err);
    (StatusCode::BAD_REQUEST, "Malformed form data").into_response()
}
