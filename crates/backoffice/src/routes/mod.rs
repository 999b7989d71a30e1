//! HTTP entry points consumed by the presentation layer.
//!
//! Reads return JSON rows plus a total page count; mutations accept
//! multipart form submissions and answer with either a redirect to the
//! resource's listing route or a soft `{errors?, message?}` body the form
//! re-renders from. Read failures surface as real HTTP errors; mutation
//! failures never do - the forms only know how to re-render soft bodies.

pub mod customers;
pub mod products;

use axum::{
    Json, Router,
    extract::multipart::Field,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;

use crate::actions::{DeleteOutcome, MutationOutcome};
use crate::error::AppError;
use crate::forms::ImageUpload;
use crate::state::AppState;

/// Build the resource router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(customers::router())
        .merge(products::router())
}

/// Response body for delete mutations: `{ message? }`.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Convert a create/edit outcome into its HTTP shape.
pub(crate) fn mutation_response(outcome: MutationOutcome) -> Response {
    match outcome {
        MutationOutcome::Completed { redirect_to } => Redirect::to(redirect_to).into_response(),
        MutationOutcome::Invalid(errors) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
        }
        MutationOutcome::Failed(message) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(message)).into_response()
        }
    }
}

/// Convert a delete outcome into its HTTP shape.
pub(crate) fn delete_response(outcome: DeleteOutcome) -> Json<DeleteResponse> {
    match outcome {
        DeleteOutcome::Completed => Json(DeleteResponse { message: None }),
        DeleteOutcome::Failed(failure) => Json(DeleteResponse {
            message: Some(failure.message),
        }),
    }
}

/// Read an uploaded image out of a multipart field.
///
/// Browsers submit an empty file part when nothing was selected; that (and
/// any part without a filename) counts as no upload.
pub(crate) async fn read_image_field(field: Field<'_>) -> Result<Option<ImageUpload>, AppError> {
    let filename = match field.file_name() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Ok(None),
    };
    let content_type = field.content_type().map(String::from);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(Some(ImageUpload {
        filename,
        content_type,
        bytes: bytes.to_vec(),
    }))
}

/// Read a text field, treating read errors as bad requests.
pub(crate) async fn read_text_field(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}
