//! Body and query extractors whose rejections use the API error envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::QueryRejection;
use serde::Serialize;

use foodgram_domain::validation::FieldErrors;

use crate::error::ApiError;

/// Key for errors that cannot be pinned to a request field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// JSON body. Malformed or mistyped input becomes a 400 `VALIDATION_ERROR`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Query string with repeated keys collected into sequences (`tags=a&tags=b`).
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let errors = match &rejection {
            JsonRejection::JsonDataError(_) => deserialize_errors(&rejection.body_text()),
            _ => FieldErrors::single(NON_FIELD_ERRORS, rejection.body_text()),
        };
        tracing::debug!(rejection = %rejection.body_text(), "rejected request body");
        ApiError::Validation(errors)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(rejection = %rejection.body_text(), "rejected query string");
        ApiError::Validation(deserialize_errors(&rejection.body_text()))
    }
}

/// Split `"<context>: <path>: <message>"` into the top-level field of `path`
/// and the serde message. Errors without a path land under
/// [`NON_FIELD_ERRORS`].
fn deserialize_errors(body_text: &str) -> FieldErrors {
    let detail = body_text
        .split_once(": ")
        .map_or(body_text, |(_, detail)| detail);
    match detail.split_once(": ") {
        Some((path, message)) if !path.is_empty() && !path.contains(char::is_whitespace) => {
            FieldErrors::single(top_level_field(path), message)
        }
        _ => FieldErrors::single(NON_FIELD_ERRORS, detail),
    }
}

fn top_level_field(path: &str) -> &str {
    let end = path.find(['.', '[']).unwrap_or(path.len());
    &path[..end]
}
