//! Caller identity extractors backed by the `Authorization` header.
//!
//! Accepted schemes: `Token <jwt>` and `Bearer <jwt>`.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use http::header::AUTHORIZATION;
use http::request::Parts;

use crate::token::validate_token;

/// HMAC secret used to validate auth tokens. Provide it from app state via `FromRef`.
#[derive(Clone)]
pub struct TokenSecret(pub Arc<str>);

impl TokenSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }
}

/// Authenticated caller. Rejects with 401 when the header is absent or invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
}

/// Optional caller: `None` when no `Authorization` header is sent.
/// A header that is present but invalid still rejects with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
    pub fn user_id(&self) -> Option<i32> {
        self.0.map(|identity| identity.user_id)
    }
}

/// Why an identity could not be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    #[error("authentication credentials were not provided")]
    Missing,
    #[error("invalid token")]
    InvalidToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": "UNAUTHORIZED",
            "message": self.to_string(),
        });
        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

/// Result of inspecting the header: `Ok(None)` when absent.
fn identity_from_parts(parts: &Parts, secret: &str) -> Result<Option<Identity>, AuthRejection> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthRejection::InvalidToken)?;
    let token = value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AuthRejection::InvalidToken)?;
    let info = validate_token(token, secret).map_err(|e| {
        tracing::debug!(error = %e, "rejected auth token");
        AuthRejection::InvalidToken
    })?;
    Ok(Some(Identity {
        user_id: info.user_id,
    }))
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    TokenSecret: FromRef<S>,
{
    type Rejection = AuthRejection;

    // Header inspection is synchronous; the returned future owns its result.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = TokenSecret::from_ref(state);
        let result = identity_from_parts(parts, &secret.0)
            .and_then(|identity| identity.ok_or(AuthRejection::Missing));
        async move { result }
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
    TokenSecret: FromRef<S>,
{
    type Rejection = AuthRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = TokenSecret::from_ref(state);
        let result = identity_from_parts(parts, &secret.0).map(MaybeIdentity);
        async move { result }
    }
}
