use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::Identity;

use crate::error::ApiError;
use crate::handlers::extract::Json;
use crate::state::AppState;
use crate::usecase::auth::{LoginInput, LoginUseCase};

// ── POST /api/auth/token/login/ ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let usecase = LoginUseCase {
        repo: state.user_repo(),
        secret: state.token_secret.clone(),
    };
    let auth_token = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(TokenResponse { auth_token }))
}

// ── POST /api/auth/token/logout/ ─────────────────────────────────────────────

/// Tokens are stateless; the client drops its copy.
pub async fn logout(identity: Identity) -> StatusCode {
    tracing::debug!(user_id = identity.user_id, "logout");
    StatusCode::NO_CONTENT
}
