use anyhow::Context as _;

use foodgram_auth_types::identity::TokenSecret;
use foodgram_auth_types::token::issue_token;
use foodgram_domain::user::normalize_email;
use foodgram_domain::validation::FieldErrors;

use crate::domain::repository::UserRepository;
use crate::error::ApiError;
use crate::infra::password::verify_password;

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
    pub secret: TokenSecret,
}

impl<R: UserRepository> LoginUseCase<R> {
    /// Exchange email + password for a signed auth token.
    pub async fn execute(&self, input: LoginInput) -> Result<String, ApiError> {
        let mut errors = FieldErrors::new();
        let email = errors.require("email", input.email);
        let password = errors.require("password", input.password);
        errors.into_result()?;

        let user = self
            .repo
            .find_by_email(&normalize_email(&email))
            .await?
            .ok_or(ApiError::InvalidCredentials)?;
        if !verify_password(&password, &user.password_hash).await? {
            return Err(ApiError::InvalidCredentials);
        }
        let (token, _) = issue_token(user.id, &self.secret.0).context("issue auth token")?;
        tracing::debug!(user_id = user.id, "issued auth token");
        Ok(token)
    }
}
