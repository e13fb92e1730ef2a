//! Auth helpers for tests.
//!
//! `MockAuth` signs a real token with a test secret so requests pass through the
//! `Identity` extractor without a login round-trip.

use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};

use foodgram_auth_types::identity::TokenSecret;
use foodgram_auth_types::token::issue_token;

/// Secret shared by test state and `MockAuth`.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: i32,
}

impl MockAuth {
    pub fn new(user_id: i32) -> Self {
        Self { user_id }
    }

    pub fn secret() -> TokenSecret {
        TokenSecret::new(TEST_JWT_SECRET)
    }

    /// `Authorization: Token <jwt>` for this user.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        let (token, _) = issue_token(self.user_id, TEST_JWT_SECRET).expect("sign test token");
        let value = HeaderValue::from_str(&format!("Token {token}")).expect("ascii token");
        (AUTHORIZATION, value)
    }
}
