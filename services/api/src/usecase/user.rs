use std::collections::HashSet;

use foodgram_domain::pagination::PageRequest;
use foodgram_domain::user::{
    MAX_NAME_LEN, normalize_email, validate_email, validate_username,
};
use foodgram_domain::validation::FieldErrors;

use crate::domain::repository::{SubscriptionRepository, UserRepository};
use crate::domain::types::{NewUser, User, UserView};
use crate::error::ApiError;
use crate::infra::password::{hash_password, verify_password};

/// Authors among `author_ids` the caller follows. Anonymous callers follow nobody.
pub async fn subscribed_among<S: SubscriptionRepository>(
    subscriptions: &S,
    caller: Option<i32>,
    author_ids: &[i32],
) -> Result<HashSet<i32>, ApiError> {
    match caller {
        Some(user_id) => subscriptions.following_among(user_id, author_ids).await,
        None => Ok(HashSet::new()),
    }
}

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

pub struct RegisterUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> RegisterUserUseCase<R> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<User, ApiError> {
        let mut errors = FieldErrors::new();
        let email = normalize_email(&errors.require("email", input.email));
        let username = errors.require("username", input.username);
        let first_name = errors.require("first_name", input.first_name);
        let last_name = errors.require("last_name", input.last_name);
        let password = errors.require("password", input.password);

        if !email.is_empty() {
            errors.check(validate_email(&email), "email", "enter a valid email address");
        }
        if !username.is_empty() {
            errors.check(
                validate_username(&username),
                "username",
                "enter a valid username: letters, digits and @/./+/-/_ only",
            );
        }
        for (field, value) in [("first_name", &first_name), ("last_name", &last_name)] {
            errors.check(
                value.chars().count() <= MAX_NAME_LEN,
                field,
                format!("ensure this field has no more than {MAX_NAME_LEN} characters"),
            );
        }
        errors.into_result()?;

        let mut errors = FieldErrors::new();
        if self.repo.username_taken(&username).await? {
            errors.add("username", "a user with that username already exists");
        }
        if self.repo.email_taken(&email).await? {
            errors.add("email", "a user with that email already exists");
        }
        errors.into_result()?;

        let user = self
            .repo
            .create(&NewUser {
                username,
                email,
                first_name,
                last_name,
                password_hash: hash_password(&password).await?,
            })
            .await?;
        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository, S: SubscriptionRepository> {
    pub users: U,
    pub subscriptions: S,
}

impl<U: UserRepository, S: SubscriptionRepository> GetUserUseCase<U, S> {
    pub async fn execute(&self, caller: Option<i32>, user_id: i32) -> Result<UserView, ApiError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let followed = subscribed_among(&self.subscriptions, caller, &[user.id]).await?;
        Ok(UserView {
            is_subscribed: followed.contains(&user.id),
            user,
        })
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository, S: SubscriptionRepository> {
    pub users: U,
    pub subscriptions: S,
}

impl<U: UserRepository, S: SubscriptionRepository> ListUsersUseCase<U, S> {
    pub async fn execute(
        &self,
        caller: Option<i32>,
        page: PageRequest,
    ) -> Result<(Vec<UserView>, u64), ApiError> {
        let (users, count) = self.users.list(page).await?;
        let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
        let followed = subscribed_among(&self.subscriptions, caller, &ids).await?;
        let views = users
            .into_iter()
            .map(|user| UserView {
                is_subscribed: followed.contains(&user.id),
                user,
            })
            .collect();
        Ok((views, count))
    }
}

// ── SetPassword ──────────────────────────────────────────────────────────────

pub struct SetPasswordInput {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub struct SetPasswordUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> SetPasswordUseCase<R> {
    pub async fn execute(&self, user_id: i32, input: SetPasswordInput) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        let current = errors.require("current_password", input.current_password);
        let new = errors.require("new_password", input.new_password);
        errors.into_result()?;

        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if !verify_password(&current, &user.password_hash).await? {
            return Err(ApiError::field("current_password", "wrong password"));
        }
        self.repo
            .update_password(user_id, &hash_password(&new).await?)
            .await?;
        tracing::info!(user_id, "password changed");
        Ok(())
    }
}
