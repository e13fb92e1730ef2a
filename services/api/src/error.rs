use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use foodgram_domain::validation::FieldErrors;

/// API error variants. Authentication failures are rejected earlier by the
/// `Identity` extractor and never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("missing data")]
    MissingData,
    #[error("unable to log in with provided credentials")]
    InvalidCredentials,
    #[error("cannot subscribe to yourself")]
    SelfSubscription,
    #[error("already subscribed")]
    AlreadySubscribed,
    #[error("recipe already in favorites")]
    AlreadyFavorited,
    #[error("recipe already in shopping cart")]
    AlreadyInCart,
    #[error("forbidden")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("subscription not found")]
    SubscriptionNotFound,
    #[error("recipe not in favorites")]
    FavoriteNotFound,
    #[error("recipe not in shopping cart")]
    CartItemNotFound,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::SelfSubscription => "SELF_SUBSCRIPTION",
            Self::AlreadySubscribed => "ALREADY_SUBSCRIBED",
            Self::AlreadyFavorited => "ALREADY_FAVORITED",
            Self::AlreadyInCart => "ALREADY_IN_CART",
            Self::Forbidden => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
            Self::FavoriteNotFound => "FAVORITE_NOT_FOUND",
            Self::CartItemNotFound => "CART_ITEM_NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Shorthand for a validation error on one field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_)
            | Self::MissingData
            | Self::InvalidCredentials
            | Self::SelfSubscription
            | Self::AlreadySubscribed
            | Self::AlreadyFavorited
            | Self::AlreadyInCart => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound
            | Self::RecipeNotFound
            | Self::TagNotFound
            | Self::IngredientNotFound
            | Self::SubscriptionNotFound
            | Self::FavoriteNotFound
            | Self::CartItemNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation(ref errors) = self {
            body["errors"] = serde_json::json!(errors);
        }
        (status, axum::Json(body)).into_response()
    }
}
