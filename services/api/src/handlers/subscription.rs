use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::Identity;
use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::types::SubscriptionView;
use crate::error::ApiError;
use crate::handlers::extract::{Json, Query};
use crate::handlers::recipe::ShortRecipeResponse;
use crate::state::AppState;
use crate::usecase::subscription::{
    ListSubscriptionsUseCase, SubscribeUseCase, UnsubscribeUseCase,
};

/// A followed author. `is_subscribed` is always true from the follower's side.
#[derive(Serialize)]
pub struct SubscriptionResponse {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub recipes: Vec<ShortRecipeResponse>,
    pub recipes_count: u64,
}

impl From<SubscriptionView> for SubscriptionResponse {
    fn from(view: SubscriptionView) -> Self {
        Self {
            email: view.author.email,
            id: view.author.id,
            username: view.author.username,
            first_name: view.author.first_name,
            last_name: view.author.last_name,
            is_subscribed: true,
            recipes: view
                .recipes
                .into_iter()
                .map(ShortRecipeResponse::from)
                .collect(),
            recipes_count: view.recipes_count,
        }
    }
}

#[derive(Deserialize)]
pub struct RecipesLimitQuery {
    pub recipes_limit: Option<u32>,
}

// ── GET /api/users/subscriptions/ ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubscriptionListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub recipes_limit: Option<u32>,
}

pub async fn list_subscriptions(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<SubscriptionListQuery>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Page<SubscriptionResponse>>, ApiError> {
    let usecase = ListSubscriptionsUseCase {
        subscriptions: state.subscription_repo(),
        recipes: state.recipe_repo(),
    };
    let page = PageRequest::from_query(query.page, query.limit);
    let (views, count) = usecase
        .execute(identity.user_id, page, query.recipes_limit)
        .await?;
    let page = Page::new(views, count, page, uri.path(), uri.query());
    Ok(Json(page.map(SubscriptionResponse::from)))
}

// ── POST /api/users/{id}/subscribe/ ──────────────────────────────────────────

pub async fn subscribe(
    identity: Identity,
    State(state): State<AppState>,
    Path(author_id): Path<i32>,
    Query(query): Query<RecipesLimitQuery>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), ApiError> {
    let usecase = SubscribeUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
        recipes: state.recipe_repo(),
    };
    let view = usecase
        .execute(identity.user_id, author_id, query.recipes_limit)
        .await?;
    tracing::info!(user_id = identity.user_id, author_id, "subscribed");
    Ok((StatusCode::CREATED, Json(view.into())))
}

// ── DELETE /api/users/{id}/subscribe/ ────────────────────────────────────────

pub async fn unsubscribe(
    identity: Identity,
    State(state): State<AppState>,
    Path(author_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = UnsubscribeUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
    };
    usecase.execute(identity.user_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
