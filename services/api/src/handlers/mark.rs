use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use foodgram_auth_types::identity::Identity;

use crate::domain::types::RecipeMark;
use crate::error::ApiError;
use crate::handlers::recipe::ShortRecipeResponse;
use crate::state::AppState;
use crate::usecase::mark::{AddMarkUseCase, RemoveMarkUseCase};

async fn add_mark(
    state: AppState,
    mark: RecipeMark,
    user_id: i32,
    recipe_id: i32,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), ApiError> {
    let usecase = AddMarkUseCase {
        recipes: state.recipe_repo(),
        marks: state.mark_repo(),
        mark,
    };
    let recipe = usecase.execute(user_id, recipe_id).await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

async fn remove_mark(
    state: AppState,
    mark: RecipeMark,
    user_id: i32,
    recipe_id: i32,
) -> Result<StatusCode, ApiError> {
    let usecase = RemoveMarkUseCase {
        recipes: state.recipe_repo(),
        marks: state.mark_repo(),
        mark,
    };
    usecase.execute(user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/recipes/{id}/favorite/ ─────────────────────────────────────────

pub async fn add_favorite(
    identity: Identity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), ApiError> {
    add_mark(state, RecipeMark::Favorite, identity.user_id, recipe_id).await
}

// ── DELETE /api/recipes/{id}/favorite/ ───────────────────────────────────────

pub async fn remove_favorite(
    identity: Identity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    remove_mark(state, RecipeMark::Favorite, identity.user_id, recipe_id).await
}

// ── POST /api/recipes/{id}/shopping_cart/ ────────────────────────────────────

pub async fn add_to_cart(
    identity: Identity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<ShortRecipeResponse>), ApiError> {
    add_mark(state, RecipeMark::Cart, identity.user_id, recipe_id).await
}

// ── DELETE /api/recipes/{id}/shopping_cart/ ──────────────────────────────────

pub async fn remove_from_cart(
    identity: Identity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    remove_mark(state, RecipeMark::Cart, identity.user_id, recipe_id).await
}
