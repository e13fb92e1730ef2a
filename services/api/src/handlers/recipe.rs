use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::{Identity, MaybeIdentity};
use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::types::{IngredientAmount, RecipeIngredient, RecipeView, ShortRecipe};
use crate::error::ApiError;
use crate::handlers::extract::{Json, Query};
use crate::handlers::query_flag;
use crate::handlers::tag::TagResponse;
use crate::handlers::user::UserResponse;
use crate::infra::media::media_url;
use crate::state::AppState;
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesUseCase, RecipeInput,
    RecipeQuery, UpdateRecipeUseCase,
};

#[derive(Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<RecipeIngredient> for RecipeIngredientResponse {
    fn from(line: RecipeIngredient) -> Self {
        Self {
            id: line.ingredient.id,
            name: line.ingredient.name,
            measurement_unit: line.ingredient.measurement_unit,
            amount: line.amount,
        }
    }
}

#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

impl From<RecipeView> for RecipeResponse {
    fn from(view: RecipeView) -> Self {
        let recipe = view.recipe;
        Self {
            id: recipe.id,
            tags: recipe.tags.into_iter().map(TagResponse::from).collect(),
            author: UserResponse::new(recipe.author, view.author_is_subscribed),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(RecipeIngredientResponse::from)
                .collect(),
            is_favorited: view.is_favorited,
            is_in_shopping_cart: view.is_in_shopping_cart,
            name: recipe.name,
            image: media_url(&recipe.image),
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Serialize)]
pub struct ShortRecipeResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<ShortRecipe> for ShortRecipeResponse {
    fn from(recipe: ShortRecipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: media_url(&recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Deserialize)]
pub struct IngredientAmountRequest {
    pub id: i32,
    pub amount: i32,
}

/// Body of both create and partial update.
#[derive(Deserialize)]
pub struct RecipeRequest {
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
    pub tags: Option<Vec<i32>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

impl From<RecipeRequest> for RecipeInput {
    fn from(body: RecipeRequest) -> Self {
        Self {
            name: body.name,
            text: body.text,
            image: body.image,
            cooking_time: body.cooking_time,
            tags: body.tags,
            ingredients: body.ingredients.map(|items| {
                items
                    .into_iter()
                    .map(|item| IngredientAmount {
                        id: item.id,
                        amount: item.amount,
                    })
                    .collect()
            }),
        }
    }
}

async fn recipe_response(
    state: &AppState,
    caller: Option<i32>,
    recipe_id: i32,
) -> Result<RecipeResponse, ApiError> {
    let usecase = GetRecipeUseCase {
        recipes: state.recipe_repo(),
        marks: state.mark_repo(),
        subscriptions: state.subscription_repo(),
    };
    Ok(usecase.execute(caller, recipe_id).await?.into())
}

// ── GET /api/recipes/ ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RecipeListQuery {
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<i32>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn list_recipes(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Query(query): Query<RecipeListQuery>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Page<RecipeResponse>>, ApiError> {
    let usecase = ListRecipesUseCase {
        recipes: state.recipe_repo(),
        marks: state.mark_repo(),
        subscriptions: state.subscription_repo(),
    };
    let page = PageRequest::from_query(query.page, query.limit);
    let filter = RecipeQuery {
        tags: query.tags,
        author: query.author,
        is_favorited: query_flag(query.is_favorited.as_deref()),
        is_in_shopping_cart: query_flag(query.is_in_shopping_cart.as_deref()),
    };
    let (views, count) = usecase.execute(identity.user_id(), filter, page).await?;
    let page = Page::new(views, count, page, uri.path(), uri.query());
    Ok(Json(page.map(RecipeResponse::from)))
}

// ── POST /api/recipes/ ───────────────────────────────────────────────────────

pub async fn create_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let usecase = CreateRecipeUseCase {
        recipes: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
        media: state.media.clone(),
    };
    let recipe_id = usecase.execute(identity.user_id, body.into()).await?;
    let recipe = recipe_response(&state, Some(identity.user_id), recipe_id).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

// ── GET /api/recipes/{id}/ ───────────────────────────────────────────────────

pub async fn get_recipe(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<Json<RecipeResponse>, ApiError> {
    Ok(Json(
        recipe_response(&state, identity.user_id(), recipe_id).await?,
    ))
}

// ── PATCH /api/recipes/{id}/ ─────────────────────────────────────────────────

pub async fn update_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
    Json(body): Json<RecipeRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let usecase = UpdateRecipeUseCase {
        recipes: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
        media: state.media.clone(),
    };
    usecase
        .execute(identity.user_id, recipe_id, body.into())
        .await?;
    Ok(Json(
        recipe_response(&state, Some(identity.user_id), recipe_id).await?,
    ))
}

// ── DELETE /api/recipes/{id}/ ────────────────────────────────────────────────

pub async fn delete_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteRecipeUseCase {
        recipes: state.recipe_repo(),
    };
    usecase.execute(identity.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
