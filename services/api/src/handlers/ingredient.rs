use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use crate::domain::types::IngredientUnit;
use crate::error::ApiError;
use crate::handlers::extract::{Json, Query};
use crate::state::AppState;
use crate::usecase::ingredient::{GetIngredientUseCase, SearchIngredientsUseCase};

#[derive(Serialize)]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

impl From<IngredientUnit> for IngredientResponse {
    fn from(item: IngredientUnit) -> Self {
        Self {
            id: item.id,
            name: item.name,
            measurement_unit: item.measurement_unit,
        }
    }
}

// ── GET /api/ingredients/ ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IngredientQuery {
    pub name: Option<String>,
}

pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    let usecase = SearchIngredientsUseCase {
        repo: state.ingredient_repo(),
    };
    let items = usecase.execute(query.name.as_deref()).await?;
    Ok(Json(items.into_iter().map(IngredientResponse::from).collect()))
}

// ── GET /api/ingredients/{id}/ ───────────────────────────────────────────────

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<IngredientResponse>, ApiError> {
    let usecase = GetIngredientUseCase {
        repo: state.ingredient_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}
