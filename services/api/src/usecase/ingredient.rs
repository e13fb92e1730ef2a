use crate::domain::repository::IngredientRepository;
use crate::domain::types::IngredientUnit;
use crate::error::ApiError;

pub struct SearchIngredientsUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> SearchIngredientsUseCase<R> {
    /// All ingredient-units, or those whose ingredient name contains `name`
    /// ignoring case.
    pub async fn execute(&self, name: Option<&str>) -> Result<Vec<IngredientUnit>, ApiError> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        self.repo.search(name).await
    }
}

pub struct GetIngredientUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> GetIngredientUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<IngredientUnit, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::IngredientNotFound)
    }
}
