use crate::domain::repository::{RecipeMarkRepository, RecipeRepository};
use crate::domain::types::{RecipeMark, ShortRecipe};
use crate::error::ApiError;

fn already_marked(mark: RecipeMark) -> ApiError {
    match mark {
        RecipeMark::Favorite => ApiError::AlreadyFavorited,
        RecipeMark::Cart => ApiError::AlreadyInCart,
    }
}

fn not_marked(mark: RecipeMark) -> ApiError {
    match mark {
        RecipeMark::Favorite => ApiError::FavoriteNotFound,
        RecipeMark::Cart => ApiError::CartItemNotFound,
    }
}

// ── AddMark ──────────────────────────────────────────────────────────────────

/// Add a recipe to the caller's favorites or shopping cart.
pub struct AddMarkUseCase<R: RecipeRepository, K: RecipeMarkRepository> {
    pub recipes: R,
    pub marks: K,
    pub mark: RecipeMark,
}

impl<R: RecipeRepository, K: RecipeMarkRepository> AddMarkUseCase<R, K> {
    pub async fn execute(&self, caller: i32, recipe_id: i32) -> Result<ShortRecipe, ApiError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        if !self.marks.add(self.mark, caller, recipe.id).await? {
            return Err(already_marked(self.mark));
        }
        Ok(ShortRecipe::from(&recipe))
    }
}

// ── RemoveMark ───────────────────────────────────────────────────────────────

pub struct RemoveMarkUseCase<R: RecipeRepository, K: RecipeMarkRepository> {
    pub recipes: R,
    pub marks: K,
    pub mark: RecipeMark,
}

impl<R: RecipeRepository, K: RecipeMarkRepository> RemoveMarkUseCase<R, K> {
    pub async fn execute(&self, caller: i32, recipe_id: i32) -> Result<(), ApiError> {
        self.recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        if !self.marks.remove(self.mark, caller, recipe_id).await? {
            return Err(not_marked(self.mark));
        }
        Ok(())
    }
}
