#![allow(async_fn_in_trait)]

use std::collections::{HashMap, HashSet};

use foodgram_domain::pagination::PageRequest;
use foodgram_domain::shopping_list::CartLine;

use crate::domain::types::{
    IngredientUnit, NewUser, Recipe, RecipeChanges, RecipeDraft, RecipeFilter, RecipeMark,
    ShortRecipe, Tag, User,
};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn username_taken(&self, username: &str) -> Result<bool, ApiError>;
    async fn email_taken(&self, email: &str) -> Result<bool, ApiError>;
    async fn create(&self, user: &NewUser) -> Result<User, ApiError>;
    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), ApiError>;
    /// Users ordered by id, with the total count.
    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError>;
}

/// Repository for follow relationships.
pub trait SubscriptionRepository: Send + Sync {
    /// Returns `false` when the subscription already existed.
    async fn add(&self, user_id: i32, following_id: i32) -> Result<bool, ApiError>;
    /// Returns `false` when there was nothing to delete.
    async fn remove(&self, user_id: i32, following_id: i32) -> Result<bool, ApiError>;
    /// The subset of `author_ids` that `user_id` follows.
    async fn following_among(
        &self,
        user_id: i32,
        author_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiError>;
    /// Followed authors ordered by subscription id, with the total count.
    async fn list_following(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), ApiError>;
}

pub trait TagRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Tag>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, ApiError>;
    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError>;
}

pub trait IngredientRepository: Send + Sync {
    /// Ingredient-units ordered by name; `name` is a case-insensitive substring.
    async fn search(&self, name: Option<&str>) -> Result<Vec<IngredientUnit>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<IngredientUnit>, ApiError>;
    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError>;
}

/// Repository for recipes and their tag/ingredient join rows.
pub trait RecipeRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, ApiError>;
    /// Insert the recipe and its join rows atomically. Returns the new id.
    async fn create(&self, author_id: i32, draft: &RecipeDraft) -> Result<i32, ApiError>;
    /// Update scalars and replace join rows atomically.
    async fn update(&self, id: i32, changes: &RecipeChanges) -> Result<(), ApiError>;
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
    /// Newest first, with the total count matching `filter`.
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<Recipe>, u64), ApiError>;
    /// Recipe totals per author. Authors without recipes are absent.
    async fn count_by_authors(&self, author_ids: &[i32]) -> Result<HashMap<i32, u64>, ApiError>;
    /// One author's recipes, newest first, at most `limit` when given.
    async fn short_by_author(
        &self,
        author_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<ShortRecipe>, ApiError>;
}

/// Favorites and shopping-cart entries, selected by [`RecipeMark`].
pub trait RecipeMarkRepository: Send + Sync {
    /// Returns `false` when the mark already existed.
    async fn add(&self, mark: RecipeMark, user_id: i32, recipe_id: i32) -> Result<bool, ApiError>;
    /// Returns `false` when there was nothing to delete.
    async fn remove(&self, mark: RecipeMark, user_id: i32, recipe_id: i32)
    -> Result<bool, ApiError>;
    async fn recipe_ids(&self, mark: RecipeMark, user_id: i32) -> Result<Vec<i32>, ApiError>;
    /// The subset of `recipe_ids` the user has marked.
    async fn marked_among(
        &self,
        mark: RecipeMark,
        user_id: i32,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiError>;
    /// Ingredient lines of every carted recipe, in cart order then line order.
    async fn cart_lines(&self, user_id: i32) -> Result<Vec<CartLine>, ApiError>;
}

/// Storage for uploaded recipe images.
pub trait MediaStore: Send + Sync {
    /// Store `bytes` and return the path relative to the media root.
    async fn save_recipe_image(&self, extension: &str, bytes: &[u8]) -> Result<String, ApiError>;
    /// Delete a stored image. Missing files are not an error.
    async fn remove_recipe_image(&self, path: &str) -> Result<(), ApiError>;
}
