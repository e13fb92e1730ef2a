use std::collections::HashSet;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use foodgram_domain::pagination::PageRequest;
use foodgram_domain::recipe::{
    MAX_RECIPE_NAME_LEN, MIN_AMOUNT, MIN_COOKING_TIME, first_duplicate, parse_image_data_url,
};
use foodgram_domain::validation::{FieldErrors, REQUIRED};

use crate::domain::repository::{
    IngredientRepository, MediaStore, RecipeMarkRepository, RecipeRepository,
    SubscriptionRepository, TagRepository,
};
use crate::domain::types::{
    IngredientAmount, Recipe, RecipeChanges, RecipeDraft, RecipeFilter, RecipeMark, RecipeView,
};
use crate::error::ApiError;

/// Client-submitted recipe fields. On create every field is required; on
/// update only `tags` and `ingredients` are.
#[derive(Debug, Default)]
pub struct RecipeInput {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<IngredientAmount>>,
}

/// Decoded image not yet written to the media store.
struct ImageUpload {
    extension: &'static str,
    bytes: Vec<u8>,
}

struct ValidRecipe {
    name: Option<String>,
    text: Option<String>,
    image: Option<ImageUpload>,
    cooking_time: Option<i32>,
    tags: Vec<i32>,
    ingredients: Vec<IngredientAmount>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Create,
    Update,
}

fn decode_image(value: &str) -> Result<ImageUpload, String> {
    let data = parse_image_data_url(value).map_err(|e| e.to_string())?;
    let bytes = STANDARD
        .decode(data.base64)
        .map_err(|_| "image payload is not valid base64".to_owned())?;
    Ok(ImageUpload {
        extension: data.extension,
        bytes,
    })
}

/// Scalar that is required on create and optional on update.
fn scalar(errors: &mut FieldErrors, mode: Mode, field: &str, value: Option<String>) -> Option<String> {
    match value {
        None if mode == Mode::Update => None,
        value => Some(errors.require(field, value)),
    }
}

async fn validate_recipe<T, I>(
    input: RecipeInput,
    mode: Mode,
    tags: &T,
    ingredients: &I,
) -> Result<ValidRecipe, ApiError>
where
    T: TagRepository,
    I: IngredientRepository,
{
    let mut errors = FieldErrors::new();

    let name = scalar(&mut errors, mode, "name", input.name);
    if let Some(name) = &name {
        errors.check(
            name.chars().count() <= MAX_RECIPE_NAME_LEN,
            "name",
            format!("ensure this field has no more than {MAX_RECIPE_NAME_LEN} characters"),
        );
    }
    let text = scalar(&mut errors, mode, "text", input.text);

    let cooking_time = match input.cooking_time {
        None if mode == Mode::Update => None,
        None => {
            errors.add("cooking_time", REQUIRED);
            None
        }
        Some(minutes) => {
            errors.check(
                minutes >= MIN_COOKING_TIME,
                "cooking_time",
                format!("ensure this value is greater than or equal to {MIN_COOKING_TIME}"),
            );
            Some(minutes)
        }
    };

    let image = match scalar(&mut errors, mode, "image", input.image) {
        Some(raw) if !raw.is_empty() => match decode_image(&raw) {
            Ok(upload) => Some(upload),
            Err(message) => {
                errors.add("image", message);
                None
            }
        },
        _ => None,
    };

    let tag_ids = input.tags.unwrap_or_default();
    if tag_ids.is_empty() {
        errors.add("tags", "at least one tag is required");
    } else if let Some(dup) = first_duplicate(&tag_ids) {
        errors.add("tags", format!("tag {dup} is listed more than once"));
    } else {
        let known = tags.existing_ids(&tag_ids).await?;
        for id in tag_ids.iter().filter(|id| !known.contains(*id)) {
            errors.add("tags", format!("tag {id} does not exist"));
        }
    }

    let items = input.ingredients.unwrap_or_default();
    if items.is_empty() {
        errors.add("ingredients", "at least one ingredient is required");
    } else {
        for item in items.iter().filter(|item| item.amount < MIN_AMOUNT) {
            errors.add(
                "ingredients",
                format!("amount of ingredient {} must be at least {MIN_AMOUNT}", item.id),
            );
        }
        let ids: Vec<i32> = items.iter().map(|item| item.id).collect();
        if let Some(dup) = first_duplicate(&ids) {
            errors.add("ingredients", format!("ingredient {dup} is listed more than once"));
        } else {
            let known = ingredients.existing_ids(&ids).await?;
            for id in ids.iter().filter(|id| !known.contains(*id)) {
                errors.add("ingredients", format!("ingredient {id} does not exist"));
            }
        }
    }

    errors.into_result()?;
    Ok(ValidRecipe {
        name,
        text,
        image,
        cooking_time,
        tags: tag_ids,
        ingredients: items,
    })
}

/// Fill in the caller-relative flags. Anonymous callers get `false`
/// everywhere without touching storage.
pub async fn recipe_views<K, S>(
    marks: &K,
    subscriptions: &S,
    caller: Option<i32>,
    recipes: Vec<Recipe>,
) -> Result<Vec<RecipeView>, ApiError>
where
    K: RecipeMarkRepository,
    S: SubscriptionRepository,
{
    let Some(user_id) = caller else {
        return Ok(recipes
            .into_iter()
            .map(|recipe| RecipeView {
                recipe,
                is_favorited: false,
                is_in_shopping_cart: false,
                author_is_subscribed: false,
            })
            .collect());
    };
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
    let mut author_ids: Vec<i32> = recipes.iter().map(|r| r.author.id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let favorited = marks
        .marked_among(RecipeMark::Favorite, user_id, &ids)
        .await?;
    let carted = marks.marked_among(RecipeMark::Cart, user_id, &ids).await?;
    let followed = subscriptions.following_among(user_id, &author_ids).await?;

    Ok(recipes
        .into_iter()
        .map(|recipe| RecipeView {
            is_favorited: favorited.contains(&recipe.id),
            is_in_shopping_cart: carted.contains(&recipe.id),
            author_is_subscribed: followed.contains(&recipe.author.id),
            recipe,
        })
        .collect())
}

/// Best-effort removal; a leftover file must not fail the request.
async fn discard_image<M: MediaStore>(media: &M, path: &str) {
    if let Err(e) = media.remove_recipe_image(path).await {
        tracing::warn!(error = %e, path, "failed to remove recipe image");
    }
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<R, T, I, M>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    M: MediaStore,
{
    pub recipes: R,
    pub tags: T,
    pub ingredients: I,
    pub media: M,
}

impl<R, T, I, M> CreateRecipeUseCase<R, T, I, M>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    M: MediaStore,
{
    /// Validate, store the image and insert the recipe. Returns the new id.
    pub async fn execute(&self, author_id: i32, input: RecipeInput) -> Result<i32, ApiError> {
        let valid = validate_recipe(input, Mode::Create, &self.tags, &self.ingredients).await?;
        let upload = valid
            .image
            .ok_or_else(|| ApiError::field("image", REQUIRED))?;
        let image = self
            .media
            .save_recipe_image(upload.extension, &upload.bytes)
            .await?;

        let draft = RecipeDraft {
            name: valid.name.unwrap_or_default(),
            text: valid.text.unwrap_or_default(),
            image,
            cooking_time: valid.cooking_time.unwrap_or(MIN_COOKING_TIME),
            tags: valid.tags,
            ingredients: valid.ingredients,
        };
        let id = match self.recipes.create(author_id, &draft).await {
            Ok(id) => id,
            Err(e) => {
                discard_image(&self.media, &draft.image).await;
                return Err(e);
            }
        };
        tracing::info!(recipe_id = id, author_id, "recipe created");
        Ok(id)
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeUseCase<R, T, I, M>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    M: MediaStore,
{
    pub recipes: R,
    pub tags: T,
    pub ingredients: I,
    pub media: M,
}

impl<R, T, I, M> UpdateRecipeUseCase<R, T, I, M>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    M: MediaStore,
{
    /// Author-only. Tags and ingredients replace the stored sets.
    pub async fn execute(
        &self,
        caller: i32,
        recipe_id: i32,
        input: RecipeInput,
    ) -> Result<(), ApiError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        if recipe.author.id != caller {
            return Err(ApiError::Forbidden);
        }

        let valid = validate_recipe(input, Mode::Update, &self.tags, &self.ingredients).await?;
        let image = match valid.image {
            Some(upload) => Some(
                self.media
                    .save_recipe_image(upload.extension, &upload.bytes)
                    .await?,
            ),
            None => None,
        };

        let changes = RecipeChanges {
            name: valid.name,
            text: valid.text,
            image,
            cooking_time: valid.cooking_time,
            tags: valid.tags,
            ingredients: valid.ingredients,
        };
        if let Err(e) = self.recipes.update(recipe_id, &changes).await {
            if let Some(new_image) = &changes.image {
                discard_image(&self.media, new_image).await;
            }
            return Err(e);
        }
        if changes.image.is_some() {
            discard_image(&self.media, &recipe.image).await;
        }
        tracing::info!(recipe_id, "recipe updated");
        Ok(())
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> DeleteRecipeUseCase<R> {
    pub async fn execute(&self, caller: i32, recipe_id: i32) -> Result<(), ApiError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        if recipe.author.id != caller {
            return Err(ApiError::Forbidden);
        }
        if !self.recipes.delete(recipe_id).await? {
            return Err(ApiError::RecipeNotFound);
        }
        tracing::info!(recipe_id, "recipe deleted");
        Ok(())
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R, K, S>
where
    R: RecipeRepository,
    K: RecipeMarkRepository,
    S: SubscriptionRepository,
{
    pub recipes: R,
    pub marks: K,
    pub subscriptions: S,
}

impl<R, K, S> GetRecipeUseCase<R, K, S>
where
    R: RecipeRepository,
    K: RecipeMarkRepository,
    S: SubscriptionRepository,
{
    pub async fn execute(&self, caller: Option<i32>, recipe_id: i32) -> Result<RecipeView, ApiError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        let mut views = recipe_views(&self.marks, &self.subscriptions, caller, vec![recipe]).await?;
        views.pop().ok_or(ApiError::RecipeNotFound)
    }
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RecipeQuery {
    /// Tag slugs, any of which qualifies.
    pub tags: Vec<String>,
    pub author: Option<i32>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

pub struct ListRecipesUseCase<R, K, S>
where
    R: RecipeRepository,
    K: RecipeMarkRepository,
    S: SubscriptionRepository,
{
    pub recipes: R,
    pub marks: K,
    pub subscriptions: S,
}

impl<R, K, S> ListRecipesUseCase<R, K, S>
where
    R: RecipeRepository,
    K: RecipeMarkRepository,
    S: SubscriptionRepository,
{
    pub async fn execute(
        &self,
        caller: Option<i32>,
        query: RecipeQuery,
        page: PageRequest,
    ) -> Result<(Vec<RecipeView>, u64), ApiError> {
        let mut ids: Option<HashSet<i32>> = None;
        for (wanted, mark) in [
            (query.is_favorited, RecipeMark::Favorite),
            (query.is_in_shopping_cart, RecipeMark::Cart),
        ] {
            if !wanted {
                continue;
            }
            // Anonymous callers have no favorites or cart.
            let Some(user_id) = caller else {
                return Ok((Vec::new(), 0));
            };
            let marked: HashSet<i32> = self.marks.recipe_ids(mark, user_id).await?.into_iter().collect();
            ids = Some(match ids {
                Some(previous) => previous.intersection(&marked).copied().collect(),
                None => marked,
            });
        }
        if ids.as_ref().is_some_and(HashSet::is_empty) {
            return Ok((Vec::new(), 0));
        }

        let filter = RecipeFilter {
            tags: query.tags,
            author: query.author,
            ids: ids.map(|set| {
                let mut ids: Vec<i32> = set.into_iter().collect();
                ids.sort_unstable();
                ids
            }),
        };
        let (recipes, count) = self.recipes.list(&filter, page).await?;
        let views = recipe_views(&self.marks, &self.subscriptions, caller, recipes).await?;
        Ok((views, count))
    }
}
