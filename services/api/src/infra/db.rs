use std::collections::{HashMap, HashSet};

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{Set, Unchanged},
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, SqlErr,
    TransactionTrait,
    sea_query::{Expr, OnConflict, Query},
};

use foodgram_api_schema::{
    ingredient_units, ingredients, measurement_units, recipe_carts, recipe_favorites,
    recipe_ingredients, recipe_tags, recipes, subscriptions, tags, users,
};
use foodgram_core::sea_ext::ContainsIgnoreCase;
use foodgram_domain::pagination::PageRequest;
use foodgram_domain::shopping_list::CartLine;
use foodgram_domain::validation::FieldErrors;

use crate::domain::repository::{
    IngredientRepository, RecipeMarkRepository, RecipeRepository, SubscriptionRepository,
    TagRepository, UserRepository,
};
use crate::domain::types::{
    IngredientAmount, IngredientUnit, NewUser, Recipe, RecipeChanges, RecipeDraft, RecipeFilter,
    RecipeIngredient, RecipeMark, ShortRecipe, Tag, User,
};
use crate::error::ApiError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn username_taken(&self, username: &str) -> Result<bool, ApiError> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await
            .context("count users by username")?;
        Ok(count > 0)
    }

    async fn email_taken(&self, email: &str) -> Result<bool, ApiError> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await
            .context("count users by email")?;
        Ok(count > 0)
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let result = users::ActiveModel {
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password: Set(user.password_hash.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            date_joined: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(model) => Ok(user_from_model(model)),
            // Lost a race against a concurrent registration.
            Err(e) if is_unique_violation(&e) => Err(ApiError::Validation(FieldErrors::single(
                "non_field_errors",
                "a user with that username or email already exists",
            ))),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            password: Set(password_hash.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user password")?;
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError> {
        let page = page.clamped();
        let paginator = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .paginate(&self.db, u64::from(page.limit));
        let count = paginator.num_items().await.context("count users")?;
        let models = paginator
            .fetch_page(page.index())
            .await
            .context("list users")?;
        Ok((models.into_iter().map(user_from_model).collect(), count))
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        password_hash: model.password,
        date_joined: model.date_joined,
    }
}

async fn users_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
) -> Result<HashMap<i32, User>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = users::Entity::find()
        .filter(users::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?;
    Ok(models
        .into_iter()
        .map(|m| (m.id, user_from_model(m)))
        .collect())
}

// ── Subscription repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl SubscriptionRepository for DbSubscriptionRepository {
    async fn add(&self, user_id: i32, following_id: i32) -> Result<bool, ApiError> {
        let inserted = subscriptions::Entity::insert(subscriptions::ActiveModel {
            user_id: Set(user_id),
            following_id: Set(following_id),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([
                subscriptions::Column::UserId,
                subscriptions::Column::FollowingId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert subscription")?;
        Ok(inserted > 0)
    }

    async fn remove(&self, user_id: i32, following_id: i32) -> Result<bool, ApiError> {
        let result = subscriptions::Entity::delete_many()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .filter(subscriptions::Column::FollowingId.eq(following_id))
            .exec(&self.db)
            .await
            .context("delete subscription")?;
        Ok(result.rows_affected > 0)
    }

    async fn following_among(
        &self,
        user_id: i32,
        author_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiError> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let ids = subscriptions::Entity::find()
            .select_only()
            .column(subscriptions::Column::FollowingId)
            .filter(subscriptions::Column::UserId.eq(user_id))
            .filter(subscriptions::Column::FollowingId.is_in(author_ids.iter().copied()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .context("select followed authors")?;
        Ok(ids.into_iter().collect())
    }

    async fn list_following(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), ApiError> {
        let page = page.clamped();
        let paginator = subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .order_by_asc(subscriptions::Column::Id)
            .paginate(&self.db, u64::from(page.limit));
        let count = paginator.num_items().await.context("count subscriptions")?;
        let rows = paginator
            .fetch_page(page.index())
            .await
            .context("list subscriptions")?;

        let ids: Vec<i32> = rows.iter().map(|row| row.following_id).collect();
        let mut authors = users_by_ids(&self.db, &ids)
            .await
            .context("load followed authors")?;
        let ordered = ids.iter().filter_map(|id| authors.remove(id)).collect();
        Ok((ordered, count))
    }
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

impl TagRepository for DbTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, ApiError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, ApiError> {
        let model = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tag by id")?;
        Ok(model.map(tag_from_model))
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found = tags::Entity::find()
            .select_only()
            .column(tags::Column::Id)
            .filter(tags::Column::Id.is_in(ids.iter().copied()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .context("select existing tag ids")?;
        Ok(found.into_iter().collect())
    }
}

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        slug: model.slug,
        color: model.color,
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct IngredientUnitRow {
    id: i32,
    name: String,
    measurement_unit: String,
}

/// ingredient_units joined with their ingredient and unit names.
fn ingredient_unit_query() -> Select<ingredient_units::Entity> {
    ingredient_units::Entity::find()
        .select_only()
        .column(ingredient_units::Column::Id)
        .column_as(ingredients::Column::Name, "name")
        .column_as(measurement_units::Column::Name, "measurement_unit")
        .join(JoinType::InnerJoin, ingredient_units::Relation::Ingredient.def())
        .join(
            JoinType::InnerJoin,
            ingredient_units::Relation::MeasurementUnit.def(),
        )
}

impl IngredientRepository for DbIngredientRepository {
    async fn search(&self, name: Option<&str>) -> Result<Vec<IngredientUnit>, ApiError> {
        let mut query = ingredient_unit_query();
        if let Some(needle) = name.filter(|n| !n.is_empty()) {
            query = query.contains_ignore_case(ingredients::Column::Name, needle);
        }
        let rows = query
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredient_units::Column::Id)
            .into_model::<IngredientUnitRow>()
            .all(&self.db)
            .await
            .context("search ingredients")?;
        Ok(rows.into_iter().map(ingredient_unit_from_row).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<IngredientUnit>, ApiError> {
        let row = ingredient_unit_query()
            .filter(ingredient_units::Column::Id.eq(id))
            .into_model::<IngredientUnitRow>()
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(row.map(ingredient_unit_from_row))
    }

    async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, ApiError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found = ingredient_units::Entity::find()
            .select_only()
            .column(ingredient_units::Column::Id)
            .filter(ingredient_units::Column::Id.is_in(ids.iter().copied()))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .context("select existing ingredient ids")?;
        Ok(found.into_iter().collect())
    }
}

fn ingredient_unit_from_row(row: IngredientUnitRow) -> IngredientUnit {
    IngredientUnit {
        id: row.id,
        name: row.name,
        measurement_unit: row.measurement_unit,
    }
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct RecipeIngredientRow {
    recipe_id: i32,
    ingredient_unit_id: i32,
    amount: i32,
    name: String,
    measurement_unit: String,
}

/// Ingredient lines of the given recipes in insertion order.
async fn ingredient_rows<C: ConnectionTrait>(
    db: &C,
    recipe_ids: &[i32],
) -> Result<Vec<RecipeIngredientRow>, DbErr> {
    if recipe_ids.is_empty() {
        return Ok(Vec::new());
    }
    recipe_ingredients::Entity::find()
        .select_only()
        .column(recipe_ingredients::Column::RecipeId)
        .column(recipe_ingredients::Column::IngredientUnitId)
        .column(recipe_ingredients::Column::Amount)
        .column_as(ingredients::Column::Name, "name")
        .column_as(measurement_units::Column::Name, "measurement_unit")
        .join(
            JoinType::InnerJoin,
            recipe_ingredients::Relation::IngredientUnit.def(),
        )
        .join(JoinType::InnerJoin, ingredient_units::Relation::Ingredient.def())
        .join(
            JoinType::InnerJoin,
            ingredient_units::Relation::MeasurementUnit.def(),
        )
        .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .order_by_asc(recipe_ingredients::Column::Id)
        .into_model::<RecipeIngredientRow>()
        .all(db)
        .await
}

/// Attach authors, tags and ingredients to recipe rows, keeping their order.
async fn load_recipes<C: ConnectionTrait>(
    db: &C,
    models: Vec<recipes::Model>,
) -> anyhow::Result<Vec<Recipe>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let recipe_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let author_ids: Vec<i32> = models.iter().map(|m| m.author_id).collect();

    let authors = users_by_ids(db, &author_ids)
        .await
        .context("load recipe authors")?;

    let mut tags_by_recipe: HashMap<i32, Vec<Tag>> = HashMap::new();
    let tag_rows = recipe_tags::Entity::find()
        .find_also_related(tags::Entity)
        .filter(recipe_tags::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .order_by_asc(recipe_tags::Column::Id)
        .all(db)
        .await
        .context("load recipe tags")?;
    for (link, tag) in tag_rows {
        if let Some(tag) = tag {
            tags_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(tag_from_model(tag));
        }
    }

    let mut ingredients_by_recipe: HashMap<i32, Vec<RecipeIngredient>> = HashMap::new();
    for row in ingredient_rows(db, &recipe_ids)
        .await
        .context("load recipe ingredients")?
    {
        ingredients_by_recipe
            .entry(row.recipe_id)
            .or_default()
            .push(RecipeIngredient {
                ingredient: IngredientUnit {
                    id: row.ingredient_unit_id,
                    name: row.name,
                    measurement_unit: row.measurement_unit,
                },
                amount: row.amount,
            });
    }

    models
        .into_iter()
        .map(|model| {
            let author = authors
                .get(&model.author_id)
                .cloned()
                .with_context(|| format!("author {} of recipe {} missing", model.author_id, model.id))?;
            Ok(Recipe {
                id: model.id,
                tags: tags_by_recipe.remove(&model.id).unwrap_or_default(),
                ingredients: ingredients_by_recipe.remove(&model.id).unwrap_or_default(),
                author,
                name: model.name,
                text: model.text,
                image: model.image,
                cooking_time: model.cooking_time,
                pub_date: model.pub_date,
            })
        })
        .collect()
}

async fn insert_recipe_links<C: ConnectionTrait>(
    db: &C,
    recipe_id: i32,
    tag_ids: &[i32],
    ingredients: &[IngredientAmount],
) -> Result<(), DbErr> {
    if !tag_ids.is_empty() {
        recipe_tags::Entity::insert_many(tag_ids.iter().map(|&tag_id| recipe_tags::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(tag_id),
            ..Default::default()
        }))
        .exec(db)
        .await?;
    }
    if !ingredients.is_empty() {
        recipe_ingredients::Entity::insert_many(ingredients.iter().map(|item| {
            recipe_ingredients::ActiveModel {
                recipe_id: Set(recipe_id),
                ingredient_unit_id: Set(item.id),
                amount: Set(item.amount),
                ..Default::default()
            }
        }))
        .exec(db)
        .await?;
    }
    Ok(())
}

impl RecipeRepository for DbRecipeRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, ApiError> {
        let Some(model) = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe by id")?
        else {
            return Ok(None);
        };
        let recipe = load_recipes(&self.db, vec![model]).await?.pop();
        Ok(recipe)
    }

    async fn create(&self, author_id: i32, draft: &RecipeDraft) -> Result<i32, ApiError> {
        let id = self
            .db
            .transaction::<_, i32, DbErr>(|txn| {
                let draft = draft.clone();
                Box::pin(async move {
                    let recipe = recipes::ActiveModel {
                        author_id: Set(author_id),
                        name: Set(draft.name),
                        text: Set(draft.text),
                        image: Set(draft.image),
                        cooking_time: Set(draft.cooking_time),
                        pub_date: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    insert_recipe_links(txn, recipe.id, &draft.tags, &draft.ingredients).await?;
                    Ok(recipe.id)
                })
            })
            .await
            .context("create recipe")?;
        Ok(id)
    }

    async fn update(&self, id: i32, changes: &RecipeChanges) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let changes = changes.clone();
                Box::pin(async move {
                    let mut recipe = recipes::ActiveModel {
                        id: Unchanged(id),
                        ..Default::default()
                    };
                    if let Some(name) = changes.name {
                        recipe.name = Set(name);
                    }
                    if let Some(text) = changes.text {
                        recipe.text = Set(text);
                    }
                    if let Some(image) = changes.image {
                        recipe.image = Set(image);
                    }
                    if let Some(cooking_time) = changes.cooking_time {
                        recipe.cooking_time = Set(cooking_time);
                    }
                    if recipe.is_changed() {
                        recipe.update(txn).await?;
                    }

                    recipe_tags::Entity::delete_many()
                        .filter(recipe_tags::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;
                    recipe_ingredients::Entity::delete_many()
                        .filter(recipe_ingredients::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;
                    insert_recipe_links(txn, id, &changes.tags, &changes.ingredients).await?;
                    Ok(())
                })
            })
            .await
            .context("update recipe")?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = recipes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<(Vec<Recipe>, u64), ApiError> {
        let page = page.clamped();
        let mut query = recipes::Entity::find();
        if let Some(author) = filter.author {
            query = query.filter(recipes::Column::AuthorId.eq(author));
        }
        if let Some(ids) = &filter.ids {
            query = query.filter(recipes::Column::Id.is_in(ids.iter().copied()));
        }
        if !filter.tags.is_empty() {
            // Any matching slug qualifies; the subquery keeps each recipe once.
            let tagged = Query::select()
                .column((recipe_tags::Entity, recipe_tags::Column::RecipeId))
                .from(recipe_tags::Entity)
                .inner_join(
                    tags::Entity,
                    Expr::col((tags::Entity, tags::Column::Id))
                        .equals((recipe_tags::Entity, recipe_tags::Column::TagId)),
                )
                .and_where(tags::Column::Slug.is_in(filter.tags.iter().cloned()))
                .to_owned();
            query = query.filter(recipes::Column::Id.in_subquery(tagged));
        }

        let paginator = query
            .order_by_desc(recipes::Column::PubDate)
            .order_by_desc(recipes::Column::Id)
            .paginate(&self.db, u64::from(page.limit));
        let count = paginator.num_items().await.context("count recipes")?;
        let models = paginator
            .fetch_page(page.index())
            .await
            .context("list recipes")?;
        Ok((load_recipes(&self.db, models).await?, count))
    }

    async fn count_by_authors(&self, author_ids: &[i32]) -> Result<HashMap<i32, u64>, ApiError> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = recipe_counts_query(author_ids)
            .into_tuple::<(i32, i64)>()
            .all(&self.db)
            .await
            .context("count recipes by authors")?;
        Ok(rows
            .into_iter()
            .map(|(author_id, count)| (author_id, u64::try_from(count).unwrap_or_default()))
            .collect())
    }

    async fn short_by_author(
        &self,
        author_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<ShortRecipe>, ApiError> {
        let models = author_recipes_query(author_id, limit)
            .all(&self.db)
            .await
            .context("list recipes by author")?;
        Ok(models
            .into_iter()
            .map(|m| ShortRecipe {
                id: m.id,
                author_id: m.author_id,
                name: m.name,
                image: m.image,
                cooking_time: m.cooking_time,
            })
            .collect())
    }
}

fn recipe_counts_query(author_ids: &[i32]) -> Select<recipes::Entity> {
    recipes::Entity::find()
        .select_only()
        .column(recipes::Column::AuthorId)
        .column_as(Expr::col(recipes::Column::Id).count(), "recipes_count")
        .filter(recipes::Column::AuthorId.is_in(author_ids.iter().copied()))
        .group_by(recipes::Column::AuthorId)
}

fn author_recipes_query(author_id: i32, limit: Option<u64>) -> Select<recipes::Entity> {
    recipes::Entity::find()
        .filter(recipes::Column::AuthorId.eq(author_id))
        .order_by_desc(recipes::Column::PubDate)
        .order_by_desc(recipes::Column::Id)
        .limit(limit)
}

// ── Recipe mark repository (favorites + cart) ────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeMarkRepository {
    pub db: DatabaseConnection,
}

impl RecipeMarkRepository for DbRecipeMarkRepository {
    async fn add(&self, mark: RecipeMark, user_id: i32, recipe_id: i32) -> Result<bool, ApiError> {
        let inserted = match mark {
            RecipeMark::Favorite => recipe_favorites::Entity::insert(recipe_favorites::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                ..Default::default()
            })
            .on_conflict(
                OnConflict::columns([
                    recipe_favorites::Column::UserId,
                    recipe_favorites::Column::RecipeId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("insert favorite")?,
            RecipeMark::Cart => recipe_carts::Entity::insert(recipe_carts::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
                ..Default::default()
            })
            .on_conflict(
                OnConflict::columns([recipe_carts::Column::UserId, recipe_carts::Column::RecipeId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("insert cart item")?,
        };
        Ok(inserted > 0)
    }

    async fn remove(
        &self,
        mark: RecipeMark,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, ApiError> {
        let result = match mark {
            RecipeMark::Favorite => recipe_favorites::Entity::delete_many()
                .filter(recipe_favorites::Column::UserId.eq(user_id))
                .filter(recipe_favorites::Column::RecipeId.eq(recipe_id))
                .exec(&self.db)
                .await
                .context("delete favorite")?,
            RecipeMark::Cart => recipe_carts::Entity::delete_many()
                .filter(recipe_carts::Column::UserId.eq(user_id))
                .filter(recipe_carts::Column::RecipeId.eq(recipe_id))
                .exec(&self.db)
                .await
                .context("delete cart item")?,
        };
        Ok(result.rows_affected > 0)
    }

    async fn recipe_ids(&self, mark: RecipeMark, user_id: i32) -> Result<Vec<i32>, ApiError> {
        let ids = match mark {
            RecipeMark::Favorite => recipe_favorites::Entity::find()
                .select_only()
                .column(recipe_favorites::Column::RecipeId)
                .filter(recipe_favorites::Column::UserId.eq(user_id))
                .order_by_asc(recipe_favorites::Column::Id)
                .into_tuple::<i32>()
                .all(&self.db)
                .await
                .context("select favorite recipe ids")?,
            RecipeMark::Cart => recipe_carts::Entity::find()
                .select_only()
                .column(recipe_carts::Column::RecipeId)
                .filter(recipe_carts::Column::UserId.eq(user_id))
                .order_by_asc(recipe_carts::Column::Id)
                .into_tuple::<i32>()
                .all(&self.db)
                .await
                .context("select cart recipe ids")?,
        };
        Ok(ids)
    }

    async fn marked_among(
        &self,
        mark: RecipeMark,
        user_id: i32,
        recipe_ids: &[i32],
    ) -> Result<HashSet<i32>, ApiError> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let ids = match mark {
            RecipeMark::Favorite => recipe_favorites::Entity::find()
                .select_only()
                .column(recipe_favorites::Column::RecipeId)
                .filter(recipe_favorites::Column::UserId.eq(user_id))
                .filter(recipe_favorites::Column::RecipeId.is_in(recipe_ids.iter().copied()))
                .into_tuple::<i32>()
                .all(&self.db)
                .await
                .context("select favorited among")?,
            RecipeMark::Cart => recipe_carts::Entity::find()
                .select_only()
                .column(recipe_carts::Column::RecipeId)
                .filter(recipe_carts::Column::UserId.eq(user_id))
                .filter(recipe_carts::Column::RecipeId.is_in(recipe_ids.iter().copied()))
                .into_tuple::<i32>()
                .all(&self.db)
                .await
                .context("select carted among")?,
        };
        Ok(ids.into_iter().collect())
    }

    async fn cart_lines(&self, user_id: i32) -> Result<Vec<CartLine>, ApiError> {
        let recipe_ids = self.recipe_ids(RecipeMark::Cart, user_id).await?;
        let mut by_recipe: HashMap<i32, Vec<CartLine>> = HashMap::new();
        for row in ingredient_rows(&self.db, &recipe_ids)
            .await
            .context("load cart ingredient lines")?
        {
            by_recipe.entry(row.recipe_id).or_default().push(CartLine::new(
                row.name,
                row.measurement_unit,
                i64::from(row.amount),
            ));
        }
        Ok(recipe_ids
            .iter()
            .filter_map(|id| by_recipe.remove(id))
            .flatten()
            .collect())
    }
}
