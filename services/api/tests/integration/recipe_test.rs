use foodgram_api::domain::repository::RecipeRepository;
use foodgram_api::domain::types::{IngredientAmount, RecipeMark};
use foodgram_api::error::ApiError;
use foodgram_api::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesUseCase, RecipeInput,
    RecipeQuery, UpdateRecipeUseCase,
};
use foodgram_domain::pagination::PageRequest;

use crate::helpers::{MemoryStore, PNG_DATA_URL};

type Store = MemoryStore;

fn create(store: &Store) -> CreateRecipeUseCase<Store, Store, Store, Store> {
    CreateRecipeUseCase {
        recipes: store.clone(),
        tags: store.clone(),
        ingredients: store.clone(),
        media: store.clone(),
    }
}

fn update(store: &Store) -> UpdateRecipeUseCase<Store, Store, Store, Store> {
    UpdateRecipeUseCase {
        recipes: store.clone(),
        tags: store.clone(),
        ingredients: store.clone(),
        media: store.clone(),
    }
}

fn get(store: &Store) -> GetRecipeUseCase<Store, Store, Store> {
    GetRecipeUseCase {
        recipes: store.clone(),
        marks: store.clone(),
        subscriptions: store.clone(),
    }
}

fn list(store: &Store) -> ListRecipesUseCase<Store, Store, Store> {
    ListRecipesUseCase {
        recipes: store.clone(),
        marks: store.clone(),
        subscriptions: store.clone(),
    }
}

async fn find(store: &Store, id: i32) -> foodgram_api::domain::types::Recipe {
    RecipeRepository::find_by_id(store, id).await.unwrap().unwrap()
}

// ── Create ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_recipe_with_stored_image() {
    let store = Store::new();
    let alice = store.seed_user("alice");
    let breakfast = store.seed_tag("Breakfast", "breakfast");
    let eggs = store.seed_ingredient("eggs", "pcs");

    let id = create(&store)
        .execute(
            alice.id,
            RecipeInput {
                name: Some("Omelette".to_owned()),
                text: Some("Beat and fry.".to_owned()),
                image: Some(PNG_DATA_URL.to_owned()),
                cooking_time: Some(5),
                tags: Some(vec![breakfast.id]),
                ingredients: Some(vec![IngredientAmount {
                    id: eggs.id,
                    amount: 3,
                }]),
            },
        )
        .await
        .unwrap();

    let recipe = find(&store, id).await;
    assert_eq!(recipe.author.id, alice.id);
    assert_eq!(recipe.image, "recipes/images/upload-1.png");
    assert_eq!(store.saved_images(), vec!["recipes/images/upload-1.png"]);
    assert_eq!(recipe.tags, vec![breakfast]);
    assert_eq!(recipe.ingredients[0].ingredient, eggs);
    assert_eq!(recipe.ingredients[0].amount, 3);
}

#[tokio::test]
async fn should_not_store_image_when_validation_fails() {
    let store = Store::new();
    let alice = store.seed_user("alice");

    let err = create(&store)
        .execute(
            alice.id,
            RecipeInput {
                image: Some(PNG_DATA_URL.to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(store.saved_images().is_empty());
}

#[tokio::test]
async fn should_remove_uploaded_image_when_insert_fails() {
    let store = Store::new();
    let alice = store.seed_user("alice");
    let breakfast = store.seed_tag("Breakfast", "breakfast");
    let eggs = store.seed_ingredient("eggs", "pcs");
    store.fail_recipe_writes();

    let err = create(&store)
        .execute(
            alice.id,
            RecipeInput {
                name: Some("Omelette".to_owned()),
                text: Some("Beat and fry.".to_owned()),
                image: Some(PNG_DATA_URL.to_owned()),
                cooking_time: Some(5),
                tags: Some(vec![breakfast.id]),
                ingredients: Some(vec![IngredientAmount { id: eggs.id, amount: 3 }]),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Internal(_)));
    assert!(store.saved_images().is_empty());
    assert_eq!(store.removed_images(), vec!["recipes/images/upload-1.png"]);
}

// ── Update ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_remove_replaced_image_after_update() {
    let store = Store::new();
    let alice = store.seed_user("alice");
    let tag = store.seed_tag("Dinner", "dinner");
    let flour = store.seed_ingredient("flour", "g");
    let id = store.seed_recipe(&alice, "pie", &[&tag], &[(&flour, 200)]);

    update(&store)
        .execute(
            alice.id,
            id,
            RecipeInput {
                image: Some(PNG_DATA_URL.to_owned()),
                tags: Some(vec![tag.id]),
                ingredients: Some(vec![IngredientAmount { id: flour.id, amount: 250 }]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let recipe = find(&store, id).await;
    assert_eq!(recipe.image, "recipes/images/upload-1.png");
    assert_eq!(store.saved_images(), vec!["recipes/images/upload-1.png"]);
    assert_eq!(store.removed_images(), vec![format!("recipes/images/{id}.png")]);
}

#[tokio::test]
async fn should_keep_current_image_when_update_fails() {
    let store = Store::new();
    let alice = store.seed_user("alice");
    let tag = store.seed_tag("Dinner", "dinner");
    let flour = store.seed_ingredient("flour", "g");
    let id = store.seed_recipe(&alice, "pie", &[&tag], &[(&flour, 200)]);
    store.fail_recipe_writes();

    let err = update(&store)
        .execute(
            alice.id,
            id,
            RecipeInput {
                image: Some(PNG_DATA_URL.to_owned()),
                tags: Some(vec![tag.id]),
                ingredients: Some(vec![IngredientAmount { id: flour.id, amount: 250 }]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Internal(_)));

    assert_eq!(find(&store, id).await.image, format!("recipes/images/{id}.png"));
    assert!(store.saved_images().is_empty());
    assert_eq!(store.removed_images(), vec!["recipes/images/upload-1.png"]);
}

#[tokio::test]
async fn should_replace_ingredient_and_tag_sets_on_update() {
    let store = Store::new();
    let alice = store.seed_user("alice");
    let tag = store.seed_tag("Dinner", "dinner");
    let lunch = store.seed_tag("Lunch", "lunch");
    let sweet = store.seed_tag("Sweet", "sweet");
    let a = store.seed_ingredient("apple", "pcs");
    let b = store.seed_ingredient("butter", "g");
    let c = store.seed_ingredient("cinnamon", "tsp");
    let id = store.seed_recipe(&alice, "pie", &[&tag, &lunch], &[(&a, 2), (&b, 50)]);

    update(&store)
        .execute(
            alice.id,
            id,
            RecipeInput {
                tags: Some(vec![sweet.id]),
                ingredients: Some(vec![IngredientAmount { id: c.id, amount: 1 }]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let recipe = find(&store, id).await;
    assert_eq!(recipe.ingredients.len(), 1);
    assert_eq!(recipe.ingredients[0].ingredient, c);
    assert_eq!(recipe.tags, vec![sweet]);
    assert_eq!(recipe.name, "pie");
    assert_eq!(recipe.image, format!("recipes/images/{id}.png"));
    assert!(store.saved_images().is_empty());
}

#[tokio::test]
async fn should_require_tags_and_ingredients_on_update() {
    let store = Store::new();
    let alice = store.seed_user("alice");
    let id = store.seed_recipe(&alice, "pie", &[], &[]);

    let err = update(&store)
        .execute(
            alice.id,
            id,
            RecipeInput {
                name: Some("better pie".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    let ApiError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(errors.get("tags").is_some());
    assert!(errors.get("ingredients").is_some());
    assert!(errors.get("name").is_none());
}

#[tokio::test]
async fn should_forbid_updating_foreign_recipe() {
    let store = Store::new();
    let alice = store.seed_user("alice");
    let bob = store.seed_user("bob");
    let id = store.seed_recipe(&alice, "pie", &[], &[]);

    let result = update(&store)
        .execute(bob.id, id, RecipeInput::default())
        .await;
    assert!(matches!(result, Err(ApiError::Forbidden)));
}

// ── Delete ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_only_own_recipe() {
    let store = Store::new();
    let alice = store.seed_user("alice");
    let bob = store.seed_user("bob");
    let id = store.seed_recipe(&alice, "pie", &[], &[]);
    let usecase = DeleteRecipeUseCase {
        recipes: store.clone(),
    };

    let foreign = usecase.execute(bob.id, id).await;
    assert!(matches!(foreign, Err(ApiError::Forbidden)));

    usecase.execute(alice.id, id).await.unwrap();
    let gone = usecase.execute(alice.id, id).await;
    assert!(matches!(gone, Err(ApiError::RecipeNotFound)));
}

// ── Read ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_false_flags_for_anonymous_caller() {
    let store = Store::new();
    let alice = store.seed_user("alice");
    let bob = store.seed_user("bob");
    let id = store.seed_recipe(&alice, "pie", &[], &[]);
    store.mark(RecipeMark::Favorite, &bob, id);
    store.mark(RecipeMark::Cart, &bob, id);
    store.follow(&bob, &alice);

    let anonymous = get(&store).execute(None, id).await.unwrap();
    assert!(!anonymous.is_favorited);
    assert!(!anonymous.is_in_shopping_cart);
    assert!(!anonymous.author_is_subscribed);

    let viewer = get(&store).execute(Some(bob.id), id).await.unwrap();
    assert!(viewer.is_favorited);
    assert!(viewer.is_in_shopping_cart);
    assert!(viewer.author_is_subscribed);
}

#[tokio::test]
async fn should_list_newest_first_and_match_any_tag() {
    let store = Store::new();
    let alice = store.seed_user("alice");
    let breakfast = store.seed_tag("Breakfast", "breakfast");
    let lunch = store.seed_tag("Lunch", "lunch");
    let dinner = store.seed_tag("Dinner", "dinner");
    let porridge = store.seed_recipe(&alice, "porridge", &[&breakfast], &[]);
    let soup = store.seed_recipe(&alice, "soup", &[&lunch], &[]);
    store.seed_recipe(&alice, "steak", &[&dinner], &[]);

    let query = RecipeQuery {
        tags: vec!["breakfast".to_owned(), "lunch".to_owned()],
        ..Default::default()
    };
    let (views, count) = list(&store)
        .execute(None, query, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(count, 2);
    let ids: Vec<i32> = views.iter().map(|v| v.recipe.id).collect();
    assert_eq!(ids, vec![soup, porridge]);
}

#[tokio::test]
async fn should_return_empty_page_for_anonymous_mark_filters() {
    let store = Store::new();
    let alice = store.seed_user("alice");
    store.seed_recipe(&alice, "pie", &[], &[]);

    let query = RecipeQuery {
        is_favorited: true,
        ..Default::default()
    };
    let (views, count) = list(&store)
        .execute(None, query, PageRequest::default())
        .await
        .unwrap();
    assert!(views.is_empty());
    assert_eq!(count, 0);
}

#[tokio::test]
async fn should_intersect_favorite_and_cart_filters() {
    let store = Store::new();
    let alice = store.seed_user("alice");
    let pie = store.seed_recipe(&alice, "pie", &[], &[]);
    let soup = store.seed_recipe(&alice, "soup", &[], &[]);
    let cake = store.seed_recipe(&alice, "cake", &[], &[]);
    store.mark(RecipeMark::Favorite, &alice, pie);
    store.mark(RecipeMark::Favorite, &alice, soup);
    store.mark(RecipeMark::Cart, &alice, soup);
    store.mark(RecipeMark::Cart, &alice, cake);

    let query = RecipeQuery {
        is_favorited: true,
        is_in_shopping_cart: true,
        ..Default::default()
    };
    let (views, count) = list(&store)
        .execute(Some(alice.id), query, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(count, 1);
    assert_eq!(views[0].recipe.id, soup);
    assert!(views[0].is_favorited && views[0].is_in_shopping_cart);
}

#[tokio::test]
async fn should_filter_by_author() {
    let store = Store::new();
    let alice = store.seed_user("alice");
    let bob = store.seed_user("bob");
    store.seed_recipe(&alice, "pie", &[], &[]);
    let stew = store.seed_recipe(&bob, "stew", &[], &[]);

    let query = RecipeQuery {
        author: Some(bob.id),
        ..Default::default()
    };
    let (views, count) = list(&store)
        .execute(Some(alice.id), query, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(views[0].recipe.id, stew);
}
