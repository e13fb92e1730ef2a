use foodgram_api::domain::types::RecipeMark;
use foodgram_api::error::ApiError;
use foodgram_api::usecase::mark::{AddMarkUseCase, RemoveMarkUseCase};
use foodgram_api::usecase::shopping_cart::DownloadShoppingListUseCase;

use crate::helpers::MemoryStore;

fn add(store: &MemoryStore, mark: RecipeMark) -> AddMarkUseCase<MemoryStore, MemoryStore> {
    AddMarkUseCase {
        recipes: store.clone(),
        marks: store.clone(),
        mark,
    }
}

fn remove(store: &MemoryStore, mark: RecipeMark) -> RemoveMarkUseCase<MemoryStore, MemoryStore> {
    RemoveMarkUseCase {
        recipes: store.clone(),
        marks: store.clone(),
        mark,
    }
}

// ── Favorites & cart ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_repeat_favorite_until_removed() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let recipe = store.seed_recipe(&alice, "soup", &[], &[]);

    let short = add(&store, RecipeMark::Favorite)
        .execute(alice.id, recipe)
        .await
        .unwrap();
    assert_eq!(short.id, recipe);
    assert_eq!(short.name, "soup");

    let again = add(&store, RecipeMark::Favorite).execute(alice.id, recipe).await;
    assert!(matches!(again, Err(ApiError::AlreadyFavorited)));

    remove(&store, RecipeMark::Favorite)
        .execute(alice.id, recipe)
        .await
        .unwrap();
    assert!(
        add(&store, RecipeMark::Favorite)
            .execute(alice.id, recipe)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn should_keep_favorites_and_cart_independent() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let recipe = store.seed_recipe(&alice, "soup", &[], &[]);

    add(&store, RecipeMark::Favorite)
        .execute(alice.id, recipe)
        .await
        .unwrap();
    add(&store, RecipeMark::Cart)
        .execute(alice.id, recipe)
        .await
        .unwrap();
    let again = add(&store, RecipeMark::Cart).execute(alice.id, recipe).await;
    assert!(matches!(again, Err(ApiError::AlreadyInCart)));
}

#[tokio::test]
async fn should_report_missing_mark_on_remove() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let recipe = store.seed_recipe(&alice, "soup", &[], &[]);

    let result = remove(&store, RecipeMark::Cart).execute(alice.id, recipe).await;
    assert!(matches!(result, Err(ApiError::CartItemNotFound)));

    let result = remove(&store, RecipeMark::Favorite)
        .execute(alice.id, recipe)
        .await;
    assert!(matches!(result, Err(ApiError::FavoriteNotFound)));
}

#[tokio::test]
async fn should_return_recipe_not_found_for_unknown_recipe() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");

    let result = add(&store, RecipeMark::Favorite).execute(alice.id, 9999).await;
    assert!(matches!(result, Err(ApiError::RecipeNotFound)));
    let result = remove(&store, RecipeMark::Cart).execute(alice.id, 9999).await;
    assert!(matches!(result, Err(ApiError::RecipeNotFound)));
}

// ── Shopping list ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_sum_cart_ingredients_across_recipes() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let flour = store.seed_ingredient("flour", "g");
    let salt = store.seed_ingredient("salt", "tsp");
    let bread = store.seed_recipe(&alice, "bread", &[], &[(&flour, 200), (&salt, 1)]);
    let pancakes = store.seed_recipe(&alice, "pancakes", &[], &[(&flour, 300)]);
    store.mark(RecipeMark::Cart, &alice, bread);
    store.mark(RecipeMark::Cart, &alice, pancakes);

    let list = DownloadShoppingListUseCase {
        marks: store.clone(),
    }
    .execute(alice.id)
    .await
    .unwrap();

    assert_eq!(list.lines(), vec!["flour (g) - 500", "salt (tsp) - 1"]);
    assert_eq!(
        list.render_text(),
        "Shopping list\n\nflour (g) - 500\nsalt (tsp) - 1\n"
    );
}

#[tokio::test]
async fn should_build_empty_list_for_empty_cart() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");

    let list = DownloadShoppingListUseCase {
        marks: store.clone(),
    }
    .execute(alice.id)
    .await
    .unwrap();
    assert!(list.is_empty());
}
