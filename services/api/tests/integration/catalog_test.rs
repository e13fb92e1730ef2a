use foodgram_api::error::ApiError;
use foodgram_api::usecase::ingredient::{GetIngredientUseCase, SearchIngredientsUseCase};
use foodgram_api::usecase::tag::{GetTagUseCase, ListTagsUseCase};

use crate::helpers::MemoryStore;

#[tokio::test]
async fn should_match_ingredient_substring_ignoring_case() {
    let store = MemoryStore::new();
    store.seed_ingredient("Apple", "pcs");
    store.seed_ingredient("Pineapple", "g");
    store.seed_ingredient("Carrot", "g");
    let usecase = SearchIngredientsUseCase {
        repo: store.clone(),
    };

    let found = usecase.execute(Some("app")).await.unwrap();
    let names: Vec<&str> = found.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Apple", "Pineapple"]);
}

#[tokio::test]
async fn should_list_every_ingredient_for_blank_name() {
    let store = MemoryStore::new();
    store.seed_ingredient("Apple", "pcs");
    store.seed_ingredient("Carrot", "g");
    let usecase = SearchIngredientsUseCase {
        repo: store.clone(),
    };

    assert_eq!(usecase.execute(Some("  ")).await.unwrap().len(), 2);
    assert_eq!(usecase.execute(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_catalogue_ids() {
    let store = MemoryStore::new();
    let tag = store.seed_tag("Breakfast", "breakfast");

    let got = GetTagUseCase { repo: store.clone() }
        .execute(tag.id)
        .await
        .unwrap();
    assert_eq!(got, tag);

    let missing = GetTagUseCase { repo: store.clone() }.execute(9999).await;
    assert!(matches!(missing, Err(ApiError::TagNotFound)));
    let missing = GetIngredientUseCase { repo: store.clone() }.execute(9999).await;
    assert!(matches!(missing, Err(ApiError::IngredientNotFound)));
}

#[tokio::test]
async fn should_list_tags_in_creation_order() {
    let store = MemoryStore::new();
    store.seed_tag("Breakfast", "breakfast");
    store.seed_tag("Dinner", "dinner");

    let tags = ListTagsUseCase { repo: store.clone() }.execute().await.unwrap();
    let slugs: Vec<&str> = tags.iter().map(|t| t.slug.as_str()).collect();
    assert_eq!(slugs, vec!["breakfast", "dinner"]);
}
