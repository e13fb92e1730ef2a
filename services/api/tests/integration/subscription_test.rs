use foodgram_api::error::ApiError;
use foodgram_api::usecase::subscription::{
    ListSubscriptionsUseCase, SubscribeUseCase, UnsubscribeUseCase,
};
use foodgram_domain::pagination::PageRequest;

use crate::helpers::MemoryStore;

fn subscribe(store: &MemoryStore) -> SubscribeUseCase<MemoryStore, MemoryStore, MemoryStore> {
    SubscribeUseCase {
        users: store.clone(),
        subscriptions: store.clone(),
        recipes: store.clone(),
    }
}

#[tokio::test]
async fn should_subscribe_and_cap_embedded_recipes() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let bob = store.seed_user("bob");
    let first = store.seed_recipe(&bob, "soup", &[], &[]);
    let second = store.seed_recipe(&bob, "stew", &[], &[]);
    let third = store.seed_recipe(&bob, "pie", &[], &[]);

    let view = subscribe(&store)
        .execute(alice.id, bob.id, Some(2))
        .await
        .unwrap();

    assert_eq!(view.author.id, bob.id);
    assert_eq!(view.recipes_count, 3);
    let ids: Vec<i32> = view.recipes.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![third, second]);
    assert!(!ids.contains(&first));
}

#[tokio::test]
async fn should_embed_every_recipe_without_positive_limit() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let bob = store.seed_user("bob");
    store.seed_recipe(&bob, "soup", &[], &[]);
    store.seed_recipe(&bob, "stew", &[], &[]);

    let view = subscribe(&store)
        .execute(alice.id, bob.id, Some(0))
        .await
        .unwrap();
    assert_eq!(view.recipes.len(), 2);
}

#[tokio::test]
async fn should_reject_self_subscription() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");

    let result = subscribe(&store).execute(alice.id, alice.id, None).await;
    assert!(matches!(result, Err(ApiError::SelfSubscription)));
}

#[tokio::test]
async fn should_reject_second_subscription_to_same_author() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let bob = store.seed_user("bob");

    subscribe(&store).execute(alice.id, bob.id, None).await.unwrap();
    let result = subscribe(&store).execute(alice.id, bob.id, None).await;
    assert!(matches!(result, Err(ApiError::AlreadySubscribed)));
}

#[tokio::test]
async fn should_return_not_found_for_unknown_author() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");

    let result = subscribe(&store).execute(alice.id, 9999, None).await;
    assert!(matches!(result, Err(ApiError::UserNotFound)));
}

#[tokio::test]
async fn should_unsubscribe_once() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let bob = store.seed_user("bob");
    store.follow(&alice, &bob);
    let usecase = UnsubscribeUseCase {
        users: store.clone(),
        subscriptions: store.clone(),
    };

    usecase.execute(alice.id, bob.id).await.unwrap();
    let again = usecase.execute(alice.id, bob.id).await;
    assert!(matches!(again, Err(ApiError::SubscriptionNotFound)));
}

#[tokio::test]
async fn should_list_followed_authors_with_counts() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let bob = store.seed_user("bob");
    let carol = store.seed_user("carol");
    store.seed_recipe(&bob, "soup", &[], &[]);
    store.seed_recipe(&carol, "cake", &[], &[]);
    store.seed_recipe(&carol, "tart", &[], &[]);
    store.follow(&alice, &bob);
    store.follow(&alice, &carol);

    let usecase = ListSubscriptionsUseCase {
        subscriptions: store.clone(),
        recipes: store.clone(),
    };
    let (views, count) = usecase
        .execute(alice.id, PageRequest::default(), Some(1))
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(views[0].author.id, bob.id);
    assert_eq!(views[0].recipes_count, 1);
    assert_eq!(views[1].author.id, carol.id);
    assert_eq!(views[1].recipes_count, 2);
    assert_eq!(views[1].recipes.len(), 1);
    assert_eq!(views[1].recipes[0].name, "tart");
}
