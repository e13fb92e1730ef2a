use foodgram_api::error::ApiError;
use foodgram_api::usecase::auth::{LoginInput, LoginUseCase};
use foodgram_api::usecase::user::{
    GetUserUseCase, ListUsersUseCase, RegisterUserInput, RegisterUserUseCase, SetPasswordInput,
    SetPasswordUseCase,
};
use foodgram_auth_types::identity::TokenSecret;
use foodgram_auth_types::token::validate_token;
use foodgram_domain::pagination::PageRequest;

use crate::helpers::{MemoryStore, TEST_PASSWORD};

const SECRET: &str = "integration-secret";

fn register_input(username: &str, email: &str) -> RegisterUserInput {
    RegisterUserInput {
        email: Some(email.to_owned()),
        username: Some(username.to_owned()),
        first_name: Some("Vasya".to_owned()),
        last_name: Some("Pupkin".to_owned()),
        password: Some("Qwerty123!".to_owned()),
    }
}

fn login(store: &MemoryStore) -> LoginUseCase<MemoryStore> {
    LoginUseCase {
        repo: store.clone(),
        secret: TokenSecret::new(SECRET),
    }
}

// ── Register + login ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_then_log_in_with_same_credentials() {
    let store = MemoryStore::new();
    let register = RegisterUserUseCase { repo: store.clone() };

    let user = register
        .execute(register_input("vasya", "Vasya@Example.COM"))
        .await
        .unwrap();
    assert_eq!(user.email, "Vasya@example.com");

    let token = login(&store)
        .execute(LoginInput {
            email: Some("Vasya@example.com".to_owned()),
            password: Some("Qwerty123!".to_owned()),
        })
        .await
        .unwrap();
    assert_eq!(validate_token(&token, SECRET).unwrap().user_id, user.id);
}

#[tokio::test]
async fn should_reject_taken_username_and_email() {
    let store = MemoryStore::new();
    store.seed_user("alice");
    let register = RegisterUserUseCase { repo: store.clone() };

    let err = register
        .execute(register_input("alice", "alice@example.com"))
        .await
        .unwrap_err();
    let ApiError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(errors.get("username").is_some());
    assert!(errors.get("email").is_some());
}

#[tokio::test]
async fn should_reject_wrong_password_on_login() {
    let store = MemoryStore::new();
    store.seed_user("alice");

    let result = login(&store)
        .execute(LoginInput {
            email: Some("alice@example.com".to_owned()),
            password: Some("nope".to_owned()),
        })
        .await;
    assert!(matches!(result, Err(ApiError::InvalidCredentials)));
}

// ── SetPassword ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_change_password_and_log_in_with_new_one() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let usecase = SetPasswordUseCase { repo: store.clone() };

    usecase
        .execute(
            alice.id,
            SetPasswordInput {
                current_password: Some(TEST_PASSWORD.to_owned()),
                new_password: Some("brand-new-secret".to_owned()),
            },
        )
        .await
        .unwrap();
    assert_ne!(store.password_hash(alice.id), alice.password_hash);

    let old = login(&store)
        .execute(LoginInput {
            email: Some(alice.email.clone()),
            password: Some(TEST_PASSWORD.to_owned()),
        })
        .await;
    assert!(matches!(old, Err(ApiError::InvalidCredentials)));

    let token = login(&store)
        .execute(LoginInput {
            email: Some(alice.email.clone()),
            password: Some("brand-new-secret".to_owned()),
        })
        .await;
    assert!(token.is_ok());
}

// ── Get / list ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_flag_followed_users_for_caller_only() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice");
    let bob = store.seed_user("bob");
    store.follow(&alice, &bob);

    let get = GetUserUseCase {
        users: store.clone(),
        subscriptions: store.clone(),
    };
    assert!(get.execute(Some(alice.id), bob.id).await.unwrap().is_subscribed);
    assert!(!get.execute(Some(bob.id), alice.id).await.unwrap().is_subscribed);
    assert!(!get.execute(None, bob.id).await.unwrap().is_subscribed);

    let missing = get.execute(None, 9999).await;
    assert!(matches!(missing, Err(ApiError::UserNotFound)));
}

#[tokio::test]
async fn should_list_users_in_pages() {
    let store = MemoryStore::new();
    for name in ["u1", "u2", "u3"] {
        store.seed_user(name);
    }
    let list = ListUsersUseCase {
        users: store.clone(),
        subscriptions: store.clone(),
    };

    let (first, count) = list
        .execute(None, PageRequest::from_query(Some(1), Some(2)))
        .await
        .unwrap();
    assert_eq!(count, 3);
    assert_eq!(first.len(), 2);

    let (second, _) = list
        .execute(None, PageRequest::from_query(Some(2), Some(2)))
        .await
        .unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].user.username, "u3");
}
