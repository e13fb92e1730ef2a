use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;

use foodgram_core::health::{healthz, readyz};
use foodgram_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    auth::{login, logout},
    ingredient::{get_ingredient, list_ingredients},
    mark::{add_favorite, add_to_cart, remove_favorite, remove_from_cart},
    recipe::{create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe},
    shopping_cart::download_shopping_cart,
    subscription::{list_subscriptions, subscribe, unsubscribe},
    tag::{get_tag, list_tags},
    user::{get_me, get_user, list_users, register, set_password},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let media = ServeDir::new(&state.media.root);

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/api/auth/token/login/", post(login))
        .route("/api/auth/token/logout/", post(logout))
        // Users
        .route("/api/users/", get(list_users).post(register))
        .route("/api/users/me/", get(get_me))
        .route("/api/users/set_password/", post(set_password))
        .route("/api/users/{id}/", get(get_user))
        // Subscriptions
        .route("/api/users/subscriptions/", get(list_subscriptions))
        .route(
            "/api/users/{id}/subscribe/",
            get(subscribe).post(subscribe).delete(unsubscribe),
        )
        // Tags & ingredients
        .route("/api/tags/", get(list_tags))
        .route("/api/tags/{id}/", get(get_tag))
        .route("/api/ingredients/", get(list_ingredients))
        .route("/api/ingredients/{id}/", get(get_ingredient))
        // Recipes
        .route("/api/recipes/", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/download_shopping_cart/",
            get(download_shopping_cart),
        )
        .route(
            "/api/recipes/{id}/",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/api/recipes/{id}/favorite/",
            post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/api/recipes/{id}/shopping_cart/",
            post(add_to_cart).delete(remove_from_cart),
        )
        // Uploaded images
        .nest_service("/media", media)
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(trace_layer())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
