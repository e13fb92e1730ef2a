use axum::http::{HeaderValue, StatusCode, header::AUTHORIZATION};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use foodgram_api::infra::media::FsMediaStore;
use foodgram_api::router::build_router;
use foodgram_api::state::AppState;
use foodgram_testing::auth::MockAuth;

/// Router over a disconnected database: only paths that never reach
/// storage can succeed.
fn server(media_root: &std::path::Path) -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        token_secret: MockAuth::secret(),
        media: FsMediaStore::new(media_root),
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn should_answer_health_checks() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    server.get("/healthz").await.assert_status_ok();
    server
        .get("/readyz")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_attach_request_id() {
    let dir = tempfile::tempdir().unwrap();
    let response = server(dir.path()).get("/healthz").await;
    assert!(response.maybe_header("x-request-id").is_some());
}

#[tokio::test]
async fn should_reject_protected_routes_without_token() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    for path in [
        "/api/users/me/",
        "/api/users/subscriptions/",
        "/api/recipes/download_shopping_cart/",
    ] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["kind"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn should_reject_invalid_token() {
    let dir = tempfile::tempdir().unwrap();
    let response = server(dir.path())
        .get("/api/users/me/")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Token not-a-jwt"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_log_out_with_valid_token() {
    let dir = tempfile::tempdir().unwrap();
    let (name, value) = MockAuth::new(7).header();
    server(dir.path())
        .post("/api/auth/token/logout/")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn should_return_empty_page_for_anonymous_favorites_filter() {
    let dir = tempfile::tempdir().unwrap();
    let response = server(dir.path())
        .get("/api/recipes/?is_favorited=1&tags=lunch&tags=dinner")
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({
        "count": 0,
        "next": null,
        "previous": null,
        "results": [],
    }));
}

#[tokio::test]
async fn should_serve_uploaded_media() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("recipes/images");
    std::fs::create_dir_all(&images).unwrap();
    std::fs::write(images.join("pie.png"), b"png-bytes").unwrap();

    let response = server(dir.path())
        .get("/media/recipes/images/pie.png")
        .await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"png-bytes");
}

#[tokio::test]
async fn should_report_mistyped_body_fields_as_validation_errors() {
    let dir = tempfile::tempdir().unwrap();
    let (name, value) = MockAuth::new(3).header();
    let response = server(dir.path())
        .post("/api/recipes/")
        .add_header(name, value)
        .json(&json!({
            "name": "Soup",
            "text": "Boil.",
            "cooking_time": "soon",
            "tags": [1],
            "ingredients": [{ "id": 1, "amount": "lots" }],
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VALIDATION_ERROR");
    assert!(body["errors"]["cooking_time"][0].as_str().unwrap().contains("invalid type"));
}

#[tokio::test]
async fn should_report_unparseable_body_as_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let response = server(dir.path())
        .post("/api/auth/token/login/")
        .content_type("application/json")
        .bytes("{\"email\": ".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VALIDATION_ERROR");
    assert!(body["errors"]["non_field_errors"].is_array());
}

#[tokio::test]
async fn should_report_bad_query_values_as_validation_errors() {
    let dir = tempfile::tempdir().unwrap();
    let response = server(dir.path()).get("/api/users/?page=first").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VALIDATION_ERROR");
    assert!(body["errors"].is_object());
}
