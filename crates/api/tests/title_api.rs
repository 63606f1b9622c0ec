//! HTTP-level integration tests for `/titles`.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, patch_json_auth, post_json_auth};
use serde_json::json;
use sqlx::PgPool;

use yamdb_api::router::App;

/// Seed a category and two genres through the API.
async fn seed_catalog(app: &App, token: &str) {
    post_json_auth(app.clone(), "/api/v1/categories", json!({ "name": "Books" }), token).await;
    post_json_auth(app.clone(), "/api/v1/genres", json!({ "name": "Sci-Fi", "slug": "sci-fi" }), token).await;
    post_json_auth(app.clone(), "/api/v1/genres", json!({ "name": "Adventure" }), token).await;
}

async fn create_title(app: &App, token: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(app.clone(), "/api/v1/titles", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_returns_detail_with_relations(pool: PgPool) {
    let token = common::user_token(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);
    seed_catalog(&app, &token).await;

    let title = create_title(
        &app,
        &token,
        json!({ "name": "Dune", "year": 1965, "category": "books", "genre": ["sci-fi", "adventure"] }),
    )
    .await;

    assert_eq!(title["name"], "Dune");
    assert_eq!(title["year"], 1965);
    assert_eq!(title["rating"], serde_json::Value::Null);
    assert_eq!(title["category"], json!({ "name": "Books", "slug": "books" }));
    // Genres are ordered by name.
    assert_eq!(
        title["genre"],
        json!([
            { "name": "Adventure", "slug": "adventure" },
            { "name": "Sci-Fi", "slug": "sci-fi" }
        ])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_slugs_are_field_errors(pool: PgPool) {
    let token = common::user_token(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);
    seed_catalog(&app, &token).await;

    let response = post_json_auth(
        app,
        "/api/v1/titles",
        json!({ "name": "Dune", "category": "films", "genre": ["sci-fi", "horror"] }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"]["category"][0], "Object with slug=films does not exist.");
    assert_eq!(json["fields"]["genre"][0], "Object with slug=horror does not exist.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_combine(pool: PgPool) {
    let token = common::user_token(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);
    seed_catalog(&app, &token).await;

    create_title(&app, &token, json!({ "name": "Dune", "year": 1965, "category": "books", "genre": ["sci-fi"] })).await;
    create_title(&app, &token, json!({ "name": "Solaris", "year": 1961, "category": "books", "genre": ["sci-fi"] })).await;
    create_title(&app, &token, json!({ "name": "Treasure Island", "year": 1883, "genre": ["adventure"] })).await;

    let by_genre = body_json(get(app.clone(), "/api/v1/titles?genre=sci-fi").await).await;
    assert_eq!(by_genre["data"].as_array().unwrap().len(), 2);

    let by_genre_and_year =
        body_json(get(app.clone(), "/api/v1/titles?genre=sci-fi&year=1961").await).await;
    let titles = by_genre_and_year["data"].as_array().unwrap();
    assert_eq!(titles.len(), 1);
    assert_eq!(titles[0]["name"], "Solaris");

    let by_category = body_json(get(app.clone(), "/api/v1/titles?category=books").await).await;
    assert_eq!(by_category["data"].as_array().unwrap().len(), 2);

    let by_name = body_json(get(app, "/api/v1/titles?name=Treasure%20Island").await).await;
    assert_eq!(by_name["data"][0]["year"], 1883);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn patch_replaces_genres_and_keeps_other_fields(pool: PgPool) {
    let token = common::user_token(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);
    seed_catalog(&app, &token).await;

    let title = create_title(
        &app,
        &token,
        json!({ "name": "Dune", "year": 1965, "category": "books", "genre": ["sci-fi"] }),
    )
    .await;
    let uri = format!("/api/v1/titles/{}/", title["id"]);

    let response = patch_json_auth(app, &uri, json!({ "genre": ["adventure"] }), &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Dune");
    assert_eq!(json["data"]["year"], 1965);
    assert_eq!(json["data"]["category"]["slug"], "books");
    assert_eq!(json["data"]["genre"], json!([{ "name": "Adventure", "slug": "adventure" }]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plain_user_cannot_modify_titles(pool: PgPool) {
    let admin = common::user_token(&pool, "root", "admin").await;
    let user = common::user_token(&pool, "reader", "user").await;
    let app = common::build_test_app(pool);

    let title = create_title(&app, &admin, json!({ "name": "Dune" })).await;
    let uri = format!("/api/v1/titles/{}", title["id"]);

    let patch = patch_json_auth(app.clone(), &uri, json!({ "name": "Dune Messiah" }), &user).await;
    assert_eq!(patch.status(), StatusCode::FORBIDDEN);

    let remove = delete_auth(app.clone(), &uri, &user).await;
    assert_eq!(remove.status(), StatusCode::FORBIDDEN);

    let read = get(app, &uri).await;
    assert_eq!(read.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_title_is_404(pool: PgPool) {
    let token = common::user_token(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);

    assert_eq!(get(app.clone(), "/api/v1/titles/999").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        delete_auth(app, "/api/v1/titles/999", &token).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_category_keeps_title(pool: PgPool) {
    let token = common::user_token(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);
    seed_catalog(&app, &token).await;

    let title = create_title(&app, &token, json!({ "name": "Dune", "category": "books" })).await;
    let removed = delete_auth(app.clone(), "/api/v1/categories/books", &token).await;
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/titles/{}", title["id"])).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["category"], serde_json::Value::Null);
}
