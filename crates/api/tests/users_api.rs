//! HTTP-level integration tests for `/users` and `/users/me`.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, get_auth, patch_json_auth, post_json_auth};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_manages_users(pool: PgPool) {
    let admin = common::user_token(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);

    let created = post_json_auth(
        app.clone(),
        "/api/v1/users/",
        json!({ "username": "jane", "email": "jane@test.com", "role": "moderator" }),
        &admin,
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(created).await["data"],
        json!({
            "username": "jane",
            "email": "jane@test.com",
            "first_name": "",
            "last_name": "",
            "bio": "",
            "role": "moderator"
        })
    );

    let fetched = get_auth(app.clone(), "/api/v1/users/jane", &admin).await;
    assert_eq!(fetched.status(), StatusCode::OK);

    let patched =
        patch_json_auth(app.clone(), "/api/v1/users/jane", json!({ "bio": "Reads a lot" }), &admin)
            .await;
    assert_eq!(patched.status(), StatusCode::OK);
    let patched = body_json(patched).await;
    assert_eq!(patched["data"]["bio"], "Reads a lot");
    assert_eq!(patched["data"]["role"], "moderator");

    let removed = delete_auth(app.clone(), "/api/v1/users/jane", &admin).await;
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);

    let gone = get_auth(app, "/api/v1/users/jane", &admin).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_list_supports_exact_search(pool: PgPool) {
    let admin = common::user_token(&pool, "root", "admin").await;
    common::create_user(&pool, "jane", "user").await;
    common::create_user(&pool, "janet", "user").await;
    let app = common::build_test_app(pool);

    let all = body_json(get_auth(app.clone(), "/api/v1/users", &admin).await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 3);

    let one = body_json(get_auth(app, "/api/v1/users?search=jane", &admin).await).await;
    let users = one["data"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "jane");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_management_is_admin_only(pool: PgPool) {
    let moderator = common::user_token(&pool, "mod", "moderator").await;
    let app = common::build_test_app(pool);

    let anonymous = get(app.clone(), "/api/v1/users").await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let staff = get_auth(app, "/api/v1/users", &moderator).await;
    assert_eq!(staff.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_user_validates_fields(pool: PgPool) {
    let admin = common::user_token(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/users",
        json!({ "username": "me", "email": "bad", "role": "superuser" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["username"].is_array());
    assert!(json["fields"]["email"].is_array());
    assert!(json["fields"]["role"].is_array());

    let duplicate = post_json_auth(
        app,
        "/api/v1/users",
        json!({ "username": "root", "email": "other@test.com" }),
        &admin,
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(duplicate).await["fields"]["username"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_returns_own_profile(pool: PgPool) {
    let token = common::user_token(&pool, "alice", "user").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/v1/users/me/", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "alice");
    assert_eq!(json["data"]["email"], "alice@test.com");

    let anonymous = get(app, "/api/v1/users/me").await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plain_user_cannot_raise_own_role(pool: PgPool) {
    let token = common::user_token(&pool, "alice", "user").await;
    let app = common::build_test_app(pool);

    let response = patch_json_auth(
        app,
        "/api/v1/users/me",
        json!({ "role": "admin", "first_name": "Alice" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "user");
    assert_eq!(json["data"]["first_name"], "Alice");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_may_change_own_role(pool: PgPool) {
    let token = common::user_token(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);

    let response =
        patch_json_auth(app, "/api/v1/users/me", json!({ "role": "moderator" }), &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "moderator");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_user_token_stops_working(pool: PgPool) {
    let admin = common::user_token(&pool, "root", "admin").await;
    let alice = common::create_user(&pool, "alice", "user").await;
    let alice_token = common::token_for(&alice);
    let app = common::build_test_app(pool);

    delete_auth(app.clone(), "/api/v1/users/alice", &admin).await;

    let response = get_auth(app, "/api/v1/users/me", &alice_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
