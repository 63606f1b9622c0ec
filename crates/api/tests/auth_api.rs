//! HTTP-level integration tests for signup and token exchange.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json};
use serde_json::json;
use sqlx::PgPool;
use yamdb_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// POST /auth/email
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn email_signup_creates_user_and_mails_code(pool: PgPool) {
    let (app, mailer) = common::build_test_app_with_mailer(pool.clone());

    let response = post_json(app, "/api/v1/auth/email/", json!({ "email": "a@b.com" })).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "email": "a@b.com" }));

    let user = UserRepo::find_by_email(&pool, "a@b.com").await.unwrap().unwrap();
    assert_eq!(user.username, "a@b.com");
    assert_eq!(user.role, "user");

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@b.com");
    assert_eq!(sent[0].subject, "Confirmation code");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_signup_reuses_the_account(pool: PgPool) {
    let (app, mailer) = common::build_test_app_with_mailer(pool.clone());

    post_json(app.clone(), "/api/v1/auth/email", json!({ "email": "a@b.com" })).await;
    let response = post_json(app, "/api/v1/auth/email", json!({ "email": "a@b.com" })).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(mailer.sent().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_without_email_is_a_field_error(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/auth/email", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"]["email"][0], "This field is required.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_with_invalid_email_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/auth/email", json!({ "email": "not-an-email" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["email"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_rejects_username_taken_by_another_account(pool: PgPool) {
    // Username "c@d.com" belongs to an account with a different email.
    UserRepo::create(
        &pool,
        &yamdb_db::models::user::CreateUser {
            username: "c@d.com".into(),
            email: "other@d.com".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/auth/email", json!({ "email": "c@d.com" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["username"].is_array());
}

// ---------------------------------------------------------------------------
// POST /auth/token
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn correct_code_yields_working_token(pool: PgPool) {
    let (app, mailer) = common::build_test_app_with_mailer(pool);

    post_json(app.clone(), "/api/v1/auth/email", json!({ "email": "a@b.com" })).await;
    let code = mailer.last_code_for("a@b.com");

    let response = post_json(
        app.clone(),
        "/api/v1/auth/token/",
        json!({ "email": "a@b.com", "confirmation_code": code }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["token"].as_str().expect("response must contain token");

    let me = get_auth(app, "/api/v1/users/me", token).await;
    assert_eq!(me.status(), StatusCode::OK);
    let me = body_json(me).await;
    assert_eq!(me["data"]["username"], "a@b.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_code_is_not_acceptable(pool: PgPool) {
    let app = common::build_test_app(pool);

    post_json(app.clone(), "/api/v1/auth/email", json!({ "email": "a@b.com" })).await;
    let response = post_json(
        app,
        "/api/v1/auth/token",
        json!({ "email": "a@b.com", "confirmation_code": "zzzz-0000" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let json = body_json(response).await;
    assert_eq!(json["error"], "error code");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn code_works_only_once(pool: PgPool) {
    let (app, mailer) = common::build_test_app_with_mailer(pool);

    post_json(app.clone(), "/api/v1/auth/email", json!({ "email": "a@b.com" })).await;
    let code = mailer.last_code_for("a@b.com");
    let body = json!({ "email": "a@b.com", "confirmation_code": code });

    let first = post_json(app.clone(), "/api/v1/auth/token", body.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(app, "/api/v1/auth/token", body).await;
    assert_eq!(second.status(), StatusCode::NOT_ACCEPTABLE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_email_is_not_acceptable(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/token",
        json!({ "email": "ghost@b.com", "confirmation_code": "abc-123" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No such e-mail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_request_requires_both_fields(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/auth/token", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["email"].is_array());
    assert!(json["fields"]["confirmation_code"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_bearer_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/titles", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
