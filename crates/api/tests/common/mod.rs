#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use yamdb_api::auth::jwt::{generate_access_token, JwtConfig};
use yamdb_api::config::{ConfirmationConfig, ServerConfig};
use yamdb_api::mail::{MailError, MailTemplate, Mailer, OutgoingMail};
use yamdb_api::router::{build_app_router, App};
use yamdb_api::state::AppState;
use yamdb_core::confirmation::DEFAULT_CODE_TTL_SECS;
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults and fixed secrets.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-jwt-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        confirmation: ConfirmationConfig {
            secret: "test-confirmation-secret".to_string(),
            code_ttl_secs: DEFAULT_CODE_TTL_SECS,
        },
        mail: MailTemplate::default(),
        bootstrap_admin_email: None,
    }
}

// ---------------------------------------------------------------------------
// Mail capture
// ---------------------------------------------------------------------------

/// Mailer that keeps every message in memory.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    /// The code from the most recent message to `to`.
    pub fn last_code_for(&self, to: &str) -> String {
        let sent = self.sent.lock().unwrap();
        let mail = sent
            .iter()
            .rev()
            .find(|m| m.to == to)
            .unwrap_or_else(|| panic!("no mail sent to {to}"));
        let prefix = MailTemplate::default().text;
        mail.body
            .strip_prefix(&prefix)
            .expect("mail body starts with the template text")
            .to_string()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Build the full application with all middleware layers and a recording
/// mailer, returning both.
pub fn build_test_app_with_mailer(pool: PgPool) -> (App, Arc<RecordingMailer>) {
    let config = test_config();
    let mailer = Arc::new(RecordingMailer::default());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: mailer.clone(),
    };

    (build_app_router(state, &config), mailer)
}

/// Build the full application with all middleware layers.
pub fn build_test_app(pool: PgPool) -> App {
    build_test_app_with_mailer(pool).0
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user with `role` directly and return the row.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            role: Some(role.to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Mint an access token for `user` with the test JWT secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &test_config().jwt).expect("token generation should succeed")
}

/// Create a user with `role` and return a token for them.
pub async fn user_token(pool: &PgPool, username: &str, role: &str) -> String {
    let user = create_user(pool, username, role).await;
    token_for(&user)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: App, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

fn with_json(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    builder(method, uri, token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn get(app: App, uri: &str) -> Response {
    send(app, builder(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: App, uri: &str, token: &str) -> Response {
    send(
        app,
        builder(Method::GET, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: App, uri: &str, body: serde_json::Value) -> Response {
    send(app, with_json(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(app: App, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, with_json(Method::POST, uri, Some(token), body)).await
}

pub async fn patch_json_auth(
    app: App,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, with_json(Method::PATCH, uri, Some(token), body)).await
}

pub async fn delete(app: App, uri: &str) -> Response {
    send(
        app,
        builder(Method::DELETE, uri, None)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn delete_auth(app: App, uri: &str, token: &str) -> Response {
    send(
        app,
        builder(Method::DELETE, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
