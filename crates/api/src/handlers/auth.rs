//! Handlers for `/auth`: email confirmation codes and token exchange.
//!
//! Signup and login are the same flow. `POST /auth/email` mails a code to
//! the address (creating the account on first use), and `POST /auth/token`
//! exchanges a valid code for an access token. Codes are stateless HMACs
//! bound to the user's `last_login_at`, so a successful exchange invalidates
//! every outstanding code for that user.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use yamdb_core::confirmation::{check_code, make_code, CodeSubject};
use yamdb_core::error::{CoreError, FieldErrors};
use yamdb_core::validation::{validate_email, validate_username, REQUIRED};
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::json::ApiJson;
use crate::state::AppState;

const NO_SUCH_EMAIL: &str = "No such e-mail";
const BAD_CODE: &str = "error code";

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmailResponse {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: Option<String>,
    pub confirmation_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

fn subject(user: &User) -> CodeSubject<'_> {
    CodeSubject {
        user_id: user.id,
        email: &user.email,
        last_login_at: user.last_login_at,
    }
}

/// Return the field value, recording `REQUIRED` when it is absent.
fn required(errors: &mut FieldErrors, field: &str, value: Option<String>) -> String {
    match value {
        Some(value) => value,
        None => {
            errors.add(field, REQUIRED);
            String::new()
        }
    }
}

/// POST /api/v1/auth/email
///
/// Responds 201 with the address the code was sent to.
pub async fn email_code(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<EmailRequest>,
) -> AppResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    let email = required(&mut errors, "email", input.email);
    if errors.is_empty() {
        errors.check("email", validate_email(&email));
    }
    errors.into_result()?;

    let user = match UserRepo::find_by_email(&state.pool, &email).await? {
        Some(user) => user,
        None => register(&state, &email).await?,
    };

    let now = chrono::Utc::now().timestamp();
    let code = make_code(&subject(&user), &state.config.confirmation.secret, now);

    let mail = state.config.mail.confirmation(&user.email, &code);
    state.mailer.send(mail).await?;

    tracing::info!(user_id = user.id, "Confirmation code sent");

    Ok((
        StatusCode::CREATED,
        Json(EmailResponse { email: user.email }),
    ))
}

/// Create the account for a first-time address. The username is the email.
async fn register(state: &AppState, email: &str) -> AppResult<User> {
    let mut errors = FieldErrors::new();
    errors.check("username", validate_username(email));
    if errors.is_empty() && UserRepo::find_by_username(&state.pool, email).await?.is_some() {
        errors.add("username", "A user with that username already exists.");
    }
    errors.into_result()?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: email.to_string(),
            email: email.to_string(),
            ..Default::default()
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok(user)
}

/// POST /api/v1/auth/token
///
/// Unknown addresses and bad codes both answer 406.
pub async fn get_token(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TokenRequest>,
) -> AppResult<impl IntoResponse> {
    let mut errors = FieldErrors::new();
    let email = required(&mut errors, "email", input.email);
    let code = required(&mut errors, "confirmation_code", input.confirmation_code);
    errors.into_result()?;

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotAcceptable(NO_SUCH_EMAIL.into())))?;

    let confirmation = &state.config.confirmation;
    let now = chrono::Utc::now().timestamp();
    if !check_code(
        &subject(&user),
        &confirmation.secret,
        &code,
        now,
        confirmation.code_ttl_secs,
    ) {
        tracing::warn!(user_id = user.id, "Rejected confirmation code");
        return Err(AppError::Core(CoreError::NotAcceptable(BAD_CODE.into())));
    }

    // Moving last_login_at retires the code; losing the race means another
    // request already spent it.
    if !UserRepo::record_login(&state.pool, user.id, user.last_login_at).await? {
        tracing::warn!(user_id = user.id, "Confirmation code already used");
        return Err(AppError::Core(CoreError::NotAcceptable(BAD_CODE.into())));
    }

    let token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, "Access token issued");

    Ok(Json(TokenResponse { token }))
}
