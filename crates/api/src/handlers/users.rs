//! Handlers for `/users` (admin management) and `/users/me` (self-service).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use yamdb_core::error::{CoreError, FieldErrors};
use yamdb_core::permissions::{Policy, Target};
use yamdb_core::roles::validate_role;
use yamdb_core::validation::{validate_email, validate_person_name, validate_username};
use yamdb_db::models::user::{CreateUser, UpdateUser, User, UserListParams, UserResponse};
use yamdb_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::json::ApiJson;
use crate::middleware::rbac::Requester;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Admin management
// ---------------------------------------------------------------------------

/// GET /api/v1/users
///
/// `?search=` narrows the list to one exact username.
pub async fn list_users(
    req: Requester,
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&Policy::ADMIN_ONLY, Target::Collection)?;

    let users: Vec<UserResponse> = UserRepo::list(&state.pool, &params)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(DataResponse { data: users }))
}

/// POST /api/v1/users
pub async fn create_user(
    req: Requester,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateUser>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&Policy::ADMIN_ONLY, Target::Collection)?;

    let mut errors = FieldErrors::new();
    errors.check("username", validate_username(&input.username));
    errors.check("email", validate_email(&input.email));
    check_profile(
        &mut errors,
        input.first_name.as_deref(),
        input.last_name.as_deref(),
        input.role.as_deref(),
    );
    errors.into_result()?;

    let user = UserRepo::create(&state.pool, &input).await?;

    tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "User created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// GET /api/v1/users/{username}
pub async fn get_user(
    req: Requester,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&Policy::ADMIN_ONLY, Target::Collection)?;
    let user = find_user(&state, &username).await?;
    req.authorize(&Policy::ADMIN_ONLY, Target::Object { owner: None })?;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PATCH /api/v1/users/{username}
pub async fn update_user(
    req: Requester,
    State(state): State<AppState>,
    Path(username): Path<String>,
    ApiJson(input): ApiJson<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&Policy::ADMIN_ONLY, Target::Collection)?;
    let user = find_user(&state, &username).await?;
    req.authorize(&Policy::ADMIN_ONLY, Target::Object { owner: None })?;

    validate_update(&input)?;

    let updated = apply_update(&state, &user, &input).await?;

    tracing::info!(user_id = updated.id, username = %updated.username, "User updated");

    Ok(Json(DataResponse {
        data: UserResponse::from(updated),
    }))
}

/// DELETE /api/v1/users/{username}
///
/// The user's reviews and comments are removed with the account.
pub async fn delete_user(
    req: Requester,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&Policy::ADMIN_ONLY, Target::Collection)?;
    let user = find_user(&state, &username).await?;
    req.authorize(&Policy::ADMIN_ONLY, Target::Object { owner: None })?;

    let deleted = UserRepo::delete(&state.pool, user.id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found_by(
            "User", "username", &username,
        )));
    }

    tracing::info!(user_id = user.id, username = %username, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Self-service
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
pub async fn get_me(req: Requester, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    req.authorize(&Policy::SELF, Target::Collection)?;
    let me = req.user()?;

    let user = UserRepo::find_by_id(&state.pool, me.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", me.user_id)))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PATCH /api/v1/users/me
///
/// Non-admin callers cannot change their own role; a `role` in the body is
/// dropped for them.
pub async fn update_me(
    req: Requester,
    State(state): State<AppState>,
    ApiJson(mut input): ApiJson<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    req.authorize(&Policy::SELF, Target::Collection)?;
    let me = req.user()?;

    if !me.actor().is_admin() {
        input.role = None;
    }
    validate_update(&input)?;

    let user = UserRepo::find_by_id(&state.pool, me.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", me.user_id)))?;
    let updated = apply_update(&state, &user, &input).await?;

    tracing::info!(user_id = updated.id, "Profile updated");

    Ok(Json(DataResponse {
        data: UserResponse::from(updated),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(state: &AppState, username: &str) -> AppResult<User> {
    UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found_by("User", "username", username)))
}

async fn apply_update(state: &AppState, user: &User, input: &UpdateUser) -> AppResult<User> {
    UserRepo::update(&state.pool, user.id, input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found_by(
            "User",
            "username",
            &user.username,
        )))
}

fn check_profile(
    errors: &mut FieldErrors,
    first_name: Option<&str>,
    last_name: Option<&str>,
    role: Option<&str>,
) {
    if let Some(first_name) = first_name {
        errors.check("first_name", validate_person_name(first_name));
    }
    if let Some(last_name) = last_name {
        errors.check("last_name", validate_person_name(last_name));
    }
    if let Some(role) = role {
        errors.check("role", validate_role(role));
    }
}

fn validate_update(input: &UpdateUser) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();
    if let Some(username) = &input.username {
        errors.check("username", validate_username(username));
    }
    if let Some(email) = &input.email {
        errors.check("email", validate_email(email));
    }
    check_profile(
        &mut errors,
        input.first_name.as_deref(),
        input.last_name.as_deref(),
        input.role.as_deref(),
    );
    errors.into_result()
}
