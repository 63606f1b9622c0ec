pub mod auth;
pub mod catalog;
pub mod health;
pub mod titles;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/email                                        request confirmation code (public)
/// /auth/token                                        exchange code for token (public)
///
/// /categories                                        list, create
/// /categories/{slug}                                 delete
/// /genres                                            list, create
/// /genres/{slug}                                     delete
///
/// /titles                                            list (?category, genre, name, year), create
/// /titles/{title_id}                                 get, update, delete
/// /titles/{title_id}/reviews                         list, create
/// /titles/{title_id}/reviews/{review_id}             get, update, delete
/// /titles/{title_id}/reviews/{review_id}/comments    list, create
/// /titles/{title_id}/reviews/{review_id}/comments/{comment_id}
///                                                    get, update, delete
///
/// /users                                             list (?search), create (admin only)
/// /users/me                                          get, update (auth required)
/// /users/{username}                                  get, update, delete (admin only)
/// ```
///
/// Trailing slashes are stripped before routing (see
/// [`build_app_router`](crate::router::build_app_router)).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Signup and token exchange.
        .nest("/auth", auth::router())
        // Catalogs.
        .nest("/categories", catalog::categories_router())
        .nest("/genres", catalog::genres_router())
        // Titles with nested reviews and comments.
        .nest("/titles", titles::router())
        // User management and self-service.
        .nest("/users", users::router())
}
