//! User registration and lookup handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CreateUserRequest, UserResponse};
use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::{ChatError, ErrorResponse};

/// `POST /users` — Register a user.
///
/// # Errors
///
/// Returns [`ChatError::InvalidRequest`] for a blank username and
/// [`ChatError::UsernameTaken`] when the name is in use.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    summary = "Register a user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Blank username", body = ErrorResponse),
        (status = 409, description = "Username taken", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ChatError> {
    let user = state.users.register(&req.username).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// `GET /users/:id` — Fetch a user.
///
/// # Errors
///
/// Returns [`ChatError::UserNotFound`] if the user does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    summary = "Get a user",
    params(
        ("id" = String, Path, description = "User id"),
    ),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ChatError> {
    let id = UserId::parse(&id)?;
    let user = state.users.get(&id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// User routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
}
