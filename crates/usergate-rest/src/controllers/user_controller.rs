//! User management controller.

use crate::{
    dto::{CreateUserRequest, ListUsersQuery, UpdateUserRequest, UserListResponse},
    extractors::{ValidatedJson, ValidatedQuery},
    middleware::audit_middleware,
    responses::{ok, AppError, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Router,
};
use tracing::debug;
use usergate_core::{ErrorResponse, User};
use usergate_security::validate_password;

/// Creates the user router. Mutating routes are audited.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_users).merge(post(create_user).layer(middleware::from_fn(audit_middleware))),
        )
        .route(
            "/:username",
            get(get_user).merge(
                put(update_user)
                    .delete(delete_user)
                    .layer(middleware::from_fn(audit_middleware)),
            ),
        )
}

/// Create a new user.
#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = User),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<User> {
    debug!(username = %request.username, "Create user request");

    validate_password(&request.password, &request.confirm_password)?;

    let user = state.user_service.create(request.into_new_user()).await?;
    ok(user)
}

/// List users, filtered and paginated.
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = UserListResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> ApiResult<UserListResponse> {
    debug!(?query, "List users request");

    let (page, order, filter) = query.into_parts()?;
    let (result, page_result) = state.user_service.query(page, order, filter).await?;
    ok(UserListResponse {
        page_result,
        result,
    })
}

/// Get a user by username, served through the cache.
#[utoipa::path(
    get,
    path = "/v1/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<User> {
    debug!(username = %username, "Get user request");

    let user = state.user_service.cache_get(&username).await?;
    ok(user)
}

/// Partially update a user.
#[utoipa::path(
    put,
    path = "/v1/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<User> {
    debug!(username = %username, "Update user request");

    if request.changes_password() {
        validate_password(&request.password, &request.confirm_password)?;
    }

    let user = state.user_service.update(request.into_update(username)).await?;
    ok(user)
}

/// Delete a user. Deleting a missing user succeeds.
#[utoipa::path(
    delete,
    path = "/v1/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User deleted")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!(username = %username, "Delete user request");

    state.user_service.delete(&username).await?;
    Ok(StatusCode::OK)
}
