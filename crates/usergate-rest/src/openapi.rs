//! OpenAPI documentation configuration.

use crate::controllers::HealthResponse;
use crate::dto::{CreateUserRequest, UpdateUserRequest, UserListResponse};
use usergate_core::{ErrorResponse, OrderBy, PageResult, SortOrder, User};
use utoipa::OpenApi;

/// OpenAPI document served next to Swagger UI.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Usergate API",
        version = "1.0.0",
        description = "User management service"
    ),
    paths(
        crate::controllers::user_controller::create_user,
        crate::controllers::user_controller::list_users,
        crate::controllers::user_controller::get_user,
        crate::controllers::user_controller::update_user,
        crate::controllers::user_controller::delete_user,
        crate::controllers::health_controller::health_check,
    ),
    components(
        schemas(
            User,
            PageResult,
            SortOrder,
            OrderBy,
            ErrorResponse,
            CreateUserRequest,
            UpdateUserRequest,
            UserListResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "users", description = "User management endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
