//! User request and response DTOs.

use serde::{Deserialize, Deserializer, Serialize};
use usergate_core::rules::valid_username;
use usergate_core::{
    OrderBy, OrderQuery, PageQuery, PageResult, SortOrder, User, UserQuery, UserStatus,
    UsergateError, UsergateResult,
};
use usergate_service::{NewUser, UserUpdate};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidateEmail, ValidationError};

/// Request to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// 1 to 64 letters, digits or underscores.
    #[validate(custom(function = "valid_username"))]
    pub username: String,

    #[validate(
        email(message = "invalid email"),
        length(max = 64, message = "email must be at most 64 characters")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 140, message = "description must be at most 140 characters"))]
    pub description: String,

    pub password: String,

    pub confirm_password: String,
}

impl CreateUserRequest {
    /// New active user built from this request.
    #[must_use]
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            username: self.username,
            password: self.password,
            email: self.email,
            description: self.description,
            status: UserStatus::Active,
        }
    }
}

/// Partial update. Omitted or empty fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[schema(value_type = Option<i32>, example = 2)]
    pub status: Option<UserStatus>,

    #[serde(default)]
    #[validate(
        custom(function = "optional_email"),
        length(max = 64, message = "email must be at most 64 characters")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 140, message = "description must be at most 140 characters"))]
    pub description: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub confirm_password: String,
}

impl UpdateUserRequest {
    /// Whether the request asks for a password change.
    #[must_use]
    pub fn changes_password(&self) -> bool {
        !self.password.is_empty() || !self.confirm_password.is_empty()
    }

    #[must_use]
    pub fn into_update(self, username: String) -> UserUpdate {
        UserUpdate {
            username,
            status: self.status,
            email: self.email,
            description: self.description,
            password: self.password,
        }
    }
}

/// Query parameters for listing users. Empty values count as absent.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Page number, starting at 1.
    #[serde(default = "default_page_no", deserialize_with = "blank_page_no")]
    #[validate(range(min = 1, message = "pageNo must be at least 1"))]
    pub page_no: u32,

    /// Page size.
    #[serde(default = "default_page_size", deserialize_with = "blank_page_size")]
    #[validate(range(min = 1, message = "pageSize must be at least 1"))]
    pub page_size: u32,

    /// `asc` or `desc`.
    #[serde(default)]
    pub order: String,

    /// `created_at`, `updated_at` or `username`.
    #[serde(default)]
    pub order_by: String,

    #[serde(default)]
    #[validate(custom(function = "optional_username"))]
    pub username: String,

    /// `1` (active) or `2` (inactive).
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    #[validate(
        custom(function = "optional_email"),
        length(max = 64, message = "email must be at most 64 characters")
    )]
    pub email: String,
}

const fn default_page_no() -> u32 {
    1
}

const fn default_page_size() -> u32 {
    PageQuery::DEFAULT_SIZE
}

fn blank_page_no<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    parse_or(deserializer, default_page_no())
}

fn blank_page_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    parse_or(deserializer, default_page_size())
}

/// Reads a query number, treating `?pageNo=` like an absent parameter.
fn parse_or<'de, D: Deserializer<'de>>(deserializer: D, fallback: u32) -> Result<u32, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if raw.is_empty() {
        return Ok(fallback);
    }
    raw.parse().map_err(serde::de::Error::custom)
}

impl ListUsersQuery {
    /// Splits the query into page, order and filter.
    pub fn into_parts(self) -> UsergateResult<(PageQuery, OrderQuery, UserQuery)> {
        let order = OrderQuery {
            order: parse_choice(&self.order, "order", |s| match s {
                "asc" => Some(SortOrder::Asc),
                "desc" => Some(SortOrder::Desc),
                _ => None,
            })?,
            order_by: parse_choice(&self.order_by, "orderBy", |s| match s {
                "created_at" => Some(OrderBy::CreatedAt),
                "updated_at" => Some(OrderBy::UpdatedAt),
                "username" => Some(OrderBy::Username),
                _ => None,
            })?,
        };
        let status = parse_choice(&self.status, "status", |s| {
            s.parse::<i32>().ok().and_then(|code| UserStatus::try_from(code).ok())
        })?;

        let filter = UserQuery {
            username: Some(self.username).filter(|s| !s.is_empty()),
            status,
            email: Some(self.email).filter(|s| !s.is_empty()),
        };
        Ok((PageQuery::new(self.page_no, self.page_size), order, filter))
    }
}

fn parse_choice<T>(
    raw: &str,
    field: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> UsergateResult<Option<T>> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse(raw)
        .map(Some)
        .ok_or_else(|| UsergateError::validation(format!("{field}: unsupported value '{raw}'")))
}

fn optional_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Ok(());
    }
    valid_username(username)
}

fn optional_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || email.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message("invalid email".into()))
}

/// One page of users.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    #[serde(flatten)]
    pub page_result: PageResult,
    pub result: Vec<User>,
}
