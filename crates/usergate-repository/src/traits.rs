//! Storage port for users.

use async_trait::async_trait;
use usergate_core::{Interface, OrderQuery, PageQuery, User, UserQuery, UserStatus, UsergateResult};

/// Values for a new user row. `id` and timestamps are assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserParams {
    pub username: String,
    pub status: UserStatus,
    pub email: String,
    pub password_hash: String,
    pub description: String,
}

/// Partial update keyed by username. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserParams {
    pub username: String,
    pub status: Option<UserStatus>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub description: Option<String>,
}

impl UpdateUserParams {
    /// Creates an update for `username` that changes nothing yet.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Returns true when no column would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.description.is_none()
    }
}

/// Filtered, ordered, paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryUserParams {
    pub filter: UserQuery,
    pub order: OrderQuery,
    pub offset: u64,
    pub limit: u64,
}

impl QueryUserParams {
    /// Builds listing parameters for one page.
    #[must_use]
    pub fn for_page(filter: UserQuery, order: OrderQuery, page: PageQuery) -> Self {
        Self {
            filter,
            order,
            offset: page.offset(),
            limit: page.limit(),
        }
    }
}

/// User storage port.
///
/// Implementations classify engine failures before returning them: a
/// duplicate username on [`create_user`](Self::create_user) is
/// [`UsergateError::Conflict`](usergate_core::UsergateError::Conflict), a
/// missing row on [`get_user`](Self::get_user) is `Ok(None)`.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Inserts a new user.
    async fn create_user(&self, params: &CreateUserParams) -> UsergateResult<()>;

    /// Finds a user by username.
    async fn get_user(&self, username: &str) -> UsergateResult<Option<User>>;

    /// Applies a partial update. Updating a missing username is not an error.
    async fn update_user(&self, params: &UpdateUserParams) -> UsergateResult<()>;

    /// Deletes a user. Deleting a missing username is not an error.
    async fn delete_user(&self, username: &str) -> UsergateResult<()>;

    /// Returns one page of matching users and the total match count.
    async fn query_user(&self, params: &QueryUserParams) -> UsergateResult<(Vec<User>, u64)>;
}
