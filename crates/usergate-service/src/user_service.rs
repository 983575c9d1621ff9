//! User service trait definition.

use crate::dto::{NewUser, PasswordCheck, UserUpdate};
use async_trait::async_trait;
use usergate_core::{Interface, OrderQuery, PageQuery, PageResult, User, UserQuery, UsergateResult};

/// User lifecycle operations.
///
/// Every returned [`User`] has its password hash cleared.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Creates a user and returns it as stored.
    ///
    /// A taken username is [`Conflict`](usergate_core::UsergateError::Conflict).
    async fn create(&self, user: NewUser) -> UsergateResult<User>;

    /// Reads a user from storage.
    async fn get(&self, username: &str) -> UsergateResult<User>;

    /// Reads a user through the cache. Cache failures never fail the call.
    async fn cache_get(&self, username: &str) -> UsergateResult<User>;

    /// Lists one page of users matching `filter`.
    async fn query(
        &self,
        page: PageQuery,
        order: OrderQuery,
        filter: UserQuery,
    ) -> UsergateResult<(Vec<User>, PageResult)>;

    /// Applies a partial update and returns the updated user.
    async fn update(&self, update: UserUpdate) -> UsergateResult<User>;

    /// Deletes a user. Deleting a missing user succeeds.
    async fn delete(&self, username: &str) -> UsergateResult<()>;

    /// Checks `password` against the stored hash.
    async fn authenticate_password(
        &self,
        username: &str,
        password: &str,
    ) -> UsergateResult<PasswordCheck>;
}
