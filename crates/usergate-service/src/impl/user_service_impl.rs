//! User service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface, DEFAULT_TTL};
use crate::dto::{NewUser, PasswordCheck, UserUpdate};
use crate::user_service::UserService;
use async_trait::async_trait;
use shaku::Component;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use usergate_core::{
    with_timeout, OrderQuery, PageQuery, PageResult, User, UserQuery, UsergateError,
    UsergateResult, DEFAULT_OPERATION_TIMEOUT,
};
use usergate_repository::{CreateUserParams, QueryUserParams, UpdateUserParams, UserRepository};
use usergate_security::PasswordHasherInterface;

/// User service wired through Shaku.
///
/// Every storage and cache round trip runs under `operation_timeout`.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceImpl {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    password_hasher: Arc<dyn PasswordHasherInterface>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    #[shaku(default = DEFAULT_OPERATION_TIMEOUT)]
    operation_timeout: Duration,
    #[shaku(default = DEFAULT_TTL)]
    cache_ttl: Duration,
}

impl UserServiceImpl {
    /// Creates a service with the default timeout and cache TTL.
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        cache: Arc<dyn CacheInterface>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            cache,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            cache_ttl: DEFAULT_TTL,
        }
    }

    #[must_use]
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    async fn timed<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = UsergateResult<T>>,
    ) -> UsergateResult<T> {
        with_timeout(self.operation_timeout, operation, fut).await
    }

    /// Like `timed`, but tags failures with the operation and username.
    async fn timed_for<T>(
        &self,
        operation: &'static str,
        username: &str,
        fut: impl Future<Output = UsergateResult<T>>,
    ) -> UsergateResult<T> {
        self.timed(operation, fut)
            .await
            .map_err(|e| e.context(format!("{operation} {username}")))
    }

    fn hash_for(&self, username: &str, password: &str) -> UsergateResult<String> {
        self.password_hasher
            .hash(password)
            .map_err(|e| e.context(format!("hash password {username}")))
    }

    async fn find(&self, username: &str) -> UsergateResult<Option<User>> {
        self.timed_for("get user", username, self.user_repository.get_user(username))
            .await
    }

    /// Drops the cached copy of `username`. Failures are only logged.
    async fn invalidate(&self, username: &str) {
        let key = cache_keys::user(username);
        let result = self
            .timed("cache delete", async {
                self.cache.delete(&key).await.map_err(UsergateError::from)
            })
            .await;
        if let Err(e) = result {
            warn!(key = %key, error = %e, "Failed to invalidate cache entry");
        }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn create(&self, user: NewUser) -> UsergateResult<User> {
        debug!("Creating user: {}", user.username);

        let password_hash = self.hash_for(&user.username, &user.password)?;
        let params = CreateUserParams {
            username: user.username,
            status: user.status,
            email: user.email,
            password_hash,
            description: user.description,
        };

        self.timed_for(
            "create user",
            &params.username,
            self.user_repository.create_user(&params),
        )
        .await?;

        let created = self
            .find(&params.username)
            .await?
            .ok_or_else(|| UsergateError::not_found("User", &params.username))?;

        info!("User created: {}", created.username);
        Ok(created.sanitized())
    }

    async fn get(&self, username: &str) -> UsergateResult<User> {
        debug!("Getting user: {}", username);

        self.find(username)
            .await?
            .map(User::sanitized)
            .ok_or_else(|| UsergateError::not_found("User", username))
    }

    async fn cache_get(&self, username: &str) -> UsergateResult<User> {
        let key = cache_keys::user(username);

        let cached = self
            .timed("cache get", async {
                self.cache.get::<User>(&key).await.map_err(UsergateError::from)
            })
            .await;
        match cached {
            Ok(Some(user)) => {
                debug!("Cache hit for user: {}", username);
                return Ok(user);
            }
            Ok(None) => debug!("Cache miss for user: {}", username),
            Err(e) => warn!(key = %key, error = %e, "Cache read failed, falling back to storage"),
        }

        let user = self.get(username).await?;

        let stored = self
            .timed("cache set", async {
                self.cache
                    .set(&key, &user, self.cache_ttl)
                    .await
                    .map_err(UsergateError::from)
            })
            .await;
        if let Err(e) = stored {
            warn!(key = %key, error = %e, "Failed to populate cache");
        }

        Ok(user)
    }

    async fn query(
        &self,
        page: PageQuery,
        order: OrderQuery,
        filter: UserQuery,
    ) -> UsergateResult<(Vec<User>, PageResult)> {
        let page = page.normalized();
        debug!(
            page_no = page.page_no,
            page_size = page.page_size,
            "Querying users"
        );

        let params = QueryUserParams::for_page(filter, order, page);
        let (users, total) = self
            .timed("query users", self.user_repository.query_user(&params))
            .await
            .map_err(|e| e.context("query users"))?;

        let users = users.into_iter().map(User::sanitized).collect();
        Ok((users, PageResult::new(page, total)))
    }

    async fn update(&self, update: UserUpdate) -> UsergateResult<User> {
        debug!("Updating user: {}", update.username);

        if self.find(&update.username).await?.is_none() {
            return Err(UsergateError::not_found("User", &update.username));
        }

        let password_hash = if update.password.is_empty() {
            None
        } else {
            Some(self.hash_for(&update.username, &update.password)?)
        };
        let params = UpdateUserParams {
            username: update.username,
            status: update.status,
            email: Some(update.email).filter(|s| !s.is_empty()),
            password_hash,
            description: Some(update.description).filter(|s| !s.is_empty()),
        };

        self.timed_for(
            "update user",
            &params.username,
            self.user_repository.update_user(&params),
        )
        .await?;
        // Storage has changed, so the cached copy goes even if the re-read fails.
        self.invalidate(&params.username).await;

        let updated = self
            .find(&params.username)
            .await?
            .ok_or_else(|| UsergateError::not_found("User", &params.username))?;
        info!("User updated: {}", updated.username);
        Ok(updated.sanitized())
    }

    async fn delete(&self, username: &str) -> UsergateResult<()> {
        debug!("Deleting user: {}", username);

        if self.find(username).await?.is_none() {
            debug!("User {} already absent", username);
            return Ok(());
        }

        self.timed_for(
            "delete user",
            username,
            self.user_repository.delete_user(username),
        )
        .await?;
        self.invalidate(username).await;

        info!("User deleted: {}", username);
        Ok(())
    }

    async fn authenticate_password(
        &self,
        username: &str,
        password: &str,
    ) -> UsergateResult<PasswordCheck> {
        let Some(user) = self.find(username).await? else {
            return Ok(PasswordCheck::UserNotFound);
        };

        match self.password_hasher.verify(password, &user.password_hash) {
            Ok(()) => Ok(PasswordCheck::Verified),
            Err(UsergateError::InvalidCredentials) => {
                debug!("Password mismatch for user: {}", username);
                Ok(PasswordCheck::Mismatch)
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for UserServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl")
            .field("operation_timeout", &self.operation_timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}
