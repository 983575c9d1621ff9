//! MySQL user repository implementation.

use crate::traits::{CreateUserParams, QueryUserParams, UpdateUserParams, UserRepository};
use crate::DatabasePoolInterface;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;
use usergate_core::{User, UserQuery, UserStatus, UsergateError, UsergateResult};

const SELECT_USER: &str =
    "SELECT id, username, status, email, password_hash, description, created_at, updated_at FROM `user`";

/// MySQL user repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = UserRepository)]
pub struct MySqlUserRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlUserRepository {
    /// Creates a new MySQL user repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    status: i32,
    email: String,
    password_hash: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UsergateError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let status = UserStatus::try_from(row.status).map_err(|_| {
            UsergateError::Internal(format!(
                "Invalid status {} stored for user {}",
                row.status, row.username
            ))
        })?;

        Ok(User {
            id: row.id,
            username: row.username,
            status,
            email: row.email,
            password_hash: row.password_hash,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Appends `WHERE` clauses for every active filter, binding each value.
fn push_filters(qb: &mut QueryBuilder<'static, MySql>, filter: &UserQuery) {
    let mut clause = " WHERE ";
    if let Some(username) = filter.username() {
        qb.push(clause).push("username = ").push_bind(username.to_owned());
        clause = " AND ";
    }
    if let Some(status) = filter.status {
        qb.push(clause).push("status = ").push_bind(status.code());
        clause = " AND ";
    }
    if let Some(email) = filter.email() {
        qb.push(clause).push("email = ").push_bind(email.to_owned());
    }
}

/// Page query. `ORDER BY` only ever receives allow-listed column names.
fn select_page(params: &QueryUserParams) -> QueryBuilder<'static, MySql> {
    let mut qb = QueryBuilder::new(SELECT_USER);
    push_filters(&mut qb, &params.filter);
    qb.push(" ORDER BY ")
        .push(params.order.column())
        .push(" ")
        .push(params.order.direction().as_sql());
    qb.push(" LIMIT ")
        .push_bind(params.offset)
        .push(", ")
        .push_bind(params.limit);
    qb
}

/// Count query sharing the page query's predicate.
fn count_matches(filter: &UserQuery) -> QueryBuilder<'static, MySql> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM `user`");
    push_filters(&mut qb, filter);
    qb
}

/// `UPDATE` touching only the supplied columns, or `None` if there are none.
fn update_columns(params: &UpdateUserParams) -> Option<QueryBuilder<'static, MySql>> {
    if params.is_empty() {
        return None;
    }

    let mut qb = QueryBuilder::new("UPDATE `user` SET ");
    let mut sets = qb.separated(", ");
    if let Some(status) = params.status {
        sets.push("status = ").push_bind_unseparated(status.code());
    }
    if let Some(email) = &params.email {
        sets.push("email = ").push_bind_unseparated(email.clone());
    }
    if let Some(password_hash) = &params.password_hash {
        sets.push("password_hash = ")
            .push_bind_unseparated(password_hash.clone());
    }
    if let Some(description) = &params.description {
        sets.push("description = ")
            .push_bind_unseparated(description.clone());
    }
    qb.push(" WHERE username = ").push_bind(params.username.clone());
    Some(qb)
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create_user(&self, params: &CreateUserParams) -> UsergateResult<()> {
        debug!("Creating user: {}", params.username);

        sqlx::query(
            r"
            INSERT INTO `user` (username, status, email, password_hash, description)
            VALUES (?, ?, ?, ?, ?)
            ",
        )
        .bind(&params.username)
        .bind(params.status.code())
        .bind(&params.email)
        .bind(&params.password_hash)
        .bind(&params.description)
        .execute(self.pool.inner())
        .await
        .map_err(|e| match UsergateError::from(e) {
            UsergateError::Conflict(_) => {
                UsergateError::conflict(format!("user {} already exists", params.username))
            }
            other => other,
        })?;

        Ok(())
    }

    async fn get_user(&self, username: &str) -> UsergateResult<Option<User>> {
        debug!("Finding user by username: {}", username);

        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE username = ?"))
            .bind(username)
            .fetch_optional(self.pool.inner())
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn update_user(&self, params: &UpdateUserParams) -> UsergateResult<()> {
        let Some(mut qb) = update_columns(params) else {
            debug!("Nothing to update for user: {}", params.username);
            return Ok(());
        };
        debug!("Updating user: {}", params.username);

        qb.build().execute(self.pool.inner()).await?;
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> UsergateResult<()> {
        debug!("Deleting user: {}", username);

        sqlx::query("DELETE FROM `user` WHERE username = ?")
            .bind(username)
            .execute(self.pool.inner())
            .await?;

        Ok(())
    }

    async fn query_user(&self, params: &QueryUserParams) -> UsergateResult<(Vec<User>, u64)> {
        debug!(
            filter = ?params.filter,
            offset = params.offset,
            limit = params.limit,
            "Querying users"
        );

        let rows = select_page(params)
            .build_query_as::<UserRow>()
            .fetch_all(self.pool.inner())
            .await?;

        let total: i64 = count_matches(&params.filter)
            .build_query_scalar()
            .fetch_one(self.pool.inner())
            .await?;

        let users = rows
            .into_iter()
            .map(User::try_from)
            .collect::<UsergateResult<Vec<_>>>()?;

        Ok((users, u64::try_from(total).unwrap_or_default()))
    }
}

impl std::fmt::Debug for MySqlUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlUserRepository").finish_non_exhaustive()
    }
}
