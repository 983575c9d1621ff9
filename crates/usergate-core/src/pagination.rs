//! Pagination, ordering, and filter types for list operations.

use crate::UserStatus;
use serde::{Deserialize, Serialize};

/// A request for one page of results. Pages are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_no: u32,
    pub page_size: u32,
}

impl PageQuery {
    /// The default page size.
    pub const DEFAULT_SIZE: u32 = 100;

    /// Creates a new page query.
    #[must_use]
    pub const fn new(page_no: u32, page_size: u32) -> Self {
        Self { page_no, page_size }
    }

    /// Returns a copy with zero values raised to the minimum of 1.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            page_no: self.page_no.max(1),
            page_size: self.page_size.max(1),
        }
    }

    /// Returns the row offset, `(page_no - 1) * page_size`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page_no.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Returns the row limit.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_SIZE)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Columns a caller may sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    CreatedAt,
    UpdatedAt,
    Username,
}

impl OrderBy {
    /// Column name in the `user` table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Username => "username",
        }
    }
}

/// Ordering of a list query. Unset parts fall back to `id ASC` in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub order: Option<SortOrder>,
    pub order_by: Option<OrderBy>,
}

impl OrderQuery {
    /// Creates an explicit ordering.
    #[must_use]
    pub const fn new(order: SortOrder, order_by: OrderBy) -> Self {
        Self {
            order: Some(order),
            order_by: Some(order_by),
        }
    }

    /// Column to sort by, `id` when unset.
    #[must_use]
    pub fn column(&self) -> &'static str {
        self.order_by.map_or("id", OrderBy::column)
    }

    /// Direction to sort in, ascending when unset.
    #[must_use]
    pub fn direction(&self) -> SortOrder {
        self.order.unwrap_or_default()
    }
}

/// Optional equality filters over users. Empty strings count as unset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub username: Option<String>,
    pub status: Option<UserStatus>,
    pub email: Option<String>,
}

impl UserQuery {
    /// Username filter, if set and non-empty.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|s| !s.is_empty())
    }

    /// Email filter, if set and non-empty.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|s| !s.is_empty())
    }

    /// Returns true when no filter is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username().is_none() && self.status.is_none() && self.email().is_none()
    }
}

/// Page metadata returned alongside query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub page_no: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl PageResult {
    /// Echoes the requested page and attaches the total match count.
    #[must_use]
    pub const fn new(page: PageQuery, total_count: u64) -> Self {
        Self {
            page_no: page.page_no,
            page_size: page.page_size,
            total_count,
        }
    }
}
