// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leadflow_domain::{
    Gender, LeadStatus, LeadType, OrderStatus, Priority, UserAccount, UserRole, UserStatus,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A stored user, including credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub user_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub status: UserStatus,
    pub created_at: OffsetDateTime,
}

impl UserData {
    /// Returns the account without credentials.
    #[must_use]
    pub fn to_account(&self) -> UserAccount {
        UserAccount {
            user_id: self.user_id,
            login_name: self.login_name.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            is_active: self.is_active,
            status: self.status,
        }
    }
}

/// A page window. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Default number of rows per page.
    pub const DEFAULT_PER_PAGE: u32 = 20;
    /// Largest accepted page size.
    pub const MAX_PER_PAGE: u32 = 100;

    /// Creates a page window.
    #[must_use]
    pub const fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Number of rows skipped before this page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }

    /// Page size as a SQL limit.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results together with the overall count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Wraps a page of items.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let per_page: u64 = u64::from(request.per_page.max(1));
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
            total_pages: total.div_ceil(per_page),
        }
    }
}

/// Filters for listing leads. Every field narrows the result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeadFilter {
    pub lead_type: Option<LeadType>,
    pub status: Option<LeadStatus>,
    pub assigned: Option<bool>,
    /// Case-insensitive substring.
    pub country: Option<String>,
    pub gender: Option<Gender>,
    pub order_id: Option<i64>,
    pub assigned_to: Option<i64>,
}

/// Filters for listing orders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub priority: Option<Priority>,
    pub created_from: Option<OffsetDateTime>,
    pub created_to: Option<OffsetDateTime>,
    pub requester_id: Option<i64>,
}

/// The outcome of a bulk lead import.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IngestReport {
    /// Ids of the inserted leads, in input order.
    pub imported: Vec<i64>,
    /// Rejected rows as `(row number, message)`; row numbers are 1-based.
    pub errors: Vec<(usize, String)>,
}

/// Lead counts for one lead type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeadTypeStats {
    pub lead_type: Option<LeadType>,
    pub total: u64,
    pub assigned: u64,
    pub available: u64,
}

/// Lead counts held by one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPerformance {
    pub user_id: i64,
    pub display_name: String,
    pub assigned: u64,
    pub converted: u64,
}

/// Aggregate lead statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeadStats {
    /// Counts per lead type.
    pub by_type: Vec<LeadTypeStats>,
    /// Counts over every type.
    pub overall: LeadTypeStats,
    /// Per agent, agents only.
    pub agents: Vec<AgentPerformance>,
}
