// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::criteria::SelectionCriteria;
use crate::types::{LeadCounts, OrderStatus, Priority};

/// Cancellation reason recorded when an order is created with nothing to claim.
pub const NO_LEADS_AVAILABLE_REASON: &str = "no leads available";

/// A request to pull leads into a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Requested count per lead type.
    pub counts: LeadCounts,
    /// Selection constraints.
    pub criteria: SelectionCriteria,
    /// Order priority.
    pub priority: Priority,
    /// Free text notes.
    pub notes: Option<String>,
}

impl OrderRequest {
    /// Creates a request with default priority and no notes.
    #[must_use]
    pub const fn new(counts: LeadCounts, criteria: SelectionCriteria) -> Self {
        Self {
            counts,
            criteria,
            priority: Priority::Medium,
            notes: None,
        }
    }
}

/// The mutable metadata of an existing order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    /// New priority, if changing.
    pub priority: Option<Priority>,
    /// New notes, if changing.
    pub notes: Option<String>,
}

impl OrderUpdate {
    /// Returns whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.priority.is_none() && self.notes.is_none()
    }
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Canonical identifier assigned by the store.
    pub order_id: i64,
    /// The user who created the order.
    pub requester_id: i64,
    /// Requested count per lead type.
    pub requests: LeadCounts,
    /// Claimed count per lead type.
    pub fulfilled: LeadCounts,
    /// Claimed lead ids in claim order.
    pub lead_ids: Vec<i64>,
    /// Outcome state.
    pub status: OrderStatus,
    /// Priority.
    pub priority: Priority,
    /// The constraints used at creation.
    pub criteria: SelectionCriteria,
    /// Free text notes.
    pub notes: Option<String>,
    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Set when the order becomes cancelled.
    #[serde(with = "time::serde::rfc3339::option")]
    pub cancelled_at: Option<OffsetDateTime>,
    /// Set when the order becomes cancelled.
    pub cancellation_reason: Option<String>,
}

impl Order {
    /// Returns whether the order is the owner's, by requester id.
    #[must_use]
    pub const fn is_owned_by(&self, user_id: i64) -> bool {
        self.requester_id == user_id
    }
}

/// An order ready to be inserted, before the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// The creating user.
    pub requester_id: i64,
    /// Requested count per lead type.
    pub requests: LeadCounts,
    /// Claimed count per lead type.
    pub fulfilled: LeadCounts,
    /// Claimed lead ids in claim order.
    pub lead_ids: Vec<i64>,
    /// Derived status.
    pub status: OrderStatus,
    /// Priority.
    pub priority: Priority,
    /// Selection constraints.
    pub criteria: SelectionCriteria,
    /// Free text notes.
    pub notes: Option<String>,
    /// Creation time.
    pub created_at: OffsetDateTime,
    /// Set only for orders created cancelled.
    pub cancelled_at: Option<OffsetDateTime>,
    /// Set only for orders created cancelled.
    pub cancellation_reason: Option<String>,
}

impl NewOrder {
    /// Attaches the store-assigned id.
    #[must_use]
    pub fn into_order(self, order_id: i64) -> Order {
        Order {
            order_id,
            requester_id: self.requester_id,
            requests: self.requests,
            fulfilled: self.fulfilled,
            lead_ids: self.lead_ids,
            status: self.status,
            priority: self.priority,
            criteria: self.criteria,
            notes: self.notes,
            created_at: self.created_at,
            cancelled_at: self.cancelled_at,
            cancellation_reason: self.cancellation_reason,
        }
    }
}

/// Derives the initial status of an order from its counts.
///
/// - Nothing claimed → `Cancelled`
/// - Every bucket claimed in full → `Fulfilled`
/// - Anything else → `Partial`
#[must_use]
pub fn derive_order_status(requests: &LeadCounts, fulfilled: &LeadCounts) -> OrderStatus {
    if fulfilled.is_zero() {
        OrderStatus::Cancelled
    } else if fulfilled == requests {
        OrderStatus::Fulfilled
    } else {
        OrderStatus::Partial
    }
}

/// Allocation behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPolicy {
    /// Only unassigned leads may be claimed by an order.
    ///
    /// When off, leads already assigned may be re-claimed by a new order.
    pub exclusive: bool,
    /// Manual assignment targets must be approved.
    pub require_agent_approval: bool,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            exclusive: true,
            require_agent_approval: true,
        }
    }
}
