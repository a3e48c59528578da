// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::OrderStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// An order requested zero leads in every bucket.
    #[error("Order must request at least one lead")]
    EmptyOrderRequest,
    /// A request or record field failed validation.
    #[error("Invalid {field}: {message}")]
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },
    /// Unknown lead type.
    #[error("Invalid lead type: {0}")]
    InvalidLeadType(String),
    /// Unknown gender.
    #[error("Invalid gender: {0}")]
    InvalidGender(String),
    /// Unknown document status.
    #[error("Invalid document status: {0}")]
    InvalidDocumentStatus(String),
    /// Unknown lead status.
    #[error("Invalid lead status: {0}")]
    InvalidLeadStatus(String),
    /// Unknown order status.
    #[error("Invalid order status: {0}")]
    InvalidOrderStatus(String),
    /// Unknown priority.
    #[error("Invalid priority: {0}")]
    InvalidPriority(String),
    /// Unknown user role.
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    /// Unknown user status.
    #[error("Invalid user status: {0}")]
    InvalidUserStatus(String),
    /// Order does not exist.
    #[error("Order {0} not found")]
    OrderNotFound(i64),
    /// Lead does not exist.
    #[error("Lead {0} not found")]
    LeadNotFound(i64),
    /// User does not exist.
    #[error("User {0} not found")]
    UserNotFound(i64),
    /// The requester may not perform this action on this resource.
    #[error("Forbidden: not permitted to {action}")]
    Forbidden {
        /// The attempted action.
        action: &'static str,
    },
    /// The order is already in its terminal state.
    #[error("Order {0} is already cancelled")]
    OrderAlreadyCancelled(i64),
    /// The requested order status change is not allowed.
    #[error("Invalid order status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },
    /// The assignment target cannot receive leads.
    #[error("User {user_id} cannot receive leads: {reason}")]
    AgentNotEligible {
        /// The target user.
        user_id: i64,
        /// Why the user is not eligible.
        reason: String,
    },
    /// The lead is still claimed by a live order.
    #[error("Lead {lead_id} is referenced by active order {order_id}")]
    LeadInUse {
        /// The lead.
        lead_id: i64,
        /// The order holding it.
        order_id: i64,
    },
}
