// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leads, orders and users, with the validation and access rules that do not
//! need a database.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod criteria;
mod error;
mod lead;
mod order;
pub mod policy;
mod types;
mod user;
mod validation;

#[cfg(test)]
mod tests;

pub use criteria::{SelectionCriteria, SelectionCriteriaBuilder};
pub use error::DomainError;
pub use lead::{Assignment, Comment, Lead, NormalizedLeadRecord};
pub use order::{
    AllocationPolicy, NO_LEADS_AVAILABLE_REASON, NewOrder, Order, OrderRequest, OrderUpdate,
    derive_order_status,
};
pub use policy::{Access, authorize_owner, authorize_resource};

pub use types::{
    DocumentStatus, Gender, LeadCounts, LeadStatus, LeadType, OrderStatus, Priority, UserRole,
    UserStatus,
};
pub use user::{Requester, UserAccount};
pub use validation::{
    MAX_ORDER_COUNT, MAX_TEXT_LENGTH, validate_agent_eligibility, validate_cancellation_reason,
    validate_comment, validate_lead_record, validate_order_request, validate_order_update,
};
