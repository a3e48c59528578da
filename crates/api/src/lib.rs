// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for Leadflow.
//!
//! Translates transport-neutral requests into persistence and core calls,
//! enforces role checks that live outside the core, and maps every lower
//! layer error into [`ApiError`].

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
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod csv_import;
mod error;
mod export;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use csv_import::{CsvImport, CsvLeadRow, CsvRowError, parse_leads_csv};
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use export::{EXPORT_HEADERS, leads_to_csv};
pub use handlers::{
    add_comment, assign_leads, bootstrap_admin, cancel_order, create_lead, create_order,
    create_user, delete_lead, export_order_leads, get_lead, get_order, get_order_timeline,
    import_leads, lead_stats, list_leads, list_orders, list_users, unassign_leads,
    update_lead_status, update_order, update_user,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AddCommentRequest, AddCommentResponse, AssignLeadsRequest, AssignmentResponse,
    AuditEventInfo, CancelOrderRequest, CommentInfo, CreateLeadRequest, CreateOrderRequest,
    CreateUserRequest, ImportLeadsResponse, ImportRowError, LeadInfo, LeadStatsResponse,
    ListLeadsQuery, ListLeadsResponse, ListOrdersQuery, ListOrdersResponse, ListUsersQuery,
    ListUsersResponse, OrderDetailsResponse, OrderInfo, OrderTimelineResponse,
    OrderTransitionResponse, UnassignLeadsRequest, UpdateLeadStatusRequest, UpdateOrderRequest,
    UpdateUserRequest, UserInfo,
};
