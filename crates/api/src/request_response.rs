// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Enumerated values travel as strings and are parsed by the handlers, so a
//! bad value is reported as an invalid field rather than a body rejection.

use leadflow_audit::AuditEvent;
use leadflow_domain::{Comment, Lead, LeadCounts, Order};
use leadflow_persistence::{AgentPerformance, LeadTypeStats, UserData};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// ============================================================================
// Orders
// ============================================================================

/// API request to create an order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Requested FTD leads.
    #[serde(default)]
    pub ftd: u32,
    /// Requested filler leads.
    #[serde(default)]
    pub filler: u32,
    /// Requested cold leads.
    #[serde(default)]
    pub cold: u32,
    /// Requested live leads.
    #[serde(default)]
    pub live: u32,
    /// `low`, `medium` or `high`; defaults to `medium`.
    #[serde(default)]
    pub priority: Option<String>,
    /// Free text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Country substring filter.
    #[serde(default)]
    pub country: Option<String>,
    /// Exact gender filter.
    #[serde(default)]
    pub gender: Option<String>,
    /// Client labels to exclude.
    #[serde(default)]
    pub excluded_clients: Vec<String>,
    /// Client broker labels to exclude.
    #[serde(default)]
    pub excluded_brokers: Vec<String>,
    /// Client network labels to exclude.
    #[serde(default)]
    pub excluded_networks: Vec<String>,
}

/// API request to change an order's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateOrderRequest {
    /// New priority.
    #[serde(default)]
    pub priority: Option<String>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// API request to cancel an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrderRequest {
    /// Why the order is being cancelled.
    pub reason: String,
}

/// Query parameters for listing orders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListOrdersQuery {
    /// Order status.
    pub status: Option<String>,
    /// Order priority.
    pub priority: Option<String>,
    /// Earliest creation time (RFC 3339 or `YYYY-MM-DD`), inclusive.
    pub from: Option<String>,
    /// Latest creation time (RFC 3339 or `YYYY-MM-DD`), inclusive.
    pub to: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Rows per page.
    pub per_page: Option<u32>,
}

/// An order as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInfo {
    /// The order id.
    pub order_id: i64,
    /// The user who created the order.
    pub requester_id: i64,
    /// `fulfilled`, `partial` or `cancelled`.
    pub status: String,
    /// `low`, `medium` or `high`.
    pub priority: String,
    /// Requested count per lead type.
    pub requests: LeadCounts,
    /// Claimed count per lead type.
    pub fulfilled: LeadCounts,
    /// Claimed lead ids in claim order.
    pub lead_ids: Vec<i64>,
    /// Country filter used at creation.
    pub country: Option<String>,
    /// Gender filter used at creation.
    pub gender: Option<String>,
    /// Excluded client labels.
    pub excluded_clients: Vec<String>,
    /// Excluded broker labels.
    pub excluded_brokers: Vec<String>,
    /// Excluded network labels.
    pub excluded_networks: Vec<String>,
    /// Free text notes.
    pub notes: Option<String>,
    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Cancellation time.
    #[serde(with = "time::serde::rfc3339::option")]
    pub cancelled_at: Option<OffsetDateTime>,
    /// Cancellation reason.
    pub cancellation_reason: Option<String>,
}

impl From<&Order> for OrderInfo {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id,
            requester_id: order.requester_id,
            status: order.status.to_string(),
            priority: order.priority.to_string(),
            requests: order.requests,
            fulfilled: order.fulfilled,
            lead_ids: order.lead_ids.clone(),
            country: order.criteria.country().map(String::from),
            gender: order.criteria.gender().map(|g| g.to_string()),
            excluded_clients: order.criteria.excluded_clients().iter().cloned().collect(),
            excluded_brokers: order.criteria.excluded_brokers().iter().cloned().collect(),
            excluded_networks: order.criteria.excluded_networks().iter().cloned().collect(),
            notes: order.notes.clone(),
            created_at: order.created_at,
            cancelled_at: order.cancelled_at,
            cancellation_reason: order.cancellation_reason.clone(),
        }
    }
}

/// API response for create, cancel and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTransitionResponse {
    /// The order after the change.
    pub order: OrderInfo,
    /// The audit event recorded for the change.
    pub event_id: Option<i64>,
}

/// API response for a single order with its leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetailsResponse {
    /// The order.
    pub order: OrderInfo,
    /// Claimed leads in claim order.
    pub leads: Vec<LeadInfo>,
}

/// API response for listing orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOrdersResponse {
    /// Orders on this page, newest first.
    pub orders: Vec<OrderInfo>,
    /// Total matching orders.
    pub total: u64,
    /// The page number.
    pub page: u32,
    /// Rows per page.
    pub per_page: u32,
    /// Number of pages.
    pub total_pages: u64,
}

/// One audit event in an order's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventInfo {
    /// The event id.
    pub event_id: Option<i64>,
    /// Who acted.
    pub actor_id: String,
    /// The actor's type.
    pub actor_type: String,
    /// The cause id.
    pub cause_id: String,
    /// The cause description.
    pub cause_description: String,
    /// The action name.
    pub action: String,
    /// Optional action details.
    pub details: Option<String>,
    /// State before the change.
    pub before: String,
    /// State after the change.
    pub after: String,
    /// When it happened.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&AuditEvent> for AuditEventInfo {
    fn from(event: &AuditEvent) -> Self {
        Self {
            event_id: event.event_id,
            actor_id: event.actor.id.clone(),
            actor_type: event.actor.actor_type.clone(),
            cause_id: event.cause.id.clone(),
            cause_description: event.cause.description.clone(),
            action: event.action.name.clone(),
            details: event.action.details.clone(),
            before: event.before.data.clone(),
            after: event.after.data.clone(),
            created_at: event.created_at,
        }
    }
}

/// API response for an order's audit history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTimelineResponse {
    /// The order id.
    pub order_id: i64,
    /// Events, oldest first.
    pub events: Vec<AuditEventInfo>,
}

// ============================================================================
// Leads
// ============================================================================

/// API request to create a lead.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateLeadRequest {
    /// `ftd`, `filler`, `cold` or `live`.
    pub lead_type: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Country of residence.
    pub country: String,
    /// `male`, `female` or `not_defined`.
    #[serde(default)]
    pub gender: Option<String>,
    /// Client label.
    #[serde(default)]
    pub client: Option<String>,
    /// Client broker label.
    #[serde(default)]
    pub client_broker: Option<String>,
    /// Client network label.
    #[serde(default)]
    pub client_network: Option<String>,
    /// `good`, `ok` or `pending`.
    #[serde(default)]
    pub document_status: Option<String>,
    /// Engagement status; defaults to `active`.
    #[serde(default)]
    pub status: Option<String>,
    /// Where the lead came from.
    #[serde(default)]
    pub source: Option<String>,
}

/// Query parameters for listing leads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListLeadsQuery {
    /// Lead type.
    pub lead_type: Option<String>,
    /// Engagement status.
    pub status: Option<String>,
    /// Assigned or not.
    pub assigned: Option<bool>,
    /// Country substring.
    pub country: Option<String>,
    /// Gender.
    pub gender: Option<String>,
    /// The order that last claimed the lead.
    pub order_id: Option<i64>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Rows per page.
    pub per_page: Option<u32>,
}

/// API request to change a lead's engagement status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLeadStatusRequest {
    /// The new status.
    pub status: String,
}

/// API request to add a comment to a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCommentRequest {
    /// The comment text.
    pub text: String,
}

/// API response for a new comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCommentResponse {
    /// The lead commented on.
    pub lead_id: i64,
    /// The new comment's id.
    pub comment_id: i64,
}

/// A comment as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentInfo {
    /// Who wrote it.
    pub author_id: i64,
    /// The text.
    pub text: String,
    /// When it was written.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&Comment> for CommentInfo {
    fn from(comment: &Comment) -> Self {
        Self {
            author_id: comment.author_id,
            text: comment.text.clone(),
            created_at: comment.created_at,
        }
    }
}

/// A lead as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadInfo {
    /// The lead id.
    pub lead_id: i64,
    /// Lead type.
    pub lead_type: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Country.
    pub country: String,
    /// Gender.
    pub gender: String,
    /// Client label.
    pub client: Option<String>,
    /// Client broker label.
    pub client_broker: Option<String>,
    /// Client network label.
    pub client_network: Option<String>,
    /// FTD document state.
    pub document_status: Option<String>,
    /// Engagement status.
    pub status: String,
    /// Where the lead came from.
    pub source: Option<String>,
    /// Current holder.
    pub assigned_to: Option<i64>,
    /// When the current holder received it.
    #[serde(with = "time::serde::rfc3339::option")]
    pub assigned_at: Option<OffsetDateTime>,
    /// The order that last claimed the lead.
    pub order_id: Option<i64>,
    /// Comments, oldest first.
    pub comments: Vec<CommentInfo>,
    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&Lead> for LeadInfo {
    fn from(lead: &Lead) -> Self {
        Self {
            lead_id: lead.lead_id,
            lead_type: lead.lead_type.to_string(),
            first_name: lead.first_name.clone(),
            last_name: lead.last_name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            country: lead.country.clone(),
            gender: lead.gender.to_string(),
            client: lead.client.clone(),
            client_broker: lead.client_broker.clone(),
            client_network: lead.client_network.clone(),
            document_status: lead.document_status.map(|d| d.to_string()),
            status: lead.status.to_string(),
            source: lead.source.clone(),
            assigned_to: lead.assigned_to(),
            assigned_at: lead.assignment.map(|a| a.assigned_at),
            order_id: lead.order_id,
            comments: lead.comments.iter().map(CommentInfo::from).collect(),
            created_at: lead.created_at,
        }
    }
}

/// API response for listing leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLeadsResponse {
    /// Leads on this page.
    pub leads: Vec<LeadInfo>,
    /// Total matching leads.
    pub total: u64,
    /// The page number.
    pub page: u32,
    /// Rows per page.
    pub per_page: u32,
    /// Number of pages.
    pub total_pages: u64,
}

/// A rejected import row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowError {
    /// The CSV row number (1-based, excluding header).
    pub row: usize,
    /// Why it was rejected.
    pub message: String,
}

/// API response for a CSV import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportLeadsResponse {
    /// Number of leads created.
    pub imported: usize,
    /// Ids of the created leads, in file order.
    pub lead_ids: Vec<i64>,
    /// Rejected rows, in file order.
    pub errors: Vec<ImportRowError>,
}

/// API request to assign leads to an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignLeadsRequest {
    /// The leads to assign.
    pub lead_ids: Vec<i64>,
    /// The receiving agent.
    pub agent_id: i64,
}

/// API request to clear lead assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignLeadsRequest {
    /// The leads to release.
    pub lead_ids: Vec<i64>,
}

/// API response for assign and unassign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResponse {
    /// Number of leads actually changed.
    pub modified: usize,
    /// The audit event, when anything changed.
    pub event_id: Option<i64>,
}

/// API response for lead statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadStatsResponse {
    /// Counts per lead type.
    pub by_type: Vec<LeadTypeStats>,
    /// Counts over every type.
    pub overall: LeadTypeStats,
    /// Per-agent performance.
    pub agents: Vec<AgentPerformance>,
}

// ============================================================================
// Users
// ============================================================================

/// API request to create a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Login name.
    pub login_name: String,
    /// Display name.
    pub display_name: String,
    /// Initial password.
    pub password: String,
    /// `admin`, `affiliate_manager`, `lead_manager` or `agent`.
    pub role: String,
}

/// Query parameters for listing users.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListUsersQuery {
    /// Only users with this role.
    pub role: Option<String>,
}

/// API request to change a user's status or active flag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// `pending`, `approved` or `rejected`.
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the account may act.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// A user as returned by the API. Credentials are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// The user id.
    pub user_id: i64,
    /// Login name.
    pub login_name: String,
    /// Display name.
    pub display_name: String,
    /// Role.
    pub role: String,
    /// Approval status.
    pub status: String,
    /// Whether the account may act.
    pub is_active: bool,
    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&UserData> for UserInfo {
    fn from(user: &UserData) -> Self {
        Self {
            user_id: user.user_id,
            login_name: user.login_name.clone(),
            display_name: user.display_name.clone(),
            role: user.role.to_string(),
            status: user.status.to_string(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// API response for listing users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    /// Users, by id.
    pub users: Vec<UserInfo>,
}
