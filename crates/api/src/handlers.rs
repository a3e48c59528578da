// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Each handler takes the persistence layer, the parsed request and the
//! authenticated caller, and returns an API response or an [`ApiError`].
//! Writes that change orders or assignments also take the [`Cause`] recorded
//! in the audit trail and the time the change happens.

use leadflow::{AssignmentOutcome, OrderDetails, OrderTransition};
use leadflow_audit::{AuditEvent, Cause};
use leadflow_domain::{
    AllocationPolicy, DomainError, Gender, Lead, LeadCounts, LeadStatus, NormalizedLeadRecord,
    Order, OrderRequest, OrderUpdate, Priority, SelectionCriteria, UserRole, UserStatus,
    policy::{sees_all_leads, sees_all_orders},
};
use leadflow_persistence::{
    IngestReport, LeadFilter, LeadStats, NewUser, OrderFilter, Page, PageRequest, Persistence,
    UserData,
};
use std::str::FromStr;
use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::csv_import::{CsvImport, parse_leads_csv};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::export::leads_to_csv;
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AddCommentRequest, AddCommentResponse, AssignLeadsRequest, AssignmentResponse,
    AuditEventInfo, CancelOrderRequest, CreateLeadRequest, CreateOrderRequest, CreateUserRequest,
    ImportLeadsResponse, ImportRowError, LeadInfo, LeadStatsResponse, ListLeadsQuery,
    ListLeadsResponse, ListOrdersQuery, ListOrdersResponse, ListUsersQuery, ListUsersResponse,
    OrderDetailsResponse, OrderInfo, OrderTimelineResponse, OrderTransitionResponse,
    UnassignLeadsRequest, UpdateLeadStatusRequest, UpdateOrderRequest, UpdateUserRequest,
    UserInfo,
};

// ============================================================================
// Parsing helpers
// ============================================================================

fn parse_value<T>(value: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    value.parse::<T>().map_err(translate_domain_error)
}

fn parse_optional<T>(value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(parse_value)
        .transpose()
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
fn parse_timestamp(field: &str, value: &str) -> Result<OffsetDateTime, ApiError> {
    let value: &str = value.trim();
    if let Ok(timestamp) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(timestamp);
    }
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("'{value}' is not an RFC 3339 timestamp or YYYY-MM-DD date"),
        })
}

fn page_request(page: Option<u32>, per_page: Option<u32>) -> Result<PageRequest, ApiError> {
    let page: u32 = page.unwrap_or(1);
    let per_page: u32 = per_page.unwrap_or(PageRequest::DEFAULT_PER_PAGE);

    if page == 0 {
        return Err(ApiError::InvalidInput {
            field: String::from("page"),
            message: String::from("Page numbers start at 1"),
        });
    }
    if per_page == 0 || per_page > PageRequest::MAX_PER_PAGE {
        return Err(ApiError::InvalidInput {
            field: String::from("per_page"),
            message: format!(
                "Must be between 1 and {}, got {per_page}",
                PageRequest::MAX_PER_PAGE
            ),
        });
    }

    Ok(PageRequest::new(page, per_page))
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn require_lead(persistence: &mut Persistence, lead_id: i64) -> Result<Lead, ApiError> {
    persistence
        .get_lead(lead_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::LeadNotFound(lead_id)))
}

fn require_user(persistence: &mut Persistence, user_id: i64) -> Result<UserData, ApiError> {
    persistence
        .get_user_by_id(user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::UserNotFound(user_id)))
}

fn transition_response(transition: &OrderTransition) -> OrderTransitionResponse {
    OrderTransitionResponse {
        order: OrderInfo::from(&transition.order),
        event_id: transition.audit_event.event_id,
    }
}

fn assignment_response(outcome: &AssignmentOutcome) -> AssignmentResponse {
    AssignmentResponse {
        modified: outcome.modified,
        event_id: outcome
            .audit_event
            .as_ref()
            .and_then(|event: &AuditEvent| event.event_id),
    }
}

// ============================================================================
// Orders
// ============================================================================

/// Creates an order and claims leads for it.
///
/// The order is always created when the request is valid; an order that
/// could claim nothing comes back `cancelled`.
///
/// # Errors
///
/// Returns an error if:
/// - A count, filter or priority is invalid
/// - The caller may not create orders
/// - Allocation fails verification or the store fails
pub fn create_order(
    persistence: &mut Persistence,
    request: &CreateOrderRequest,
    authenticated_actor: &AuthenticatedActor,
    policy: &AllocationPolicy,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<OrderTransitionResponse, ApiError> {
    let gender: Option<Gender> = parse_optional(request.gender.as_deref())?;
    let priority: Priority = parse_optional(request.priority.as_deref())?.unwrap_or_default();

    let criteria: SelectionCriteria = SelectionCriteria::builder()
        .country(request.country.as_deref())
        .gender(gender)
        .exclude_clients(&request.excluded_clients)
        .exclude_brokers(&request.excluded_brokers)
        .exclude_networks(&request.excluded_networks)
        .build();

    let mut order_request: OrderRequest = OrderRequest::new(
        LeadCounts::new(request.ftd, request.filler, request.cold, request.live),
        criteria,
    );
    order_request.priority = priority;
    order_request.notes = non_blank(request.notes.as_ref());

    let transition: OrderTransition = persistence
        .create_order(
            order_request,
            &authenticated_actor.to_requester(),
            policy,
            cause,
            now,
        )
        .map_err(translate_persistence_error)?;

    info!(
        order_id = transition.order.order_id,
        requester_id = authenticated_actor.user_id,
        status = %transition.order.status,
        "Order request handled"
    );
    Ok(transition_response(&transition))
}

/// Lists orders. Non-admins only see their own.
///
/// # Errors
///
/// Returns an error if a filter or the page window is invalid, or the store fails.
pub fn list_orders(
    persistence: &mut Persistence,
    query: &ListOrdersQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListOrdersResponse, ApiError> {
    let filter: OrderFilter = OrderFilter {
        status: parse_optional(query.status.as_deref())?,
        priority: parse_optional(query.priority.as_deref())?,
        created_from: query
            .from
            .as_deref()
            .map(|v| parse_timestamp("from", v))
            .transpose()?,
        created_to: query
            .to
            .as_deref()
            .map(|v| parse_timestamp("to", v))
            .transpose()?,
        requester_id: if sees_all_orders(authenticated_actor.role) {
            None
        } else {
            Some(authenticated_actor.user_id)
        },
    };
    let page: PageRequest = page_request(query.page, query.per_page)?;

    let orders: Page<Order> = persistence
        .list_orders(&filter, page)
        .map_err(translate_persistence_error)?;

    Ok(ListOrdersResponse {
        orders: orders.items.iter().map(OrderInfo::from).collect(),
        total: orders.total,
        page: orders.page,
        per_page: orders.per_page,
        total_pages: orders.total_pages,
    })
}

/// Loads an order with its claimed leads.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the order does not exist, or `Unauthorized`
/// if the caller neither owns it nor is an admin.
pub fn get_order(
    persistence: &mut Persistence,
    order_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<OrderDetailsResponse, ApiError> {
    let details: OrderDetails = persistence
        .get_order_details(order_id, &authenticated_actor.to_requester())
        .map_err(translate_persistence_error)?;

    Ok(OrderDetailsResponse {
        order: OrderInfo::from(&details.order),
        leads: details.leads.iter().map(LeadInfo::from).collect(),
    })
}

/// Changes an order's priority and/or notes.
///
/// # Errors
///
/// Returns an error if the order is missing or not the caller's, the
/// update is empty, or a value is invalid.
pub fn update_order(
    persistence: &mut Persistence,
    order_id: i64,
    request: &UpdateOrderRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<OrderTransitionResponse, ApiError> {
    let update: OrderUpdate = OrderUpdate {
        priority: parse_optional(request.priority.as_deref())?,
        notes: request.notes.clone(),
    };

    let transition: OrderTransition = persistence
        .update_order(
            order_id,
            &update,
            &authenticated_actor.to_requester(),
            cause,
            now,
        )
        .map_err(translate_persistence_error)?;

    Ok(transition_response(&transition))
}

/// Cancels an order and releases the leads it still holds.
///
/// # Errors
///
/// Returns an error if the order is missing or not the caller's, the
/// reason is blank, or the order is already cancelled (`Conflict`).
pub fn cancel_order(
    persistence: &mut Persistence,
    order_id: i64,
    request: &CancelOrderRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<OrderTransitionResponse, ApiError> {
    let transition: OrderTransition = persistence
        .cancel_order(
            order_id,
            &request.reason,
            &authenticated_actor.to_requester(),
            cause,
            now,
        )
        .map_err(translate_persistence_error)?;

    info!(
        order_id,
        requester_id = authenticated_actor.user_id,
        "Order cancelled"
    );
    Ok(transition_response(&transition))
}

/// Exports an order's claimed leads as CSV.
///
/// # Errors
///
/// Returns the same errors as [`get_order`], or `Internal` if writing fails.
pub fn export_order_leads(
    persistence: &mut Persistence,
    order_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<String, ApiError> {
    let details: OrderDetails = persistence
        .get_order_details(order_id, &authenticated_actor.to_requester())
        .map_err(translate_persistence_error)?;

    leads_to_csv(&details.leads)
}

/// Returns the audit history of an order, oldest first.
///
/// # Errors
///
/// Returns the same access errors as [`get_order`].
pub fn get_order_timeline(
    persistence: &mut Persistence,
    order_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<OrderTimelineResponse, ApiError> {
    persistence
        .get_order_details(order_id, &authenticated_actor.to_requester())
        .map_err(translate_persistence_error)?;

    let events: Vec<AuditEvent> = persistence
        .get_order_timeline(order_id)
        .map_err(translate_persistence_error)?;

    Ok(OrderTimelineResponse {
        order_id,
        events: events.iter().map(AuditEventInfo::from).collect(),
    })
}

// ============================================================================
// Leads
// ============================================================================

fn lead_record(request: &CreateLeadRequest) -> Result<NormalizedLeadRecord, ApiError> {
    let mut record: NormalizedLeadRecord = NormalizedLeadRecord::new(
        parse_value(&request.lead_type)?,
        request.first_name.clone(),
        request.last_name.clone(),
        request.email.clone(),
        request.country.clone(),
    );
    record.phone = non_blank(request.phone.as_ref());
    record.gender = parse_optional(request.gender.as_deref())?.unwrap_or_default();
    record.client = non_blank(request.client.as_ref());
    record.client_broker = non_blank(request.client_broker.as_ref());
    record.client_network = non_blank(request.client_network.as_ref());
    record.document_status = parse_optional(request.document_status.as_deref())?;
    record.status = parse_optional(request.status.as_deref())?.unwrap_or_default();
    record.source = non_blank(request.source.as_ref());
    Ok(record)
}

/// Creates a single lead.
///
/// # Errors
///
/// Returns an error if the caller may not manage leads, a field is invalid,
/// or the email is already in use.
pub fn create_lead(
    persistence: &mut Persistence,
    request: &CreateLeadRequest,
    authenticated_actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<LeadInfo, ApiError> {
    AuthorizationService::authorize_manage_leads(authenticated_actor)?;

    let record: NormalizedLeadRecord = lead_record(request)?;
    let lead: Lead = persistence
        .create_lead(&record, now)
        .map_err(translate_persistence_error)?;

    info!(lead_id = lead.lead_id, lead_type = %lead.lead_type, "Lead created");
    Ok(LeadInfo::from(&lead))
}

/// Imports leads from CSV text.
///
/// Rows that fail to parse or validate are reported with their CSV row
/// number; every other row is imported.
///
/// # Errors
///
/// Returns an error if the caller may not manage leads, the CSV header is
/// unusable, or the store fails.
pub fn import_leads(
    persistence: &mut Persistence,
    csv_content: &str,
    authenticated_actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<ImportLeadsResponse, ApiError> {
    AuthorizationService::authorize_manage_leads(authenticated_actor)?;

    let parsed: CsvImport = parse_leads_csv(csv_content)?;
    let records: Vec<NormalizedLeadRecord> =
        parsed.rows.iter().map(|row| row.record.clone()).collect();

    let report: IngestReport = persistence
        .ingest_leads(&records, now)
        .map_err(translate_persistence_error)?;

    let mut errors: Vec<ImportRowError> = parsed
        .errors
        .into_iter()
        .map(|e| ImportRowError {
            row: e.row_number,
            message: e.message,
        })
        .collect();
    // Ingest numbers rows within the parsed batch; map back to CSV rows.
    errors.extend(report.errors.into_iter().map(|(index, message)| {
        let row: usize = parsed
            .rows
            .get(index.saturating_sub(1))
            .map_or(index, |r| r.row_number);
        ImportRowError { row, message }
    }));
    errors.sort_by_key(|e| e.row);

    if !errors.is_empty() {
        warn!(rejected = errors.len(), "Some CSV rows were rejected");
    }

    Ok(ImportLeadsResponse {
        imported: report.imported.len(),
        lead_ids: report.imported,
        errors,
    })
}

/// Lists leads. Roles that do not see every lead only get their own.
///
/// # Errors
///
/// Returns an error if a filter or the page window is invalid, or the store fails.
pub fn list_leads(
    persistence: &mut Persistence,
    query: &ListLeadsQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListLeadsResponse, ApiError> {
    let filter: LeadFilter = LeadFilter {
        lead_type: parse_optional(query.lead_type.as_deref())?,
        status: parse_optional::<LeadStatus>(query.status.as_deref())?,
        assigned: query.assigned,
        country: non_blank(query.country.as_ref()),
        gender: parse_optional(query.gender.as_deref())?,
        order_id: query.order_id,
        assigned_to: if sees_all_leads(authenticated_actor.role) {
            None
        } else {
            Some(authenticated_actor.user_id)
        },
    };
    let page: PageRequest = page_request(query.page, query.per_page)?;

    let leads: Page<Lead> = persistence
        .list_leads(&filter, page)
        .map_err(translate_persistence_error)?;

    Ok(ListLeadsResponse {
        leads: leads.items.iter().map(LeadInfo::from).collect(),
        total: leads.total,
        page: leads.page,
        per_page: leads.per_page,
        total_pages: leads.total_pages,
    })
}

/// Loads one lead with its comments.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the lead does not exist, or `Unauthorized`
/// if the caller may not see it.
pub fn get_lead(
    persistence: &mut Persistence,
    lead_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<LeadInfo, ApiError> {
    let lead: Lead = require_lead(persistence, lead_id)?;
    AuthorizationService::authorize_lead_access(
        authenticated_actor,
        lead.assigned_to(),
        "view_lead",
    )?;
    Ok(LeadInfo::from(&lead))
}

/// Deletes a lead.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the lead does not exist,
/// or a live order still holds it (`Conflict`).
pub fn delete_lead(
    persistence: &mut Persistence,
    lead_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_delete_lead(authenticated_actor)?;

    persistence
        .delete_lead(lead_id)
        .map_err(translate_persistence_error)?;

    info!(lead_id, deleted_by = authenticated_actor.user_id, "Lead deleted");
    Ok(())
}

/// Changes a lead's engagement status.
///
/// # Errors
///
/// Returns an error if the lead does not exist, the caller may not work it,
/// or the status is unknown.
pub fn update_lead_status(
    persistence: &mut Persistence,
    lead_id: i64,
    request: &UpdateLeadStatusRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<LeadInfo, ApiError> {
    let lead: Lead = require_lead(persistence, lead_id)?;
    AuthorizationService::authorize_lead_access(
        authenticated_actor,
        lead.assigned_to(),
        "update_lead_status",
    )?;
    let status: LeadStatus = parse_value(&request.status)?;

    persistence
        .update_lead_status(lead_id, status)
        .map_err(translate_persistence_error)?;

    let lead: Lead = require_lead(persistence, lead_id)?;
    Ok(LeadInfo::from(&lead))
}

/// Appends a comment to a lead, authored by the caller.
///
/// # Errors
///
/// Returns an error if the lead does not exist, the caller may not work it,
/// or the text is blank or too long.
pub fn add_comment(
    persistence: &mut Persistence,
    lead_id: i64,
    request: &AddCommentRequest,
    authenticated_actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<AddCommentResponse, ApiError> {
    let lead: Lead = require_lead(persistence, lead_id)?;
    AuthorizationService::authorize_lead_access(
        authenticated_actor,
        lead.assigned_to(),
        "comment_lead",
    )?;

    let comment_id: i64 = persistence
        .add_comment(lead_id, authenticated_actor.user_id, &request.text, now)
        .map_err(translate_persistence_error)?;

    Ok(AddCommentResponse {
        lead_id,
        comment_id,
    })
}

/// Assigns leads to an agent.
///
/// Ids that do not exist, or that the caller may not touch, are skipped and
/// show up only as a lower `modified` count.
///
/// # Errors
///
/// Returns an error if the caller may not assign, or the agent is unknown
/// (`ResourceNotFound`) or ineligible (`DomainRuleViolation`).
pub fn assign_leads(
    persistence: &mut Persistence,
    request: &AssignLeadsRequest,
    authenticated_actor: &AuthenticatedActor,
    policy: &AllocationPolicy,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<AssignmentResponse, ApiError> {
    let outcome: AssignmentOutcome = persistence
        .assign_leads(
            &request.lead_ids,
            request.agent_id,
            &authenticated_actor.to_requester(),
            policy,
            cause,
            now,
        )
        .map_err(translate_persistence_error)?;

    info!(
        agent_id = request.agent_id,
        requested = request.lead_ids.len(),
        modified = outcome.modified,
        "Leads assigned"
    );
    Ok(assignment_response(&outcome))
}

/// Clears the assignment of leads.
///
/// # Errors
///
/// Returns an error if the caller may not unassign, or the store fails.
pub fn unassign_leads(
    persistence: &mut Persistence,
    request: &UnassignLeadsRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<AssignmentResponse, ApiError> {
    let outcome: AssignmentOutcome = persistence
        .unassign_leads(
            &request.lead_ids,
            &authenticated_actor.to_requester(),
            cause,
            now,
        )
        .map_err(translate_persistence_error)?;

    Ok(assignment_response(&outcome))
}

/// Returns lead counts per type and per agent.
///
/// # Errors
///
/// Returns an error if the caller may not view reports, or the store fails.
pub fn lead_stats(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<LeadStatsResponse, ApiError> {
    AuthorizationService::authorize_view_reports(authenticated_actor)?;

    let stats: LeadStats = persistence
        .lead_stats()
        .map_err(translate_persistence_error)?;

    Ok(LeadStatsResponse {
        by_type: stats.by_type,
        overall: stats.overall,
        agents: stats.agents,
    })
}

// ============================================================================
// Users
// ============================================================================

fn create_user_record(
    persistence: &mut Persistence,
    request: &CreateUserRequest,
    now: OffsetDateTime,
) -> Result<UserData, ApiError> {
    let login_name: &str = request.login_name.trim();
    if login_name.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("login_name"),
            message: String::from("Login name cannot be empty"),
        });
    }
    let display_name: &str = request.display_name.trim();
    if display_name.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("display_name"),
            message: String::from("Display name cannot be empty"),
        });
    }

    let role: UserRole = parse_value(&request.role)?;
    PasswordPolicy::default().validate(&request.password, login_name, display_name)?;

    // Agents wait for approval before they can receive leads.
    let status: UserStatus = match role {
        UserRole::Agent => UserStatus::Pending,
        UserRole::Admin | UserRole::AffiliateManager | UserRole::LeadManager => {
            UserStatus::Approved
        }
    };

    persistence
        .create_user(
            &NewUser {
                login_name,
                display_name,
                password: &request.password,
                role,
                status,
            },
            now,
        )
        .map_err(translate_persistence_error)
}

/// Creates a user.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, a field or the password
/// is invalid, or the login name is taken (`Conflict`).
pub fn create_user(
    persistence: &mut Persistence,
    request: &CreateUserRequest,
    authenticated_actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<UserInfo, ApiError> {
    AuthorizationService::authorize_manage_users(authenticated_actor)?;

    let user: UserData = create_user_record(persistence, request, now)?;
    info!(
        user_id = user.user_id,
        login_name = %user.login_name,
        role = %user.role,
        created_by = authenticated_actor.user_id,
        "User created"
    );
    Ok(UserInfo::from(&user))
}

/// Creates the first admin when no user exists yet.
///
/// Returns `None` when the users table is not empty.
///
/// # Errors
///
/// Returns an error if the password fails the policy or the store fails.
pub fn bootstrap_admin(
    persistence: &mut Persistence,
    login_name: &str,
    password: &str,
    now: OffsetDateTime,
) -> Result<Option<UserInfo>, ApiError> {
    let existing: i64 = persistence
        .count_users()
        .map_err(translate_persistence_error)?;
    if existing > 0 {
        return Ok(None);
    }

    let request: CreateUserRequest = CreateUserRequest {
        login_name: login_name.to_string(),
        display_name: String::from("Administrator"),
        password: password.to_string(),
        role: UserRole::Admin.to_string(),
    };
    let user: UserData = create_user_record(persistence, &request, now)?;
    info!(user_id = user.user_id, login_name = %user.login_name, "Bootstrap admin created");
    Ok(Some(UserInfo::from(&user)))
}

/// Lists users, optionally of one role.
///
/// # Errors
///
/// Returns an error if the caller may not view reports or the role is unknown.
pub fn list_users(
    persistence: &mut Persistence,
    query: &ListUsersQuery,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ListUsersResponse, ApiError> {
    AuthorizationService::authorize_view_reports(authenticated_actor)?;

    let role: Option<UserRole> = parse_optional(query.role.as_deref())?;
    let users: Vec<UserData> = persistence
        .list_users(role)
        .map_err(translate_persistence_error)?;

    Ok(ListUsersResponse {
        users: users.iter().map(UserInfo::from).collect(),
    })
}

/// Changes a user's approval status and/or active flag.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the user does not exist,
/// nothing is being changed, or the status is unknown.
pub fn update_user(
    persistence: &mut Persistence,
    user_id: i64,
    request: &UpdateUserRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<UserInfo, ApiError> {
    AuthorizationService::authorize_manage_users(authenticated_actor)?;

    let status: Option<UserStatus> = parse_optional(request.status.as_deref())?;
    if status.is_none() && request.is_active.is_none() {
        return Err(ApiError::InvalidInput {
            field: String::from("update"),
            message: String::from("At least one of status or is_active must be provided"),
        });
    }
    require_user(persistence, user_id)?;

    if let Some(status) = status {
        persistence
            .set_user_status(user_id, status)
            .map_err(translate_persistence_error)?;
    }
    if let Some(is_active) = request.is_active {
        persistence
            .set_user_active(user_id, is_active)
            .map_err(translate_persistence_error)?;
    }

    let user: UserData = require_user(persistence, user_id)?;
    info!(
        user_id,
        status = %user.status,
        is_active = user.is_active,
        updated_by = authenticated_actor.user_id,
        "User updated"
    );
    Ok(UserInfo::from(&user))
}
