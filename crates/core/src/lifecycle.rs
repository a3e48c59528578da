// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leadflow_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use leadflow_domain::{
    AllocationPolicy, DomainError, Lead, NO_LEADS_AVAILABLE_REASON, NewOrder, Order,
    OrderRequest, OrderStatus, OrderUpdate, Requester, authorize_owner, derive_order_status,
    policy::authorize_create_order, validate_cancellation_reason, validate_order_request,
    validate_order_update,
};
use time::OffsetDateTime;

use crate::allocator::{AllocationResult, allocate};
use crate::error::CoreError;
use crate::store::OrderRepository;
use crate::transition::{OrderDetails, OrderTransition, order_snapshot};

/// Creates an order: selects leads, persists the order, claims every lead
/// and verifies that each one now carries the new order id.
///
/// Callers that need all-or-nothing behaviour run this inside a store
/// transaction. Without one, a failed verification still removes the order,
/// but leads that were claimed are left as they are; they are never released
/// here since another order may own them by now.
///
/// # Arguments
///
/// * `store` - The order repository
/// * `request` - The order request
/// * `requester` - Who is creating the order
/// * `policy` - Allocation switches
/// * `cause` - Why the order is being created
/// * `now` - The creation time
///
/// # Errors
///
/// Returns an error if:
/// - The request is empty or has invalid fields
/// - The requester may not create orders
/// - Any claimed lead fails verification (`AllocationInconsistency`)
/// - The store fails
pub fn create_order<S: OrderRepository>(
    store: &mut S,
    request: OrderRequest,
    requester: &Requester,
    policy: &AllocationPolicy,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<OrderTransition, S::Error> {
    authorize_create_order(requester.role)
        .require("create_order")
        .map_err(CoreError::from)?;
    validate_order_request(&request).map_err(CoreError::from)?;

    let allocation: AllocationResult = allocate(store, &request, policy)?;
    let lead_ids: Vec<i64> = allocation.lead_ids();

    let status: OrderStatus = derive_order_status(&request.counts, &allocation.fulfilled);
    let (cancelled_at, cancellation_reason) = if status.is_cancelled() {
        (Some(now), Some(String::from(NO_LEADS_AVAILABLE_REASON)))
    } else {
        (None, None)
    };

    let new_order: NewOrder = NewOrder {
        requester_id: requester.user_id,
        requests: request.counts,
        fulfilled: allocation.fulfilled,
        lead_ids: lead_ids.clone(),
        status,
        priority: request.priority,
        criteria: request.criteria,
        notes: request.notes,
        created_at: now,
        cancelled_at,
        cancellation_reason,
    };

    let order_id: i64 = store.insert_order(&new_order)?;

    for lead_id in &lead_ids {
        // A lost claim is caught by verification below
        store.claim_lead(*lead_id, order_id, requester.user_id, now, policy.exclusive)?;
    }

    let unverified: Vec<i64> = unverified_leads(store, order_id, &lead_ids)?;
    if !unverified.is_empty() {
        store.delete_order(order_id)?;
        return Err(CoreError::AllocationInconsistency {
            order_id,
            lead_ids: unverified,
        }
        .into());
    }

    let order: Order = new_order.into_order(order_id);
    let action: Action = Action::new(
        String::from("CreateOrder"),
        Some(format!(
            "Requested [{}], fulfilled [{}]",
            order.requests, order.fulfilled
        )),
    );
    let audit_event: AuditEvent = record(
        store,
        AuditEvent::new(
            Actor::from_requester(requester),
            cause,
            action,
            StateSnapshot::empty(),
            order_snapshot(&order),
            Some(order_id),
            now,
        ),
    )?;

    Ok(OrderTransition { order, audit_event })
}

/// Cancels an order and releases the leads it still holds.
///
/// Only leads whose order reference is still this order are released; the
/// reference itself is kept for history.
///
/// # Arguments
///
/// * `store` - The order repository
/// * `order_id` - The order to cancel
/// * `reason` - The cancellation reason
/// * `requester` - Who is cancelling
/// * `cause` - Why the cancellation was requested
/// * `now` - The cancellation time
///
/// # Errors
///
/// Returns an error if:
/// - The reason is blank or too long
/// - The order does not exist
/// - The requester is neither the owner nor an admin
/// - The order is already cancelled (nothing is written)
/// - The store fails
pub fn cancel_order<S: OrderRepository>(
    store: &mut S,
    order_id: i64,
    reason: &str,
    requester: &Requester,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<OrderTransition, S::Error> {
    validate_cancellation_reason(reason).map_err(CoreError::from)?;

    let before: Order = load_authorized(store, order_id, requester, "cancel_order")?;
    if before.status.is_cancelled() {
        return Err(CoreError::from(DomainError::OrderAlreadyCancelled(order_id)).into());
    }
    if !before.status.can_transition_to(OrderStatus::Cancelled) {
        return Err(CoreError::from(DomainError::InvalidStatusTransition {
            from: before.status,
            to: OrderStatus::Cancelled,
        })
        .into());
    }

    let released: usize = store.release_order_leads(order_id, &before.lead_ids)?;
    store.mark_order_cancelled(order_id, now, reason.trim())?;

    let order: Order = store
        .get_order(order_id)?
        .ok_or(CoreError::DomainViolation(DomainError::OrderNotFound(
            order_id,
        )))?;

    let action: Action = Action::new(
        String::from("CancelOrder"),
        Some(format!("Released {released} leads: {}", reason.trim())),
    );
    let audit_event: AuditEvent = record(
        store,
        AuditEvent::new(
            Actor::from_requester(requester),
            cause,
            action,
            order_snapshot(&before),
            order_snapshot(&order),
            Some(order_id),
            now,
        ),
    )?;

    Ok(OrderTransition { order, audit_event })
}

/// Updates an order's priority or notes.
///
/// Cancelled orders still accept metadata edits.
///
/// # Errors
///
/// Returns an error if:
/// - The update changes nothing or has invalid notes
/// - The order does not exist
/// - The requester is neither the owner nor an admin
/// - The store fails
pub fn update_order<S: OrderRepository>(
    store: &mut S,
    order_id: i64,
    update: &OrderUpdate,
    requester: &Requester,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<OrderTransition, S::Error> {
    validate_order_update(update).map_err(CoreError::from)?;

    let before: Order = load_authorized(store, order_id, requester, "update_order")?;
    store.update_order_metadata(order_id, update)?;

    let order: Order = store
        .get_order(order_id)?
        .ok_or(CoreError::DomainViolation(DomainError::OrderNotFound(
            order_id,
        )))?;

    let action: Action = Action::new(String::from("UpdateOrder"), None);
    let audit_event: AuditEvent = record(
        store,
        AuditEvent::new(
            Actor::from_requester(requester),
            cause,
            action,
            order_snapshot(&before),
            order_snapshot(&order),
            Some(order_id),
            now,
        ),
    )?;

    Ok(OrderTransition { order, audit_event })
}

/// Loads an order with its leads in claim order.
///
/// # Errors
///
/// Returns an error if the order does not exist, the requester is neither
/// the owner nor an admin, or the store fails.
pub fn get_order<S: OrderRepository>(
    store: &mut S,
    order_id: i64,
    requester: &Requester,
) -> Result<OrderDetails, S::Error> {
    let order: Order = load_authorized(store, order_id, requester, "view_order")?;

    let mut found: Vec<Lead> = store.find_leads_by_ids(&order.lead_ids)?;
    let mut leads: Vec<Lead> = Vec::with_capacity(found.len());
    for lead_id in &order.lead_ids {
        if let Some(index) = found.iter().position(|lead| lead.lead_id == *lead_id) {
            leads.push(found.swap_remove(index));
        }
    }

    Ok(OrderDetails { order, leads })
}

fn load_authorized<S: OrderRepository>(
    store: &mut S,
    order_id: i64,
    requester: &Requester,
    action: &'static str,
) -> Result<Order, S::Error> {
    let order: Order = store
        .get_order(order_id)?
        .ok_or(CoreError::DomainViolation(DomainError::OrderNotFound(
            order_id,
        )))?;

    authorize_owner(requester, order.requester_id)
        .require(action)
        .map_err(CoreError::from)?;

    Ok(order)
}

fn unverified_leads<S: OrderRepository>(
    store: &mut S,
    order_id: i64,
    lead_ids: &[i64],
) -> Result<Vec<i64>, S::Error> {
    if lead_ids.is_empty() {
        return Ok(Vec::new());
    }

    let leads: Vec<Lead> = store.find_leads_by_ids(lead_ids)?;
    Ok(lead_ids
        .iter()
        .copied()
        .filter(|lead_id| {
            !leads
                .iter()
                .any(|lead| lead.lead_id == *lead_id && lead.order_id == Some(order_id))
        })
        .collect())
}

pub(crate) fn record<S: OrderRepository>(
    store: &mut S,
    event: AuditEvent,
) -> Result<AuditEvent, S::Error> {
    let event_id: i64 = store.record_audit_event(&event)?;
    Ok(event.with_event_id(event_id))
}
