// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leadflow_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use leadflow_domain::{
    AllocationPolicy, DomainError, Requester, UserAccount,
    policy::{assignment_owner_filter, authorize_assign_leads},
    validate_agent_eligibility,
};
use time::OffsetDateTime;

use crate::error::CoreError;
use crate::lifecycle::record;
use crate::store::{OrderRepository, UserDirectory};
use crate::transition::AssignmentOutcome;

/// Assigns leads to an agent.
///
/// Ids that do not exist, or that fall outside the requester's ownership
/// filter, are skipped; the outcome reports how many leads were modified.
///
/// # Arguments
///
/// * `store` - The store
/// * `lead_ids` - The leads to assign
/// * `agent_id` - The receiving agent
/// * `requester` - Who is assigning
/// * `policy` - Whether the agent must be approved
/// * `cause` - Why the assignment was requested
/// * `now` - The assignment time
///
/// # Errors
///
/// Returns an error if:
/// - The requester may not assign leads
/// - The agent does not exist
/// - The agent is not an active (and, if required, approved) agent
/// - The store fails
pub fn assign_leads<S: OrderRepository + UserDirectory>(
    store: &mut S,
    lead_ids: &[i64],
    agent_id: i64,
    requester: &Requester,
    policy: &AllocationPolicy,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<AssignmentOutcome, S::Error> {
    authorize_assign_leads(requester.role)
        .require("assign_leads")
        .map_err(CoreError::from)?;

    let agent: UserAccount = store
        .find_user(agent_id)?
        .ok_or(CoreError::DomainViolation(DomainError::UserNotFound(
            agent_id,
        )))?;
    validate_agent_eligibility(&agent, policy).map_err(CoreError::from)?;

    let modified: usize =
        store.assign_leads(lead_ids, agent_id, now, assignment_owner_filter(requester))?;

    let action: Action = Action::new(
        String::from("AssignLeads"),
        Some(format!(
            "Assigned {modified} of {} leads to user {agent_id}",
            lead_ids.len()
        )),
    );
    finish(store, modified, requester, cause, action, now)
}

/// Clears the assignment of the listed leads.
///
/// Leads that are not assigned, or that fall outside the requester's
/// ownership filter, are skipped.
///
/// # Errors
///
/// Returns an error if the requester may not unassign leads or the store
/// fails.
pub fn unassign_leads<S: OrderRepository>(
    store: &mut S,
    lead_ids: &[i64],
    requester: &Requester,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<AssignmentOutcome, S::Error> {
    authorize_assign_leads(requester.role)
        .require("unassign_leads")
        .map_err(CoreError::from)?;

    let modified: usize = store.unassign_leads(lead_ids, assignment_owner_filter(requester))?;

    let action: Action = Action::new(
        String::from("UnassignLeads"),
        Some(format!("Unassigned {modified} of {} leads", lead_ids.len())),
    );
    finish(store, modified, requester, cause, action, now)
}

fn finish<S: OrderRepository>(
    store: &mut S,
    modified: usize,
    requester: &Requester,
    cause: Cause,
    action: Action,
    now: OffsetDateTime,
) -> Result<AssignmentOutcome, S::Error> {
    if modified == 0 {
        return Ok(AssignmentOutcome {
            modified,
            audit_event: None,
        });
    }

    let audit_event: AuditEvent = record(
        store,
        AuditEvent::new(
            Actor::from_requester(requester),
            cause,
            action,
            StateSnapshot::empty(),
            StateSnapshot::new(format!("modified={modified}")),
            None,
            now,
        ),
    )?;

    Ok(AssignmentOutcome {
        modified,
        audit_event: Some(audit_event),
    })
}
