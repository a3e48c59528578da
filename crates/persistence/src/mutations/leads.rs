// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lead mutations.
//!
//! The three assignment columns are only ever written together, through
//! [`assignment_values`].

use diesel::SqliteConnection;
use diesel::dsl;
use diesel::prelude::*;
use leadflow_domain::{LeadStatus, NormalizedLeadRecord};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::convert::{flag_value, fold_case, format_timestamp};
use crate::diesel_schema::{lead_comments, leads};
use crate::error::PersistenceError;

type AssignmentValues = (
    dsl::Eq<leads::is_assigned, i32>,
    dsl::Eq<leads::assigned_to, Option<i64>>,
    dsl::Eq<leads::assigned_at, Option<String>>,
);

/// Builds the assignment column triplet for a holder, or the cleared triplet.
fn assignment_values(
    holder: Option<(i64, OffsetDateTime)>,
) -> Result<AssignmentValues, PersistenceError> {
    let (agent_id, assigned_at): (Option<i64>, Option<String>) = match holder {
        Some((agent_id, at)) => (Some(agent_id), Some(format_timestamp(at)?)),
        None => (None, None),
    };

    Ok((
        leads::is_assigned.eq(flag_value(agent_id.is_some())),
        leads::assigned_to.eq(agent_id),
        leads::assigned_at.eq(assigned_at),
    ))
}

/// Inserts a new, unassigned lead and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_lead(
    conn: &mut SqliteConnection,
    record: &NormalizedLeadRecord,
    created_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(leads::table)
        .values((
            leads::lead_type.eq(record.lead_type.as_str()),
            leads::first_name.eq(record.first_name.trim()),
            leads::last_name.eq(record.last_name.trim()),
            leads::email.eq(record.email.trim()),
            leads::phone.eq(record.phone.as_deref()),
            leads::country.eq(record.country.trim()),
            leads::country_folded.eq(fold_case(&record.country)),
            leads::gender.eq(record.gender.as_str()),
            leads::client.eq(record.client.as_deref()),
            leads::client_broker.eq(record.client_broker.as_deref()),
            leads::client_network.eq(record.client_network.as_deref()),
            leads::document_status.eq(record.document_status.map(|s| s.as_str())),
            leads::status.eq(record.status.as_str()),
            leads::source.eq(record.source.as_deref()),
            leads::is_assigned.eq(0),
            leads::created_at.eq(format_timestamp(created_at)?),
        ))
        .execute(conn)?;

    let lead_id: i64 = get_last_insert_rowid(conn)?;
    debug!(lead_id, lead_type = %record.lead_type, "Inserted lead");
    Ok(lead_id)
}

/// Claims a lead for an order.
///
/// With `exclusive` set the update is conditional on the lead being
/// unassigned at write time, so two writers can never both claim it.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn claim_lead(
    conn: &mut SqliteConnection,
    lead_id: i64,
    order_id: i64,
    agent_id: i64,
    assigned_at: OffsetDateTime,
    exclusive: bool,
) -> Result<bool, PersistenceError> {
    let values: AssignmentValues = assignment_values(Some((agent_id, assigned_at)))?;
    let target = leads::table.filter(leads::lead_id.eq(lead_id));

    let affected: usize = if exclusive {
        diesel::update(target.filter(leads::is_assigned.eq(0)))
            .set((values, leads::order_id.eq(Some(order_id))))
            .execute(conn)?
    } else {
        diesel::update(target)
            .set((values, leads::order_id.eq(Some(order_id))))
            .execute(conn)?
    };

    Ok(affected == 1)
}

/// Clears the assignment of the listed leads still attributed to `order_id`.
///
/// The order reference is kept as history.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn release_order_leads(
    conn: &mut SqliteConnection,
    order_id: i64,
    lead_ids: &[i64],
) -> Result<usize, PersistenceError> {
    if lead_ids.is_empty() {
        return Ok(0);
    }

    let released: usize = diesel::update(
        leads::table
            .filter(leads::lead_id.eq_any(lead_ids))
            .filter(leads::order_id.eq(order_id))
            .filter(leads::is_assigned.eq(1)),
    )
    .set(assignment_values(None)?)
    .execute(conn)?;

    info!(order_id, released, "Released order leads");
    Ok(released)
}

/// Assigns the listed leads to an agent.
///
/// With `owner_filter` set, only leads currently held by that user change.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn assign_leads(
    conn: &mut SqliteConnection,
    lead_ids: &[i64],
    agent_id: i64,
    assigned_at: OffsetDateTime,
    owner_filter: Option<i64>,
) -> Result<usize, PersistenceError> {
    if lead_ids.is_empty() {
        return Ok(0);
    }

    let values: AssignmentValues = assignment_values(Some((agent_id, assigned_at)))?;
    let target = leads::table.filter(leads::lead_id.eq_any(lead_ids));

    let modified: usize = match owner_filter {
        Some(owner_id) => diesel::update(target.filter(leads::assigned_to.eq(owner_id)))
            .set(values)
            .execute(conn)?,
        None => diesel::update(target).set(values).execute(conn)?,
    };

    Ok(modified)
}

/// Clears the assignment of the listed leads that are currently assigned.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn unassign_leads(
    conn: &mut SqliteConnection,
    lead_ids: &[i64],
    owner_filter: Option<i64>,
) -> Result<usize, PersistenceError> {
    if lead_ids.is_empty() {
        return Ok(0);
    }

    let target = leads::table
        .filter(leads::lead_id.eq_any(lead_ids))
        .filter(leads::is_assigned.eq(1));

    let modified: usize = match owner_filter {
        Some(owner_id) => diesel::update(target.filter(leads::assigned_to.eq(owner_id)))
            .set(assignment_values(None)?)
            .execute(conn)?,
        None => diesel::update(target)
            .set(assignment_values(None)?)
            .execute(conn)?,
    };

    Ok(modified)
}

/// Changes the engagement status of a lead.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the lead does not exist.
pub fn update_lead_status(
    conn: &mut SqliteConnection,
    lead_id: i64,
    status: LeadStatus,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(leads::table.filter(leads::lead_id.eq(lead_id)))
        .set(leads::status.eq(status.as_str()))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("Lead {lead_id}")));
    }
    Ok(())
}

/// Appends a comment to a lead and returns the comment id.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the lead or author
/// does not exist.
pub fn add_comment(
    conn: &mut SqliteConnection,
    lead_id: i64,
    author_id: i64,
    text: &str,
    created_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(lead_comments::table)
        .values((
            lead_comments::lead_id.eq(lead_id),
            lead_comments::author_id.eq(author_id),
            lead_comments::text.eq(text.trim()),
            lead_comments::created_at.eq(format_timestamp(created_at)?),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Deletes a lead and its comments.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the lead does not exist.
pub fn delete_lead(conn: &mut SqliteConnection, lead_id: i64) -> Result<(), PersistenceError> {
    let affected: usize = diesel::delete(leads::table.filter(leads::lead_id.eq(lead_id)))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("Lead {lead_id}")));
    }
    info!(lead_id, "Deleted lead");
    Ok(())
}
