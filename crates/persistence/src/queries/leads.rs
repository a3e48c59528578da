// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lead queries.
//!
//! Lead rows are always loaded together with their comments and turned into
//! domain `Lead` values here. Rows whose assignment columns disagree are
//! rejected rather than repaired.

use std::collections::BTreeMap;

use diesel::SqliteConnection;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use leadflow_domain::{
    Assignment, Comment, Lead, LeadStatus, LeadType, OrderStatus, SelectionCriteria, UserRole,
};
use tracing::debug;

use crate::convert::{
    contains_pattern, count_to_u64, flag, flag_value, fold_case, parse_label, parse_timestamp,
};
use crate::data_models::{AgentPerformance, LeadFilter, LeadStats, LeadTypeStats, Page, PageRequest};
use crate::diesel_schema::{lead_comments, leads, order_leads, orders, users};
use crate::error::PersistenceError;

/// Diesel Queryable struct for lead rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = leads)]
#[diesel(check_for_backend(Sqlite))]
struct LeadRow {
    lead_id: i64,
    lead_type: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    country: String,
    gender: String,
    client: Option<String>,
    client_broker: Option<String>,
    client_network: Option<String>,
    document_status: Option<String>,
    status: String,
    source: Option<String>,
    is_assigned: i32,
    assigned_to: Option<i64>,
    assigned_at: Option<String>,
    order_id: Option<i64>,
    created_at: String,
}

/// Diesel Queryable struct for comment rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = lead_comments)]
#[diesel(check_for_backend(Sqlite))]
struct CommentRow {
    lead_id: i64,
    author_id: i64,
    text: String,
    created_at: String,
}

fn lead_from_row(row: LeadRow, comments: Vec<Comment>) -> Result<Lead, PersistenceError> {
    let assignment: Option<Assignment> = match (
        flag(row.is_assigned),
        row.assigned_to,
        row.assigned_at.as_deref(),
    ) {
        (true, Some(agent_id), Some(assigned_at)) => {
            Some(Assignment::new(agent_id, parse_timestamp(assigned_at)?))
        }
        (false, None, None) => None,
        _ => {
            return Err(PersistenceError::ReconstructionError(format!(
                "Lead {} has a partially set assignment",
                row.lead_id
            )));
        }
    };

    Ok(Lead {
        lead_id: row.lead_id,
        lead_type: parse_label(&row.lead_type)?,
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        phone: row.phone,
        country: row.country,
        gender: parse_label(&row.gender)?,
        client: row.client,
        client_broker: row.client_broker,
        client_network: row.client_network,
        document_status: row.document_status.as_deref().map(parse_label).transpose()?,
        status: parse_label(&row.status)?,
        source: row.source,
        assignment,
        order_id: row.order_id,
        comments,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

/// Turns rows into leads, loading every row's comments in one query.
fn leads_from_rows(
    conn: &mut SqliteConnection,
    rows: Vec<LeadRow>,
) -> Result<Vec<Lead>, PersistenceError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let lead_ids: Vec<i64> = rows.iter().map(|row| row.lead_id).collect();
    let comment_rows: Vec<CommentRow> = lead_comments::table
        .filter(lead_comments::lead_id.eq_any(&lead_ids))
        .order((lead_comments::lead_id.asc(), lead_comments::comment_id.asc()))
        .select(CommentRow::as_select())
        .load(conn)?;

    let mut comments: BTreeMap<i64, Vec<Comment>> = BTreeMap::new();
    for row in comment_rows {
        comments.entry(row.lead_id).or_default().push(Comment {
            text: row.text,
            author_id: row.author_id,
            created_at: parse_timestamp(&row.created_at)?,
        });
    }

    rows.into_iter()
        .map(|row| {
            let lead_comments: Vec<Comment> = comments.remove(&row.lead_id).unwrap_or_default();
            lead_from_row(row, lead_comments)
        })
        .collect()
}

/// Finds up to `limit` leads of one type matching the selection criteria,
/// in ascending lead id order.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `lead_type` - The bucket to search
/// * `limit` - Maximum number of leads
/// * `criteria` - Country, gender and exclusion constraints
/// * `exclusive` - Only return unassigned leads
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn find_available(
    conn: &mut SqliteConnection,
    lead_type: LeadType,
    limit: u32,
    criteria: &SelectionCriteria,
    exclusive: bool,
) -> Result<Vec<Lead>, PersistenceError> {
    let mut query = leads::table
        .filter(leads::lead_type.eq(lead_type.as_str()))
        .into_boxed::<Sqlite>();

    if exclusive {
        query = query.filter(leads::is_assigned.eq(0));
    }
    if let Some(country) = criteria.country() {
        query = query.filter(
            leads::country_folded
                .like(contains_pattern(&fold_case(country)))
                .escape('\\'),
        );
    }
    if let Some(gender) = criteria.gender() {
        query = query.filter(leads::gender.eq(gender.as_str()));
    }

    let clients: Vec<&str> = criteria
        .excluded_clients()
        .iter()
        .map(String::as_str)
        .collect();
    if !clients.is_empty() {
        query = query.filter(leads::client.is_null().or(leads::client.ne_all(clients)));
    }
    let brokers: Vec<&str> = criteria
        .excluded_brokers()
        .iter()
        .map(String::as_str)
        .collect();
    if !brokers.is_empty() {
        query = query.filter(
            leads::client_broker
                .is_null()
                .or(leads::client_broker.ne_all(brokers)),
        );
    }
    let networks: Vec<&str> = criteria
        .excluded_networks()
        .iter()
        .map(String::as_str)
        .collect();
    if !networks.is_empty() {
        query = query.filter(
            leads::client_network
                .is_null()
                .or(leads::client_network.ne_all(networks)),
        );
    }

    let rows: Vec<LeadRow> = query
        .select(LeadRow::as_select())
        .order(leads::lead_id.asc())
        .limit(i64::from(limit))
        .load(conn)?;

    debug!(%lead_type, limit, found = rows.len(), "Searched available leads");
    leads_from_rows(conn, rows)
}

/// Loads the given leads in ascending id order. Unknown ids are skipped.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn find_leads_by_ids(
    conn: &mut SqliteConnection,
    lead_ids: &[i64],
) -> Result<Vec<Lead>, PersistenceError> {
    if lead_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<LeadRow> = leads::table
        .filter(leads::lead_id.eq_any(lead_ids))
        .order(leads::lead_id.asc())
        .select(LeadRow::as_select())
        .load(conn)?;

    leads_from_rows(conn, rows)
}

/// Loads one lead with its comments.
///
/// # Errors
///
/// Returns an error if the query fails.
/// Returns `Ok(None)` if the lead does not exist.
pub fn get_lead(
    conn: &mut SqliteConnection,
    lead_id: i64,
) -> Result<Option<Lead>, PersistenceError> {
    Ok(find_leads_by_ids(conn, &[lead_id])?.pop())
}

fn filtered_leads(filter: &LeadFilter) -> leads::BoxedQuery<'_, Sqlite> {
    let mut query = leads::table.into_boxed::<Sqlite>();

    if let Some(lead_type) = filter.lead_type {
        query = query.filter(leads::lead_type.eq(lead_type.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(leads::status.eq(status.as_str()));
    }
    if let Some(assigned) = filter.assigned {
        query = query.filter(leads::is_assigned.eq(flag_value(assigned)));
    }
    if let Some(country) = &filter.country {
        query = query.filter(
            leads::country_folded
                .like(contains_pattern(&fold_case(country)))
                .escape('\\'),
        );
    }
    if let Some(gender) = filter.gender {
        query = query.filter(leads::gender.eq(gender.as_str()));
    }
    if let Some(order_id) = filter.order_id {
        query = query.filter(leads::order_id.eq(order_id));
    }
    if let Some(assigned_to) = filter.assigned_to {
        query = query.filter(leads::assigned_to.eq(assigned_to));
    }

    query
}

/// Lists leads matching a filter, one page at a time, in ascending id order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_leads(
    conn: &mut SqliteConnection,
    filter: &LeadFilter,
    page: PageRequest,
) -> Result<Page<Lead>, PersistenceError> {
    let total: i64 = filtered_leads(filter).count().get_result(conn)?;

    let rows: Vec<LeadRow> = filtered_leads(filter)
        .select(LeadRow::as_select())
        .order(leads::lead_id.asc())
        .offset(page.offset())
        .limit(page.limit())
        .load(conn)?;

    let items: Vec<Lead> = leads_from_rows(conn, rows)?;
    Ok(Page::new(items, count_to_u64(total)?, page))
}

/// Returns whether any lead already uses the given email address.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn email_exists(conn: &mut SqliteConnection, email: &str) -> Result<bool, PersistenceError> {
    Ok(diesel::select(diesel::dsl::exists(
        leads::table.filter(leads::email.eq(email)),
    ))
    .get_result(conn)?)
}

/// Returns the id of a non-cancelled order that lists the lead, if any.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_active_order_for_lead(
    conn: &mut SqliteConnection,
    lead_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    Ok(order_leads::table
        .inner_join(orders::table)
        .filter(order_leads::lead_id.eq(lead_id))
        .filter(orders::status.ne(OrderStatus::Cancelled.as_str()))
        .select(orders::order_id)
        .first::<i64>(conn)
        .optional()?)
}

/// Computes lead counts per type and per agent.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn lead_stats(conn: &mut SqliteConnection) -> Result<LeadStats, PersistenceError> {
    let grouped: Vec<(String, i32, i64)> = leads::table
        .group_by((leads::lead_type, leads::is_assigned))
        .select((leads::lead_type, leads::is_assigned, count_star()))
        .load(conn)?;

    let mut by_type: Vec<LeadTypeStats> = LeadType::ALL
        .iter()
        .map(|lead_type| LeadTypeStats {
            lead_type: Some(*lead_type),
            ..LeadTypeStats::default()
        })
        .collect();
    let mut overall: LeadTypeStats = LeadTypeStats::default();

    for (lead_type, is_assigned, count) in grouped {
        let lead_type: LeadType = parse_label(&lead_type)?;
        let count: u64 = count_to_u64(count)?;
        let Some(entry) = by_type
            .iter_mut()
            .find(|entry| entry.lead_type == Some(lead_type))
        else {
            continue;
        };
        for stats in [&mut *entry, &mut overall] {
            stats.total += count;
            if flag(is_assigned) {
                stats.assigned += count;
            } else {
                stats.available += count;
            }
        }
    }

    let assigned: BTreeMap<i64, i64> = by_holder(
        leads::table
            .filter(leads::is_assigned.eq(1))
            .group_by(leads::assigned_to)
            .select((leads::assigned_to, count_star()))
            .load(conn)?,
    );
    let converted: BTreeMap<i64, i64> = by_holder(
        leads::table
            .filter(leads::is_assigned.eq(1))
            .filter(leads::status.eq(LeadStatus::Converted.as_str()))
            .group_by(leads::assigned_to)
            .select((leads::assigned_to, count_star()))
            .load(conn)?,
    );

    let agent_rows: Vec<(i64, String)> = users::table
        .filter(users::role.eq(UserRole::Agent.as_str()))
        .order(users::user_id.asc())
        .select((users::user_id, users::display_name))
        .load(conn)?;

    let mut agents: Vec<AgentPerformance> = Vec::with_capacity(agent_rows.len());
    for (user_id, display_name) in agent_rows {
        agents.push(AgentPerformance {
            user_id,
            display_name,
            assigned: count_to_u64(assigned.get(&user_id).copied().unwrap_or(0))?,
            converted: count_to_u64(converted.get(&user_id).copied().unwrap_or(0))?,
        });
    }

    Ok(LeadStats {
        by_type,
        overall,
        agents,
    })
}

fn by_holder(rows: Vec<(Option<i64>, i64)>) -> BTreeMap<i64, i64> {
    rows.into_iter()
        .filter_map(|(user_id, count)| user_id.map(|id| (id, count)))
        .collect()
}
