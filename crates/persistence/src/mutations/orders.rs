// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order mutations.

use std::collections::BTreeSet;

use diesel::SqliteConnection;
use diesel::prelude::*;
use leadflow_domain::{LeadType, NewOrder, OrderStatus, OrderUpdate, SelectionCriteria};
use num_traits::ToPrimitive;
use time::OffsetDateTime;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::convert::{count_to_column, format_timestamp};
use crate::diesel_schema::{order_leads, orders};
use crate::error::PersistenceError;

/// Changed order metadata. `None` leaves a column untouched.
#[derive(AsChangeset)]
#[diesel(table_name = orders)]
struct OrderMetadataChanges<'a> {
    priority: Option<&'a str>,
    notes: Option<&'a str>,
}

fn exclusion_json(values: &BTreeSet<String>) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(values)?)
}

/// Inserts an order and its lead list, returning the new order id.
///
/// The lead list keeps claim order through its `position` column.
///
/// # Errors
///
/// Returns an error if an insert fails.
pub fn insert_order(
    conn: &mut SqliteConnection,
    order: &NewOrder,
) -> Result<i64, PersistenceError> {
    let criteria: &SelectionCriteria = &order.criteria;
    let requested = |lead_type: LeadType| count_to_column(order.requests.get(lead_type));
    let fulfilled = |lead_type: LeadType| count_to_column(order.fulfilled.get(lead_type));

    diesel::insert_into(orders::table)
        .values((
            (
                orders::requester_id.eq(order.requester_id),
                orders::requested_ftd.eq(requested(LeadType::Ftd)?),
                orders::requested_filler.eq(requested(LeadType::Filler)?),
                orders::requested_cold.eq(requested(LeadType::Cold)?),
                orders::requested_live.eq(requested(LeadType::Live)?),
                orders::fulfilled_ftd.eq(fulfilled(LeadType::Ftd)?),
                orders::fulfilled_filler.eq(fulfilled(LeadType::Filler)?),
                orders::fulfilled_cold.eq(fulfilled(LeadType::Cold)?),
                orders::fulfilled_live.eq(fulfilled(LeadType::Live)?),
            ),
            (
                orders::status.eq(order.status.as_str()),
                orders::priority.eq(order.priority.as_str()),
                orders::country_filter.eq(criteria.country()),
                orders::gender_filter.eq(criteria.gender().map(|g| g.as_str())),
                orders::excluded_clients.eq(exclusion_json(criteria.excluded_clients())?),
                orders::excluded_brokers.eq(exclusion_json(criteria.excluded_brokers())?),
                orders::excluded_networks.eq(exclusion_json(criteria.excluded_networks())?),
                orders::notes.eq(order.notes.as_deref()),
                orders::created_at.eq(format_timestamp(order.created_at)?),
                orders::cancelled_at.eq(order.cancelled_at.map(format_timestamp).transpose()?),
                orders::cancellation_reason.eq(order.cancellation_reason.as_deref()),
            ),
        ))
        .execute(conn)?;

    let order_id: i64 = get_last_insert_rowid(conn)?;

    let mut rows: Vec<(_, _, _)> = Vec::with_capacity(order.lead_ids.len());
    for (index, lead_id) in order.lead_ids.iter().enumerate() {
        let position: i32 = index.to_i32().ok_or_else(|| {
            PersistenceError::SerializationError(format!("Lead position {index} out of range"))
        })?;
        rows.push((
            order_leads::order_id.eq(order_id),
            order_leads::lead_id.eq(*lead_id),
            order_leads::position.eq(position),
        ));
    }
    if !rows.is_empty() {
        diesel::insert_into(order_leads::table)
            .values(rows)
            .execute(conn)?;
    }

    info!(
        order_id,
        status = %order.status,
        leads = order.lead_ids.len(),
        "Inserted order"
    );
    Ok(order_id)
}

/// Deletes an order. Its lead list goes with it.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_order(conn: &mut SqliteConnection, order_id: i64) -> Result<(), PersistenceError> {
    diesel::delete(orders::table.filter(orders::order_id.eq(order_id))).execute(conn)?;
    info!(order_id, "Deleted order");
    Ok(())
}

/// Marks an order cancelled.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the order does not exist.
pub fn mark_order_cancelled(
    conn: &mut SqliteConnection,
    order_id: i64,
    cancelled_at: OffsetDateTime,
    reason: &str,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(orders::table.filter(orders::order_id.eq(order_id)))
        .set((
            orders::status.eq(OrderStatus::Cancelled.as_str()),
            orders::cancelled_at.eq(Some(format_timestamp(cancelled_at)?)),
            orders::cancellation_reason.eq(Some(reason)),
        ))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("Order {order_id}")));
    }
    Ok(())
}

/// Applies a priority and/or notes change.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the order does not exist.
pub fn update_order_metadata(
    conn: &mut SqliteConnection,
    order_id: i64,
    update: &OrderUpdate,
) -> Result<(), PersistenceError> {
    let changes: OrderMetadataChanges<'_> = OrderMetadataChanges {
        priority: update.priority.map(|p| p.as_str()),
        notes: update.notes.as_deref(),
    };

    let affected: usize = diesel::update(orders::table.filter(orders::order_id.eq(order_id)))
        .set(&changes)
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("Order {order_id}")));
    }
    Ok(())
}
