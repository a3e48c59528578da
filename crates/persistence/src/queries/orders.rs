// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order queries.

use std::collections::BTreeMap;

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use leadflow_domain::{Gender, LeadCounts, Order, SelectionCriteria};

use crate::convert::{
    count_from_column, count_to_u64, format_timestamp, parse_label, parse_optional_timestamp,
    parse_timestamp,
};
use crate::data_models::{OrderFilter, Page, PageRequest};
use crate::diesel_schema::{order_leads, orders};
use crate::error::PersistenceError;

/// Diesel Queryable struct for order rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(Sqlite))]
struct OrderRow {
    order_id: i64,
    requester_id: i64,
    requested_ftd: i32,
    requested_filler: i32,
    requested_cold: i32,
    requested_live: i32,
    fulfilled_ftd: i32,
    fulfilled_filler: i32,
    fulfilled_cold: i32,
    fulfilled_live: i32,
    status: String,
    priority: String,
    country_filter: Option<String>,
    gender_filter: Option<String>,
    excluded_clients: String,
    excluded_brokers: String,
    excluded_networks: String,
    notes: Option<String>,
    created_at: String,
    cancelled_at: Option<String>,
    cancellation_reason: Option<String>,
}

fn counts(ftd: i32, filler: i32, cold: i32, live: i32) -> Result<LeadCounts, PersistenceError> {
    Ok(LeadCounts::new(
        count_from_column(ftd)?,
        count_from_column(filler)?,
        count_from_column(cold)?,
        count_from_column(live)?,
    ))
}

fn order_from_row(row: OrderRow, lead_ids: Vec<i64>) -> Result<Order, PersistenceError> {
    let gender: Option<Gender> = row.gender_filter.as_deref().map(parse_label).transpose()?;
    let excluded_clients: Vec<String> = serde_json::from_str(&row.excluded_clients)?;
    let excluded_brokers: Vec<String> = serde_json::from_str(&row.excluded_brokers)?;
    let excluded_networks: Vec<String> = serde_json::from_str(&row.excluded_networks)?;

    let criteria: SelectionCriteria = SelectionCriteria::builder()
        .country(row.country_filter.as_deref())
        .gender(gender)
        .exclude_clients(excluded_clients)
        .exclude_brokers(excluded_brokers)
        .exclude_networks(excluded_networks)
        .build();

    let requests: LeadCounts = counts(
        row.requested_ftd,
        row.requested_filler,
        row.requested_cold,
        row.requested_live,
    )?;
    let fulfilled: LeadCounts = counts(
        row.fulfilled_ftd,
        row.fulfilled_filler,
        row.fulfilled_cold,
        row.fulfilled_live,
    )?;

    Ok(Order {
        order_id: row.order_id,
        requester_id: row.requester_id,
        requests,
        fulfilled,
        lead_ids,
        status: parse_label(&row.status)?,
        priority: parse_label(&row.priority)?,
        criteria,
        notes: row.notes,
        created_at: parse_timestamp(&row.created_at)?,
        cancelled_at: parse_optional_timestamp(row.cancelled_at.as_deref())?,
        cancellation_reason: row.cancellation_reason,
    })
}

/// Loads the claimed lead ids of several orders, each in claim order.
fn lead_ids_by_order(
    conn: &mut SqliteConnection,
    order_ids: &[i64],
) -> Result<BTreeMap<i64, Vec<i64>>, PersistenceError> {
    let rows: Vec<(i64, i64)> = order_leads::table
        .filter(order_leads::order_id.eq_any(order_ids))
        .order((order_leads::order_id.asc(), order_leads::position.asc()))
        .select((order_leads::order_id, order_leads::lead_id))
        .load(conn)?;

    let mut grouped: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for (order_id, lead_id) in rows {
        grouped.entry(order_id).or_default().push(lead_id);
    }
    Ok(grouped)
}

/// Loads an order with its claimed lead ids.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be reconstructed.
/// Returns `Ok(None)` if the order does not exist.
pub fn get_order(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<Option<Order>, PersistenceError> {
    let row: Option<OrderRow> = orders::table
        .filter(orders::order_id.eq(order_id))
        .select(OrderRow::as_select())
        .first(conn)
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };

    let lead_ids: Vec<i64> = lead_ids_by_order(conn, &[order_id])?
        .remove(&order_id)
        .unwrap_or_default();
    order_from_row(row, lead_ids).map(Some)
}

fn filtered_orders(
    filter: &OrderFilter,
) -> Result<orders::BoxedQuery<'_, Sqlite>, PersistenceError> {
    let mut query = orders::table.into_boxed::<Sqlite>();

    if let Some(status) = filter.status {
        query = query.filter(orders::status.eq(status.as_str()));
    }
    if let Some(priority) = filter.priority {
        query = query.filter(orders::priority.eq(priority.as_str()));
    }
    if let Some(from) = filter.created_from {
        query = query.filter(orders::created_at.ge(format_timestamp(from)?));
    }
    if let Some(to) = filter.created_to {
        query = query.filter(orders::created_at.le(format_timestamp(to)?));
    }
    if let Some(requester_id) = filter.requester_id {
        query = query.filter(orders::requester_id.eq(requester_id));
    }

    Ok(query)
}

/// Lists orders matching a filter, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_orders(
    conn: &mut SqliteConnection,
    filter: &OrderFilter,
    page: PageRequest,
) -> Result<Page<Order>, PersistenceError> {
    let total: i64 = filtered_orders(filter)?.count().get_result(conn)?;

    let rows: Vec<OrderRow> = filtered_orders(filter)?
        .select(OrderRow::as_select())
        .order(orders::order_id.desc())
        .offset(page.offset())
        .limit(page.limit())
        .load(conn)?;

    let order_ids: Vec<i64> = rows.iter().map(|row| row.order_id).collect();
    let mut lead_ids: BTreeMap<i64, Vec<i64>> = lead_ids_by_order(conn, &order_ids)?;

    let items: Vec<Order> = rows
        .into_iter()
        .map(|row| {
            let ids: Vec<i64> = lead_ids.remove(&row.order_id).unwrap_or_default();
            order_from_row(row, ids)
        })
        .collect::<Result<_, _>>()?;

    Ok(Page::new(items, count_to_u64(total)?, page))
}
