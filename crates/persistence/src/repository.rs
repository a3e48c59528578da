// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engine store interfaces backed by a Diesel `SQLite` connection.
//!
//! A `DieselRepository` borrows a connection that is normally already inside
//! a transaction, so everything the engine does through it commits or rolls
//! back together.

use diesel::SqliteConnection;
use leadflow::{LeadStore, OrderRepository, Store, UserDirectory};
use leadflow_audit::AuditEvent;
use leadflow_domain::{
    Lead, LeadType, NewOrder, Order, OrderUpdate, SelectionCriteria, UserAccount,
};
use time::OffsetDateTime;

use crate::error::PersistenceError;
use crate::{mutations, queries};

/// Store adapter over one borrowed connection.
pub struct DieselRepository<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> DieselRepository<'a> {
    /// Wraps a connection.
    pub const fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }
}

impl Store for DieselRepository<'_> {
    type Error = PersistenceError;
}

impl LeadStore for DieselRepository<'_> {
    fn find_available(
        &mut self,
        lead_type: LeadType,
        limit: u32,
        criteria: &SelectionCriteria,
        exclusive: bool,
    ) -> Result<Vec<Lead>, Self::Error> {
        queries::leads::find_available(self.conn, lead_type, limit, criteria, exclusive)
    }

    fn find_leads_by_ids(&mut self, lead_ids: &[i64]) -> Result<Vec<Lead>, Self::Error> {
        queries::leads::find_leads_by_ids(self.conn, lead_ids)
    }

    fn claim_lead(
        &mut self,
        lead_id: i64,
        order_id: i64,
        agent_id: i64,
        assigned_at: OffsetDateTime,
        exclusive: bool,
    ) -> Result<bool, Self::Error> {
        mutations::leads::claim_lead(self.conn, lead_id, order_id, agent_id, assigned_at, exclusive)
    }

    fn release_order_leads(
        &mut self,
        order_id: i64,
        lead_ids: &[i64],
    ) -> Result<usize, Self::Error> {
        mutations::leads::release_order_leads(self.conn, order_id, lead_ids)
    }

    fn assign_leads(
        &mut self,
        lead_ids: &[i64],
        agent_id: i64,
        assigned_at: OffsetDateTime,
        owner_filter: Option<i64>,
    ) -> Result<usize, Self::Error> {
        mutations::leads::assign_leads(self.conn, lead_ids, agent_id, assigned_at, owner_filter)
    }

    fn unassign_leads(
        &mut self,
        lead_ids: &[i64],
        owner_filter: Option<i64>,
    ) -> Result<usize, Self::Error> {
        mutations::leads::unassign_leads(self.conn, lead_ids, owner_filter)
    }
}

impl OrderRepository for DieselRepository<'_> {
    fn insert_order(&mut self, order: &NewOrder) -> Result<i64, Self::Error> {
        mutations::orders::insert_order(self.conn, order)
    }

    fn get_order(&mut self, order_id: i64) -> Result<Option<Order>, Self::Error> {
        queries::orders::get_order(self.conn, order_id)
    }

    fn delete_order(&mut self, order_id: i64) -> Result<(), Self::Error> {
        mutations::orders::delete_order(self.conn, order_id)
    }

    fn mark_order_cancelled(
        &mut self,
        order_id: i64,
        cancelled_at: OffsetDateTime,
        reason: &str,
    ) -> Result<(), Self::Error> {
        mutations::orders::mark_order_cancelled(self.conn, order_id, cancelled_at, reason)
    }

    fn update_order_metadata(
        &mut self,
        order_id: i64,
        update: &OrderUpdate,
    ) -> Result<(), Self::Error> {
        mutations::orders::update_order_metadata(self.conn, order_id, update)
    }

    fn record_audit_event(&mut self, event: &AuditEvent) -> Result<i64, Self::Error> {
        mutations::audit::persist_audit_event(self.conn, event)
    }
}

impl UserDirectory for DieselRepository<'_> {
    fn find_user(&mut self, user_id: i64) -> Result<Option<UserAccount>, Self::Error> {
        Ok(queries::users::get_user_by_id(self.conn, user_id)?.map(|user| user.to_account()))
    }
}
