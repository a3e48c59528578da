// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborator interfaces consumed by the engine.
//!
//! The engine never talks to a database directly. Implementations decide
//! how (and inside which transaction) these calls reach storage.

use leadflow_audit::AuditEvent;
use leadflow_domain::{
    Lead, LeadType, NewOrder, Order, OrderUpdate, SelectionCriteria, UserAccount,
};
use time::OffsetDateTime;

use crate::error::CoreError;

/// Shared error plumbing for every store interface.
pub trait Store {
    /// The store's error type. Engine failures are lifted into it.
    type Error: From<CoreError>;
}

/// Read and write access to leads.
pub trait LeadStore: Store {
    /// Returns up to `limit` leads of `lead_type` matching `criteria`, in
    /// ascending lead id order.
    ///
    /// With `exclusive` set, only unassigned leads are returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn find_available(
        &mut self,
        lead_type: LeadType,
        limit: u32,
        criteria: &SelectionCriteria,
        exclusive: bool,
    ) -> Result<Vec<Lead>, Self::Error>;

    /// Loads the given leads. Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn find_leads_by_ids(&mut self, lead_ids: &[i64]) -> Result<Vec<Lead>, Self::Error>;

    /// Claims one lead for an order, setting the whole assignment and the
    /// order reference.
    ///
    /// With `exclusive` set, the write only applies if the lead is still
    /// unassigned. Returns whether the lead was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn claim_lead(
        &mut self,
        lead_id: i64,
        order_id: i64,
        agent_id: i64,
        assigned_at: OffsetDateTime,
        exclusive: bool,
    ) -> Result<bool, Self::Error>;

    /// Clears the assignment of every listed lead whose order reference is
    /// still `order_id`. The order reference itself is kept.
    ///
    /// Returns the number of leads released.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn release_order_leads(&mut self, order_id: i64, lead_ids: &[i64])
    -> Result<usize, Self::Error>;

    /// Assigns the listed leads to an agent.
    ///
    /// With an `owner_filter`, only leads currently assigned to that user are
    /// touched. Returns the number of leads modified.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn assign_leads(
        &mut self,
        lead_ids: &[i64],
        agent_id: i64,
        assigned_at: OffsetDateTime,
        owner_filter: Option<i64>,
    ) -> Result<usize, Self::Error>;

    /// Clears the assignment of the listed leads that are currently assigned.
    ///
    /// With an `owner_filter`, only leads currently assigned to that user are
    /// touched. Returns the number of leads modified.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn unassign_leads(
        &mut self,
        lead_ids: &[i64],
        owner_filter: Option<i64>,
    ) -> Result<usize, Self::Error>;
}

/// Order storage. Every order repository is also a lead store so a single
/// transaction can cover both.
pub trait OrderRepository: LeadStore {
    /// Inserts an order with its lead list and returns the new id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_order(&mut self, order: &NewOrder) -> Result<i64, Self::Error>;

    /// Loads an order with its lead list.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn get_order(&mut self, order_id: i64) -> Result<Option<Order>, Self::Error>;

    /// Removes an order and its lead list.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn delete_order(&mut self, order_id: i64) -> Result<(), Self::Error>;

    /// Marks an order cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn mark_order_cancelled(
        &mut self,
        order_id: i64,
        cancelled_at: OffsetDateTime,
        reason: &str,
    ) -> Result<(), Self::Error>;

    /// Applies a metadata update to an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn update_order_metadata(
        &mut self,
        order_id: i64,
        update: &OrderUpdate,
    ) -> Result<(), Self::Error>;

    /// Persists an audit event and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn record_audit_event(&mut self, event: &AuditEvent) -> Result<i64, Self::Error>;
}

/// Lookup of users and roles.
pub trait UserDirectory: Store {
    /// Loads a user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn find_user(&mut self, user_id: i64) -> Result<Option<UserAccount>, Self::Error>;
}
