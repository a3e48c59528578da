// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::{BTreeMap, BTreeSet};

use leadflow_audit::{AuditEvent, Cause};
use leadflow_domain::{
    Assignment, Gender, Lead, LeadStatus, LeadType, NewOrder, Order, OrderStatus, OrderUpdate,
    SelectionCriteria, UserAccount, UserRole, UserStatus,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{CoreError, LeadStore, OrderRepository, Store, UserDirectory};

/// The order id a hijacked lead ends up attributed to.
pub const HIJACKING_ORDER_ID: i64 = 9999;

/// An in-memory store with a few knobs for provoking edge cases.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub leads: BTreeMap<i64, Lead>,
    pub orders: BTreeMap<i64, Order>,
    pub users: BTreeMap<i64, UserAccount>,
    pub audit_events: Vec<AuditEvent>,
    /// Number of `find_available` calls.
    pub queries: usize,
    /// Leads that another order grabs between selection and claim.
    pub hijacked: BTreeSet<i64>,
    /// Ignore the limit and type when answering `find_available`.
    pub over_return: bool,
    next_order_id: i64,
}

impl InMemoryStore {
    pub fn with_leads(leads: impl IntoIterator<Item = Lead>) -> Self {
        Self {
            leads: leads.into_iter().map(|lead| (lead.lead_id, lead)).collect(),
            ..Self::default()
        }
    }

    pub fn add_user(&mut self, user: UserAccount) {
        self.users.insert(user.user_id, user);
    }

    pub fn lead(&self, lead_id: i64) -> &Lead {
        &self.leads[&lead_id]
    }
}

impl Store for InMemoryStore {
    type Error = CoreError;
}

impl LeadStore for InMemoryStore {
    fn find_available(
        &mut self,
        lead_type: LeadType,
        limit: u32,
        criteria: &SelectionCriteria,
        exclusive: bool,
    ) -> Result<Vec<Lead>, CoreError> {
        self.queries += 1;
        if self.over_return {
            return Ok(self.leads.values().cloned().collect());
        }
        Ok(self
            .leads
            .values()
            .filter(|lead| lead.lead_type == lead_type)
            .filter(|lead| !exclusive || !lead.is_assigned())
            .filter(|lead| criteria.matches(lead))
            .take(usize::try_from(limit).unwrap())
            .cloned()
            .collect())
    }

    fn find_leads_by_ids(&mut self, lead_ids: &[i64]) -> Result<Vec<Lead>, CoreError> {
        Ok(lead_ids
            .iter()
            .filter_map(|lead_id| self.leads.get(lead_id).cloned())
            .collect())
    }

    fn claim_lead(
        &mut self,
        lead_id: i64,
        order_id: i64,
        agent_id: i64,
        assigned_at: OffsetDateTime,
        exclusive: bool,
    ) -> Result<bool, CoreError> {
        let hijacked: bool = self.hijacked.contains(&lead_id);
        let Some(lead) = self.leads.get_mut(&lead_id) else {
            return Ok(false);
        };
        if hijacked {
            lead.assignment = Some(Assignment::new(agent_id + 1, assigned_at));
            lead.order_id = Some(HIJACKING_ORDER_ID);
            return Ok(false);
        }
        if exclusive && lead.is_assigned() {
            return Ok(false);
        }
        lead.assignment = Some(Assignment::new(agent_id, assigned_at));
        lead.order_id = Some(order_id);
        Ok(true)
    }

    fn release_order_leads(
        &mut self,
        order_id: i64,
        lead_ids: &[i64],
    ) -> Result<usize, CoreError> {
        let mut released: usize = 0;
        for lead_id in lead_ids {
            let held = self
                .leads
                .get_mut(lead_id)
                .filter(|lead| lead.order_id == Some(order_id) && lead.is_assigned());
            if let Some(lead) = held {
                lead.assignment = None;
                released += 1;
            }
        }
        Ok(released)
    }

    fn assign_leads(
        &mut self,
        lead_ids: &[i64],
        agent_id: i64,
        assigned_at: OffsetDateTime,
        owner_filter: Option<i64>,
    ) -> Result<usize, CoreError> {
        let unique: BTreeSet<i64> = lead_ids.iter().copied().collect();
        let mut modified: usize = 0;
        for lead_id in unique {
            let target = self
                .leads
                .get_mut(&lead_id)
                .filter(|lead| owner_filter.is_none_or(|owner| lead.is_assigned_to(owner)));
            if let Some(lead) = target {
                lead.assignment = Some(Assignment::new(agent_id, assigned_at));
                modified += 1;
            }
        }
        Ok(modified)
    }

    fn unassign_leads(
        &mut self,
        lead_ids: &[i64],
        owner_filter: Option<i64>,
    ) -> Result<usize, CoreError> {
        let unique: BTreeSet<i64> = lead_ids.iter().copied().collect();
        let mut modified: usize = 0;
        for lead_id in unique {
            let target = self.leads.get_mut(&lead_id).filter(|lead| {
                lead.is_assigned() && owner_filter.is_none_or(|owner| lead.is_assigned_to(owner))
            });
            if let Some(lead) = target {
                lead.assignment = None;
                modified += 1;
            }
        }
        Ok(modified)
    }
}

impl OrderRepository for InMemoryStore {
    fn insert_order(&mut self, order: &NewOrder) -> Result<i64, CoreError> {
        self.next_order_id += 1;
        let order_id: i64 = self.next_order_id;
        self.orders
            .insert(order_id, order.clone().into_order(order_id));
        Ok(order_id)
    }

    fn get_order(&mut self, order_id: i64) -> Result<Option<Order>, CoreError> {
        Ok(self.orders.get(&order_id).cloned())
    }

    fn delete_order(&mut self, order_id: i64) -> Result<(), CoreError> {
        self.orders.remove(&order_id);
        Ok(())
    }

    fn mark_order_cancelled(
        &mut self,
        order_id: i64,
        cancelled_at: OffsetDateTime,
        reason: &str,
    ) -> Result<(), CoreError> {
        if let Some(order) = self.orders.get_mut(&order_id) {
            order.status = OrderStatus::Cancelled;
            order.cancelled_at = Some(cancelled_at);
            order.cancellation_reason = Some(reason.to_string());
        }
        Ok(())
    }

    fn update_order_metadata(
        &mut self,
        order_id: i64,
        update: &OrderUpdate,
    ) -> Result<(), CoreError> {
        if let Some(order) = self.orders.get_mut(&order_id) {
            if let Some(priority) = update.priority {
                order.priority = priority;
            }
            if let Some(notes) = &update.notes {
                order.notes = Some(notes.clone());
            }
        }
        Ok(())
    }

    fn record_audit_event(&mut self, event: &AuditEvent) -> Result<i64, CoreError> {
        self.audit_events.push(event.clone());
        Ok(i64::try_from(self.audit_events.len()).unwrap())
    }
}

impl UserDirectory for InMemoryStore {
    fn find_user(&mut self, user_id: i64) -> Result<Option<UserAccount>, CoreError> {
        Ok(self.users.get(&user_id).cloned())
    }
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("API request"))
}

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-02-01 09:30 UTC)
}

pub fn create_test_lead(lead_id: i64, lead_type: LeadType) -> Lead {
    Lead {
        lead_id,
        lead_type,
        first_name: String::from("Jane"),
        last_name: String::from("Doe"),
        email: format!("jane{lead_id}@example.com"),
        phone: None,
        country: String::from("Germany"),
        gender: Gender::Female,
        client: None,
        client_broker: None,
        client_network: None,
        document_status: None,
        status: LeadStatus::Active,
        source: None,
        assignment: None,
        order_id: None,
        comments: Vec::new(),
        created_at: datetime!(2026-01-15 10:00 UTC),
    }
}

/// Leads with ids `first..first + count`, all of one type.
pub fn create_test_leads(first: i64, count: i64, lead_type: LeadType) -> Vec<Lead> {
    (first..first + count)
        .map(|lead_id| create_test_lead(lead_id, lead_type))
        .collect()
}

pub fn create_test_user(user_id: i64, role: UserRole) -> UserAccount {
    UserAccount {
        user_id,
        login_name: format!("USER{user_id}"),
        display_name: format!("User {user_id}"),
        role,
        is_active: true,
        status: UserStatus::Approved,
    }
}
