// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leadflow_audit::{AuditEvent, StateSnapshot};
use leadflow_domain::{Lead, Order};

/// The result of a successful order transition.
///
/// Contains the order as it is after the transition and the audit event that
/// was recorded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTransition {
    /// The order after the transition.
    pub order: Order,
    /// The recorded audit event.
    pub audit_event: AuditEvent,
}

/// The result of a bulk assign or unassign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentOutcome {
    /// Number of leads actually modified.
    pub modified: usize,
    /// The recorded audit event. `None` when nothing was modified.
    pub audit_event: Option<AuditEvent>,
}

/// An order together with its claimed leads, in claim order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    /// The order.
    pub order: Order,
    /// The claimed leads that still exist.
    pub leads: Vec<Lead>,
}

pub(crate) fn order_snapshot(order: &Order) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={},priority={},requests=[{}],fulfilled=[{}],leads={}",
        order.status,
        order.priority,
        order.requests,
        order.fulfilled,
        order.lead_ids.len()
    ))
}
