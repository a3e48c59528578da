// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit records for Leadflow: who changed what, why, and the state on
//! either side of the change.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use leadflow_domain::Requester;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[cfg(test)]
mod tests;

/// Actor type (and id) of work the server does on its own behalf.
pub const SYSTEM_ACTOR_TYPE: &str = "system";

/// Who made a change: a user, recorded under their role, or the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User id as text, or `"system"`.
    pub id: String,
    /// Role name, or `"system"`.
    pub actor_type: String,
}

impl Actor {
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// The actor for an authenticated caller.
    #[must_use]
    pub fn from_requester(requester: &Requester) -> Self {
        Self {
            id: requester.user_id.to_string(),
            actor_type: requester.role.as_str().to_string(),
        }
    }

    #[must_use]
    pub fn system() -> Self {
        Self {
            id: String::from(SYSTEM_ACTOR_TYPE),
            actor_type: String::from(SYSTEM_ACTOR_TYPE),
        }
    }

    /// `None` for the system actor.
    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        self.id.parse().ok()
    }
}

/// What triggered a change, usually the HTTP request that carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    /// Request id supplied by the caller, or the description when absent.
    pub id: String,
    /// For example `"POST /orders"`.
    pub description: String,
}

impl Cause {
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// The operation that produced an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// `CreateOrder`, `CancelOrder`, `AssignLeads` and so on.
    pub name: String,
    /// Free-form summary such as lead counts.
    pub details: Option<String>,
}

impl Action {
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// Serialized state of the records an action touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// Before-state of a record that is being created.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            data: String::new(),
        }
    }
}

/// One recorded change to orders or lead ownership.
///
/// Written in the same transaction as the change it describes and never
/// updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// `None` until persisted.
    pub event_id: Option<i64>,
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    pub before: StateSnapshot,
    pub after: StateSnapshot,
    /// Set for order lifecycle events so the order timeline can find them.
    pub order_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl AuditEvent {
    /// An event that has not been stored yet.
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        order_id: Option<i64>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            before,
            after,
            order_id,
            created_at,
        }
    }

    /// Used by the store when reading events back.
    #[must_use]
    pub const fn with_event_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }
}
