// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{DocumentStatus, Gender, LeadStatus, LeadType};

/// The assignment of a lead to a user.
///
/// A lead is assigned exactly when it carries an `Assignment`; the agent and
/// the timestamp are always set together and cleared together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// The user currently holding the lead.
    pub agent_id: i64,
    /// When the lead was assigned to that user.
    #[serde(with = "time::serde::rfc3339")]
    pub assigned_at: OffsetDateTime,
}

impl Assignment {
    /// Creates a new assignment.
    #[must_use]
    pub const fn new(agent_id: i64, assigned_at: OffsetDateTime) -> Self {
        Self {
            agent_id,
            assigned_at,
        }
    }
}

/// A comment attached to a lead. Comments are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// The comment text.
    pub text: String,
    /// The user who wrote it.
    pub author_id: i64,
    /// When it was written.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A lead record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    /// Canonical identifier assigned by the store.
    pub lead_id: i64,
    /// The allocation bucket of this lead.
    pub lead_type: LeadType,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Country of residence.
    pub country: String,
    /// Gender.
    pub gender: Gender,
    /// Client label, used for exclusion filtering.
    pub client: Option<String>,
    /// Client broker label, used for exclusion filtering.
    pub client_broker: Option<String>,
    /// Client network label, used for exclusion filtering.
    pub client_network: Option<String>,
    /// FTD document verification state.
    pub document_status: Option<DocumentStatus>,
    /// Engagement status.
    pub status: LeadStatus,
    /// Where the lead came from.
    pub source: Option<String>,
    /// Current holder of the lead, if any.
    pub assignment: Option<Assignment>,
    /// The order that last claimed this lead.
    ///
    /// Retained after the order is cancelled as a historical reference.
    pub order_id: Option<i64>,
    /// Comments in the order they were written.
    pub comments: Vec<Comment>,
    /// When the lead was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Lead {
    /// Returns whether the lead is currently assigned.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }

    /// Returns the user currently holding the lead.
    #[must_use]
    pub fn assigned_to(&self) -> Option<i64> {
        self.assignment.map(|a| a.agent_id)
    }

    /// Returns whether the lead is held by the given user.
    #[must_use]
    pub fn is_assigned_to(&self, user_id: i64) -> bool {
        self.assigned_to() == Some(user_id)
    }
}

/// A lead record as it arrives from creation or bulk import,
/// before the store has assigned it an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedLeadRecord {
    /// Lead type.
    pub lead_type: LeadType,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Country of residence.
    pub country: String,
    /// Gender.
    #[serde(default)]
    pub gender: Gender,
    /// Client label.
    #[serde(default)]
    pub client: Option<String>,
    /// Client broker label.
    #[serde(default)]
    pub client_broker: Option<String>,
    /// Client network label.
    #[serde(default)]
    pub client_network: Option<String>,
    /// FTD document verification state.
    #[serde(default)]
    pub document_status: Option<DocumentStatus>,
    /// Engagement status.
    #[serde(default)]
    pub status: LeadStatus,
    /// Where the lead came from.
    #[serde(default)]
    pub source: Option<String>,
}

impl NormalizedLeadRecord {
    /// Creates a minimal record with the required fields.
    ///
    /// Optional labels start empty and may be set directly on the returned value.
    #[must_use]
    pub const fn new(
        lead_type: LeadType,
        first_name: String,
        last_name: String,
        email: String,
        country: String,
    ) -> Self {
        Self {
            lead_type,
            first_name,
            last_name,
            email,
            phone: None,
            country,
            gender: Gender::NotDefined,
            client: None,
            client_broker: None,
            client_network: None,
            document_status: None,
            status: LeadStatus::Active,
            source: None,
        }
    }
}
