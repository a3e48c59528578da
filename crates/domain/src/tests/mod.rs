// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]


use time::macros::datetime;

use crate::{Gender, Lead, LeadStatus, LeadType};

/// Builds an unassigned lead with the given type and id.
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
