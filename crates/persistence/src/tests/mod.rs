// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod user_tests;

use diesel::prelude::*;
use leadflow_audit::Cause;
use leadflow_domain::{
    Lead, LeadCounts, LeadType, NormalizedLeadRecord, OrderRequest, Requester, SelectionCriteria,
    UserRole, UserStatus,
};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::Persistence;
use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::users;

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub const fn test_now() -> OffsetDateTime {
    datetime!(2026-02-01 09:30 UTC)
}

/// Inserts a user row directly, skipping password hashing.
pub fn seed_user(
    persistence: &mut Persistence,
    login_name: &str,
    role: UserRole,
    status: UserStatus,
) -> i64 {
    diesel::insert_into(users::table)
        .values((
            users::login_name.eq(login_name.to_uppercase()),
            users::display_name.eq(login_name),
            users::password_hash.eq("unused"),
            users::role.eq(role.as_str()),
            users::is_active.eq(1),
            users::status.eq(status.as_str()),
            users::created_at.eq("2026-01-01T00:00:00Z"),
        ))
        .execute(&mut persistence.conn)
        .expect("Failed to seed user");
    get_last_insert_rowid(&mut persistence.conn).expect("Failed to read user id")
}

/// Seeds an affiliate manager and returns it as a requester.
pub fn seed_manager(persistence: &mut Persistence, login_name: &str) -> Requester {
    let user_id: i64 = seed_user(
        persistence,
        login_name,
        UserRole::AffiliateManager,
        UserStatus::Approved,
    );
    Requester::new(user_id, UserRole::AffiliateManager)
}

/// Seeds an admin and returns it as a requester.
pub fn seed_admin(persistence: &mut Persistence) -> Requester {
    let user_id: i64 = seed_user(persistence, "admin", UserRole::Admin, UserStatus::Approved);
    Requester::new(user_id, UserRole::Admin)
}

pub fn lead_record(lead_type: LeadType, email: &str) -> NormalizedLeadRecord {
    NormalizedLeadRecord::new(
        lead_type,
        String::from("Test"),
        String::from("Lead"),
        String::from(email),
        String::from("Germany"),
    )
}

/// Inserts `count` leads of one type with generated emails and returns their ids.
pub fn seed_leads(
    persistence: &mut Persistence,
    lead_type: LeadType,
    count: usize,
    email_prefix: &str,
) -> Vec<i64> {
    (0..count)
        .map(|n| {
            let record: NormalizedLeadRecord =
                lead_record(lead_type, &format!("{email_prefix}{n}@example.com"));
            persistence
                .create_lead(&record, test_now())
                .expect("Failed to seed lead")
                .lead_id
        })
        .collect()
}

/// Loads leads straight from the store, in ascending id order.
pub fn load_leads(persistence: &mut Persistence, lead_ids: &[i64]) -> Vec<Lead> {
    crate::queries::leads::find_leads_by_ids(&mut persistence.conn, lead_ids)
        .expect("Failed to load leads")
}

pub fn ftd_request(count: u32) -> OrderRequest {
    OrderRequest::new(
        LeadCounts::new(count, 0, 0, 0),
        SelectionCriteria::default(),
    )
}
