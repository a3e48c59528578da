// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use leadflow_audit::Cause;
use leadflow_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    AuthenticatedActor, AuthenticationService, CreateUserRequest, ImportLeadsResponse, UserInfo,
    create_user, import_leads,
};

/// An in-memory store with one user per managing role.
pub struct Fixture {
    pub persistence: Persistence,
    pub admin: AuthenticatedActor,
    pub manager: AuthenticatedActor,
    pub lead_manager: AuthenticatedActor,
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub const fn test_now() -> OffsetDateTime {
    datetime!(2026-03-02 14:00 UTC)
}

pub fn user_request(login_name: &str, role: &str) -> CreateUserRequest {
    CreateUserRequest {
        login_name: login_name.to_string(),
        display_name: format!("{login_name} display"),
        password: String::from("leadflow-2026"),
        role: role.to_string(),
    }
}

pub fn setup() -> Fixture {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let admin: AuthenticatedActor = crate::bootstrap_admin(
        &mut persistence,
        "admin",
        "leadflow-2026",
        test_now(),
    )
    .unwrap()
    .map(|user| AuthenticationService::authenticate(&mut persistence, user.user_id).unwrap())
    .unwrap();

    let manager: AuthenticatedActor =
        add_user(&mut persistence, &admin, "manager", "affiliate_manager");
    let lead_manager: AuthenticatedActor =
        add_user(&mut persistence, &admin, "leads", "lead_manager");

    Fixture {
        persistence,
        admin,
        manager,
        lead_manager,
    }
}

pub fn add_user(
    persistence: &mut Persistence,
    admin: &AuthenticatedActor,
    login_name: &str,
    role: &str,
) -> AuthenticatedActor {
    let user: UserInfo =
        create_user(persistence, &user_request(login_name, role), admin, test_now()).unwrap();
    AuthenticationService::authenticate(persistence, user.user_id).unwrap()
}

/// Imports `count` leads of one type through the CSV path.
pub fn import_leads_of_type(
    fixture: &mut Fixture,
    lead_type: &str,
    count: usize,
    client: &str,
) -> Vec<i64> {
    let mut csv: String = String::from("lead_type,first_name,last_name,email,country,client\n");
    for i in 0..count {
        csv.push_str(&format!(
            "{lead_type},First{i},Last{i},{lead_type}{i}.{client}@example.com,Germany,{client}\n"
        ));
    }
    let response: ImportLeadsResponse = import_leads(
        &mut fixture.persistence,
        &csv,
        &fixture.lead_manager,
        test_now(),
    )
    .unwrap();
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    response.lead_ids
}
