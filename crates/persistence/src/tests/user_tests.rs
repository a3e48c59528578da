// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leadflow_domain::{UserRole, UserStatus};

use super::{seed_user, test_now};
use crate::{NewUser, Persistence, PersistenceError};

fn new_user<'a>(login_name: &'a str, role: UserRole, status: UserStatus) -> NewUser<'a> {
    NewUser {
        login_name,
        display_name: "Test User",
        password: "correct horse",
        role,
        status,
    }
}

#[test]
fn test_create_user_normalizes_login_and_hashes_password() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let user = persistence
        .create_user(
            &new_user("  jdoe ", UserRole::LeadManager, UserStatus::Approved),
            test_now(),
        )
        .unwrap();

    assert_eq!(user.login_name, "JDOE");
    assert_eq!(user.role, UserRole::LeadManager);
    assert!(user.is_active);
    assert_ne!(user.password_hash, "correct horse");
    assert_eq!(user.created_at, test_now());
}

#[test]
fn test_duplicate_login_is_rejected_case_insensitively() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence
        .create_user(&new_user("jdoe", UserRole::Agent, UserStatus::Pending), test_now())
        .unwrap();

    let result = persistence.create_user(
        &new_user("JDoe", UserRole::Agent, UserStatus::Pending),
        test_now(),
    );

    assert_eq!(
        result,
        Err(PersistenceError::DuplicateLoginName(String::from("JDOE")))
    );
}

#[test]
fn test_verify_credentials() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let user = persistence
        .create_user(&new_user("jdoe", UserRole::Admin, UserStatus::Approved), test_now())
        .unwrap();

    let found = persistence
        .verify_credentials("jdoe", "correct horse")
        .unwrap();
    assert_eq!(found.map(|u| u.user_id), Some(user.user_id));
    assert_eq!(persistence.verify_credentials("jdoe", "wrong").unwrap(), None);
    assert_eq!(
        persistence
            .verify_credentials("nobody", "correct horse")
            .unwrap(),
        None
    );

    persistence.set_user_active(user.user_id, false).unwrap();
    assert_eq!(
        persistence
            .verify_credentials("jdoe", "correct horse")
            .unwrap(),
        None,
        "inactive users cannot log in"
    );
}

#[test]
fn test_status_changes_and_role_listing() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let agent = seed_user(&mut persistence, "agent", UserRole::Agent, UserStatus::Pending);
    seed_user(&mut persistence, "lm", UserRole::LeadManager, UserStatus::Approved);

    persistence
        .set_user_status(agent, UserStatus::Approved)
        .unwrap();

    let agents = persistence.list_users(Some(UserRole::Agent)).unwrap();
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].status, UserStatus::Approved);
    assert_eq!(persistence.list_users(None).unwrap().len(), 2);

    assert!(matches!(
        persistence.set_user_status(999, UserStatus::Rejected),
        Err(PersistenceError::NotFound(_))
    ));
}
