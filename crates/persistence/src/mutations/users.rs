// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use leadflow_domain::{UserRole, UserStatus};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::convert::{flag_value, format_timestamp};
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// A user to be created.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub login_name: &'a str,
    pub display_name: &'a str,
    pub password: &'a str,
    pub role: UserRole,
    pub status: UserStatus,
}

/// Creates a user and returns the new id.
///
/// The login name is normalized to uppercase and the password is stored as
/// a bcrypt hash.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateLoginName` if the login is taken,
/// or another error if hashing or the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    user: &NewUser<'_>,
    created_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let normalized_login: String = user.login_name.trim().to_uppercase();

    let password_hash: String = bcrypt::hash(user.password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::PasswordHashing(e.to_string()))?;

    debug!(login_name = %normalized_login, role = %user.role, "Creating user");

    diesel::insert_into(users::table)
        .values((
            users::login_name.eq(&normalized_login),
            users::display_name.eq(user.display_name.trim()),
            users::password_hash.eq(&password_hash),
            users::role.eq(user.role.as_str()),
            users::is_active.eq(1),
            users::status.eq(user.status.as_str()),
            users::created_at.eq(format_timestamp(created_at)?),
        ))
        .execute(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                PersistenceError::DuplicateLoginName(normalized_login.clone())
            }
            other => PersistenceError::from(other),
        })?;

    let user_id: i64 = get_last_insert_rowid(conn)?;
    info!(user_id, login_name = %normalized_login, "Created user");
    Ok(user_id)
}

/// Changes a user's approval status.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the user does not exist.
pub fn set_user_status(
    conn: &mut SqliteConnection,
    user_id: i64,
    status: UserStatus,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set(users::status.eq(status.as_str()))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("User {user_id}")));
    }
    info!(user_id, %status, "Updated user status");
    Ok(())
}

/// Activates or deactivates a user.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the user does not exist.
pub fn set_user_active(
    conn: &mut SqliteConnection,
    user_id: i64,
    is_active: bool,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set(users::is_active.eq(flag_value(is_active)))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("User {user_id}")));
    }
    info!(user_id, is_active, "Updated user activity");
    Ok(())
}
