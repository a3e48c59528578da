// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User queries.

use diesel::SqliteConnection;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use leadflow_domain::UserRole;
use tracing::debug;

use crate::convert::{flag, parse_label, parse_timestamp};
use crate::data_models::UserData;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(Sqlite))]
struct UserRow {
    user_id: i64,
    login_name: String,
    display_name: String,
    password_hash: String,
    role: String,
    is_active: i32,
    status: String,
    created_at: String,
}

impl TryFrom<UserRow> for UserData {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.user_id,
            login_name: row.login_name,
            display_name: row.display_name,
            password_hash: row.password_hash,
            role: parse_label(&row.role)?,
            is_active: flag(row.is_active),
            status: parse_label(&row.status)?,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

fn first_user(
    conn: &mut SqliteConnection,
    query: users::BoxedQuery<'_, Sqlite>,
) -> Result<Option<UserData>, PersistenceError> {
    query
        .select(UserRow::as_select())
        .first(conn)
        .optional()?
        .map(UserData::try_from)
        .transpose()
}

/// Looks a user up by id.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserData>, PersistenceError> {
    debug!(user_id, "Loading user");
    first_user(conn, users::table.filter(users::user_id.eq(user_id)).into_boxed())
}

/// Looks a user up by login name. Logins are stored upper-cased, so the
/// match ignores case and surrounding whitespace.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
pub fn get_user_by_login(
    conn: &mut SqliteConnection,
    login_name: &str,
) -> Result<Option<UserData>, PersistenceError> {
    let login: String = login_name.trim().to_uppercase();
    debug!(login_name = %login, "Loading user");
    first_user(conn, users::table.filter(users::login_name.eq(login)).into_boxed())
}

/// Lists users, optionally restricted to one role, ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(
    conn: &mut SqliteConnection,
    role: Option<UserRole>,
) -> Result<Vec<UserData>, PersistenceError> {
    let mut query = users::table.into_boxed::<Sqlite>();
    if let Some(role) = role {
        query = query.filter(users::role.eq(role.as_str()));
    }

    query
        .select(UserRow::as_select())
        .order(users::user_id.asc())
        .load(conn)?
        .into_iter()
        .map(UserData::try_from)
        .collect()
}

/// # Errors
///
/// Returns an error if the query fails.
pub fn count_users(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(users::table.select(count_star()).first(conn)?)
}

/// Checks `password` against a bcrypt hash.
///
/// # Errors
///
/// Returns an error if the hash cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::PasswordHashing(e.to_string()))
}
