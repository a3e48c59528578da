// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup.
//!
//! Every connection gets the same PRAGMAs: a busy timeout so concurrent
//! writers queue instead of failing, and foreign key enforcement. File
//! databases additionally switch to WAL so readers never block the writer.

use diesel::dsl::sql;
use diesel::QueryableByName;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Embedded schema migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits for another writer before giving up.
pub const BUSY_TIMEOUT_MS: u32 = 5000;

/// Where a connection points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseTarget<'a> {
    /// A named shared-cache in-memory database, unique per id.
    Memory(u64),
    /// A database file on disk.
    File(&'a str),
}

impl DatabaseTarget<'_> {
    fn url(self) -> String {
        match self {
            Self::Memory(id) => format!("file:leadflow_mem_{id}?mode=memory&cache=shared"),
            Self::File(path) => path.to_string(),
        }
    }
}

#[derive(QueryableByName)]
struct PragmaValue {
    #[diesel(sql_type = Integer)]
    value: i32,
}

/// Returns the id of the row inserted last on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Reads one integer column of a PRAGMA through its table-valued form.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn read_pragma(
    conn: &mut SqliteConnection,
    name: &str,
    column: &str,
) -> Result<i32, PersistenceError> {
    let row: PragmaValue =
        diesel::sql_query(format!("SELECT {column} AS value FROM pragma_{name}()"))
            .get_result(conn)?;
    Ok(row.value)
}

/// Fails unless foreign key enforcement is on for this connection.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyEnforcementNotEnabled` when it is
/// off, or a query error.
pub fn verify_foreign_key_enforcement(
    conn: &mut SqliteConnection,
) -> Result<(), PersistenceError> {
    if read_pragma(conn, "foreign_keys", "foreign_keys")? == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    Ok(())
}

fn execute_pragma(conn: &mut SqliteConnection, pragma: &str) -> Result<(), PersistenceError> {
    diesel::sql_query(format!("PRAGMA {pragma}"))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("PRAGMA {pragma}: {e}")))?;
    Ok(())
}

/// Opens a connection, applies the PRAGMAs and runs pending migrations.
///
/// # Errors
///
/// Returns an error if the connection cannot be opened, configured or
/// migrated, or if foreign keys are still off afterwards.
pub fn open(target: DatabaseTarget<'_>) -> Result<SqliteConnection, PersistenceError> {
    let url: String = target.url();
    info!(url = %url, "Opening SQLite database");

    let mut conn: SqliteConnection = SqliteConnection::establish(&url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    execute_pragma(&mut conn, &format!("busy_timeout = {BUSY_TIMEOUT_MS}"))?;
    execute_pragma(&mut conn, "foreign_keys = ON")?;
    if matches!(target, DatabaseTarget::File(_)) {
        execute_pragma(&mut conn, "journal_mode = WAL")?;
    }

    let applied: usize = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?
        .len();
    debug!(applied, "Migrations applied");

    verify_foreign_key_enforcement(&mut conn)?;
    Ok(conn)
}
