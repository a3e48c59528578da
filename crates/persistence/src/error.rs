// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::Error as DieselError;
use leadflow::CoreError;
use leadflow_domain::DomainError;
use thiserror::Error;

/// Failures of the `SQLite` store.
///
/// Engine rule violations raised inside a store transaction are carried in
/// [`PersistenceError::Core`] so callers can still tell a rejected order from
/// a broken database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Database connection failed: {0}")]
    DatabaseConnectionFailed(String),
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    /// A stored row could not be turned back into a model value.
    #[error("Reconstruction error: {0}")]
    ReconstructionError(String),
    /// A JSON column (exclusion lists, audit snapshots) failed to encode or decode.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Initialization error: {0}")]
    InitializationError(String),
    #[error("Foreign key enforcement is not enabled")]
    ForeignKeyEnforcementNotEnabled,
    #[error("Login name already exists: {0}")]
    DuplicateLoginName(String),
    /// Holds the kind and id of the missing record, e.g. `"Order 4"`.
    #[error("Not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    /// bcrypt failed to hash or verify a password.
    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        if matches!(err, DieselError::NotFound) {
            Self::NotFound(String::from("Record"))
        } else {
            Self::DatabaseError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::Core(CoreError::DomainViolation(err))
    }
}
