// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::types::{UserRole, UserStatus};

/// A system user as seen by the core.
///
/// Credentials are not part of this type; they stay in the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Canonical identifier.
    pub user_id: i64,
    /// Login name, normalized to uppercase.
    pub login_name: String,
    /// Display name.
    pub display_name: String,
    /// Role.
    pub role: UserRole,
    /// Whether the account may act or receive leads.
    pub is_active: bool,
    /// Approval state.
    pub status: UserStatus,
}

/// The identity and role of whoever is invoking an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requester {
    /// The acting user.
    pub user_id: i64,
    /// The acting user's role.
    pub role: UserRole,
}

impl Requester {
    /// Creates a new requester.
    #[must_use]
    pub const fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }
}
