// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authorization policy.
//!
//! Every ownership or role decision in the system goes through the functions
//! in this module. Callers never branch on roles themselves.

use crate::error::DomainError;
use crate::types::UserRole;
use crate::user::Requester;

/// The outcome of an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The action may proceed.
    Allow,
    /// The action must be rejected.
    Deny,
}

impl Access {
    /// Converts the decision into a result, naming the attempted action on denial.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Forbidden` when the decision is `Deny`.
    pub const fn require(self, action: &'static str) -> Result<(), DomainError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny => Err(DomainError::Forbidden { action }),
        }
    }
}

/// Decides whether an actor may act on a resource owned by `owner_id`.
///
/// Admins may act on anything; everyone else only on what they own.
#[must_use]
pub const fn authorize_resource(actor_role: UserRole, actor_id: i64, owner_id: i64) -> Access {
    match actor_role {
        UserRole::Admin => Access::Allow,
        UserRole::AffiliateManager | UserRole::LeadManager | UserRole::Agent => {
            if actor_id == owner_id {
                Access::Allow
            } else {
                Access::Deny
            }
        }
    }
}

/// Decides whether a requester may act on a resource owned by `owner_id`.
#[must_use]
pub const fn authorize_owner(requester: &Requester, owner_id: i64) -> Access {
    authorize_resource(requester.role, requester.user_id, owner_id)
}

/// Decides whether a role may create orders.
#[must_use]
pub const fn authorize_create_order(role: UserRole) -> Access {
    match role {
        UserRole::Admin | UserRole::AffiliateManager => Access::Allow,
        UserRole::LeadManager | UserRole::Agent => Access::Deny,
    }
}

/// Decides whether a role may create, import and edit leads.
#[must_use]
pub const fn authorize_manage_leads(role: UserRole) -> Access {
    match role {
        UserRole::Admin | UserRole::LeadManager => Access::Allow,
        UserRole::AffiliateManager | UserRole::Agent => Access::Deny,
    }
}

/// Decides whether a role may delete leads.
#[must_use]
pub const fn authorize_delete_lead(role: UserRole) -> Access {
    match role {
        UserRole::Admin => Access::Allow,
        UserRole::AffiliateManager | UserRole::LeadManager | UserRole::Agent => Access::Deny,
    }
}

/// Decides whether a role may assign or unassign leads.
#[must_use]
pub const fn authorize_assign_leads(role: UserRole) -> Access {
    match role {
        UserRole::Admin | UserRole::LeadManager | UserRole::AffiliateManager => Access::Allow,
        UserRole::Agent => Access::Deny,
    }
}

/// Returns the ownership filter applied to bulk assignment operations.
///
/// Restricted roles only touch leads currently assigned to themselves.
/// `None` means no restriction.
#[must_use]
pub const fn assignment_owner_filter(requester: &Requester) -> Option<i64> {
    match requester.role {
        UserRole::AffiliateManager => Some(requester.user_id),
        UserRole::Admin | UserRole::LeadManager | UserRole::Agent => None,
    }
}

/// Decides whether a requester may read or work a lead held by `assigned_to`.
///
/// Admins and lead managers see every lead. Other roles only see leads
/// currently assigned to them.
#[must_use]
pub fn authorize_lead_access(requester: &Requester, assigned_to: Option<i64>) -> Access {
    match requester.role {
        UserRole::Admin | UserRole::LeadManager => Access::Allow,
        UserRole::AffiliateManager | UserRole::Agent => {
            if assigned_to == Some(requester.user_id) {
                Access::Allow
            } else {
                Access::Deny
            }
        }
    }
}

/// Decides whether a role sees every order or only its own.
#[must_use]
pub const fn sees_all_orders(role: UserRole) -> bool {
    matches!(role, UserRole::Admin)
}

/// Decides whether a role sees every lead or only those assigned to it.
#[must_use]
pub const fn sees_all_leads(role: UserRole) -> bool {
    matches!(role, UserRole::Admin | UserRole::LeadManager)
}

/// Decides whether a role may administer users.
#[must_use]
pub const fn authorize_manage_users(role: UserRole) -> Access {
    match role {
        UserRole::Admin => Access::Allow,
        UserRole::AffiliateManager | UserRole::LeadManager | UserRole::Agent => Access::Deny,
    }
}

/// Decides whether a role may read user listings and statistics.
#[must_use]
pub const fn authorize_view_reports(role: UserRole) -> Access {
    match role {
        UserRole::Admin | UserRole::AffiliateManager | UserRole::LeadManager => Access::Allow,
        UserRole::Agent => Access::Deny,
    }
}
