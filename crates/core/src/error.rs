// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leadflow_domain::DomainError;
use thiserror::Error;

/// Errors that can occur during order and assignment transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A domain rule was violated.
    #[error("Domain violation: {0}")]
    DomainViolation(#[from] DomainError),
    /// Claimed leads were not attributed to the new order after claiming.
    ///
    /// The order has been removed; the listed leads are the ones that failed
    /// verification.
    #[error("Order {order_id} failed verification: leads {lead_ids:?} are not attributed to it")]
    AllocationInconsistency {
        /// The order that was removed.
        order_id: i64,
        /// The leads that failed verification.
        lead_ids: Vec<i64>,
    },
}
