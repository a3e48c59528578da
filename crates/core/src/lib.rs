// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The Leadflow engine: lead allocation, the order lifecycle and manual
//! assignment.
//!
//! Every operation runs against a [`Store`], so the same rules hold in the
//! `SQLite` transaction used by the server and in the in-memory stores the
//! tests use. No function here touches a clock; callers pass `now`.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod allocator;
mod assignment;
mod error;
mod lifecycle;
mod store;
mod transition;

#[cfg(test)]
mod tests;

pub use allocator::{AllocationResult, allocate};
pub use assignment::{assign_leads, unassign_leads};
pub use error::CoreError;
pub use lifecycle::{cancel_order, create_order, get_order, update_order};
pub use store::{LeadStore, OrderRepository, Store, UserDirectory};
pub use transition::{AssignmentOutcome, OrderDetails, OrderTransition};
