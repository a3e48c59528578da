// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Leadflow order fulfillment engine.
//!
//! This crate stores leads, orders, users and audit events in `SQLite`
//! through Diesel, and adapts a connection to the store interfaces the
//! `leadflow` engine consumes.
//!
//! ## Transactions
//!
//! Order creation, cancellation and lead (un)assignment run inside an
//! IMMEDIATE transaction. `SQLite` takes the write lock before the first
//! read, so two connections racing for the same leads are serialized and
//! the exclusive claim write can never be lost silently.
//!
//! ## Storage conventions
//!
//! - Timestamps are RFC 3339 text in UTC
//! - Booleans are INTEGER 0/1
//! - Exclusion lists are JSON arrays
//!
//! ## Testing Philosophy
//!
//! - Standard tests (`cargo test`) run against in-memory `SQLite`
//! - Each in-memory database is unique, so tests never share state
//! - Concurrency tests use a temporary database file and two connections

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
#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel::SqliteConnection;
use leadflow::{AssignmentOutcome, OrderDetails, OrderTransition};
use leadflow_audit::{AuditEvent, Cause};
use leadflow_domain::{
    AllocationPolicy, DomainError, Lead, LeadStatus, NormalizedLeadRecord, Order, OrderRequest,
    OrderUpdate, Requester, UserRole, UserStatus, validate_comment, validate_lead_record,
};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::backend::sqlite::DatabaseTarget;

mod backend;
mod convert;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod repository;

#[cfg(test)]
mod tests;

pub use data_models::{
    AgentPerformance, IngestReport, LeadFilter, LeadStats, LeadTypeStats, OrderFilter, Page,
    PageRequest, UserData,
};
pub use error::PersistenceError;
pub use mutations::users::NewUser;
pub use repository::DieselRepository;

/// Source of ids for in-memory databases; each one gets a fresh name.
static MEMORY_DB_IDS: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter owning one `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Opens a private in-memory database with the schema applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let id: u64 = MEMORY_DB_IDS.fetch_add(1, Ordering::Relaxed);
        let conn: SqliteConnection = backend::sqlite::open(DatabaseTarget::Memory(id))?;
        Ok(Self { conn })
    }

    /// Opens (or creates) a database file and migrates it.
    ///
    /// Several adapters may open the same file; writes are serialized by
    /// `SQLite` and wait up to the busy timeout for each other.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not UTF-8 or the database cannot be
    /// opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("database path is not valid UTF-8".to_string())
        })?;
        let conn: SqliteConnection = backend::sqlite::open(DatabaseTarget::File(path))?;
        Ok(Self { conn })
    }

    /// Reads the connection's busy timeout in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the PRAGMA cannot be read.
    pub fn busy_timeout_ms(&mut self) -> Result<i32, PersistenceError> {
        backend::sqlite::read_pragma(&mut self.conn, "busy_timeout", "timeout")
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Creates an order and claims its leads in one IMMEDIATE transaction.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Core` for validation, authorization and
    /// allocation failures, or a database error. Nothing is written on error.
    pub fn create_order(
        &mut self,
        request: OrderRequest,
        requester: &Requester,
        policy: &AllocationPolicy,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<OrderTransition, PersistenceError> {
        let transition: OrderTransition = self.conn.immediate_transaction(|conn| {
            let mut repository: DieselRepository<'_> = DieselRepository::new(conn);
            leadflow::create_order(&mut repository, request, requester, policy, cause, now)
        })?;

        info!(
            order_id = transition.order.order_id,
            status = %transition.order.status,
            leads = transition.order.lead_ids.len(),
            "Order created"
        );
        Ok(transition)
    }

    /// Cancels an order and releases its leads in one IMMEDIATE transaction.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Core` if the order is missing, not owned by
    /// the requester, or already cancelled, or a database error.
    pub fn cancel_order(
        &mut self,
        order_id: i64,
        reason: &str,
        requester: &Requester,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<OrderTransition, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let mut repository: DieselRepository<'_> = DieselRepository::new(conn);
            leadflow::cancel_order(&mut repository, order_id, reason, requester, cause, now)
        })
    }

    /// Changes an order's priority and/or notes.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Core` if the order is missing, not owned by
    /// the requester, or the update is invalid, or a database error.
    pub fn update_order(
        &mut self,
        order_id: i64,
        update: &OrderUpdate,
        requester: &Requester,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<OrderTransition, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let mut repository: DieselRepository<'_> = DieselRepository::new(conn);
            leadflow::update_order(&mut repository, order_id, update, requester, cause, now)
        })
    }

    /// Loads an order with its leads on behalf of a requester.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Core` if the order is missing or not visible
    /// to the requester, or a database error.
    pub fn get_order_details(
        &mut self,
        order_id: i64,
        requester: &Requester,
    ) -> Result<OrderDetails, PersistenceError> {
        let mut repository: DieselRepository<'_> = DieselRepository::new(&mut self.conn);
        leadflow::get_order(&mut repository, order_id, requester)
    }

    /// Loads an order without any access check.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_order(&mut self, order_id: i64) -> Result<Option<Order>, PersistenceError> {
        queries::orders::get_order(&mut self.conn, order_id)
    }

    /// Lists orders matching a filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_orders(
        &mut self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> Result<Page<Order>, PersistenceError> {
        queries::orders::list_orders(&mut self.conn, filter, page)
    }

    // ========================================================================
    // Lead assignment
    // ========================================================================

    /// Assigns leads to an agent in one IMMEDIATE transaction.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Core` if the requester may not assign, the
    /// agent is unknown or ineligible, or a database error.
    pub fn assign_leads(
        &mut self,
        lead_ids: &[i64],
        agent_id: i64,
        requester: &Requester,
        policy: &AllocationPolicy,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<AssignmentOutcome, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let mut repository: DieselRepository<'_> = DieselRepository::new(conn);
            leadflow::assign_leads(
                &mut repository,
                lead_ids,
                agent_id,
                requester,
                policy,
                cause,
                now,
            )
        })
    }

    /// Clears the assignment of leads in one IMMEDIATE transaction.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Core` if the requester may not unassign, or
    /// a database error.
    pub fn unassign_leads(
        &mut self,
        lead_ids: &[i64],
        requester: &Requester,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<AssignmentOutcome, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let mut repository: DieselRepository<'_> = DieselRepository::new(conn);
            leadflow::unassign_leads(&mut repository, lead_ids, requester, cause, now)
        })
    }

    // ========================================================================
    // Leads
    // ========================================================================

    /// Validates and inserts one lead.
    ///
    /// # Errors
    ///
    /// Returns a domain violation if the record is invalid or its email is
    /// already in use, or a database error.
    pub fn create_lead(
        &mut self,
        record: &NormalizedLeadRecord,
        now: OffsetDateTime,
    ) -> Result<Lead, PersistenceError> {
        validate_lead_record(record)?;

        self.conn.immediate_transaction(|conn| -> Result<Lead, PersistenceError> {
            if queries::leads::email_exists(conn, record.email.trim())? {
                return Err(duplicate_email(record.email.trim()).into());
            }
            let lead_id: i64 = mutations::leads::insert_lead(conn, record, now)?;
            queries::leads::get_lead(conn, lead_id)?
                .ok_or_else(|| PersistenceError::NotFound(format!("Lead {lead_id}")))
        })
    }

    /// Imports a batch of lead records.
    ///
    /// Each record is checked on its own; a rejected row is reported and the
    /// rest still go in. All accepted rows are written in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error only if the database fails; invalid rows are reported
    /// in the returned [`IngestReport`].
    pub fn ingest_leads(
        &mut self,
        records: &[NormalizedLeadRecord],
        now: OffsetDateTime,
    ) -> Result<IngestReport, PersistenceError> {
        let report: IngestReport = self
            .conn
            .immediate_transaction(|conn| ingest_batch(conn, records, now))?;

        info!(
            imported = report.imported.len(),
            rejected = report.errors.len(),
            "Lead import finished"
        );
        Ok(report)
    }

    /// Loads one lead with its comments.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_lead(&mut self, lead_id: i64) -> Result<Option<Lead>, PersistenceError> {
        queries::leads::get_lead(&mut self.conn, lead_id)
    }

    /// Lists leads matching a filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_leads(
        &mut self,
        filter: &LeadFilter,
        page: PageRequest,
    ) -> Result<Page<Lead>, PersistenceError> {
        queries::leads::list_leads(&mut self.conn, filter, page)
    }

    /// Changes a lead's engagement status.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the lead does not exist.
    pub fn update_lead_status(
        &mut self,
        lead_id: i64,
        status: LeadStatus,
    ) -> Result<(), PersistenceError> {
        mutations::leads::update_lead_status(&mut self.conn, lead_id, status)
    }

    /// Appends a comment to a lead.
    ///
    /// # Errors
    ///
    /// Returns a domain violation if the text is blank or too long, or
    /// `PersistenceError::NotFound` if the lead does not exist.
    pub fn add_comment(
        &mut self,
        lead_id: i64,
        author_id: i64,
        text: &str,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        validate_comment(text)?;

        self.conn.immediate_transaction(|conn| -> Result<i64, PersistenceError> {
            if queries::leads::get_lead(conn, lead_id)?.is_none() {
                return Err(PersistenceError::NotFound(format!("Lead {lead_id}")));
            }
            mutations::leads::add_comment(conn, lead_id, author_id, text, now)
        })
    }

    /// Deletes a lead that no live order references.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LeadInUse` (as a domain violation) if a
    /// non-cancelled order lists the lead, or `PersistenceError::NotFound`
    /// if the lead does not exist.
    pub fn delete_lead(&mut self, lead_id: i64) -> Result<(), PersistenceError> {
        self.conn.immediate_transaction(|conn| -> Result<(), PersistenceError> {
            if let Some(order_id) = queries::leads::find_active_order_for_lead(conn, lead_id)? {
                warn!(lead_id, order_id, "Refusing to delete lead held by a live order");
                return Err(DomainError::LeadInUse { lead_id, order_id }.into());
            }
            mutations::leads::delete_lead(conn, lead_id)
        })
    }

    /// Computes lead counts per type and per agent.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn lead_stats(&mut self) -> Result<LeadStats, PersistenceError> {
        queries::leads::lead_stats(&mut self.conn)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a user and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateLoginName` if the login is taken,
    /// or a database error.
    pub fn create_user(
        &mut self,
        user: &NewUser<'_>,
        now: OffsetDateTime,
    ) -> Result<UserData, PersistenceError> {
        let user_id: i64 = mutations::users::create_user(&mut self.conn, user, now)?;
        queries::users::get_user_by_id(&mut self.conn, user_id)?
            .ok_or_else(|| PersistenceError::NotFound(format!("User {user_id}")))
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Retrieves a user by login name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_login(
        &mut self,
        login_name: &str,
    ) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_login(&mut self.conn, login_name)
    }

    /// Lists users, optionally restricted to one role.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users(
        &mut self,
        role: Option<UserRole>,
    ) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_users(&mut self.conn, role)
    }

    /// Counts all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_users(&mut self) -> Result<i64, PersistenceError> {
        queries::users::count_users(&mut self.conn)
    }

    /// Changes a user's approval status.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the user does not exist.
    pub fn set_user_status(
        &mut self,
        user_id: i64,
        status: UserStatus,
    ) -> Result<(), PersistenceError> {
        mutations::users::set_user_status(&mut self.conn, user_id, status)
    }

    /// Activates or deactivates a user.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the user does not exist.
    pub fn set_user_active(
        &mut self,
        user_id: i64,
        is_active: bool,
    ) -> Result<(), PersistenceError> {
        mutations::users::set_user_active(&mut self.conn, user_id, is_active)
    }

    /// Checks a login and password.
    ///
    /// Returns the user only if it exists, is active and the password matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or hash verification fails.
    pub fn verify_credentials(
        &mut self,
        login_name: &str,
        password: &str,
    ) -> Result<Option<UserData>, PersistenceError> {
        let Some(user) = queries::users::get_user_by_login(&mut self.conn, login_name)? else {
            return Ok(None);
        };

        if !user.is_active || !queries::users::verify_password(password, &user.password_hash)? {
            return Ok(None);
        }
        Ok(Some(user))
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found or cannot be deserialized.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, event_id)
    }

    /// Retrieves every audit event recorded against an order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or an event cannot be deserialized.
    pub fn get_order_timeline(
        &mut self,
        order_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_order_timeline(&mut self.conn, order_id)
    }

    /// Counts all audit events.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_audit_events(&mut self) -> Result<i64, PersistenceError> {
        queries::audit::count_audit_events(&mut self.conn)
    }
}

fn duplicate_email(email: &str) -> DomainError {
    DomainError::InvalidField {
        field: "email",
        message: format!("A lead with email '{email}' already exists"),
    }
}

/// Validates and inserts each record, collecting per-row failures.
fn ingest_batch(
    conn: &mut SqliteConnection,
    records: &[NormalizedLeadRecord],
    now: OffsetDateTime,
) -> Result<IngestReport, PersistenceError> {
    let mut report: IngestReport = IngestReport::default();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for (index, record) in records.iter().enumerate() {
        let row: usize = index + 1;
        if let Err(e) = validate_lead_record(record) {
            report.errors.push((row, e.to_string()));
            continue;
        }

        let email: &str = record.email.trim();
        if !seen.insert(email.to_string()) || queries::leads::email_exists(conn, email)? {
            report.errors.push((row, duplicate_email(email).to_string()));
            continue;
        }

        report
            .imported
            .push(mutations::leads::insert_lead(conn, record, now)?);
    }

    Ok(report)
}
