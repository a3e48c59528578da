// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The classification of a lead.
///
/// The lead type is immutable once a lead is created and is the bucket key
/// used by order allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadType {
    /// First-time depositor.
    Ftd,
    /// Filler lead.
    Filler,
    /// Cold lead.
    Cold,
    /// Live lead.
    Live,
}

impl LeadType {
    /// All lead types in allocation order.
    pub const ALL: [Self; 4] = [Self::Ftd, Self::Filler, Self::Cold, Self::Live];

    /// Converts this lead type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ftd => "ftd",
            Self::Filler => "filler",
            Self::Cold => "cold",
            Self::Live => "live",
        }
    }
}

impl FromStr for LeadType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ftd" => Ok(Self::Ftd),
            "filler" => Ok(Self::Filler),
            "cold" => Ok(Self::Cold),
            "live" => Ok(Self::Live),
            _ => Err(DomainError::InvalidLeadType(s.to_string())),
        }
    }
}

impl std::fmt::Display for LeadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gender classification of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Not recorded.
    #[default]
    NotDefined,
}

impl Gender {
    /// Converts this gender to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::NotDefined => "not_defined",
        }
    }
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            "not_defined" | "" => Ok(Self::NotDefined),
            _ => Err(DomainError::InvalidGender(s.to_string())),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verification status of the identity documents attached to an FTD lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Documents verified as good.
    Good,
    /// Documents acceptable.
    Ok,
    /// Documents awaiting review.
    Pending,
}

impl DocumentStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Ok => "ok",
            Self::Pending => "pending",
        }
    }
}

impl FromStr for DocumentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" => Ok(Self::Good),
            "ok" => Ok(Self::Ok),
            "pending" => Ok(Self::Pending),
            _ => Err(DomainError::InvalidDocumentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Engagement status of a lead.
///
/// Independent of whether the lead is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    /// Lead is open for engagement.
    #[default]
    Active,
    /// Lead has been contacted.
    Contacted,
    /// Lead converted.
    Converted,
    /// Lead is no longer pursued.
    Inactive,
}

impl LeadStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Contacted => "contacted",
            Self::Converted => "converted",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "contacted" => Ok(Self::Contacted),
            "converted" => Ok(Self::Converted),
            "inactive" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidLeadStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome state of an order.
///
/// The initial state is derived at creation from requested versus fulfilled
/// counts. The only transition afterwards is into `Cancelled`, which is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Every requested lead was claimed.
    Fulfilled,
    /// Some but not all requested leads were claimed.
    Partial,
    /// Cancelled by a requester, or created with nothing to claim.
    Cancelled,
}

impl OrderStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fulfilled => "fulfilled",
            Self::Partial => "partial",
            Self::Cancelled => "cancelled",
        }
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// Valid transitions are:
    /// - `Fulfilled` → `Cancelled`
    /// - `Partial` → `Cancelled`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Fulfilled | Self::Partial, Self::Cancelled)
        )
    }

    /// Returns whether this is the terminal state.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fulfilled" => Ok(Self::Fulfilled),
            "partial" => Ok(Self::Partial),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidOrderStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority.
    #[default]
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Converts this priority to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(DomainError::InvalidPriority(s.to_string())),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role of a system user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full authority over every order, lead and user.
    Admin,
    /// Requests orders and redistributes the leads they receive.
    AffiliateManager,
    /// Maintains the lead inventory and assigns leads to agents.
    LeadManager,
    /// Works the leads assigned to them.
    Agent,
}

impl UserRole {
    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::AffiliateManager => "affiliate_manager",
            Self::LeadManager => "lead_manager",
            Self::Agent => "agent",
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "affiliate_manager" => Ok(Self::AffiliateManager),
            "lead_manager" => Ok(Self::LeadManager),
            "agent" => Ok(Self::Agent),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Approval status of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Awaiting admin approval.
    #[default]
    Pending,
    /// Approved for work.
    Approved,
    /// Rejected by an admin.
    Rejected,
}

impl UserStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for UserStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidUserStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-type lead counts.
///
/// Used both for what an order requests and for what it actually received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct LeadCounts {
    /// FTD count.
    pub ftd: u32,
    /// Filler count.
    pub filler: u32,
    /// Cold count.
    pub cold: u32,
    /// Live count.
    pub live: u32,
}

impl LeadCounts {
    /// Creates a new set of counts.
    #[must_use]
    pub const fn new(ftd: u32, filler: u32, cold: u32, live: u32) -> Self {
        Self {
            ftd,
            filler,
            cold,
            live,
        }
    }

    /// Returns the count for a single lead type.
    #[must_use]
    pub const fn get(&self, lead_type: LeadType) -> u32 {
        match lead_type {
            LeadType::Ftd => self.ftd,
            LeadType::Filler => self.filler,
            LeadType::Cold => self.cold,
            LeadType::Live => self.live,
        }
    }

    /// Sets the count for a single lead type.
    pub const fn set(&mut self, lead_type: LeadType, value: u32) {
        match lead_type {
            LeadType::Ftd => self.ftd = value,
            LeadType::Filler => self.filler = value,
            LeadType::Cold => self.cold = value,
            LeadType::Live => self.live = value,
        }
    }

    /// Increments the count for a single lead type, saturating at `u32::MAX`.
    pub const fn increment(&mut self, lead_type: LeadType) {
        self.set(lead_type, self.get(lead_type).saturating_add(1));
    }

    /// Returns the sum over all types.
    #[must_use]
    pub fn total(&self) -> u64 {
        u64::from(self.ftd) + u64::from(self.filler) + u64::from(self.cold) + u64::from(self.live)
    }

    /// Returns whether every count is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }

    /// Returns whether every count is less than or equal to the matching count in `other`.
    #[must_use]
    pub const fn fits_within(&self, other: &Self) -> bool {
        self.ftd <= other.ftd
            && self.filler <= other.filler
            && self.cold <= other.cold
            && self.live <= other.live
    }

    /// Iterates over `(type, count)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (LeadType, u32)> + '_ {
        LeadType::ALL.into_iter().map(|t| (t, self.get(t)))
    }
}

impl std::fmt::Display for LeadCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ftd={},filler={},cold={},live={}",
            self.ftd, self.filler, self.cold, self.live
        )
    }
}
