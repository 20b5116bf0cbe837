//! Nomination records and the status transition table.

use crate::container::ContainerAttachment;
use crate::dataset::{DatasetId, LicenseTerms};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;
use uuid::Uuid;

/// Unique identifier for a nomination.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NominationId(Uuid);

impl NominationId {
    /// Generate a new random nomination ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from a string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| crate::Error::InvalidIdentifier(format!("invalid nomination ID: {e}")))
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NominationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NominationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NominationId({})", self.0)
    }
}

impl fmt::Display for NominationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Nomination lifecycle states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NominationStatus {
    /// Submitted, awaiting curator approval.
    PendingApproval,
    /// Approved; storage not yet created.
    Approved,
    /// Storage exists; submitter is uploading content.
    Uploading,
    /// Content handed to the import pipeline.
    Importing,
    /// Imported and published.
    Complete,
    /// Rejected by a curator.
    Rejected,
    /// Import failed.
    Error,
}

impl NominationStatus {
    /// String form used in audit logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Uploading => "uploading",
            Self::Importing => "importing",
            Self::Complete => "complete",
            Self::Rejected => "rejected",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NominationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The nomination status transition table.
///
/// The single source of truth consulted by the one choke point all
/// status changes pass through. Resubmission (`-> PendingApproval`),
/// rejection, and error are always legal; everything else follows the
/// pipeline order.
pub fn is_valid_transition(from: NominationStatus, to: NominationStatus) -> bool {
    use NominationStatus::*;
    match to {
        PendingApproval | Rejected | Error => true,
        Approved => matches!(from, PendingApproval),
        Uploading => matches!(from, PendingApproval | Approved),
        Importing => matches!(from, Uploading),
        Complete => matches!(from, Importing | Error),
    }
}

/// A proposed new (or re-proposed) dataset awaiting approval and import.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Nomination {
    /// Nomination identifier.
    pub id: NominationId,
    /// Existing dataset this nomination replaces content for, if any.
    pub dataset_id: Option<DatasetId>,
    /// Human-readable name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Research domain.
    pub domain: Option<String>,
    /// License declaration including override sub-fields.
    #[serde(default)]
    pub license: LicenseTerms,
    /// Search tags.
    pub tags: Vec<String>,
    /// Whether bulk download is offered.
    pub is_downloadable: bool,
    /// Whether a compressed rendition is available.
    pub is_compressed_available: bool,
    /// Contact name for the submitter.
    pub contact_name: Option<String>,
    /// Contact email for the submitter.
    pub contact_email: Option<String>,
    /// Lifecycle status.
    pub status: NominationStatus,
    /// Pointer to the content container, once one exists.
    pub attachment: Option<ContainerAttachment>,
    /// Who created the nomination.
    pub created_by: Option<String>,
    /// When the nomination was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Who last modified the nomination.
    pub modified_by: Option<String>,
    /// When the nomination was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub modified_at: OffsetDateTime,
}
