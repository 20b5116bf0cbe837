//! Published dataset records and their editable projections.

use crate::container::ContainerRef;
use crate::principal::{Owner, Principal};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;
use uuid::Uuid;

/// Unique identifier for a published dataset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetId(Uuid);

impl DatasetId {
    /// Generate a new random dataset ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from a string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| crate::Error::InvalidIdentifier(format!("invalid dataset ID: {e}")))
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DatasetId({})", self.0)
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a nomination or edit declares its license.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseKind {
    /// No license declared yet.
    #[default]
    Unknown,
    /// Reference to a standard license in the license catalog.
    Standard,
    /// Inline HTML license text supplied by the submitter.
    HtmlText,
    /// License uploaded as a file.
    InputFile,
}

impl LicenseKind {
    /// Whether this kind carries license-override sub-fields.
    pub fn has_override(&self) -> bool {
        matches!(self, Self::HtmlText | Self::InputFile)
    }
}

/// License declaration carried by datasets, edit sessions, and nominations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseTerms {
    /// Reference to a standard license, when `kind` is `Standard`.
    pub license_id: Option<String>,
    /// How the license is declared.
    #[serde(default)]
    pub kind: LicenseKind,
    /// Inline HTML license content (override).
    pub content_html: Option<String>,
    /// Uploaded license file name (override).
    pub file_name: Option<String>,
    /// Display name for an override license.
    pub display_name: Option<String>,
}

impl LicenseTerms {
    /// Return a copy with override sub-fields cleared unless the kind
    /// actually carries an override.
    pub fn sanitized(&self) -> Self {
        if self.kind.has_override() {
            self.clone()
        } else {
            Self {
                license_id: self.license_id.clone(),
                kind: self.kind,
                content_html: None,
                file_name: None,
                display_name: None,
            }
        }
    }
}

/// The published record of truth for a research dataset.
///
/// Owned by the metadata store; mutated only through the edit
/// coordinator's publish step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset identifier.
    pub id: DatasetId,
    /// Human-readable name.
    pub name: String,
    /// Description (markdown/plain text).
    pub description: String,
    /// Research domain.
    pub domain: Option<String>,
    /// License declaration.
    #[serde(default)]
    pub license: LicenseTerms,
    /// Search tags.
    pub tags: Vec<String>,
    /// Whether bulk download is offered.
    pub is_downloadable: bool,
    /// Whether a compressed rendition is available.
    pub is_compressed_available: bool,
    /// Owners authorized to edit this dataset.
    pub owners: Vec<Owner>,
    /// Where the dataset's bulk content lives.
    pub container: Option<ContainerRef>,
    /// Who created the record.
    pub created_by: Option<String>,
    /// When the record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Who last modified the record.
    pub modified_by: Option<String>,
    /// When the record was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub modified_at: OffsetDateTime,
}

impl Dataset {
    /// Replace the editable metadata fields from a patch and stamp the
    /// modifier audit fields. Container coordinates and owners are not
    /// editable through this path.
    pub fn apply_patch(&mut self, patch: &DatasetPatch, user: &Principal, now: OffsetDateTime) {
        self.name = patch.name.clone();
        self.description = patch.description.clone();
        self.domain = patch.domain.clone();
        self.license = patch.license.sanitized();
        self.tags = patch.tags.clone();
        self.is_downloadable = patch.is_downloadable;
        self.is_compressed_available = patch.is_compressed_available;
        self.modified_by = Some(user.normalized_email());
        self.modified_at = now;
    }
}

/// The editable projection of a dataset, staged in an edit session.
///
/// Carries the contact fields a nomination needs so a content publish
/// can construct its import nomination without a second round trip.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetPatch {
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
    /// Contact name for a resulting nomination.
    pub contact_name: Option<String>,
    /// Contact email for a resulting nomination.
    pub contact_email: Option<String>,
}

impl DatasetPatch {
    /// Build the editable projection of a published dataset.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            name: dataset.name.clone(),
            description: dataset.description.clone(),
            domain: dataset.domain.clone(),
            license: dataset.license.clone(),
            tags: dataset.tags.clone(),
            is_downloadable: dataset.is_downloadable,
            is_compressed_available: dataset.is_compressed_available,
            contact_name: None,
            contact_email: None,
        }
    }
}
