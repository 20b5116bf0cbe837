//! Edit session types and lifecycle.

use crate::container::ContainerRef;
use crate::dataset::{Dataset, DatasetId, DatasetPatch};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Edit session state.
///
/// `Unmodified` is never persisted: reads synthesize it from the
/// published dataset when no session record exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditStatus {
    /// No staged changes; synthesized from the published dataset.
    Unmodified,
    /// Metadata edited; no container change.
    DetailsModified,
    /// A shadow container has been allocated and is writable.
    ContentsModified,
    /// Content publish committed; cleanup deferred to the import pipeline.
    Importing,
}

impl EditStatus {
    /// Whether a content edit is in flight (shadow container exists).
    pub fn is_content_edit(&self) -> bool {
        matches!(self, Self::ContentsModified)
    }

    /// Whether this state is terminal for the edit coordinator.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Importing)
    }

    /// Whether the original container may be exposed read-only.
    pub fn allows_original_read(&self) -> bool {
        matches!(self, Self::DetailsModified | Self::ContentsModified)
    }
}

/// The working-copy record tracking an in-progress owner edit.
///
/// One per dataset, keyed by the dataset's identifier but stored under a
/// logical partition distinct from the dataset's own. Created lazily on
/// first read; deleted on cancel or successful publish.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditSession {
    /// The dataset being edited.
    pub dataset_id: DatasetId,
    /// Working copy of the editable fields.
    pub details: DatasetPatch,
    /// Current session state.
    pub status: EditStatus,
    /// Shadow container staging replacement content
    /// (`ContentsModified`/`Importing` only).
    pub shadow: Option<ContainerRef>,
    /// Snapshot of the dataset's container at content-edit start, kept
    /// for rollback and deferred cleanup.
    pub original: Option<ContainerRef>,
    /// Who last modified the session.
    pub modified_by: Option<String>,
    /// When the session was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub modified_at: OffsetDateTime,
}

impl EditSession {
    /// Synthesize an unmodified session from a published dataset.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            dataset_id: dataset.id,
            details: DatasetPatch::from_dataset(dataset),
            status: EditStatus::Unmodified,
            shadow: None,
            original: None,
            modified_by: None,
            modified_at: dataset.modified_at,
        }
    }
}
