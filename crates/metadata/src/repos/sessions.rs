//! Edit session repository.

use crate::error::MetadataResult;
use async_trait::async_trait;
use curator_core::{DatasetId, EditSession};

/// Repository for edit session records.
///
/// Sessions are keyed by their dataset's ID but live under a logical
/// partition distinct from the dataset partition, so a session write can
/// never clobber the published record.
#[async_trait]
pub trait EditSessionRepo: Send + Sync {
    /// Get the edit session for a dataset, if one exists.
    async fn get_session(&self, dataset_id: DatasetId) -> MetadataResult<Option<EditSession>>;

    /// Create or replace the edit session for a dataset.
    async fn upsert_session(&self, session: &EditSession) -> MetadataResult<()>;

    /// Delete the edit session for a dataset.
    ///
    /// Returns whether a record existed. Deleting a missing session is
    /// not an error; cancel and cleanup rely on this for idempotency.
    async fn delete_session(&self, dataset_id: DatasetId) -> MetadataResult<bool>;
}
