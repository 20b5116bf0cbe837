//! Nomination repository.

use crate::error::MetadataResult;
use async_trait::async_trait;
use curator_core::{Nomination, NominationId, NominationStatus};

/// Repository for nomination records.
#[async_trait]
pub trait NominationRepo: Send + Sync {
    /// Get a nomination by ID.
    async fn get_nomination(&self, id: NominationId) -> MetadataResult<Option<Nomination>>;

    /// Create or replace a nomination record.
    async fn upsert_nomination(&self, nomination: &Nomination) -> MetadataResult<()>;

    /// Replace an existing nomination record in place.
    ///
    /// Fails with `NotFound` if no record exists for the nomination's ID.
    async fn replace_nomination(&self, nomination: &Nomination) -> MetadataResult<()>;

    /// List nominations with the given status (the approval queue reads
    /// `PendingApproval`).
    async fn list_by_status(&self, status: NominationStatus) -> MetadataResult<Vec<Nomination>>;
}
