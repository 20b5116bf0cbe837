//! Coordinator error types.

use curator_core::NominationStatus;
use curator_metadata::MetadataError;
use curator_storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the edit and nomination coordinators.
///
/// Transient failures from the backing stores pass through the
/// transparent variants unchanged so the caller's retry policy applies
/// to the original error, not a wrapper.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("not authorized: {0}")]
    NotAuthorized(String),

    #[error("already processed: {0}")]
    AlreadyProcessed(String),

    #[error("invalid nomination transition: {from} -> {to}")]
    InvalidTransition {
        from: NominationStatus,
        to: NominationStatus,
    },

    #[error("storage inconsistency: {0}")]
    StorageInconsistency(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for coordinator operations.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Bail out before the next I/O step if the caller cancelled.
///
/// Cancellation is checked between steps only; a step already committed
/// stays committed (at-least-once side effects, never rollback).
pub(crate) fn ensure_live(cancel: &tokio_util::sync::CancellationToken) -> CatalogResult<()> {
    if cancel.is_cancelled() {
        Err(CatalogError::Cancelled)
    } else {
        Ok(())
    }
}
