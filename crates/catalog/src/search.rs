//! Search mirror collaborator.

use crate::error::CatalogResult;
use async_trait::async_trait;
use curator_core::DatasetId;

/// Best-effort synchronous refresh of a dataset's search document,
/// bypassing the bulk indexer.
///
/// The index itself (query semantics, relevance) lives outside this
/// core; the coordinators only need to poke it after a publish.
#[async_trait]
pub trait SearchMirror: Send + Sync {
    /// Refresh the index document for one dataset.
    async fn refresh_document(&self, dataset_id: DatasetId) -> CatalogResult<()>;
}

/// A search mirror that does nothing, for deployments without an index.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSearchMirror;

#[async_trait]
impl SearchMirror for NullSearchMirror {
    async fn refresh_document(&self, _dataset_id: DatasetId) -> CatalogResult<()> {
        Ok(())
    }
}
