//! Dataset repository.

use crate::error::MetadataResult;
use async_trait::async_trait;
use curator_core::{Dataset, DatasetId};

/// Repository for published dataset records.
///
/// Datasets are created by the import pipeline (out of scope here);
/// this surface only reads them and replaces them in place on publish.
#[async_trait]
pub trait DatasetRepo: Send + Sync {
    /// Get a dataset by ID.
    async fn get_dataset(&self, id: DatasetId) -> MetadataResult<Option<Dataset>>;

    /// Replace an existing dataset record in place.
    ///
    /// Fails with `NotFound` if no record exists for the dataset's ID.
    async fn replace_dataset(&self, dataset: &Dataset) -> MetadataResult<()>;
}
