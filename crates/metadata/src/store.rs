//! Combined metadata store trait.

use crate::error::MetadataResult;
use crate::repos::{DatasetRepo, EditSessionRepo, NominationRepo};
use async_trait::async_trait;

/// Combined metadata store trait.
///
/// Backends implement the per-record repositories plus a connectivity
/// probe the serving layer can wire into its readiness checks.
#[async_trait]
pub trait MetadataStore: DatasetRepo + EditSessionRepo + NominationRepo + Send + Sync {
    /// Check store connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}
