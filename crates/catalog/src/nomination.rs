//! The nomination approval/import pipeline.

use crate::error::{ensure_live, CatalogError, CatalogResult};
use curator_core::{
    is_valid_transition, CatalogConfig, ContainerAttachment, Nomination, NominationId,
    NominationStatus, Principal,
};
use curator_metadata::MetadataStore;
use curator_storage::{NameAllocator, ObjectStore};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;

/// Request to create the upload container for a nomination.
#[derive(Clone, Debug)]
pub struct StorageRequest {
    /// The nomination to attach storage to.
    pub nomination_id: NominationId,
    /// Dataset name the container name is derived from.
    pub dataset_name: String,
}

/// Drives nominations through the approval/import pipeline.
///
/// Every status change funnels through [`NominationService::update_status`],
/// the single choke point that consults the transition table.
pub struct NominationService {
    metadata: Arc<dyn MetadataStore>,
    store: Arc<dyn ObjectStore>,
    allocator: NameAllocator,
    config: CatalogConfig,
}

impl NominationService {
    /// Create a service over the injected collaborators.
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        store: Arc<dyn ObjectStore>,
        config: CatalogConfig,
    ) -> Self {
        let allocator = NameAllocator::new(config.max_container_name_len);
        Self {
            metadata,
            store,
            allocator,
            config,
        }
    }

    /// Approve a pending nomination.
    ///
    /// Fails with `AlreadyProcessed` unless the nomination is still
    /// PendingApproval. If a content container is already attached and
    /// present, approval skips straight to Uploading; otherwise the
    /// nomination waits in Approved for storage creation.
    pub async fn approve(
        &self,
        id: NominationId,
        user: &Principal,
        cancel: &CancellationToken,
    ) -> CatalogResult<Nomination> {
        ensure_live(cancel)?;
        let nomination = self.require_nomination(id).await?;
        if nomination.status != NominationStatus::PendingApproval {
            return Err(CatalogError::AlreadyProcessed(format!(
                "nomination {id} is {}",
                nomination.status
            )));
        }

        let has_storage = match &nomination.attachment {
            Some(attachment) => {
                attachment
                    .validate_storage_type()
                    .map_err(|_| storage_type_error(id, attachment))?;
                ensure_live(cancel)?;
                self.store
                    .container_exists(&attachment.account, &attachment.container)
                    .await?
            }
            None => false,
        };

        let target = if has_storage {
            NominationStatus::Uploading
        } else {
            NominationStatus::Approved
        };
        self.update_status(id, target, user, cancel).await
    }

    /// Reject a nomination. Always legal per the transition table.
    pub async fn reject(
        &self,
        id: NominationId,
        user: &Principal,
        cancel: &CancellationToken,
    ) -> CatalogResult<Nomination> {
        self.update_status(id, NominationStatus::Rejected, user, cancel)
            .await
    }

    /// Allocate and create the upload container for a nomination,
    /// attach its coordinates, and transition to Uploading.
    ///
    /// The container is created *before* the attachment is persisted;
    /// a crash in between orphans an empty container, never a
    /// nomination pointing at missing storage.
    pub async fn create_storage(
        &self,
        request: StorageRequest,
        user: &Principal,
        cancel: &CancellationToken,
    ) -> CatalogResult<Nomination> {
        ensure_live(cancel)?;
        let mut nomination = self.require_nomination(request.nomination_id).await?;
        if !is_valid_transition(nomination.status, NominationStatus::Uploading) {
            return Err(CatalogError::InvalidTransition {
                from: nomination.status,
                to: NominationStatus::Uploading,
            });
        }

        let account = self.config.storage_account.clone();
        ensure_live(cancel)?;
        let container = self
            .allocator
            .allocate_unique(self.store.as_ref(), &account, &request.dataset_name, &[])
            .await?;

        ensure_live(cancel)?;
        self.store.create_container(&account, &container).await?;
        tracing::info!(
            nomination_id = %request.nomination_id,
            container = %container,
            "nomination upload container created"
        );

        nomination.attachment = Some(ContainerAttachment::new(
            &account,
            &container,
            self.store.container_url(&account, &container),
        ));
        self.apply_transition(&mut nomination, NominationStatus::Uploading, user)?;
        self.metadata.replace_nomination(&nomination).await?;
        Ok(nomination)
    }

    /// The single choke point all status changes pass through.
    ///
    /// Loads the current status, consults the transition table, and
    /// persists the new status plus modifier audit fields.
    pub async fn update_status(
        &self,
        id: NominationId,
        status: NominationStatus,
        user: &Principal,
        cancel: &CancellationToken,
    ) -> CatalogResult<Nomination> {
        ensure_live(cancel)?;
        let mut nomination = self.require_nomination(id).await?;
        self.apply_transition(&mut nomination, status, user)?;

        ensure_live(cancel)?;
        self.metadata.replace_nomination(&nomination).await?;
        tracing::info!(nomination_id = %id, status = %status, "nomination status updated");
        Ok(nomination)
    }

    /// Nominations awaiting curator review, oldest first.
    pub async fn pending(&self, cancel: &CancellationToken) -> CatalogResult<Vec<Nomination>> {
        ensure_live(cancel)?;
        Ok(self
            .metadata
            .list_by_status(NominationStatus::PendingApproval)
            .await?)
    }

    fn apply_transition(
        &self,
        nomination: &mut Nomination,
        to: NominationStatus,
        user: &Principal,
    ) -> CatalogResult<()> {
        if !is_valid_transition(nomination.status, to) {
            return Err(CatalogError::InvalidTransition {
                from: nomination.status,
                to,
            });
        }
        nomination.status = to;
        nomination.modified_by = Some(user.normalized_email());
        nomination.modified_at = OffsetDateTime::now_utc();
        Ok(())
    }

    async fn require_nomination(&self, id: NominationId) -> CatalogResult<Nomination> {
        self.metadata
            .get_nomination(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("nomination {id}")))
    }
}

fn storage_type_error(id: NominationId, attachment: &ContainerAttachment) -> CatalogError {
    CatalogError::StorageInconsistency(format!(
        "nomination {id} attachment has unsupported storage type '{}'",
        attachment.storage_type
    ))
}
