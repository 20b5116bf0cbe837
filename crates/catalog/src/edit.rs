//! The per-dataset edit session coordinator.

use crate::error::{ensure_live, CatalogError, CatalogResult};
use crate::search::SearchMirror;
use curator_core::{
    is_owner, CatalogConfig, ContainerAttachment, ContainerRef, Dataset, DatasetId, DatasetPatch,
    EditSession, EditStatus, Nomination, NominationId, NominationStatus, Principal,
};
use curator_metadata::MetadataStore;
use curator_storage::{AccessGrant, NameAllocator, ObjectStore, TokenIssuer};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;

/// Result of a publish attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Whether anything was published.
    pub published: bool,
    /// Whether the caller must enqueue the external import job.
    pub queue_import: bool,
}

impl PublishOutcome {
    fn details() -> Self {
        Self {
            published: true,
            queue_import: false,
        }
    }

    fn contents() -> Self {
        Self {
            published: true,
            queue_import: true,
        }
    }

    fn nothing() -> Self {
        Self {
            published: false,
            queue_import: false,
        }
    }
}

/// Coordinates owner edits to published datasets.
///
/// Owns the per-dataset edit session state machine (Unmodified /
/// DetailsModified / ContentsModified / Importing), enforces ownership,
/// and drives publish/cancel side effects across the metadata store,
/// the object store, and the search mirror.
///
/// Concurrent double-invocation for the same dataset (two simultaneous
/// `initiate_content_edit` calls) is not serialized in-process; the
/// backing store's optimistic concurrency is the only guard. This is a
/// known race inherited from the system this coordinator fronts.
pub struct EditCoordinator {
    metadata: Arc<dyn MetadataStore>,
    store: Arc<dyn ObjectStore>,
    tokens: Arc<TokenIssuer>,
    search: Arc<dyn SearchMirror>,
    allocator: NameAllocator,
    config: CatalogConfig,
}

impl EditCoordinator {
    /// Create a coordinator over the injected collaborators.
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        store: Arc<dyn ObjectStore>,
        tokens: Arc<TokenIssuer>,
        search: Arc<dyn SearchMirror>,
        config: CatalogConfig,
    ) -> Self {
        let allocator = NameAllocator::new(config.max_container_name_len);
        Self {
            metadata,
            store,
            tokens,
            search,
            allocator,
            config,
        }
    }

    /// Fetch the edit session for a dataset, synthesizing an Unmodified
    /// session from the published record when none is stored.
    pub async fn get_edit_by_id(
        &self,
        dataset_id: DatasetId,
        user: &Principal,
        cancel: &CancellationToken,
    ) -> CatalogResult<EditSession> {
        ensure_live(cancel)?;
        let dataset = self.require_owned_dataset(dataset_id, user).await?;
        self.load_or_synthesize(&dataset).await
    }

    /// Stage metadata changes on the session's working copy.
    ///
    /// License override sub-fields are kept only when the license kind
    /// actually carries an override, and cleared otherwise. A content
    /// edit in flight stays in ContentsModified; metadata edits never
    /// transition out of it.
    pub async fn update_details(
        &self,
        dataset_id: DatasetId,
        user: &Principal,
        patch: DatasetPatch,
        cancel: &CancellationToken,
    ) -> CatalogResult<EditSession> {
        ensure_live(cancel)?;
        let dataset = self.require_owned_dataset(dataset_id, user).await?;
        let mut session = self.load_or_synthesize(&dataset).await?;

        let mut details = patch;
        details.license = details.license.sanitized();
        session.details = details;

        if matches!(
            session.status,
            EditStatus::Unmodified | EditStatus::DetailsModified
        ) {
            session.status = EditStatus::DetailsModified;
        }
        self.stamp(&mut session, user);

        ensure_live(cancel)?;
        self.metadata.upsert_session(&session).await?;
        tracing::info!(dataset_id = %dataset_id, status = ?session.status, "edit details staged");
        Ok(session)
    }

    /// Begin a content edit: allocate and create a shadow container,
    /// snapshot the original container coordinates, and flip the
    /// session to ContentsModified.
    ///
    /// Idempotent: a session already in ContentsModified is returned
    /// unchanged and no second container is created. The container is
    /// created *before* the session references it; a crash in between
    /// leaves an orphaned empty container, never a dangling reference.
    pub async fn initiate_content_edit(
        &self,
        dataset_id: DatasetId,
        user: &Principal,
        cancel: &CancellationToken,
    ) -> CatalogResult<EditSession> {
        ensure_live(cancel)?;
        let dataset = self.require_owned_dataset(dataset_id, user).await?;
        let mut session = self.load_or_synthesize(&dataset).await?;

        if session.status.is_content_edit() {
            return Ok(session);
        }

        let account = self.config.storage_account.clone();
        ensure_live(cancel)?;
        let shadow_name = self
            .allocator
            .allocate_update_name(
                self.store.as_ref(),
                &account,
                &dataset.name,
                OffsetDateTime::now_utc().date(),
            )
            .await?;

        ensure_live(cancel)?;
        self.store.create_container(&account, &shadow_name).await?;
        tracing::info!(
            dataset_id = %dataset_id,
            container = %shadow_name,
            "shadow container created"
        );

        session.original = dataset.container.clone();
        session.shadow = Some(ContainerRef::new(&account, &shadow_name));
        session.status = EditStatus::ContentsModified;
        self.stamp(&mut session, user);
        self.metadata.upsert_session(&session).await?;
        Ok(session)
    }

    /// Read-only token for the dataset's *original* container, so the
    /// client can show existing content while an edit is in progress.
    ///
    /// Only meaningful in DetailsModified or ContentsModified; any
    /// other state yields no grant, as does a dataset that has no
    /// container yet.
    pub async fn read_only_token_for_original(
        &self,
        dataset_id: DatasetId,
        user: &Principal,
        cancel: &CancellationToken,
    ) -> CatalogResult<Option<AccessGrant>> {
        ensure_live(cancel)?;
        let dataset = self.require_owned_dataset(dataset_id, user).await?;
        let session = self.load_or_synthesize(&dataset).await?;

        if !session.status.allows_original_read() {
            return Ok(None);
        }
        // A dataset getting its first content has nothing to read yet.
        let Some(original) = session.original.clone().or_else(|| dataset.container.clone())
        else {
            return Ok(None);
        };
        let grant = self
            .tokens
            .issue_read_token(&original.account, &original.container)?;
        Ok(Some(grant))
    }

    /// Read/write token for the shadow container of an in-flight
    /// content edit; empty in any other state.
    pub async fn read_write_token_for_shadow(
        &self,
        dataset_id: DatasetId,
        user: &Principal,
        cancel: &CancellationToken,
    ) -> CatalogResult<Option<AccessGrant>> {
        ensure_live(cancel)?;
        let dataset = self.require_owned_dataset(dataset_id, user).await?;
        let session = self.load_or_synthesize(&dataset).await?;

        if !session.status.is_content_edit() {
            return Ok(None);
        }
        let shadow = session.shadow.as_ref().ok_or_else(|| {
            CatalogError::StorageInconsistency(format!(
                "content edit for dataset {dataset_id} has no shadow container"
            ))
        })?;
        let grant = self
            .tokens
            .issue_edit_token(&shadow.account, &shadow.container)
            .await?;
        Ok(Some(grant))
    }

    /// Publish staged changes.
    ///
    /// - DetailsModified: replace the dataset's metadata in place,
    ///   refresh the search mirror, drop the session.
    /// - ContentsModified: revoke the shadow's edit token, flip the
    ///   session to Importing, and create an Importing nomination
    ///   pointing at the frozen shadow container. The caller must then
    ///   enqueue the external import job (`queue_import`).
    /// - Anything else: no side effects, `published == false`.
    ///
    /// Revocation happens *before* the Importing flip so a client
    /// cannot race a write past the authoritative transition.
    pub async fn publish(
        &self,
        dataset_id: DatasetId,
        user: &Principal,
        cancel: &CancellationToken,
    ) -> CatalogResult<PublishOutcome> {
        ensure_live(cancel)?;
        let dataset = self.require_owned_dataset(dataset_id, user).await?;
        let Some(mut session) = self.metadata.get_session(dataset_id).await? else {
            return Ok(PublishOutcome::nothing());
        };

        match session.status {
            EditStatus::DetailsModified => {
                let mut dataset = dataset;
                let now = OffsetDateTime::now_utc();
                dataset.apply_patch(&session.details, user, now);

                ensure_live(cancel)?;
                self.metadata.replace_dataset(&dataset).await?;
                self.search.refresh_document(dataset_id).await?;
                self.metadata.delete_session(dataset_id).await?;
                tracing::info!(dataset_id = %dataset_id, "details published");
                Ok(PublishOutcome::details())
            }
            EditStatus::ContentsModified => {
                let shadow = session.shadow.clone().ok_or_else(|| {
                    CatalogError::StorageInconsistency(format!(
                        "content edit for dataset {dataset_id} has no shadow container"
                    ))
                })?;

                ensure_live(cancel)?;
                self.tokens
                    .revoke_edit_token(&shadow.account, &shadow.container)
                    .await?;

                session.status = EditStatus::Importing;
                self.stamp(&mut session, user);
                self.metadata.upsert_session(&session).await?;

                let nomination = self.build_import_nomination(&dataset, &session, &shadow, user);
                self.metadata.upsert_nomination(&nomination).await?;
                tracing::info!(
                    dataset_id = %dataset_id,
                    nomination_id = %nomination.id,
                    container = %shadow.container,
                    "content publish handed to import pipeline"
                );
                Ok(PublishOutcome::contents())
            }
            EditStatus::Unmodified | EditStatus::Importing => Ok(PublishOutcome::nothing()),
        }
    }

    /// Discard staged changes.
    ///
    /// Returns `false` when there is nothing to cancel. For a content
    /// edit, outstanding edit tokens are revoked and the session record
    /// is deleted *before* the shadow container, so a crash mid-way
    /// orphans a container rather than leaving a dangling reference.
    /// Idempotent: a second call finds no session record.
    pub async fn cancel(
        &self,
        dataset_id: DatasetId,
        user: &Principal,
        cancel: &CancellationToken,
    ) -> CatalogResult<bool> {
        ensure_live(cancel)?;
        self.require_owned_dataset(dataset_id, user).await?;
        let Some(session) = self.metadata.get_session(dataset_id).await? else {
            return Ok(false);
        };

        match session.status {
            EditStatus::DetailsModified => {
                self.metadata.delete_session(dataset_id).await?;
                tracing::info!(dataset_id = %dataset_id, "details edit cancelled");
                Ok(true)
            }
            EditStatus::ContentsModified => {
                if let Some(shadow) = &session.shadow {
                    ensure_live(cancel)?;
                    self.tokens
                        .revoke_edit_token(&shadow.account, &shadow.container)
                        .await?;
                }
                self.metadata.delete_session(dataset_id).await?;
                if let Some(shadow) = &session.shadow {
                    self.store
                        .delete_container(&shadow.account, &shadow.container)
                        .await?;
                    tracing::info!(
                        dataset_id = %dataset_id,
                        container = %shadow.container,
                        "content edit cancelled, shadow container deleted"
                    );
                }
                Ok(true)
            }
            EditStatus::Unmodified | EditStatus::Importing => Ok(false),
        }
    }

    /// Finish a content publish after the import pipeline has durably
    /// copied content into place.
    ///
    /// Refreshes the search mirror, deletes the *original* container
    /// (if its coordinates were snapshotted), then deletes the session
    /// record. Returns `false` when no session exists or the session is
    /// not in Importing: the import already cleaned up, or the owner
    /// has since started a fresh edit. A retried cleanup must never
    /// destroy that new session. The shadow/new container is never
    /// touched here.
    pub async fn cleanup_after_import(
        &self,
        dataset_id: DatasetId,
        cancel: &CancellationToken,
    ) -> CatalogResult<bool> {
        ensure_live(cancel)?;
        self.search.refresh_document(dataset_id).await?;

        let Some(session) = self.metadata.get_session(dataset_id).await? else {
            return Ok(false);
        };
        if session.status != EditStatus::Importing {
            return Ok(false);
        }

        if let Some(original) = &session.original {
            ensure_live(cancel)?;
            self.store
                .delete_container(&original.account, &original.container)
                .await?;
            tracing::info!(
                dataset_id = %dataset_id,
                container = %original.container,
                "original container deleted after import"
            );
        }
        self.metadata.delete_session(dataset_id).await?;
        Ok(true)
    }

    async fn require_owned_dataset(
        &self,
        dataset_id: DatasetId,
        user: &Principal,
    ) -> CatalogResult<Dataset> {
        let dataset = self
            .metadata
            .get_dataset(dataset_id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("dataset {dataset_id}")))?;
        if !is_owner(&dataset.owners, user) {
            return Err(CatalogError::NotAuthorized(format!(
                "{} is not an owner of dataset {dataset_id}",
                user.normalized_email()
            )));
        }
        Ok(dataset)
    }

    async fn load_or_synthesize(&self, dataset: &Dataset) -> CatalogResult<EditSession> {
        match self.metadata.get_session(dataset.id).await? {
            Some(session) => Ok(session),
            None => Ok(EditSession::from_dataset(dataset)),
        }
    }

    fn stamp(&self, session: &mut EditSession, user: &Principal) {
        session.modified_by = Some(user.normalized_email());
        session.modified_at = OffsetDateTime::now_utc();
    }

    fn build_import_nomination(
        &self,
        dataset: &Dataset,
        session: &EditSession,
        shadow: &ContainerRef,
        user: &Principal,
    ) -> Nomination {
        let now = OffsetDateTime::now_utc();
        let details = &session.details;
        Nomination {
            id: NominationId::new(),
            dataset_id: Some(dataset.id),
            name: details.name.clone(),
            description: details.description.clone(),
            domain: details.domain.clone(),
            license: details.license.sanitized(),
            tags: details.tags.clone(),
            is_downloadable: details.is_downloadable,
            is_compressed_available: details.is_compressed_available,
            contact_name: details.contact_name.clone(),
            contact_email: details.contact_email.clone(),
            status: NominationStatus::Importing,
            attachment: Some(ContainerAttachment::new(
                &shadow.account,
                &shadow.container,
                self.store
                    .container_url(&shadow.account, &shadow.container),
            )),
            created_by: Some(user.normalized_email()),
            created_at: now,
            modified_by: Some(user.normalized_email()),
            modified_at: now,
        }
    }
}
