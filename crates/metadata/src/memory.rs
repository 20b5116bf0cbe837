//! In-memory metadata store for tests and local development.

use crate::error::{MetadataError, MetadataResult};
use crate::repos::{DatasetRepo, EditSessionRepo, NominationRepo};
use crate::store::MetadataStore;
use async_trait::async_trait;
use curator_core::{Dataset, DatasetId, EditSession, Nomination, NominationId, NominationStatus};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Logical partition holding published dataset records.
pub const DATASET_PARTITION: &str = "datasets";

/// Logical partition holding edit sessions.
///
/// Distinct from [`DATASET_PARTITION`] even though sessions are keyed by
/// dataset ID: the working copy must never shadow the record of truth.
pub const EDIT_SESSION_PARTITION: &str = "dataset-edits";

/// Logical partition holding nominations.
pub const NOMINATION_PARTITION: &str = "nominations";

/// In-memory, partition-scoped JSON document store.
///
/// Documents are stored serialized, so reads round-trip through the same
/// serde path a real document store would exercise. Writes are
/// last-writer-wins; there is no optimistic concurrency (a documented
/// gap shared with the backing store this stands in for).
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<(&'static str, Uuid), serde_json::Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a dataset record, bypassing the coordinator (test setup).
    pub fn seed_dataset(&self, dataset: &Dataset) {
        self.put(DATASET_PARTITION, *dataset.id.as_uuid(), dataset)
            .expect("dataset serializes");
    }

    /// Seed a nomination record, bypassing the coordinator (test setup).
    pub fn seed_nomination(&self, nomination: &Nomination) {
        self.put(NOMINATION_PARTITION, *nomination.id.as_uuid(), nomination)
            .expect("nomination serializes");
    }

    fn get_doc<T: DeserializeOwned>(
        &self,
        partition: &'static str,
        id: Uuid,
    ) -> MetadataResult<Option<T>> {
        let documents = self.documents.read().expect("store lock poisoned");
        match documents.get(&(partition, id)) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    fn put<T: Serialize>(&self, partition: &'static str, id: Uuid, doc: &T) -> MetadataResult<()> {
        let value = serde_json::to_value(doc)?;
        let mut documents = self.documents.write().expect("store lock poisoned");
        documents.insert((partition, id), value);
        Ok(())
    }

    fn replace<T: Serialize>(
        &self,
        partition: &'static str,
        id: Uuid,
        doc: &T,
    ) -> MetadataResult<()> {
        let value = serde_json::to_value(doc)?;
        let mut documents = self.documents.write().expect("store lock poisoned");
        match documents.get_mut(&(partition, id)) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(MetadataError::NotFound(format!("{partition}/{id}"))),
        }
    }

    fn remove(&self, partition: &'static str, id: Uuid) -> bool {
        let mut documents = self.documents.write().expect("store lock poisoned");
        documents.remove(&(partition, id)).is_some()
    }
}

#[async_trait]
impl DatasetRepo for MemoryStore {
    async fn get_dataset(&self, id: DatasetId) -> MetadataResult<Option<Dataset>> {
        self.get_doc(DATASET_PARTITION, *id.as_uuid())
    }

    async fn replace_dataset(&self, dataset: &Dataset) -> MetadataResult<()> {
        self.replace(DATASET_PARTITION, *dataset.id.as_uuid(), dataset)
    }
}

#[async_trait]
impl EditSessionRepo for MemoryStore {
    async fn get_session(&self, dataset_id: DatasetId) -> MetadataResult<Option<EditSession>> {
        self.get_doc(EDIT_SESSION_PARTITION, *dataset_id.as_uuid())
    }

    async fn upsert_session(&self, session: &EditSession) -> MetadataResult<()> {
        self.put(EDIT_SESSION_PARTITION, *session.dataset_id.as_uuid(), session)
    }

    async fn delete_session(&self, dataset_id: DatasetId) -> MetadataResult<bool> {
        Ok(self.remove(EDIT_SESSION_PARTITION, *dataset_id.as_uuid()))
    }
}

#[async_trait]
impl NominationRepo for MemoryStore {
    async fn get_nomination(&self, id: NominationId) -> MetadataResult<Option<Nomination>> {
        self.get_doc(NOMINATION_PARTITION, *id.as_uuid())
    }

    async fn upsert_nomination(&self, nomination: &Nomination) -> MetadataResult<()> {
        self.put(NOMINATION_PARTITION, *nomination.id.as_uuid(), nomination)
    }

    async fn replace_nomination(&self, nomination: &Nomination) -> MetadataResult<()> {
        self.replace(NOMINATION_PARTITION, *nomination.id.as_uuid(), nomination)
    }

    async fn list_by_status(&self, status: NominationStatus) -> MetadataResult<Vec<Nomination>> {
        let documents = self.documents.read().expect("store lock poisoned");
        let mut matches = Vec::new();
        for ((partition, _), value) in documents.iter() {
            if *partition != NOMINATION_PARTITION {
                continue;
            }
            let nomination: Nomination = serde_json::from_value(value.clone())?;
            if nomination.status == status {
                matches.push(nomination);
            }
        }
        matches.sort_by_key(|n| n.created_at);
        Ok(matches)
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn health_check(&self) -> MetadataResult<()> {
        Ok(())
    }
}
